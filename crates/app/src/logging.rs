use tracing_subscriber::EnvFilter;

/// Filter directives are read from `CALM_LOG`, e.g. `CALM_LOG=services=debug`.
pub const LOG_ENV: &str = "CALM_LOG";

const DEFAULT_DIRECTIVES: &str = "info,tower_http=warn,hyper=warn,reqwest=warn";

/// Install the global subscriber. Logs go to stderr so the terminal client
/// keeps stdout for the questionnaire. Safe to call more than once.
pub fn init() {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init();
}
