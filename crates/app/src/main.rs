use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, warn};

use app::config::{self, AppConfig};
use app::{AppState, Terminal, logging};
use services::export::FILE_NAME;
use services::{
    EndpointClient, ModelClient, ModelQuestionGenerator, ModelSummaryGenerator, ReflectionLoop,
};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    Invalid(config::ConfigError),
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::Invalid(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ArgsError {}

impl From<config::ConfigError> for ArgsError {
    fn from(err: config::ConfigError) -> Self {
        ArgsError::Invalid(err)
    }
}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- serve   [--bind <host:port>]");
    eprintln!("  cargo run -p app -- reflect [--endpoint <url>] [--ticks <n>] [--export <path>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --bind {}", config::DEFAULT_BIND);
    eprintln!("  --ticks 4");
    eprintln!("  --export {FILE_NAME}");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  CALM_AI_API_KEY, CALM_AI_BASE_URL, CALM_AI_MODEL");
    eprintln!("  CALM_BIND, CALM_ENDPOINT, CALM_BREATH_TICKS, CALM_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Serve,
    Reflect,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "serve" => Some(Self::Serve),
            "reflect" => Some(Self::Reflect),
            _ => None,
        }
    }
}

/// Environment settings with command-line overrides applied.
struct Args {
    config: AppConfig,
    export_path: PathBuf,
}

impl Args {
    fn parse(
        config: AppConfig,
        args: &mut impl Iterator<Item = String>,
    ) -> Result<Self, ArgsError> {
        let mut parsed = Self {
            config,
            export_path: PathBuf::from(FILE_NAME),
        };

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--bind" => {
                    parsed.config.bind = config::parse_bind(&require_value(args, "--bind")?)?;
                }
                "--endpoint" => parsed.config.endpoint = Some(require_value(args, "--endpoint")?),
                "--ticks" => {
                    parsed.config.breath_ticks =
                        config::parse_ticks(&require_value(args, "--ticks")?)?;
                }
                "--export" => parsed.export_path = require_value(args, "--export")?.into(),
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(parsed)
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // No subcommand runs the terminal client.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Reflect,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Reflect,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };
    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let config = AppConfig::from_env()?;
    let parsed = Args::parse(config, &mut argv.into_iter()).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    match cmd {
        Command::Serve => {
            let client = ModelClient::from_env();
            if !client.enabled() {
                warn!("CALM_AI_API_KEY is not set; every generation request will fail");
            }
            app::serve(parsed.config.bind, AppState::from_model(client)).await?;
        }
        Command::Reflect => {
            let settings = parsed.config.session_settings();
            let workflow = match parsed.config.endpoint {
                Some(endpoint) => {
                    info!(%endpoint, "using generation endpoints");
                    let client = Arc::new(EndpointClient::new(endpoint));
                    ReflectionLoop::new(client.clone(), client)
                }
                None => {
                    let client = ModelClient::from_env();
                    info!(model = client.model_name().unwrap_or("none"), "using model directly");
                    ReflectionLoop::new(
                        Arc::new(ModelQuestionGenerator::new(client.clone())),
                        Arc::new(ModelSummaryGenerator::new(client)),
                    )
                }
            };
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            let mut terminal =
                Terminal::new(workflow, settings, parsed.export_path, std::io::stdout());
            terminal.run(stdin).await?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    logging::init();
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
