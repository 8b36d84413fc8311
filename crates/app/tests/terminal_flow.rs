use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use app::Terminal;
use calm_core::model::{QuestionDraft, Summary};
use calm_core::session::{ModeKind, QuestionContext, SessionSettings, SummaryContext};
use calm_core::time::fixed_clock;
use services::{
    ExportDocument, GenerationError, QuestionGenerator, ReflectionLoop, SummaryGenerator,
};

#[derive(Default)]
struct NumberedQuestions {
    calls: AtomicUsize,
}

#[async_trait::async_trait]
impl QuestionGenerator for NumberedQuestions {
    async fn generate_question(
        &self,
        _context: &QuestionContext,
    ) -> Result<QuestionDraft, GenerationError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(QuestionDraft::new(
            format!("Reflection {n}?"),
            ["Calm", "Restless", "Not sure"].map(String::from),
        )?)
    }
}

struct OneTaskSummary;

#[async_trait::async_trait]
impl SummaryGenerator for OneTaskSummary {
    async fn generate_summary(&self, _context: &SummaryContext) -> Result<Summary, GenerationError> {
        Ok(Summary::new(
            "You stayed present. Keep noticing.",
            vec!["Pause for one minute of stillness".to_string()],
        )?)
    }
}

fn terminal(export_path: std::path::PathBuf) -> Terminal<Vec<u8>> {
    let workflow = ReflectionLoop::new(
        Arc::new(NumberedQuestions::default()),
        Arc::new(OneTaskSummary),
    );
    Terminal::new(
        workflow,
        SessionSettings::with_breath_ticks(1),
        export_path,
        Vec::new(),
    )
    .with_tick_period(Duration::from_millis(1))
    .with_clock(fixed_clock())
}

#[tokio::test]
async fn faq_toggle_advance_and_back() {
    let mut term = terminal(std::env::temp_dir().join("calm-unused.pdf"));
    let script = "f\n\n\n1 2\n\nb\nq\n";
    term.run(script.as_bytes()).await.unwrap();

    let session = term.session();
    assert_eq!(session.mode().kind(), ModeKind::Question);
    assert_eq!(session.current_step(), 1);
    let first = session.current_question().unwrap().id();
    assert_eq!(session.answers().selected(first), ["Happy", "Sad"]);

    let output = String::from_utf8(term.into_output()).unwrap();
    assert!(output.contains("What is this form for?"));
    assert!(output.contains("Breathe in... 1"));
    assert!(output.contains("Breathe out... 1"));
    assert!(output.contains("2. What's one thing you're grateful for?"));
}

#[tokio::test]
async fn full_cycle_reaches_review_and_exports() {
    let path = std::env::temp_dir().join(format!("calm-journey-{}.pdf", std::process::id()));
    let mut term = terminal(path.clone());

    let mut script = String::from("\n");
    for _ in 0..10 {
        script.push_str("1\n\n");
    }
    script.push_str("r\ne 1 Calm now\nx\nq\n");
    term.run(script.as_bytes()).await.unwrap();

    let session = term.session();
    assert_eq!(session.mode().kind(), ModeKind::ReviewDetail);
    assert_eq!(session.questions().len(), 10);

    let exported = std::fs::read(&path).unwrap();
    let _ = std::fs::remove_file(&path);
    assert!(exported.starts_with(b"%PDF-"));

    let document = ExportDocument::from_session(session, fixed_clock()).unwrap();
    let pdf = lopdf::Document::load_mem(&exported).unwrap();
    assert_eq!(pdf.get_pages().len(), document.pages().len());
    let text = document.pages().concat();
    assert!(text.contains("November 14, 2023"));
    assert!(text.contains("Q1: How are you feeling today?\nA: Calm now"));
    assert!(text.contains("Q10: Reflection 7?\nA: Calm"));
    assert!(text.contains("  1. Pause for one minute of stillness"));

    let output = String::from_utf8(term.into_output()).unwrap();
    assert!(output.contains("Review your answers or keep going?"));
    assert!(output.contains("Saved to"));
}

#[tokio::test]
async fn unknown_input_is_reported_not_fatal() {
    let mut term = terminal(std::env::temp_dir().join("calm-unused.pdf"));
    term.run("dance\n\n7\nq\n".as_bytes()).await.unwrap();

    let output = String::from_utf8(term.into_output()).unwrap();
    assert!(output.contains("Unrecognised input"));
    assert!(output.contains("There is no option 7."));
}
