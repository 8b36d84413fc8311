use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use calm_core::bank::FALLBACK;
use calm_core::model::{QuestionDraft, QuestionId, Summary};
use calm_core::session::{
    Action, ModeKind, Notice, QuestionContext, Session, SessionSettings, SummaryContext,
};
use calm_core::time::fixed_clock;
use services::{
    ExportDocument, GenerationError, QuestionGenerator, ReflectionLoop, SummaryGenerator,
};

#[derive(Default)]
struct CountingQuestions {
    calls: AtomicUsize,
    seen: Mutex<Vec<usize>>,
}

#[async_trait::async_trait]
impl QuestionGenerator for CountingQuestions {
    async fn generate_question(
        &self,
        context: &QuestionContext,
    ) -> Result<QuestionDraft, GenerationError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.seen.lock().unwrap().push(context.history.len());
        Ok(QuestionDraft::new(
            format!("Generated question {n}?"),
            ["Calm", "Busy", "Not sure"].map(String::from),
        )?)
    }
}

struct FailingQuestions;

#[async_trait::async_trait]
impl QuestionGenerator for FailingQuestions {
    async fn generate_question(
        &self,
        _context: &QuestionContext,
    ) -> Result<QuestionDraft, GenerationError> {
        Err(GenerationError::EmptyResponse)
    }
}

struct FixedSummary;

#[async_trait::async_trait]
impl SummaryGenerator for FixedSummary {
    async fn generate_summary(&self, context: &SummaryContext) -> Result<Summary, GenerationError> {
        Ok(Summary::new(
            format!("You answered {} questions with care.", context.answered.len()),
            vec!["Take three slow breaths".to_string()],
        )?)
    }
}

struct FailingSummary;

#[async_trait::async_trait]
impl SummaryGenerator for FailingSummary {
    async fn generate_summary(&self, _context: &SummaryContext) -> Result<Summary, GenerationError> {
        Err(GenerationError::Disabled)
    }
}

fn land(session: &mut Session) {
    while session.mode().is_transition() {
        session.tick();
    }
}

fn answer_current(session: &mut Session) {
    let question = session.current_question().expect("question on screen").clone();
    session
        .toggle_option(question.id(), question.options()[0].clone())
        .unwrap();
}

#[tokio::test]
async fn loop_generates_past_the_seed_bank_and_reaches_review() {
    let questions = Arc::new(CountingQuestions::default());
    let workflow = ReflectionLoop::new(questions.clone(), Arc::new(FixedSummary));
    let mut session = Session::new(SessionSettings::with_breath_ticks(1));

    workflow.dispatch(&mut session, Action::Begin).await.unwrap();
    while session.current_step() < 10 {
        answer_current(&mut session);
        let result = workflow.dispatch(&mut session, Action::Advance).await.unwrap();
        assert!(!result.used_fallback_question);
        land(&mut session);
    }

    assert_eq!(session.questions().len(), 10);
    assert_eq!(questions.calls.load(Ordering::SeqCst), 7);
    assert_eq!(*questions.seen.lock().unwrap(), vec![3, 4, 5, 6, 7, 8, 9]);

    answer_current(&mut session);
    let result = workflow.dispatch(&mut session, Action::Advance).await.unwrap();
    assert_eq!(result.mode, ModeKind::ReviewPrompt);

    let result = workflow.dispatch(&mut session, Action::Review).await.unwrap();
    assert_eq!(result.mode, ModeKind::ReviewDetail);
    assert_eq!(result.summary_error, None);
    assert_eq!(
        session.summary().unwrap().text(),
        "You answered 10 questions with care."
    );

    let doc = ExportDocument::from_session(&session, fixed_clock()).unwrap();
    let text = doc.pages().concat();
    assert!(text.contains("Q1: How are you feeling today?"));
    assert!(text.contains("Q10: Generated question 7?"));
    assert!(text.contains("November 14, 2023"));
    assert!(doc.to_pdf().unwrap().starts_with(b"%PDF-"));
}

#[tokio::test]
async fn failed_generation_lands_the_fallback_question() {
    let workflow = ReflectionLoop::new(Arc::new(FailingQuestions), Arc::new(FixedSummary));
    let mut session = Session::new(SessionSettings::with_breath_ticks(1));

    workflow.dispatch(&mut session, Action::Begin).await.unwrap();
    for _ in 0..2 {
        workflow.dispatch(&mut session, Action::Advance).await.unwrap();
        land(&mut session);
    }
    assert_eq!(session.current_step(), 3);

    let result = workflow.dispatch(&mut session, Action::Advance).await.unwrap();
    assert!(result.used_fallback_question);
    assert_eq!(result.mode, ModeKind::TransitionIn);
    land(&mut session);

    let current = session.current_question().unwrap();
    assert_eq!(current.text(), FALLBACK.text);
    assert_eq!(current.id(), QuestionId::new(4));
    assert!(!session.is_waiting());
}

#[tokio::test]
async fn failed_summary_leaves_a_notice_and_can_be_retried() {
    let questions = Arc::new(CountingQuestions::default());
    let failing = ReflectionLoop::new(questions.clone(), Arc::new(FailingSummary));
    let working = ReflectionLoop::new(questions, Arc::new(FixedSummary));
    let mut session = Session::new(SessionSettings::with_breath_ticks(1));

    failing.dispatch(&mut session, Action::Begin).await.unwrap();
    while session.mode().kind() != ModeKind::ReviewPrompt {
        answer_current(&mut session);
        failing.dispatch(&mut session, Action::Advance).await.unwrap();
        land(&mut session);
    }

    let result = failing.dispatch(&mut session, Action::Review).await.unwrap();
    assert_eq!(result.mode, ModeKind::ReviewPrompt);
    assert!(result.summary_error.is_some());
    assert!(matches!(session.notice(), Some(Notice::SummaryFailed { .. })));
    assert!(session.summary().is_none());

    let result = working.dispatch(&mut session, Action::Review).await.unwrap();
    assert_eq!(result.mode, ModeKind::ReviewDetail);
    assert!(session.summary().is_some());
}

#[tokio::test]
async fn rejected_actions_surface_as_session_errors() {
    let workflow = ReflectionLoop::new(Arc::new(FailingQuestions), Arc::new(FixedSummary));
    let mut session = Session::default();

    let err = workflow
        .dispatch(&mut session, Action::Advance)
        .await
        .unwrap_err();
    assert!(matches!(err, calm_core::SessionError::NotAllowed { .. }));
    assert_eq!(session.mode().kind(), ModeKind::Welcome);
}
