use std::sync::Arc;

use tracing::{info, warn};

use calm_core::session::{Action, Effect, ModeKind, QuestionOutcome, Session, SummaryOutcome};
use calm_core::SessionError;

use crate::generation::{QuestionGenerator, SummaryGenerator};

/// What happened while dispatching one action, effects included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchResult {
    pub mode: ModeKind,
    pub used_fallback_question: bool,
    pub summary_error: Option<String>,
}

/// Drives a [`Session`] by resolving the effects it asks for.
///
/// The session stays pure; this loop owns the generators and feeds their
/// outcomes back as completion actions.
#[derive(Clone)]
pub struct ReflectionLoop {
    questions: Arc<dyn QuestionGenerator>,
    summaries: Arc<dyn SummaryGenerator>,
}

impl ReflectionLoop {
    #[must_use]
    pub fn new(
        questions: Arc<dyn QuestionGenerator>,
        summaries: Arc<dyn SummaryGenerator>,
    ) -> Self {
        Self {
            questions,
            summaries,
        }
    }

    /// Apply `action` and run every effect it produces to completion.
    ///
    /// Generator failures never surface here: a failed question lands as the
    /// fallback question and a failed summary leaves a notice on the session.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` when the session rejects `action`.
    pub async fn dispatch(
        &self,
        session: &mut Session,
        action: Action,
    ) -> Result<DispatchResult, SessionError> {
        let mut result = DispatchResult {
            mode: session.mode().kind(),
            used_fallback_question: false,
            summary_error: None,
        };

        let mut effect = session.apply(action)?;
        loop {
            let completion = match effect {
                Effect::None => break,
                Effect::GenerateQuestion { ticket, context } => {
                    let outcome = match self.questions.generate_question(&context).await {
                        Ok(draft) => QuestionOutcome::Generated(draft),
                        Err(err) => {
                            warn!(%ticket, error = %err, "question generation failed, using fallback");
                            result.used_fallback_question = true;
                            QuestionOutcome::Failed {
                                reason: err.to_string(),
                            }
                        }
                    };
                    Action::QuestionReady { ticket, outcome }
                }
                Effect::GenerateSummary { ticket, context } => {
                    let outcome = match self.summaries.generate_summary(&context).await {
                        Ok(summary) => SummaryOutcome::Generated(summary),
                        Err(err) => {
                            warn!(%ticket, error = %err, "summary generation failed");
                            result.summary_error = Some(err.to_string());
                            SummaryOutcome::Failed {
                                reason: err.to_string(),
                            }
                        }
                    };
                    Action::SummaryReady { ticket, outcome }
                }
            };
            effect = session.apply(completion)?;
        }

        result.mode = session.mode().kind();
        if result.mode == ModeKind::ReviewPrompt {
            info!(step = session.current_step(), "review checkpoint reached");
        }
        Ok(result)
    }
}
