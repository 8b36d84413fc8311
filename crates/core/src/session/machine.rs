use std::collections::BTreeSet;

use crate::bank;
use crate::error::SessionError;
use crate::model::{AnswerSet, Question, QuestionId, Summary};

use super::checkpoint::is_review_step;
use super::context::{
    AnsweredQuestion, Effect, Notice, QuestionContext, QuestionOutcome, SummaryContext,
    SummaryOutcome, Ticket,
};
use super::mode::{Mode, ModeKind};

/// Default number of ticks in each breathing phase.
pub const DEFAULT_BREATH_TICKS: u32 = 4;

//
// ─── SETTINGS ──────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSettings {
    breath_ticks: u32,
}

impl SessionSettings {
    /// Ticks per breathing phase, clamped to at least one.
    #[must_use]
    pub fn with_breath_ticks(breath_ticks: u32) -> Self {
        Self {
            breath_ticks: breath_ticks.max(1),
        }
    }

    #[must_use]
    pub fn breath_ticks(&self) -> u32 {
        self.breath_ticks
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self::with_breath_ticks(DEFAULT_BREATH_TICKS)
    }
}

//
// ─── ACTIONS ───────────────────────────────────────────────────────────────────
//

/// Every input the session reacts to, user-driven or scheduler-driven.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Begin,
    Advance,
    Back,
    Tick,
    ToggleOption {
        question_id: QuestionId,
        option: String,
    },
    EditAnswer {
        question_id: QuestionId,
        text: String,
    },
    ShowFaq,
    CloseFaq,
    Continue,
    Review,
    CloseReview,
    Reset,
    QuestionReady {
        ticket: Ticket,
        outcome: QuestionOutcome,
    },
    SummaryReady {
        ticket: Ticket,
        outcome: SummaryOutcome,
    },
}

impl Action {
    fn name(&self) -> &'static str {
        match self {
            Action::Begin => "begin",
            Action::Advance => "advance",
            Action::Back => "back",
            Action::Tick => "tick",
            Action::ToggleOption { .. } => "toggle option",
            Action::EditAnswer { .. } => "edit answer",
            Action::ShowFaq => "show faq",
            Action::CloseFaq => "close faq",
            Action::Continue => "continue",
            Action::Review => "review",
            Action::CloseReview => "close review",
            Action::Reset => "reset",
            Action::QuestionReady { .. } => "question ready",
            Action::SummaryReady { .. } => "summary ready",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Request {
    Question,
    Summary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Pending {
    request: Request,
    ticket: Ticket,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One user's questionnaire run. Never persisted.
///
/// All state changes go through [`Session::apply`]; the named methods are
/// shorthands for it. The session never performs I/O: when it needs a
/// question or a summary it returns an [`Effect`] and waits for the
/// `QuestionReady` / `SummaryReady` action carrying the same [`Ticket`].
#[derive(Debug, Clone)]
pub struct Session {
    settings: SessionSettings,
    current_step: usize,
    questions: Vec<Question>,
    answers: AnswerSet,
    mode: Mode,
    pending: Option<Pending>,
    next_ticket: Ticket,
    offered_reviews: BTreeSet<usize>,
    summary: Option<Summary>,
    notice: Option<Notice>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SessionSettings::default())
    }
}

impl Session {
    #[must_use]
    pub fn new(settings: SessionSettings) -> Self {
        Self {
            settings,
            current_step: 0,
            questions: bank::seed_questions(),
            answers: AnswerSet::new(),
            mode: Mode::Welcome,
            pending: None,
            next_ticket: Ticket::default(),
            offered_reviews: BTreeSet::new(),
            summary: None,
            notice: None,
        }
    }

    /// The single transition function.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` when the action is not available in the current
    /// mode, a request is already pending, or the action names an unknown
    /// question or option. The session is unchanged on error.
    pub fn apply(&mut self, action: Action) -> Result<Effect, SessionError> {
        let name = action.name();
        match action {
            Action::Reset => {
                self.reset_state();
                Ok(Effect::None)
            }
            Action::Tick => {
                self.tick_countdown();
                Ok(Effect::None)
            }
            Action::QuestionReady { ticket, outcome } => {
                self.land_question(ticket, outcome);
                Ok(Effect::None)
            }
            Action::SummaryReady { ticket, outcome } => {
                self.land_summary(ticket, outcome);
                Ok(Effect::None)
            }
            Action::ToggleOption {
                question_id,
                option,
            } => {
                let question = self.question(question_id)?;
                if !question.has_option(&option) && !self.answers.contains(question_id, &option)
                {
                    return Err(SessionError::UnknownOption {
                        question_id,
                        option,
                    });
                }
                self.answers.toggle(question_id, &option);
                Ok(Effect::None)
            }
            Action::EditAnswer { question_id, text } => {
                self.require(name, &[ModeKind::ReviewDetail])?;
                self.question(question_id)?;
                self.answers.replace(question_id, &text);
                Ok(Effect::None)
            }
            Action::Begin => {
                self.require(name, &[ModeKind::Welcome])?;
                self.current_step = 1.min(self.questions.len());
                self.mode = Mode::Question;
                Ok(Effect::None)
            }
            Action::ShowFaq => {
                self.require(name, &[ModeKind::Welcome])?;
                self.mode = Mode::Faq;
                Ok(Effect::None)
            }
            Action::CloseFaq => {
                self.require(name, &[ModeKind::Faq])?;
                self.mode = Mode::Welcome;
                Ok(Effect::None)
            }
            Action::Back => {
                self.require(name, &[ModeKind::Question])?;
                self.require_idle()?;
                self.current_step = self.current_step.saturating_sub(1);
                if self.current_step == 0 {
                    self.mode = Mode::Welcome;
                }
                Ok(Effect::None)
            }
            Action::Advance => {
                self.require(name, &[ModeKind::Question])?;
                self.require_idle()?;
                if is_review_step(self.current_step)
                    && self.offered_reviews.insert(self.current_step)
                {
                    self.mode = Mode::ReviewPrompt;
                    self.notice = None;
                    return Ok(Effect::None);
                }
                Ok(self.proceed())
            }
            Action::Continue => {
                self.require(name, &[ModeKind::ReviewPrompt])?;
                self.require_idle()?;
                self.notice = None;
                self.mode = Mode::Question;
                Ok(self.proceed())
            }
            Action::Review => {
                self.require(name, &[ModeKind::ReviewPrompt])?;
                self.require_idle()?;
                self.notice = None;
                Ok(Effect::GenerateSummary {
                    ticket: self.issue(Request::Summary),
                    context: self.summary_context(),
                })
            }
            Action::CloseReview => {
                self.require(name, &[ModeKind::ReviewDetail])?;
                self.mode = Mode::Question;
                Ok(Effect::None)
            }
        }
    }

    pub fn begin(&mut self) -> Result<Effect, SessionError> {
        self.apply(Action::Begin)
    }

    pub fn advance(&mut self) -> Result<Effect, SessionError> {
        self.apply(Action::Advance)
    }

    pub fn back(&mut self) -> Result<Effect, SessionError> {
        self.apply(Action::Back)
    }

    pub fn tick(&mut self) {
        self.tick_countdown();
    }

    pub fn toggle_option(
        &mut self,
        question_id: QuestionId,
        option: impl Into<String>,
    ) -> Result<Effect, SessionError> {
        self.apply(Action::ToggleOption {
            question_id,
            option: option.into(),
        })
    }

    pub fn continue_session(&mut self) -> Result<Effect, SessionError> {
        self.apply(Action::Continue)
    }

    pub fn review(&mut self) -> Result<Effect, SessionError> {
        self.apply(Action::Review)
    }

    pub fn reset(&mut self) {
        self.reset_state();
    }

    //
    // ─── QUERIES ───────────────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn settings(&self) -> SessionSettings {
        self.settings
    }

    #[must_use]
    pub fn current_step(&self) -> usize {
        self.current_step
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn answers(&self) -> &AnswerSet {
        &self.answers
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// The question on screen, if the session is showing one.
    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        match self.mode {
            Mode::Question => self.current_step.checked_sub(1).and_then(|i| self.questions.get(i)),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_waiting(&self) -> bool {
        self.pending.is_some()
    }

    #[must_use]
    pub fn summary(&self) -> Option<&Summary> {
        self.summary.as_ref()
    }

    #[must_use]
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Answered questions in question order.
    #[must_use]
    pub fn answered(&self) -> Vec<AnsweredQuestion> {
        self.questions
            .iter()
            .filter(|q| self.answers.is_answered(q.id()))
            .map(|q| AnsweredQuestion::new(q.text(), self.answers.selected(q.id()).to_vec()))
            .collect()
    }

    //
    // ─── INTERNALS ─────────────────────────────────────────────────────────────
    //

    fn require(&self, action: &'static str, allowed: &[ModeKind]) -> Result<(), SessionError> {
        let mode = self.mode.kind();
        if allowed.contains(&mode) {
            Ok(())
        } else {
            Err(SessionError::NotAllowed { action, mode })
        }
    }

    fn require_idle(&self) -> Result<(), SessionError> {
        if self.pending.is_some() {
            Err(SessionError::RequestPending)
        } else {
            Ok(())
        }
    }

    fn question(&self, question_id: QuestionId) -> Result<&Question, SessionError> {
        self.questions
            .iter()
            .find(|q| q.id() == question_id)
            .ok_or(SessionError::UnknownQuestion(question_id))
    }

    /// Move towards the next question, asking for one if none is left.
    fn proceed(&mut self) -> Effect {
        if self.current_step < self.questions.len() {
            self.start_transition(self.current_step + 1);
            Effect::None
        } else {
            Effect::GenerateQuestion {
                ticket: self.issue(Request::Question),
                context: self.question_context(),
            }
        }
    }

    fn issue(&mut self, request: Request) -> Ticket {
        let ticket = self.next_ticket;
        self.next_ticket = ticket.next();
        self.pending = Some(Pending { request, ticket });
        ticket
    }

    /// Clear the pending request if `ticket` answers it.
    fn settle(&mut self, request: Request, ticket: Ticket) -> bool {
        let current = Pending { request, ticket };
        if self.pending == Some(current) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    fn start_transition(&mut self, target: usize) {
        self.mode = Mode::TransitionIn {
            remaining: self.settings.breath_ticks,
            target,
        };
    }

    fn tick_countdown(&mut self) {
        let ticks = self.settings.breath_ticks;
        self.mode = match self.mode {
            Mode::TransitionIn { remaining, target } if remaining > 1 => Mode::TransitionIn {
                remaining: remaining - 1,
                target,
            },
            Mode::TransitionIn { target, .. } => Mode::TransitionOut {
                remaining: ticks,
                target,
            },
            Mode::TransitionOut { remaining, target } if remaining > 1 => Mode::TransitionOut {
                remaining: remaining - 1,
                target,
            },
            Mode::TransitionOut { target, .. } => {
                self.current_step = target.min(self.questions.len());
                Mode::Question
            }
            other => other,
        };
    }

    fn land_question(&mut self, ticket: Ticket, outcome: QuestionOutcome) {
        // A result for a superseded or unknown request is dropped.
        if !self.settle(Request::Question, ticket) {
            return;
        }

        let id = self.next_question_id();
        let question = match outcome {
            QuestionOutcome::Generated(draft) => Question::from_draft(id, draft),
            QuestionOutcome::Failed { .. } => bank::FALLBACK.to_question(id),
        };
        self.questions.push(question);
        self.start_transition(self.current_step + 1);
    }

    fn land_summary(&mut self, ticket: Ticket, outcome: SummaryOutcome) {
        if !self.settle(Request::Summary, ticket) {
            return;
        }

        match outcome {
            SummaryOutcome::Generated(summary) => {
                self.summary = Some(summary);
                self.notice = None;
                self.mode = Mode::ReviewDetail;
            }
            SummaryOutcome::Failed { reason } => {
                self.notice = Some(Notice::SummaryFailed { reason });
            }
        }
    }

    fn next_question_id(&self) -> QuestionId {
        self.questions
            .iter()
            .map(Question::id)
            .max()
            .map_or(QuestionId::new(1), QuestionId::next)
    }

    fn question_context(&self) -> QuestionContext {
        QuestionContext {
            history: self
                .questions
                .iter()
                .map(|q| AnsweredQuestion::new(q.text(), self.answers.selected(q.id()).to_vec()))
                .collect(),
        }
    }

    fn summary_context(&self) -> SummaryContext {
        SummaryContext {
            answered: self.answered(),
        }
    }

    /// Tickets keep counting across resets so a result from the previous run
    /// can never match a new request.
    fn reset_state(&mut self) {
        let next_ticket = self.next_ticket;
        *self = Self::new(self.settings);
        self.next_ticket = next_ticket;
    }
}
