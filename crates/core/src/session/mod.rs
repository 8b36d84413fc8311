//! Questionnaire session state machine.
//!
//! ```text
//! Welcome ⇄ Faq
//! Welcome → Question(1) → TransitionIn → TransitionOut → Question(2) → …
//! Question(n) → ReviewPrompt → { TransitionIn (continue) | ReviewDetail (review) }
//! ```
//!
//! Countdown ticks come from an external scheduler; generation is requested
//! through [`Effect`] values and answered with `QuestionReady` / `SummaryReady`
//! carrying the request's [`Ticket`].

mod checkpoint;
mod context;
mod machine;
mod mode;


pub use checkpoint::{FIRST_REVIEW_STEP, REVIEW_INTERVAL, is_review_step};
pub use context::{
    AnsweredQuestion, Effect, Notice, QuestionContext, QuestionOutcome, SummaryContext,
    SummaryOutcome, Ticket,
};
pub use machine::{Action, DEFAULT_BREATH_TICKS, Session, SessionSettings};
pub use mode::{Mode, ModeKind};
