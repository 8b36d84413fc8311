/// Which panel the session is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Welcome,
    Faq,
    /// Showing `questions[current_step - 1]`.
    Question,
    /// Breathing in before `target` is shown; `remaining` ticks left in this phase.
    TransitionIn { remaining: u32, target: usize },
    /// Breathing out before `target` is shown.
    TransitionOut { remaining: u32, target: usize },
    ReviewPrompt,
    ReviewDetail,
}

impl Mode {
    #[must_use]
    pub fn kind(&self) -> ModeKind {
        match self {
            Mode::Welcome => ModeKind::Welcome,
            Mode::Faq => ModeKind::Faq,
            Mode::Question => ModeKind::Question,
            Mode::TransitionIn { .. } => ModeKind::TransitionIn,
            Mode::TransitionOut { .. } => ModeKind::TransitionOut,
            Mode::ReviewPrompt => ModeKind::ReviewPrompt,
            Mode::ReviewDetail => ModeKind::ReviewDetail,
        }
    }

    #[must_use]
    pub fn is_transition(&self) -> bool {
        matches!(self, Mode::TransitionIn { .. } | Mode::TransitionOut { .. })
    }

    /// Countdown value to display during a transition.
    #[must_use]
    pub fn countdown(&self) -> Option<u32> {
        match self {
            Mode::TransitionIn { remaining, .. } | Mode::TransitionOut { remaining, .. } => {
                Some(*remaining)
            }
            _ => None,
        }
    }
}

/// Payload-free discriminant of `Mode`, for errors and reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModeKind {
    Welcome,
    Faq,
    Question,
    TransitionIn,
    TransitionOut,
    ReviewPrompt,
    ReviewDetail,
}
