//! Line-oriented questionnaire client.
//!
//! Reads one command per line, drives the session through the reflection
//! loop, and runs the breathing countdown on a `tokio` interval.

use std::fmt::Write as _;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info};

use calm_core::faq::FAQ;
use calm_core::model::QuestionId;
use calm_core::session::{Action, Mode, ModeKind, Notice, Session, SessionSettings};
use services::{Clock, ExportDocument, ReflectionLoop};

/// Wall time of one countdown tick.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// What a typed line means in the current mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Begin,
    ShowFaq,
    CloseFaq,
    Next,
    Back,
    Toggle(Vec<usize>),
    Continue,
    Review,
    CloseReview,
    Edit { index: usize, text: String },
    Export,
    Reset,
    Help,
    Quit,
}

/// Interpret `line` for `mode`. `None` means the line is not a command here.
#[must_use]
pub fn parse_input(mode: ModeKind, line: &str) -> Option<Input> {
    let line = line.trim();
    let (word, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(word, rest)| (word, rest.trim()));
    let word = word.to_ascii_lowercase();

    match word.as_str() {
        "q" | "quit" => return Some(Input::Quit),
        "reset" => return Some(Input::Reset),
        "h" | "help" | "?" => return Some(Input::Help),
        _ => {}
    }

    match mode {
        ModeKind::Welcome => match word.as_str() {
            "" | "s" | "start" => Some(Input::Begin),
            "f" | "faq" => Some(Input::ShowFaq),
            _ => None,
        },
        ModeKind::Faq => Some(Input::CloseFaq),
        ModeKind::Question => match word.as_str() {
            "" | "n" | "next" => Some(Input::Next),
            "b" | "back" => Some(Input::Back),
            _ => parse_indices(line).map(Input::Toggle),
        },
        ModeKind::ReviewPrompt => match word.as_str() {
            "c" | "continue" => Some(Input::Continue),
            "r" | "review" => Some(Input::Review),
            _ => None,
        },
        ModeKind::ReviewDetail => match word.as_str() {
            "c" | "close" => Some(Input::CloseReview),
            "x" | "export" => Some(Input::Export),
            "e" | "edit" => {
                let (index, text) = rest
                    .split_once(char::is_whitespace)
                    .map_or((rest, ""), |(index, text)| (index, text.trim()));
                let index = index.parse().ok().filter(|index| *index > 0)?;
                Some(Input::Edit {
                    index,
                    text: text.to_string(),
                })
            }
            _ => None,
        },
        ModeKind::TransitionIn | ModeKind::TransitionOut => None,
    }
}

/// `1 3`, `1,3` and `2` all select by 1-based option number.
fn parse_indices(line: &str) -> Option<Vec<usize>> {
    let indices: Option<Vec<usize>> = line
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .map(|part| part.parse().ok().filter(|index| *index > 0))
        .collect();
    indices.filter(|indices| !indices.is_empty())
}

/// Text for the current screen.
#[must_use]
pub fn render(session: &Session) -> String {
    let mut out = String::new();
    match session.mode() {
        Mode::Welcome => {
            out.push_str("Welcome. Take a moment to check in with yourself.\n");
            out.push_str("[enter] start   [f] about   [q] quit\n");
        }
        Mode::Faq => {
            for entry in FAQ {
                let _ = writeln!(out, "{}\n  {}\n", entry.question, entry.answer);
            }
            out.push_str("[enter] back\n");
        }
        Mode::Question => {
            if let Some(question) = session.current_question() {
                let _ = writeln!(out, "{}. {}", session.current_step(), question.text());
                for (index, option) in question.options().iter().enumerate() {
                    let mark = if session.answers().contains(question.id(), option) {
                        'x'
                    } else {
                        ' '
                    };
                    let _ = writeln!(out, "  [{mark}] {}. {option}", index + 1);
                }
                out.push_str("[numbers] toggle   [enter] next   [b] back\n");
            }
        }
        Mode::TransitionIn { remaining, .. } => {
            let _ = writeln!(out, "Breathe in... {remaining}");
        }
        Mode::TransitionOut { remaining, .. } => {
            let _ = writeln!(out, "Breathe out... {remaining}");
        }
        Mode::ReviewPrompt => {
            let _ = writeln!(
                out,
                "You have answered {} questions. Review your answers or keep going?",
                session.answered().len()
            );
            if let Some(Notice::SummaryFailed { .. }) = session.notice() {
                out.push_str("The summary could not be generated. Try again.\n");
            }
            out.push_str("[r] review   [c] continue\n");
        }
        Mode::ReviewDetail => {
            if let Some(summary) = session.summary() {
                for sentence in summary.sentences() {
                    let _ = writeln!(out, "{sentence}");
                }
                out.push_str("\nSuggested tasks:\n");
                for (index, task) in summary.tasks().iter().enumerate() {
                    let _ = writeln!(out, "  {}. {task}", index + 1);
                }
            }
            out.push_str("\nYour answers:\n");
            for (index, entry) in session.answered().iter().enumerate() {
                let _ = writeln!(
                    out,
                    "  {}. {}\n     {}",
                    index + 1,
                    entry.text,
                    entry.answers.join(", ")
                );
            }
            out.push_str("[e <n> <text>] edit   [x] export   [c] close\n");
        }
    }
    out
}

/// Interactive session over any line source and writer.
pub struct Terminal<W> {
    workflow: ReflectionLoop,
    session: Session,
    tick_period: Duration,
    export_path: PathBuf,
    clock: Clock,
    out: W,
}

impl<W: Write> Terminal<W> {
    #[must_use]
    pub fn new(
        workflow: ReflectionLoop,
        settings: SessionSettings,
        export_path: PathBuf,
        out: W,
    ) -> Self {
        Self {
            workflow,
            session: Session::new(settings),
            tick_period: TICK_PERIOD,
            export_path,
            clock: Clock::default_clock(),
            out,
        }
    }

    #[must_use]
    pub fn with_tick_period(mut self, tick_period: Duration) -> Self {
        self.tick_period = tick_period;
        self
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    #[must_use]
    pub fn into_output(self) -> W {
        self.out
    }

    /// Process lines until `quit` or end of input.
    ///
    /// # Errors
    ///
    /// Returns I/O errors from reading input, writing output or writing the
    /// export file. Rejected commands are reported on the output instead.
    pub async fn run<R>(&mut self, input: R) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = input.lines();
        self.show()?;
        while let Some(line) = lines.next_line().await? {
            let Some(command) = parse_input(self.session.mode().kind(), &line) else {
                writeln!(self.out, "Unrecognised input. Type 'help' for commands.")?;
                continue;
            };
            if command == Input::Quit {
                break;
            }
            self.handle(command).await?;
            self.breathe().await?;
            self.show()?;
        }
        Ok(())
    }

    async fn handle(&mut self, command: Input) -> std::io::Result<()> {
        let action = match command {
            Input::Begin => Action::Begin,
            Input::ShowFaq => Action::ShowFaq,
            Input::CloseFaq => Action::CloseFaq,
            Input::Next => Action::Advance,
            Input::Back => Action::Back,
            Input::Continue => Action::Continue,
            Input::Review => {
                writeln!(self.out, "Reflecting on your answers...")?;
                Action::Review
            }
            Input::CloseReview => Action::CloseReview,
            Input::Reset => Action::Reset,
            Input::Toggle(indices) => return self.toggle(&indices).await,
            Input::Edit { index, text } => match self.answered_id(index) {
                Some(question_id) => Action::EditAnswer { question_id, text },
                None => {
                    writeln!(self.out, "There is no answer {index}.")?;
                    return Ok(());
                }
            },
            Input::Export => return self.export().await,
            Input::Help => {
                writeln!(
                    self.out,
                    "Commands depend on the screen; the hints under each screen list them. \
                     'reset' starts over and 'quit' exits."
                )?;
                return Ok(());
            }
            Input::Quit => return Ok(()),
        };
        self.dispatch(action).await
    }

    async fn dispatch(&mut self, action: Action) -> std::io::Result<()> {
        match self.workflow.dispatch(&mut self.session, action).await {
            Ok(result) => {
                debug!(mode = ?result.mode, fallback = result.used_fallback_question, "dispatched");
                Ok(())
            }
            Err(err) => writeln!(self.out, "{err}"),
        }
    }

    async fn toggle(&mut self, indices: &[usize]) -> std::io::Result<()> {
        let Some(question) = self.session.current_question().cloned() else {
            return Ok(());
        };
        for &index in indices {
            match question.options().get(index - 1) {
                Some(option) => {
                    let action = Action::ToggleOption {
                        question_id: question.id(),
                        option: option.clone(),
                    };
                    self.dispatch(action).await?;
                }
                None => writeln!(self.out, "There is no option {index}.")?,
            }
        }
        Ok(())
    }

    fn answered_id(&self, index: usize) -> Option<QuestionId> {
        self.session
            .questions()
            .iter()
            .filter(|question| self.session.answers().is_answered(question.id()))
            .nth(index.checked_sub(1)?)
            .map(|question| question.id())
    }

    async fn export(&mut self) -> std::io::Result<()> {
        match ExportDocument::from_session(&self.session, self.clock) {
            Ok(document) => {
                let bytes = match document.to_pdf() {
                    Ok(bytes) => bytes,
                    Err(err) => return writeln!(self.out, "{err}"),
                };
                tokio::fs::write(&self.export_path, bytes).await?;
                info!(path = %self.export_path.display(), pages = document.pages().len(), "exported");
                writeln!(self.out, "Saved to {}", self.export_path.display())
            }
            Err(err) => writeln!(self.out, "{err}"),
        }
    }

    /// Count down until the next question lands.
    async fn breathe(&mut self) -> std::io::Result<()> {
        if !self.session.mode().is_transition() {
            return Ok(());
        }
        let mut ticker = tokio::time::interval(self.tick_period);
        ticker.tick().await;
        while self.session.mode().is_transition() {
            self.show()?;
            ticker.tick().await;
            self.session.tick();
        }
        Ok(())
    }

    fn show(&mut self) -> std::io::Result<()> {
        write!(self.out, "{}", render(&self.session))?;
        self.out.flush()
    }
}
