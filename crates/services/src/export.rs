//! The "journey" PDF: summary, tasks, then every answered question.
//!
//! Layout happens on text first (fixed-width lines, fixed-height pages), then
//! each page is drawn line by line in a monospace builtin font so the widths
//! computed here hold on paper.

use printpdf::{BuiltinFont, Mm, PdfDocument};
use serde::{Deserialize, Serialize};
use tracing::debug;
use unicode_width::UnicodeWidthStr;

use calm_core::model::Summary;
use calm_core::session::Session;
use calm_core::Clock;

use crate::error::ExportError;

pub const TITLE: &str = "Your Mindfulness Journey";
pub const FILE_NAME: &str = "mindfulness_journey.pdf";
pub const CONTENT_TYPE: &str = "application/pdf";
/// Columns per line.
pub const PAGE_WIDTH: usize = 72;
/// Lines per page.
pub const PAGE_HEIGHT: usize = 54;

// A4 portrait. 72 Courier columns at 10pt span about 152mm.
const SHEET_WIDTH: Mm = Mm(210.0);
const SHEET_HEIGHT: Mm = Mm(297.0);
const MARGIN_LEFT: Mm = Mm(20.0);
const FIRST_BASELINE: f32 = 280.0;
const LINE_HEIGHT: f32 = 4.9;
const FONT_SIZE: f32 = 10.0;
const LAYER: &str = "Text";

const NO_ANSWER: &str = "No answer provided";
const TASK_INDENT: usize = 2;

/// One question with its answers already joined for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportEntry {
    pub question: String,
    pub answer: String,
}

impl ExportEntry {
    #[must_use]
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportDocument {
    pages: Vec<String>,
}

impl ExportDocument {
    /// Lay out a document dated by `clock`.
    #[must_use]
    pub fn render(summary: &Summary, entries: &[ExportEntry], clock: Clock) -> Self {
        let mut pages = Pager::default();

        pages.push_block(vec![
            center(TITLE),
            center(&clock.date_label()),
            String::new(),
        ]);

        let mut block = vec!["Summary:".to_string()];
        block.extend(wrap(summary.text(), PAGE_WIDTH));
        block.push(String::new());
        pages.push_block(block);

        if !summary.tasks().is_empty() {
            pages.push_block(vec!["Suggested Tasks:".to_string()]);
            for (index, task) in summary.tasks().iter().enumerate() {
                pages.push_block(hanging(&format!("{}. ", index + 1), task, TASK_INDENT));
            }
            pages.push_block(vec![String::new()]);
        }

        for (index, entry) in entries.iter().enumerate() {
            let answer = if entry.answer.trim().is_empty() {
                NO_ANSWER
            } else {
                entry.answer.as_str()
            };
            let mut block = hanging(&format!("Q{}: ", index + 1), &entry.question, 0);
            block.extend(hanging("A: ", answer, 0));
            block.push(String::new());
            pages.push_block(block);
        }

        Self {
            pages: pages.finish(),
        }
    }

    /// Build the document for the session's current summary and answers.
    ///
    /// # Errors
    ///
    /// Returns `ExportError::MissingSummary` when no summary has been
    /// generated yet.
    pub fn from_session(session: &Session, clock: Clock) -> Result<Self, ExportError> {
        let summary = session.summary().ok_or(ExportError::MissingSummary)?;
        let entries: Vec<ExportEntry> = session
            .answered()
            .into_iter()
            .map(|entry| ExportEntry::new(entry.text, entry.answers.join(", ")))
            .collect();
        Ok(Self::render(summary, &entries, clock))
    }

    /// Laid-out pages, one string of newline-terminated lines each.
    #[must_use]
    pub fn pages(&self) -> &[String] {
        &self.pages
    }

    /// Draw every page onto its own PDF sheet.
    ///
    /// # Errors
    ///
    /// Returns `ExportError::Pdf` when the PDF writer fails.
    pub fn to_pdf(&self) -> Result<Vec<u8>, ExportError> {
        let (doc, first_page, first_layer) =
            PdfDocument::new(TITLE, SHEET_WIDTH, SHEET_HEIGHT, LAYER);
        let font = doc
            .add_builtin_font(BuiltinFont::Courier)
            .map_err(|err| ExportError::Pdf(err.to_string()))?;

        let mut sheets = vec![(first_page, first_layer)];
        for _ in 1..self.pages.len() {
            sheets.push(doc.add_page(SHEET_WIDTH, SHEET_HEIGHT, LAYER));
        }

        for (page, (page_index, layer_index)) in self.pages.iter().zip(sheets) {
            let layer = doc.get_page(page_index).get_layer(layer_index);
            for (row, line) in page.lines().enumerate() {
                if line.is_empty() {
                    continue;
                }
                let baseline = Mm(FIRST_BASELINE - LINE_HEIGHT * row as f32);
                layer.use_text(line, FONT_SIZE, MARGIN_LEFT, baseline, &font);
            }
        }

        let bytes = doc
            .save_to_bytes()
            .map_err(|err| ExportError::Pdf(err.to_string()))?;
        debug!(pages = self.pages.len(), bytes = bytes.len(), "rendered pdf");
        Ok(bytes)
    }
}

#[derive(Default)]
struct Pager {
    done: Vec<Vec<String>>,
    current: Vec<String>,
}

impl Pager {
    /// Keep a block on one page when it fits on a fresh one.
    fn push_block(&mut self, block: Vec<String>) {
        if self.current.len() + block.len() > PAGE_HEIGHT
            && !self.current.is_empty()
            && block.len() <= PAGE_HEIGHT
        {
            self.break_page();
        }
        for line in block {
            if self.current.len() == PAGE_HEIGHT {
                self.break_page();
            }
            self.current.push(line);
        }
    }

    fn break_page(&mut self) {
        self.done.push(std::mem::take(&mut self.current));
    }

    fn finish(mut self) -> Vec<String> {
        while self.current.last().is_some_and(String::is_empty) {
            self.current.pop();
        }
        if !self.current.is_empty() || self.done.is_empty() {
            self.break_page();
        }
        self.done
            .into_iter()
            .map(|lines| {
                let mut page = lines.join("\n");
                page.push('\n');
                page
            })
            .collect()
    }
}

fn center(text: &str) -> String {
    let pad = PAGE_WIDTH.saturating_sub(text.width()) / 2;
    format!("{}{text}", " ".repeat(pad))
}

/// `prefix` on the first line, continuation lines aligned under the text.
fn hanging(prefix: &str, text: &str, indent: usize) -> Vec<String> {
    let lead = indent + prefix.width();
    let width = PAGE_WIDTH.saturating_sub(lead).max(1);
    wrap(text, width)
        .into_iter()
        .enumerate()
        .map(|(index, line)| {
            if index == 0 {
                format!("{}{prefix}{line}", " ".repeat(indent))
            } else {
                format!("{}{line}", " ".repeat(lead))
            }
        })
        .collect()
}

/// Greedy word wrap. Words wider than `width` get a line of their own.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        if !line.is_empty() && line.width() + 1 + word.width() > width {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() || lines.is_empty() {
        lines.push(line);
    }
    lines
}
