//! Prompt text for the two generators.
//!
//! The prompts are plain markdown. Previous questions are numbered from 1 and
//! the first [`PRIORITY_QUESTIONS`] of them are set apart as the context the
//! model should weigh most.

use std::fmt::Write as _;

use rand::rng;
use rand::seq::IndexedRandom;

use calm_core::bank::{BankEntry, EXAMPLES};
use calm_core::session::AnsweredQuestion;

/// Leading questions listed under "Priority Questions".
pub const PRIORITY_QUESTIONS: usize = 5;
/// Example pairs sampled into every question prompt.
pub const EXAMPLE_SAMPLE: usize = 10;

const QUESTION_PREAMBLE: &str = "\
# CONTEXT
You are an AI mindfulness coach providing reflective questions to help users cultivate self-awareness and well-being. Your task is to generate a new reflective question and relevant answer options for a mindfulness app.

# GUIDELINES
- **Focus**: Questions should be concise, thought-provoking, and encourage self-reflection.
- **Tone**: Positive, constructive, and non-invasive.
- **Topics**: Cover a wide variety of mindfulness, self-care, and personal growth themes.
- **Options**: Provide 3-8 relevant answer options, including at least one neutral or non-committal choice (e.g., \"Not sure\").
- **Balanced**: Include questions that address both positive and challenging aspects of daily life.
- **Follow-up**: Ask follow-up questions based on user responses to deepen self-awareness and explore a topic further, balanced with new questions and topics so as not to dwell too much on one topic.

**Avoid**:
- Needless repetition of existing questions or topics.
- Overly personal or invasive content.
";

const SUMMARY_PREAMBLE: &str = "\
# CONTEXT
You are an AI mindfulness coach providing a summary of the user's responses to reflective questions. Your task is to provide a concise yet insightful summary of the user's answers and suggest 1-5 mindful tasks based on their responses.

# GUIDELINES
- **Focus**: Summary should be concise, thought-provoking, and encourage self-reflection.
- **Tone**: Positive, constructive, and non-invasive.
- **Topics**: Cover a wide variety of mindfulness, self-care, and personal growth themes.
- **Tasks**: Provide 1-5 relevant tasks or goal objectives for the user to try to promote mindfulness and wellbeing.
- **Balanced**: Address both positive and challenging aspects of the user's responses.

**Avoid**:
- Overly personal or invasive content.
- Really specific or pushy tasks, objectives or suggestions.
";

/// Pick `count` distinct example pairs from the bank.
#[must_use]
pub fn sample_examples(count: usize) -> Vec<&'static BankEntry> {
    EXAMPLES.choose_multiple(&mut rng(), count).collect()
}

fn push_pair(out: &mut String, number: usize, entry: &AnsweredQuestion, empty: &str) {
    let answers = if entry.answers.is_empty() {
        empty.to_string()
    } else {
        entry.answers.join(", ")
    };
    let _ = writeln!(out, "{number}. Q: {}", entry.text);
    let _ = writeln!(out, "   A: {answers}");
}

/// Prompt for the next question given everything asked so far.
#[must_use]
pub fn question_prompt(history: &[AnsweredQuestion], examples: &[&BankEntry]) -> String {
    let mut out = String::from(QUESTION_PREAMBLE);

    out.push_str("\n# PREVIOUS QUESTIONS AND ANSWERS\n");
    out.push_str(
        "The first five questions below are the most important and assist in setting the context for the user's reflection.\n",
    );
    out.push_str("\n## Priority Questions\n");
    for (index, entry) in history.iter().take(PRIORITY_QUESTIONS).enumerate() {
        push_pair(&mut out, index + 1, entry, "No answers provided");
    }

    out.push_str("\n## Additional Questions\n");
    out.push_str(
        "These questions are from previous sessions and should be considered when generating new questions.\n",
    );
    for (index, entry) in history.iter().enumerate().skip(PRIORITY_QUESTIONS) {
        push_pair(&mut out, index + 1, entry, "No answers provided");
    }

    out.push_str("\n# EXAMPLE QUESTIONS AND OPTIONS\n");
    for example in examples {
        let _ = writeln!(out, "\nQ: {}", example.text);
        let _ = writeln!(out, "Options: {}", example.options.join(", "));
    }

    out.push_str("\n# TASK\n");
    out.push_str(
        "Generate one new reflective question and include 3-8 concise and relevant answer options.\n",
    );
    out
}

/// Prompt for a closing summary of the answered questions.
#[must_use]
pub fn summary_prompt(answered: &[AnsweredQuestion]) -> String {
    let mut out = String::from(SUMMARY_PREAMBLE);

    out.push_str("\n# QUESTIONS AND ANSWERS\n");
    for (index, entry) in answered.iter().enumerate() {
        push_pair(&mut out, index + 1, entry, "No answer provided");
    }

    out.push_str("\n# TASK\n");
    out.push_str(
        "Based on the user's responses, provide a concise summary of their mindfulness journey and suggest 1-5 mindful tasks they could try.\n",
    );
    out
}
