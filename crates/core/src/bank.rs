//! Fixed question content: the seed questions every session starts with, the
//! example pairs used to steer generation, and the fallback question used when
//! generation fails.

use crate::model::{Question, QuestionId};

/// A static (question, options) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BankEntry {
    pub text: &'static str,
    pub options: &'static [&'static str],
}

impl BankEntry {
    #[must_use]
    pub fn to_question(&self, id: QuestionId) -> Question {
        Question::new(
            id,
            self.text,
            self.options.iter().map(|o| (*o).to_string()).collect(),
        )
    }
}

/// Questions a fresh session starts with, ids `1..=SEED.len()`.
pub const SEED: &[BankEntry] = &[
    BankEntry {
        text: "How are you feeling today?",
        options: &["Happy", "Sad", "Anxious", "Excited", "Tired", "Not sure"],
    },
    BankEntry {
        text: "What's one thing you're grateful for?",
        options: &["A person", "An opportunity", "An experience", "Nothing yet", "Not sure"],
    },
    BankEntry {
        text: "What's a small goal you have for today?",
        options: &["Rest", "Focus", "Connect with someone", "Move my body", "Not sure"],
    },
];

/// Substituted whenever question generation fails.
pub const FALLBACK: BankEntry = BankEntry {
    text: "What would you like to reflect on next?",
    options: &["My feelings", "My relationships", "My goals", "My health", "Not sure"],
};

/// Few-shot examples for generation prompts.
pub const EXAMPLES: &[BankEntry] = &[
    BankEntry { text: "What time did you wake up today?", options: &["Morning", "Afternoon", "Evening", "I don't remember", "Not sure"] },
    BankEntry { text: "Have you taken any wellness actions today?", options: &["Exercised", "Meditated", "Journaling", "None yet", "Not sure"] },
    BankEntry { text: "How would you describe your energy level today?", options: &["High", "Balanced", "Fluctuating", "Low", "Exhausted", "Not sure"] },
    BankEntry { text: "Which meal did you enjoy the most today?", options: &["Breakfast", "Lunch", "Dinner", "Snacks", "None", "Not sure"] },
    BankEntry { text: "Have you focused on gratitude today?", options: &["Yes", "Not yet", "No", "Not sure"] },
    BankEntry { text: "How much time did you spend outdoors today?", options: &["None", "<15 mins", "15-30 mins", ">1 hour", "Not sure"] },
    BankEntry { text: "Did you interact with anyone today?", options: &["Yes, meaningful", "Yes, casual", "No", "Not sure"] },
    BankEntry { text: "What is one positive moment you experienced today?", options: &["Achievement", "Interaction", "Peace", "None", "Not sure"] },
    BankEntry { text: "What challenge did you face today?", options: &["Managing emotions", "Staying motivated", "None", "Not sure"] },
    BankEntry { text: "How mindful were you during your activities today?", options: &["Very mindful", "Neutral", "Distracted", "Not sure"] },
    BankEntry { text: "Did you dedicate time to self-care today?", options: &["Yes, a lot", "Yes, but not enough", "No", "Not sure"] },
    BankEntry { text: "How did you manage stress today?", options: &["Relaxation", "Exercise", "Distraction", "I struggled", "Not sure"] },
    BankEntry { text: "What is one thing you're proud of from today?", options: &["Task", "Kindness", "Challenge", "None", "Not sure"] },
    BankEntry { text: "What inspired you today?", options: &["A person", "An idea", "Art", "Nothing", "Not sure"] },
    BankEntry { text: "What is something you're looking forward to tomorrow?", options: &["Goal", "Event", "Relaxation", "Nothing", "Not sure"] },
    BankEntry { text: "How did you nurture your mental health today?", options: &["Meditation", "Therapy", "Talking", "None", "Not sure"] },
    BankEntry { text: "Did you try something new today?", options: &["Yes, activity", "Yes, food", "No", "Not sure"] },
    BankEntry { text: "What is one thing you're grateful for today?", options: &["Person", "Opportunity", "Experience", "None", "Not sure"] },
    BankEntry { text: "What time did you eat breakfast?", options: &["Morning", "Afternoon", "Skipped", "Not sure"] },
    BankEntry { text: "What did you snack on today?", options: &["Healthy", "Unhealthy", "Nothing", "Not sure"] },
    BankEntry { text: "Did you leave the house today?", options: &["Yes", "No", "Not sure"] },
    BankEntry { text: "How did you travel today?", options: &["Walk", "Car", "Bike", "Other", "Not sure"] },
    BankEntry { text: "What did you notice on your journey?", options: &["Nature", "People", "Nothing stood out", "Not sure"] },
    BankEntry { text: "Did you work today?", options: &["Yes", "No", "Not sure"] },
    BankEntry { text: "Did you clean anything today?", options: &["Yes", "No", "Not sure"] },
    BankEntry { text: "Did you feel emotional today?", options: &["Yes, happy", "Yes, sad", "Neutral", "No", "Not sure"] },
    BankEntry { text: "What is one thing you could improve tomorrow?", options: &["Focus", "Energy", "Mindfulness", "Nothing", "Not sure"] },
    BankEntry { text: "What was your biggest achievement today?", options: &["Task", "Kindness", "Overcoming a challenge", "Nothing", "Not sure"] },
    BankEntry { text: "What was your biggest frustration today?", options: &["Work", "Personal", "Other", "None", "Not sure"] },
    BankEntry { text: "What did you find most useful today?", options: &["Advice", "Tools", "Other", "Nothing", "Not sure"] },
    BankEntry { text: "What did you create today?", options: &["Art", "Food", "Idea", "Nothing", "Not sure"] },
    BankEntry { text: "How well did you sleep last night?", options: &["Very well", "Neutral", "Poorly", "Not sure"] },
    BankEntry { text: "Did you experience joy today?", options: &["Yes", "No", "Not sure"] },
    BankEntry { text: "What is your intention for tomorrow?", options: &["Focus", "Rest", "Mindfulness", "Not sure"] },
    BankEntry { text: "Did you make progress on a goal today?", options: &["Yes", "No", "Not sure"] },
    BankEntry { text: "What time did you eat dinner?", options: &["Evening", "Skipped", "Not sure"] },
    BankEntry { text: "Did you encounter a challenge today?", options: &["Yes", "No", "Not sure"] },
    BankEntry { text: "What surprised you today?", options: &["A person", "An event", "Nothing", "Not sure"] },
    BankEntry { text: "What would you like to achieve by next week?", options: &["Goal", "Skill", "Mindset", "Not sure"] },
    BankEntry { text: "What is your priority this month?", options: &["Work", "Health", "Connection", "Not sure"] },
    BankEntry { text: "How did you connect with nature today?", options: &["Walk", "Meditation", "Nothing", "Not sure"] },
    BankEntry { text: "Did you engage in any creative activities today?", options: &["Yes", "No", "Not sure"] },
    BankEntry { text: "What made you smile today?", options: &["A person", "An event", "Other", "Nothing", "Not sure"] },
];

/// Build the seed questions with ids starting at 1.
#[must_use]
pub fn seed_questions() -> Vec<Question> {
    SEED.iter()
        .zip(1_u64..)
        .map(|(entry, id)| entry.to_question(QuestionId::new(id)))
        .collect()
}
