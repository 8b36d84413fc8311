/// One entry of the "About" panel reachable from the welcome screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaqEntry {
    pub question: &'static str,
    pub answer: &'static str,
}

pub const FAQ: &[FaqEntry] = &[
    FaqEntry {
        question: "What is this form for?",
        answer: "This form is designed to help you reflect on your day and promote mindfulness.",
    },
    FaqEntry {
        question: "How long will this take?",
        answer: "The form typically takes about 5-10 minutes to complete, but you can take as much time as you need.",
    },
    FaqEntry {
        question: "Is my data saved?",
        answer: "Your responses are not saved or stored. This form is for personal reflection only. \
                 Your responses are sent to our servers and to an AI model, but they are not stored, \
                 saved or shared with anyone.",
    },
    FaqEntry {
        question: "What this form is not",
        answer: "This form is not a replacement for friends, family, medical or professional support. \
                 If you're struggling, please reach out to a qualified professional or trusted individual \
                 for help. Help is available and you are not alone.",
    },
];
