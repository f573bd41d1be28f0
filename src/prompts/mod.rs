//! Daily reflection prompts and coaching directives
//!
//! The daily prompt is picked from a fixed pool by day of year, so every
//! user sees the same prompt on the same calendar date. The system
//! directives sent to the language model live in the submodules.

pub mod coach_prompt;
pub mod summary_prompt;

pub use coach_prompt::generate_coach_prompt;
pub use summary_prompt::{generate_summary_prompt, MAX_KEY_POINTS, MAX_NEXT_QUESTIONS};

use chrono::{Datelike, Local, NaiveDate};
use serde::Serialize;

/// A reflection prompt from the fixed pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailyPrompt {
    /// Stable identifier, recorded on sessions
    pub id: &'static str,
    /// Prompt text shown to the user
    pub text: &'static str,
}

const PROMPTS: [DailyPrompt; 10] = [
    DailyPrompt {
        id: "clarity-1",
        text: "What is the one thing you can't stop thinking about right now? Why is it on your mind?",
    },
    DailyPrompt {
        id: "values-1",
        text: "When did you last feel most like yourself?",
    },
    DailyPrompt {
        id: "relationships-1",
        text: "What has felt off in your relationships lately? What might be behind it?",
    },
    DailyPrompt {
        id: "work-1",
        text: "Where did you spend the most energy in today's work or study?",
    },
    DailyPrompt {
        id: "self-care-1",
        text: "What small thing did you do today to look after your own condition?",
    },
    DailyPrompt {
        id: "future-1",
        text: "How do you want to be three months from now? What step can you take today?",
    },
    DailyPrompt {
        id: "gratitude-1",
        text: "What have you felt grateful for recently, and why?",
    },
    DailyPrompt {
        id: "decision-1",
        text: "Is there a decision you keep putting off? What is the hesitation really about?",
    },
    DailyPrompt {
        id: "growth-1",
        text: "What did a recent challenge teach you, and how could you use it going forward?",
    },
    DailyPrompt {
        id: "rest-1",
        text: "How do you feel about resting? Is there guilt, relief, or something else?",
    },
];

/// Returns the whole prompt pool in selection order
pub fn all_prompts() -> &'static [DailyPrompt] {
    &PROMPTS
}

/// Selects the prompt for a calendar date
///
/// The index is the 1-based day of the year modulo the pool size.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use reflog::prompts::daily_prompt;
///
/// let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// assert_eq!(daily_prompt(date).id, "values-1");
/// ```
pub fn daily_prompt(date: NaiveDate) -> &'static DailyPrompt {
    let index = date.ordinal() as usize % PROMPTS.len();
    &PROMPTS[index]
}

/// Selects the prompt for the server's local calendar date
pub fn daily_prompt_today() -> &'static DailyPrompt {
    daily_prompt(Local::now().date_naive())
}

/// Looks up a prompt by identifier
pub fn find_prompt(id: &str) -> Option<&'static DailyPrompt> {
    PROMPTS.iter().find(|p| p.id == id)
}
