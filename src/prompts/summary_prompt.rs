//! Summarization directive
//!
//! System prompt used when a session reaches its exchange budget. The model
//! is asked for a JSON object that the coach module parses into summary
//! fields.

/// Maximum key points kept on a closed session
pub const MAX_KEY_POINTS: usize = 5;

/// Maximum follow-up questions kept on a closed session
pub const MAX_NEXT_QUESTIONS: usize = 3;

/// Generates the system prompt requesting a structured summary
///
/// # Examples
///
/// ```
/// use reflog::prompts::generate_summary_prompt;
///
/// let prompt = generate_summary_prompt();
/// assert!(prompt.contains("key_points"));
/// assert!(prompt.contains("next_questions"));
/// ```
pub fn generate_summary_prompt() -> String {
    format!(
        r#"You summarise journaling conversations.
Read the conversation below and reply with JSON only, no prose and no code fences.
JSON format: {{"summary": "...", "key_points": ["..."], "next_questions": ["..."]}}
summary is three to five sentences. key_points has at most {MAX_KEY_POINTS} items. next_questions has at most {MAX_NEXT_QUESTIONS} items.
Write in the same language as the conversation."#
    )
}
