//! Coaching directive
//!
//! System prompt sent ahead of the conversation history while a session is
//! still in continuation mode.

/// Generates the system prompt for a coaching reply
///
/// The exchange budget is stated so the model paces its questions to end
/// after a few round trips.
///
/// # Arguments
///
/// * `max_assistant_messages` - Assistant messages allowed per session
///
/// # Examples
///
/// ```
/// use reflog::prompts::generate_coach_prompt;
///
/// let prompt = generate_coach_prompt(3);
/// assert!(prompt.contains("coach"));
/// assert!(prompt.contains("3"));
/// ```
pub fn generate_coach_prompt(max_assistant_messages: usize) -> String {
    let exchanges = max_assistant_messages.saturating_sub(1).max(1);
    format!(
        r#"You are a reflective-journaling coach for adults.
- Prioritise questions that draw out the person's own thinking.
- Do not jump to conclusions and do not judge or evaluate.
- Ask at most one or two follow-up questions per reply.
- Expect the conversation to wrap up after {exchanges} to {max_assistant_messages} exchanges.
- Reply in the same language the person writes in."#
    )
}
