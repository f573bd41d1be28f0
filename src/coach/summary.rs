//! Structured session summaries
//!
//! The summarization directive asks the model for a JSON object. Output that
//! does not match is kept as plain summary text with no key points or
//! follow-up questions.

use crate::error::{Result, ReflogError};
use crate::prompts::{MAX_KEY_POINTS, MAX_NEXT_QUESTIONS};
use serde::{Deserialize, Serialize};

/// Summary fields stored on a closed session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub summary: String,
    #[serde(default)]
    pub key_points: Vec<String>,
    #[serde(default)]
    pub next_questions: Vec<String>,
}

impl SessionSummary {
    /// Parse the model's JSON reply
    ///
    /// A surrounding Markdown code fence is ignored. The summary and every
    /// list item must be non-blank. Lists longer than the requested limits
    /// are truncated.
    ///
    /// # Errors
    ///
    /// Returns `ReflogError::Serialization` for non-JSON or wrongly shaped
    /// output and `ReflogError::InvalidInput` for blank fields
    pub fn parse(raw: &str) -> Result<Self> {
        let mut parsed: SessionSummary = serde_json::from_str(strip_code_fence(raw))
            .map_err(ReflogError::Serialization)?;

        if parsed.summary.trim().is_empty() {
            return Err(ReflogError::InvalidInput("summary is empty".to_string()).into());
        }
        if parsed
            .key_points
            .iter()
            .chain(parsed.next_questions.iter())
            .any(|item| item.trim().is_empty())
        {
            return Err(ReflogError::InvalidInput("summary list item is empty".to_string()).into());
        }

        parsed.key_points.truncate(MAX_KEY_POINTS);
        parsed.next_questions.truncate(MAX_NEXT_QUESTIONS);
        Ok(parsed)
    }

    /// Parse the model's reply, falling back to the raw text as the summary
    ///
    /// # Examples
    ///
    /// ```
    /// use reflog::coach::SessionSummary;
    ///
    /// let summary = SessionSummary::from_model_output("Just some prose.");
    /// assert_eq!(summary.summary, "Just some prose.");
    /// assert!(summary.key_points.is_empty());
    /// ```
    pub fn from_model_output(raw: &str) -> Self {
        match Self::parse(raw) {
            Ok(summary) => summary,
            Err(e) => {
                tracing::warn!(error = %e, "Summary was not valid JSON, storing raw text");
                Self {
                    summary: raw.to_string(),
                    key_points: Vec::new(),
                    next_questions: Vec::new(),
                }
            }
        }
    }
}

fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(inner) = trimmed
        .strip_prefix("```")
        .and_then(|rest| rest.strip_suffix("```"))
    else {
        return trimmed;
    };
    // Drop an info string such as `json` on the opening fence line.
    match inner.split_once('\n') {
        Some((first_line, body)) if !first_line.trim_start().starts_with('{') => body.trim(),
        _ => inner.trim(),
    }
}
