//! Coach module for Reflog
//!
//! This module contains the conversation turn controller, which decides
//! between another coaching reply and a closing summary, plus the session
//! lifecycle operations used by the HTTP API and CLI.

pub mod controller;
pub mod session;
pub mod summary;

pub use controller::{
    derive_title, normalize_session_id, select_mode, validate_turn_input, TurnController,
    TurnMode, TurnStatus,
};
pub use session::{session_detail, start_session, SessionDetail};
pub use summary::SessionSummary;
