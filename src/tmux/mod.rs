mod client;
mod heuristics;
mod scanner;

pub use client::{inside_tmux, PaneQueries, TmuxClient};
pub use heuristics::{
    classify_content, has_spinner_prefix, is_candidate_title, shorten_path, strip_title_prefix,
};
pub use scanner::Scanner;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Activity state of a Claude session, inferred from its pane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ActivityState {
    /// Sitting at the prompt with nothing pending
    #[default]
    Idle,
    /// Blocked on a user confirmation
    Waiting,
    /// Actively processing
    Working,
}

/// One line of `tmux list-panes` output, re-parsed every scan
#[derive(Debug, Clone)]
pub struct PaneRecord {
    /// Composite pane target (e.g. "work:2.1")
    pub pane_id: String,
    /// Owning tmux session name
    pub session_name: String,
    /// Pane working directory
    pub path: String,
    /// Raw pane title, prefix included
    pub title: String,
    /// Foreground command running in the pane
    pub command: String,
}

/// A detected Claude session, rebuilt wholesale each scan cycle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Composite pane target, unique within a snapshot
    pub pane_id: String,
    /// Owning tmux session name
    pub session_name: String,
    /// Display title with the status prefix stripped
    pub title: String,
    /// Working directory, home-shortened
    pub path: String,
    /// Detected activity state
    pub status: ActivityState,
}

/// Errors from the tmux query boundary
#[derive(Debug, Error)]
pub enum TmuxError {
    #[error("failed to run tmux: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("capture-pane failed for {target}: {stderr}")]
    Capture { target: String, stderr: String },
}
