use crossterm::event::KeyEvent;

use crate::tmux::Session;

/// Events consumed by the application model
#[derive(Debug, Clone)]
pub enum Action {
    /// A key was pressed
    KeyPress(KeyEvent),
    /// A scan cycle completed with a fresh snapshot
    SnapshotArrived(Vec<Session>),
    /// Terminal was resized; triggers a redraw only
    Resize,
    /// Request to quit without a selection
    Quit,
}
