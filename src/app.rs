use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::actions::Action;
use crate::tmux::{ActivityState, Session};

/// Theme colors inspired by Claude Code
pub struct Theme {
    pub fg: Color,
    pub accent: Color,
    pub dim: Color,
    pub success: Color,
    pub warning: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            fg: Color::Rgb(220, 220, 220),
            accent: Color::Rgb(217, 119, 87), // Claude orange
            dim: Color::Rgb(100, 100, 100),
            success: Color::Rgb(80, 200, 120),
            warning: Color::Rgb(255, 193, 7),
        }
    }
}

/// Fixed per-state display descriptor
struct StateDisplay {
    symbol: &'static str,
    label: &'static str,
}

fn state_display(status: ActivityState) -> StateDisplay {
    match status {
        ActivityState::Working => StateDisplay {
            symbol: "●",
            label: "Working",
        },
        ActivityState::Waiting => StateDisplay {
            symbol: "◐",
            label: "Waiting",
        },
        ActivityState::Idle => StateDisplay {
            symbol: "○",
            label: "Idle",
        },
    }
}

/// Main application state
pub struct App {
    /// Latest snapshot of detected sessions
    pub sessions: Vec<Session>,
    /// Cursor into the snapshot
    pub list_state: ListState,
    /// Pane chosen for switching, set only on explicit confirmation
    pub selected_pane_id: Option<String>,
    /// Set once a quit or selection has been made
    pub quitting: bool,
    /// Theme
    pub theme: Theme,
}

impl App {
    pub fn new() -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0));

        Self {
            sessions: Vec::new(),
            list_state,
            selected_pane_id: None,
            quitting: false,
            theme: Theme::default(),
        }
    }

    fn cursor(&self) -> usize {
        self.list_state.selected().unwrap_or(0)
    }

    /// Handle an action and return whether to quit
    pub fn handle_action(&mut self, action: Action) -> Result<bool> {
        match action {
            Action::KeyPress(key) => self.handle_key(key),
            Action::SnapshotArrived(sessions) => {
                self.apply_snapshot(sessions);
                Ok(false)
            }
            Action::Resize => Ok(false),
            Action::Quit => {
                self.quitting = true;
                Ok(true)
            }
        }
    }

    /// Replace the snapshot and re-derive the cursor: follow the
    /// previously cursored pane if it survived, otherwise clamp.
    fn apply_snapshot(&mut self, sessions: Vec<Session>) {
        let old_id = self
            .sessions
            .get(self.cursor())
            .map(|s| s.pane_id.clone());

        self.sessions = sessions;

        if let Some(old_id) = old_id {
            if let Some(i) = self.sessions.iter().position(|s| s.pane_id == old_id) {
                self.list_state.select(Some(i));
                return;
            }
        }
        if self.cursor() >= self.sessions.len() {
            self.list_state
                .select(Some(self.sessions.len().saturating_sub(1)));
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<bool> {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.quitting = true;
                return Ok(true);
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.quitting = true;
                return Ok(true);
            }
            KeyCode::Char('j') | KeyCode::Down => self.next_session(),
            KeyCode::Char('k') | KeyCode::Up => self.previous_session(),
            KeyCode::Enter => return Ok(self.select_index(self.cursor())),
            KeyCode::Char(c @ '1'..='9') => {
                let idx = (c as usize) - ('1' as usize);
                return Ok(self.select_index(idx));
            }
            _ => {}
        }
        Ok(false)
    }

    /// Record the selection at `idx` and quit; out of range is a no-op.
    fn select_index(&mut self, idx: usize) -> bool {
        if let Some(session) = self.sessions.get(idx) {
            self.selected_pane_id = Some(session.pane_id.clone());
            self.quitting = true;
            return true;
        }
        false
    }

    fn next_session(&mut self) {
        if self.sessions.is_empty() {
            return;
        }
        let i = (self.cursor() + 1) % self.sessions.len();
        self.list_state.select(Some(i));
    }

    fn previous_session(&mut self) {
        if self.sessions.is_empty() {
            return;
        }
        let i = (self.cursor() + self.sessions.len() - 1) % self.sessions.len();
        self.list_state.select(Some(i));
    }

    pub fn render(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Session list
                Constraint::Length(3), // Footer/help
            ])
            .split(frame.area());

        self.render_header(frame, chunks[0]);
        self.render_session_list(frame, chunks[1]);
        self.render_footer(frame, chunks[2]);
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let title = Paragraph::new(Line::from(vec![
            Span::styled(
                " csm ",
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                "│ Claude sessions in tmux",
                Style::default().fg(self.theme.dim),
            ),
        ]))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(self.theme.dim)),
        );
        frame.render_widget(title, area);
    }

    fn render_session_list(&mut self, frame: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = if self.sessions.is_empty() {
            vec![ListItem::new(Line::from(Span::styled(
                "  No Claude sessions found",
                Style::default().fg(self.theme.dim),
            )))]
        } else {
            let name_width = self
                .sessions
                .iter()
                .map(|s| s.session_name.len())
                .max()
                .unwrap_or(0);

            self.sessions
                .iter()
                .enumerate()
                .map(|(i, session)| {
                    let display = state_display(session.status);
                    let state_color = match session.status {
                        ActivityState::Working => self.theme.success,
                        ActivityState::Waiting => self.theme.warning,
                        ActivityState::Idle => self.theme.dim,
                    };
                    let state_style = Style::default().fg(state_color);

                    ListItem::new(Line::from(vec![
                        Span::styled(format!("{} ", i + 1), Style::default().fg(self.theme.fg)),
                        Span::styled(format!("{} ", display.symbol), state_style),
                        Span::styled(format!("{:<8}", display.label), state_style),
                        Span::styled(
                            format!("{:<name_width$}  ", session.session_name),
                            Style::default().fg(self.theme.fg),
                        ),
                        Span::styled(
                            format!("{}  ", session.title),
                            Style::default().fg(self.theme.dim),
                        ),
                        Span::styled(&session.path, Style::default().fg(self.theme.dim)),
                    ]))
                })
                .collect()
        };

        let list = List::new(items)
            .block(
                Block::default()
                    .title(" Sessions ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(self.theme.dim)),
            )
            .highlight_style(
                Style::default()
                    .bg(Color::Rgb(50, 50, 50))
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▸ ");

        frame.render_stateful_widget(list, area, &mut self.list_state);
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect) {
        let footer = Paragraph::new(Line::from(Span::styled(
            " ↑↓/j/k: Navigate │ 1-9: Jump │ Enter: Switch │ q: Quit ",
            Style::default().fg(self.theme.dim),
        )))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(self.theme.dim)),
        );
        frame.render_widget(footer, area);
    }
}
