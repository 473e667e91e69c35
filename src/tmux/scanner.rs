use futures::future::join_all;
use tracing::debug;

use super::heuristics::{
    classify_content, has_spinner_prefix, is_candidate_title, is_shell_command, shorten_path,
    strip_title_prefix,
};
use super::{ActivityState, PaneQueries, PaneRecord, Session};

/// Scrollback depth for per-pane captures
const CAPTURE_LINES: u32 = 50;

/// A pane that passed the title and liveness filters
struct Candidate {
    record: PaneRecord,
    /// Title has a spinner prefix, so no capture is needed
    working: bool,
}

/// Builds one snapshot of Claude sessions per invocation by combining the
/// pane queries with the title/content heuristics.
pub struct Scanner<C> {
    client: C,
}

impl<C: PaneQueries> Scanner<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// Run one full detection cycle. Returns sessions sorted ascending by
    /// pane id; identical query responses always produce an identical
    /// snapshot.
    pub async fn scan(&self) -> Vec<Session> {
        let records = self.client.list_panes().await;

        let candidates: Vec<Candidate> = records
            .into_iter()
            .filter(|r| is_candidate_title(&r.title) && !is_shell_command(&r.command))
            .map(|record| {
                let working = has_spinner_prefix(&record.title);
                Candidate { record, working }
            })
            .collect();

        if candidates.is_empty() {
            return Vec::new();
        }

        // One future per candidate, all launched together and joined, so
        // total latency is the slowest capture rather than the sum. Each
        // result lands in its candidate's slot; order stays deterministic.
        let resolved = join_all(candidates.iter().map(|c| self.resolve(c))).await;

        let mut sessions: Vec<Session> = resolved.into_iter().flatten().collect();
        sessions.sort_by(|a, b| a.pane_id.cmp(&b.pane_id));
        sessions
    }

    /// Resolve one candidate's activity state. A failed capture drops the
    /// candidate for this cycle rather than guessing its state.
    async fn resolve(&self, candidate: &Candidate) -> Option<Session> {
        let record = &candidate.record;

        let status = if candidate.working {
            ActivityState::Working
        } else {
            match self.client.capture_pane(&record.pane_id, CAPTURE_LINES).await {
                Ok(content) => classify_content(&content),
                Err(e) => {
                    debug!("dropping {} this cycle: {e}", record.pane_id);
                    return None;
                }
            }
        };

        Some(Session {
            pane_id: record.pane_id.clone(),
            session_name: record.session_name.clone(),
            title: strip_title_prefix(&record.title).to_string(),
            path: shorten_path(&record.path),
            status,
        })
    }
}
