use tokio::process::Command;
use tracing::{debug, warn};

use super::{PaneRecord, TmuxError};

/// list-panes format: composite target, path, title, foreground command
const LIST_FORMAT: &str = "#{session_name}:#{window_index}.#{pane_index}\t#{pane_current_path}\t#{pane_title}\t#{pane_current_command}";

/// True if we are running inside a tmux client (the `TMUX` variable is set).
pub fn inside_tmux() -> bool {
    std::env::var("TMUX").map(|v| !v.is_empty()).unwrap_or(false)
}

/// Read-only queries the scanner needs from the multiplexer. `TmuxClient`
/// is the real implementation; tests substitute a scripted double.
#[allow(async_fn_in_trait)]
pub trait PaneQueries {
    /// Enumerate every pane across every session. Failures are soft and
    /// yield an empty list; the next scan cycle retries naturally.
    async fn list_panes(&self) -> Vec<PaneRecord>;

    /// Capture the most recent `lines` lines of one pane's content.
    async fn capture_pane(&self, target: &str, lines: u32) -> Result<String, TmuxError>;
}

/// Client for interacting with tmux via CLI
pub struct TmuxClient {
    /// Path to tmux binary
    tmux_path: String,
}

impl TmuxClient {
    pub fn new() -> Self {
        Self {
            tmux_path: "tmux".to_string(),
        }
    }

    /// Switch the attached client's focus to the given pane. Best-effort;
    /// called once on exit, after the TUI has been torn down.
    pub async fn switch_client(&self, target: &str) {
        let result = Command::new(&self.tmux_path)
            .args(["switch-client", "-t", target])
            .status()
            .await;
        if let Err(e) = result {
            warn!("tmux switch-client failed: {e}");
        }
    }
}

impl Default for TmuxClient {
    fn default() -> Self {
        Self::new()
    }
}

impl PaneQueries for TmuxClient {
    async fn list_panes(&self) -> Vec<PaneRecord> {
        let output = match Command::new(&self.tmux_path)
            .args(["list-panes", "-a", "-F", LIST_FORMAT])
            .output()
            .await
        {
            Ok(output) => output,
            Err(e) => {
                debug!("tmux list-panes failed to run: {e}");
                return Vec::new();
            }
        };

        if !output.status.success() {
            debug!(
                "tmux list-panes exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
            return Vec::new();
        }

        String::from_utf8_lossy(&output.stdout)
            .lines()
            .filter_map(parse_pane_line)
            .collect()
    }

    async fn capture_pane(&self, target: &str, lines: u32) -> Result<String, TmuxError> {
        let output = Command::new(&self.tmux_path)
            .args(["capture-pane", "-t", target, "-p", "-S"])
            .arg(format!("-{lines}"))
            .output()
            .await?;

        if !output.status.success() {
            return Err(TmuxError::Capture {
                target: target.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Parse one list-panes line. Lines with fewer than four tab-separated
/// fields are dropped.
fn parse_pane_line(line: &str) -> Option<PaneRecord> {
    let parts: Vec<&str> = line.splitn(4, '\t').collect();
    if parts.len() < 4 {
        return None;
    }

    let pane_id = parts[0].to_string();
    let session_name = parts[0].split(':').next().unwrap_or(parts[0]).to_string();

    Some(PaneRecord {
        pane_id,
        session_name,
        path: parts[1].to_string(),
        title: parts[2].to_string(),
        command: parts[3].to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pane_line() {
        let record = parse_pane_line("work:2.1\t/home/me/proj\t✳ Fixing tests\tnode").unwrap();
        assert_eq!(record.pane_id, "work:2.1");
        assert_eq!(record.session_name, "work");
        assert_eq!(record.path, "/home/me/proj");
        assert_eq!(record.title, "✳ Fixing tests");
        assert_eq!(record.command, "node");
    }

    #[test]
    fn test_parse_pane_line_too_few_fields() {
        assert!(parse_pane_line("work:2.1\t/home/me/proj\ttitle").is_none());
        assert!(parse_pane_line("").is_none());
    }

    #[test]
    fn test_parse_pane_line_tabs_in_title_fold_into_command() {
        // splitn(4) keeps any extra tabs inside the last field
        let record = parse_pane_line("a:0.0\t/tmp\tt\tnode\textra").unwrap();
        assert_eq!(record.command, "node\textra");
    }
}
