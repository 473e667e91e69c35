use once_cell::sync::Lazy;
use std::collections::HashSet;

use super::ActivityState;

/// Leading glyph on idle/waiting Claude pane titles
const SENTINEL: char = '✳';

/// Braille spinner block used while Claude is processing
const SPINNER_START: char = '\u{2800}';
const SPINNER_END: char = '\u{28FF}';

/// Marker for the start of Claude's input prompt in captured text
const PROMPT_MARKER: char = '❯';

/// Substring shown while Claude waits on a confirmation
const CONFIRMATION_MARKER: &str = "Esc to cancel";

/// Foreground commands that mean Claude has exited and a bare shell owns the pane
static SHELL_COMMANDS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| HashSet::from(["zsh", "bash", "fish", "sh", "dash"]));

fn is_spinner(c: char) -> bool {
    (SPINNER_START..=SPINNER_END).contains(&c)
}

/// True if the title marks a Claude pane: it starts with the sentinel
/// glyph or a Braille spinner character.
pub fn is_candidate_title(title: &str) -> bool {
    title
        .chars()
        .next()
        .is_some_and(|c| c == SENTINEL || is_spinner(c))
}

/// True if the title starts with a Braille spinner character, an
/// unconditional sign of active processing.
pub fn has_spinner_prefix(title: &str) -> bool {
    title.chars().next().is_some_and(is_spinner)
}

/// Strip the sentinel or spinner prefix (and following whitespace) for
/// display. Titles without a prefix pass through unchanged.
pub fn strip_title_prefix(title: &str) -> &str {
    match title.chars().next() {
        Some(c) if c == SENTINEL || is_spinner(c) => title[c.len_utf8()..].trim_start(),
        _ => title,
    }
}

/// True if the foreground command indicates Claude has exited.
pub fn is_shell_command(command: &str) -> bool {
    SHELL_COMMANDS.contains(command)
}

/// Decide Idle vs Waiting from captured pane content. Only called for
/// sentinel-prefixed panes; spinner-prefixed ones are Working by title
/// alone.
///
/// Only text after the last prompt line is inspected, so stale
/// confirmation prompts earlier in scrollback cannot leak through.
pub fn classify_content(content: &str) -> ActivityState {
    let lines: Vec<&str> = content.lines().collect();
    let last_prompt = lines
        .iter()
        .rposition(|line| line.contains(PROMPT_MARKER));

    match last_prompt {
        Some(i) if i + 1 < lines.len() => {
            let after_prompt = &lines[i + 1..];
            if after_prompt.iter().any(|l| l.contains(CONFIRMATION_MARKER)) {
                ActivityState::Waiting
            } else {
                ActivityState::Idle
            }
        }
        _ => ActivityState::Idle,
    }
}

/// Replace a leading home-directory prefix with `~`.
pub fn shorten_path(path: &str) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Some(rest) = path.strip_prefix(&*home.to_string_lossy()) {
            return format!("~{rest}");
        }
    }
    path.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_title_sentinel() {
        assert!(is_candidate_title("✳ Fixing the build"));
        assert!(is_candidate_title("✳"));
    }

    #[test]
    fn test_candidate_title_spinner() {
        assert!(is_candidate_title("⠋ Thinking"));
        assert!(is_candidate_title("\u{28FF} edge of the block"));
    }

    #[test]
    fn test_candidate_title_rejections() {
        assert!(!is_candidate_title(""));
        assert!(!is_candidate_title("vim"));
        assert!(!is_candidate_title("some ✳ later"));
    }

    #[test]
    fn test_spinner_prefix_is_subset_of_candidates() {
        assert!(has_spinner_prefix("⠙ Running tests"));
        assert!(!has_spinner_prefix("✳ Idle title"));
        assert!(!has_spinner_prefix(""));
    }

    #[test]
    fn test_strip_title_prefix() {
        assert_eq!(strip_title_prefix("✳ Fixing the build"), "Fixing the build");
        assert_eq!(strip_title_prefix("⠋ Thinking"), "Thinking");
        assert_eq!(strip_title_prefix("plain title"), "plain title");
    }

    #[test]
    fn test_strip_title_prefix_idempotent() {
        for title in ["✳ Fixing the build", "⠸  padded", "plain", ""] {
            let once = strip_title_prefix(title);
            assert_eq!(strip_title_prefix(once), once);
        }
    }

    #[test]
    fn test_shell_command_detection() {
        for shell in ["zsh", "bash", "fish", "sh", "dash"] {
            assert!(is_shell_command(shell));
        }
        assert!(!is_shell_command("node"));
    }

    #[test]
    fn test_classify_waiting_after_prompt() {
        let content = "some output\n❯ do the thing\nAllow this edit? Esc to cancel";
        assert_eq!(classify_content(content), ActivityState::Waiting);
    }

    #[test]
    fn test_classify_idle_after_prompt() {
        let content = "some output\n❯ do the thing\njust regular output";
        assert_eq!(classify_content(content), ActivityState::Idle);
    }

    #[test]
    fn test_classify_prompt_on_final_line() {
        assert_eq!(classify_content("output\n❯ "), ActivityState::Idle);
    }

    #[test]
    fn test_classify_no_prompt() {
        assert_eq!(classify_content("nothing relevant here"), ActivityState::Idle);
    }

    #[test]
    fn test_classify_stale_marker_before_last_prompt() {
        // A confirmation left in scrollback above a newer prompt must not count.
        let content = "Allow this edit? Esc to cancel\n❯ next prompt\nplain output";
        assert_eq!(classify_content(content), ActivityState::Idle);
    }
}
