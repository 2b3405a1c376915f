//! Terminal rendering of the markdown produced by the core display types,
//! with a plain-text fallback for `--no-color` and pipes.

use anyhow::Result;
use termimad::{crossterm::style::Color, MadSkin};

/// Terminal renderer that can switch between rich and plain text output
pub struct TerminalRenderer {
    rich_enabled: bool,
    skin: MadSkin,
}

impl TerminalRenderer {
    pub fn new(rich_enabled: bool) -> Self {
        let mut skin = MadSkin::default();
        skin.set_headers_fg(Color::Blue);
        skin.bold.set_fg(Color::Yellow);
        skin.italic.set_fg(Color::Magenta);
        skin.inline_code.set_fg(Color::DarkGrey);

        Self { rich_enabled, skin }
    }

    /// Render markdown text to the terminal.
    ///
    /// Header lines keep their hash marks so step numbers stay readable;
    /// status lines are colored by their label.
    pub fn render(&self, markdown: &str) -> Result<()> {
        if !self.rich_enabled {
            print!("{markdown}");
            return Ok(());
        }

        for line in markdown.lines() {
            if line.starts_with('#') {
                println!("\x1b[34m{line}\x1b[0m");
            } else if let Some(code) = status_color(line) {
                println!("\x1b[{code}m{line}\x1b[0m");
            } else {
                self.skin.print_inline(line);
                println!();
            }
        }
        Ok(())
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new(true)
    }
}

/// ANSI color for an `OperationStatus` line.
fn status_color(line: &str) -> Option<u8> {
    if line.starts_with("Success:") {
        Some(32)
    } else if line.starts_with("Warning:") {
        Some(33)
    } else if line.starts_with("Error:") {
        Some(31)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_renderer() {
        let renderer = TerminalRenderer::new(false);
        assert!(!renderer.rich_enabled);
    }

    #[test]
    fn test_default_is_rich() {
        assert!(TerminalRenderer::default().rich_enabled);
    }

    #[test]
    fn test_status_colors() {
        assert_eq!(status_color("Success: Draft saved"), Some(32));
        assert_eq!(status_color("Warning: Step 2 (Check) has no department"), Some(33));
        assert_eq!(status_color("Error: nope"), Some(31));
        assert_eq!(status_color("- Department: Sales (ID 1)"), None);
    }
}
