//! Terminal rendering module for rich markdown output
//!
//! Markdown from the core display types goes through termimad, or straight
//! to stdout when color is off. JSON output bypasses markdown entirely.

use anyhow::{Context, Result};
use serde::Serialize;
use termimad::{MadSkin, crossterm::style::Color};

/// How command output is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Rich,
    Plain,
    Json,
}

impl OutputMode {
    /// Pick the mode from the global flags. `--json` wins.
    pub fn from_flags(no_color: bool, json: bool) -> Self {
        match (json, no_color) {
            (true, _) => OutputMode::Json,
            (false, true) => OutputMode::Plain,
            (false, false) => OutputMode::Rich,
        }
    }
}

/// Terminal renderer that can switch between rich, plain and JSON output
pub struct TerminalRenderer {
    mode: OutputMode,
    skin: MadSkin,
}

impl TerminalRenderer {
    /// Create a new terminal renderer
    pub fn new(mode: OutputMode) -> Self {
        let mut skin = MadSkin::default();

        skin.set_headers_fg(Color::Blue);
        skin.bold.set_fg(Color::Yellow);
        skin.italic.set_fg(Color::Magenta);
        skin.inline_code.set_bg(Color::AnsiValue(238));

        Self { mode, skin }
    }

    /// Emit a value: as JSON in JSON mode, otherwise as its markdown.
    pub fn emit<T: Serialize>(&self, markdown: &str, value: &T) -> Result<()> {
        if self.mode == OutputMode::Json {
            let json = serde_json::to_string_pretty(value).context("Failed to encode output")?;
            println!("{json}");
            Ok(())
        } else {
            self.render(markdown);
            Ok(())
        }
    }

    /// Render markdown text to the terminal
    pub fn render(&self, markdown: &str) {
        match self.mode {
            OutputMode::Rich => {
                for line in markdown.lines() {
                    // Keep the hashes visible so heading levels stay readable
                    if line.starts_with('#') {
                        println!("\x1b[34m{line}\x1b[0m");
                    } else {
                        self.skin.print_inline(line);
                        println!();
                    }
                }
            }
            OutputMode::Plain | OutputMode::Json => print!("{markdown}"),
        }
    }
}
