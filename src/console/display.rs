// Wed Jan 21 2026 - Alex

use crate::command::DispatchError;
use colored::Colorize;
use std::error::Error;

const MAX_CAUSES: usize = 10;

pub struct ErrorDisplay {
    color_enabled: bool,
}

impl ErrorDisplay {
    pub fn new() -> Self {
        Self {
            color_enabled: true,
        }
    }

    pub fn without_colors(mut self) -> Self {
        self.color_enabled = false;
        self
    }

    pub fn with_color(mut self, enabled: bool) -> Self {
        self.color_enabled = enabled;
        self
    }

    /// Colour only when asked to and stdout is a terminal.
    pub fn for_terminal(color: bool) -> Self {
        Self::new().with_color(color && atty::is(atty::Stream::Stdout))
    }

    pub fn format<E: Error>(&self, error: &E) -> Vec<String> {
        let mut lines = vec![format!("{} {}", self.header("Error:"), error)];

        let mut source = error.source();
        let mut depth = 0;

        while let Some(cause) = source {
            if depth == MAX_CAUSES {
                lines.push("  ... (cause chain truncated)".to_string());
                break;
            }

            let arrow = if self.color_enabled {
                "->".yellow().to_string()
            } else {
                "->".to_string()
            };
            lines.push(format!("  {} Caused by: {}", arrow, cause));
            source = cause.source();
            depth += 1;
        }

        lines
    }

    /// Like [`format`](Self::format), plus the offending line with a caret
    /// under the position of a tokenizer error.
    pub fn format_dispatch(&self, error: &DispatchError, line: &str) -> Vec<String> {
        let mut lines = self.format(error);

        if let DispatchError::Tokenize(err) = error {
            let caret = err.caret_line(line);
            lines.push(format!("  {}", line));
            if self.color_enabled {
                lines.push(format!("  {}", caret.red().bold()));
            } else {
                lines.push(format!("  {}", caret));
            }
        }

        lines
    }

    pub fn format_warning(&self, message: &str) -> String {
        if self.color_enabled {
            format!("{} {}", "Warning:".yellow().bold(), message)
        } else {
            format!("Warning: {}", message)
        }
    }

    fn header(&self, text: &str) -> String {
        if self.color_enabled {
            text.red().bold().to_string()
        } else {
            text.to_string()
        }
    }
}

impl Default for ErrorDisplay {
    fn default() -> Self {
        Self::new()
    }
}
