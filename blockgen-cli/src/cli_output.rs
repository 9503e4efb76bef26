// ABOUTME: Centralized CLI output utilities for consistent user-facing messages
// ABOUTME: Provides standardized formatting for errors, warnings, info, success and progress spinners

use crate::constants::timeouts::PROGRESS_BAR_TICK_MS;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use std::io::IsTerminal;
use std::time::Duration;

/// Centralized CLI output utilities for consistent formatting
pub struct CliOutput {
    use_color: bool,
    interactive: bool,
}

impl CliOutput {
    /// Create new CLI output utility with TTY detection
    pub fn new() -> Self {
        let interactive = std::io::stderr().is_terminal();
        Self {
            use_color: interactive,
            interactive,
        }
    }

    /// Create CLI output utility with explicit color setting
    pub fn with_color(use_color: bool) -> Self {
        Self {
            use_color,
            interactive: std::io::stderr().is_terminal(),
        }
    }

    pub fn use_color(&self) -> bool {
        self.use_color
    }

    /// Display an error message
    pub fn error(&self, message: &str) {
        if self.use_color {
            eprintln!("{} {}", "error:".red().bold(), message);
        } else {
            eprintln!("error: {}", message);
        }
    }

    /// Display a warning message
    pub fn warning(&self, message: &str) {
        if self.use_color {
            eprintln!("{} {}", "warning:".yellow().bold(), message);
        } else {
            eprintln!("warning: {}", message);
        }
    }

    /// Display an informational message
    pub fn info(&self, message: &str) {
        if self.use_color {
            eprintln!("{} {}", "info:".blue().bold(), message);
        } else {
            eprintln!("info: {}", message);
        }
    }

    /// Display a success message
    pub fn success(&self, message: &str) {
        if self.use_color {
            eprintln!("{} {}", "success:".green().bold(), message);
        } else {
            eprintln!("success: {}", message);
        }
    }

    /// Display a hint line under an error
    pub fn hint(&self, message: &str) {
        if self.use_color {
            eprintln!("  {} {}", "hint:".dimmed(), message.dimmed());
        } else {
            eprintln!("  hint: {}", message);
        }
    }

    /// Spinner on stderr while waiting for the CMS; hidden when not attached to a terminal
    pub fn spinner(&self, message: &str) -> ProgressBar {
        if !self.interactive {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            pb.set_style(style);
        }
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(PROGRESS_BAR_TICK_MS));
        pb
    }
}

impl Default for CliOutput {
    fn default() -> Self {
        Self::new()
    }
}
