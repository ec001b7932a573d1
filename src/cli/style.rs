//! Terminal styling helpers

use indicatif::ProgressStyle;
use owo_colors::{OwoColorize, Stream, Style};
use std::fmt::Display;

/// Check mark used for completed steps
pub const CHECK: &str = "✓";

/// Colour roles for CLI output; colours are dropped when stdout is not a TTY
pub trait Stylize: Display + Sized {
    /// Secondary information
    fn muted(&self) -> String {
        self.styled(Style::new().dimmed())
    }

    /// Headings and key values
    fn emphasis(&self) -> String {
        self.styled(Style::new().bold())
    }

    /// Numbers and names worth spotting
    fn accent(&self) -> String {
        self.styled(Style::new().cyan())
    }

    /// Good news
    fn success(&self) -> String {
        self.styled(Style::new().green())
    }

    /// Needs attention
    fn warn(&self) -> String {
        self.styled(Style::new().yellow())
    }

    /// Something failed
    fn error(&self) -> String {
        self.styled(Style::new().red().bold())
    }

    #[doc(hidden)]
    fn styled(&self, style: Style) -> String {
        self.if_supports_color(Stream::Stdout, |s| s.style(style))
            .to_string()
    }
}

impl<T: Display> Stylize for T {}

/// Green check mark
pub fn check() -> String {
    CHECK.success()
}

/// Spinner used while a run is in progress
pub fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
}

/// `text` as a terminal hyperlink to `url` when the terminal supports it
pub fn link(text: &str, url: &str) -> String {
    if !url.is_empty() && supports_hyperlinks::on(supports_hyperlinks::Stream::Stdout) {
        terminal_link::Link::new(text, url).to_string()
    } else {
        text.to_string()
    }
}
