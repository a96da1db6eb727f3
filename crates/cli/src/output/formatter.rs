//! Output formatter for human-readable and JSON output
//!
//! Status lines go to stdout, warnings and errors to stderr. In JSON mode the
//! only thing written to stdout is the final document.

use console::style;
use serde::Serialize;

use super::OutputConfig;

/// Formatter for CLI output
#[derive(Debug, Clone)]
pub struct Formatter {
    config: OutputConfig,
}

impl Formatter {
    /// Create a new formatter with the given configuration
    pub fn new(config: OutputConfig) -> Self {
        Self { config }
    }

    /// Check if JSON output mode is enabled
    pub fn is_json(&self) -> bool {
        self.config.json
    }

    /// Check if colors are enabled
    pub fn colors_enabled(&self) -> bool {
        !self.config.no_color && !self.config.json
    }

    /// Output a success message
    pub fn success(&self, message: &str) {
        if self.config.quiet || self.config.json {
            return;
        }
        println!("{} {message}", self.glyph("✓", Glyph::Success));
    }

    /// Output an error message
    ///
    /// Errors are always printed, even in quiet mode.
    pub fn error(&self, message: &str) {
        if self.config.json {
            let error = serde_json::json!({ "error": message });
            eprintln!(
                "{}",
                serde_json::to_string_pretty(&error).unwrap_or_else(|_| message.to_string())
            );
        } else {
            eprintln!("{} {message}", self.glyph("✗", Glyph::Error));
        }
    }

    /// Output a warning message
    pub fn warning(&self, message: &str) {
        if self.config.quiet || self.config.json {
            return;
        }
        eprintln!("{} {message}", self.glyph("⚠", Glyph::Warning));
    }

    /// Output JSON directly
    pub fn json<T: Serialize>(&self, value: &T) {
        match serde_json::to_string_pretty(value) {
            Ok(json) => println!("{json}"),
            Err(e) => eprintln!("Error serializing output: {e}"),
        }
    }

    /// Print a line of text (respects quiet and JSON mode)
    pub fn println(&self, message: &str) {
        if self.config.quiet || self.config.json {
            return;
        }
        println!("{message}");
    }

    /// Status symbol, colored when the target stream is a terminal
    fn glyph(&self, symbol: &'static str, kind: Glyph) -> String {
        if !self.colors_enabled() {
            return symbol.to_string();
        }
        let styled = style(symbol);
        let styled = match kind {
            Glyph::Success => styled.green(),
            Glyph::Error => styled.for_stderr().red(),
            Glyph::Warning => styled.for_stderr().yellow(),
        };
        styled.to_string()
    }
}

#[derive(Clone, Copy)]
enum Glyph {
    Success,
    Error,
    Warning,
}

impl Default for Formatter {
    fn default() -> Self {
        Self::new(OutputConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formatter_default() {
        let formatter = Formatter::default();
        assert!(!formatter.is_json());
        assert!(formatter.colors_enabled());
    }

    #[test]
    fn test_formatter_json_mode() {
        let formatter = Formatter::new(OutputConfig {
            json: true,
            ..Default::default()
        });
        assert!(formatter.is_json());
        assert!(!formatter.colors_enabled());
    }

    #[test]
    fn test_glyph_plain_without_color() {
        let formatter = Formatter::new(OutputConfig {
            no_color: true,
            ..Default::default()
        });
        assert_eq!(formatter.glyph("✓", Glyph::Success), "✓");
    }

    #[test]
    fn test_glyph_styled_when_stderr_colors_enabled() {
        console::set_colors_enabled_stderr(true);
        let formatter = Formatter::default();
        let glyph = formatter.glyph("✗", Glyph::Error);
        assert!(glyph.contains('✗'));
        assert!(glyph.contains("\u{1b}["));
    }
}
