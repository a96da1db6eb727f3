//! Output formatting utilities
//!
//! Human-readable and JSON output, plus the upload spinner.

mod formatter;
mod progress;

pub use formatter::Formatter;
pub use progress::ProgressBar;

/// Output configuration derived from CLI flags
#[derive(Debug, Clone, Default)]
pub struct OutputConfig {
    /// Use JSON output format
    pub json: bool,
    /// Disable colored output
    pub no_color: bool,
    /// Disable progress spinner
    pub no_progress: bool,
    /// Suppress non-error output
    pub quiet: bool,
}

impl OutputConfig {
    /// Whether transient progress output may be drawn
    pub fn progress_enabled(&self) -> bool {
        !(self.quiet || self.json || self.no_progress)
    }
}
