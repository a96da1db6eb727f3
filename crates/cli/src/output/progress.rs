//! Spinner shown while a file is being uploaded

use std::time::Duration;

use indicatif::ProgressStyle;

use super::OutputConfig;

/// Spinner wrapper
///
/// In quiet, JSON, or no-progress mode nothing is drawn and every method is a
/// no-op. The spinner draws to stderr.
#[derive(Debug)]
pub struct ProgressBar {
    bar: Option<indicatif::ProgressBar>,
}

impl ProgressBar {
    /// Create a hidden-until-used spinner
    pub fn spinner(config: &OutputConfig) -> Self {
        let bar = config.progress_enabled().then(|| {
            let bar = indicatif::ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}")
            {
                bar.set_style(style);
            }
            bar.enable_steady_tick(Duration::from_millis(100));
            bar
        });

        Self { bar }
    }

    /// Set message
    pub fn set_message(&self, message: impl Into<String>) {
        if let Some(bar) = &self.bar {
            bar.set_message(message.into());
        }
    }

    /// Run `f` with the spinner hidden so regular output is not interleaved
    pub fn suspend<R>(&self, f: impl FnOnce() -> R) -> R {
        match &self.bar {
            Some(bar) => bar.suspend(f),
            None => f(),
        }
    }

    /// Finish and clear the spinner
    pub fn finish_and_clear(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}

impl Drop for ProgressBar {
    fn drop(&mut self) {
        self.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spinner_quiet_mode() {
        let config = OutputConfig {
            quiet: true,
            ..Default::default()
        };
        assert!(ProgressBar::spinner(&config).bar.is_none());
    }

    #[test]
    fn test_spinner_json_mode() {
        let config = OutputConfig {
            json: true,
            ..Default::default()
        };
        assert!(ProgressBar::spinner(&config).bar.is_none());
    }

    #[test]
    fn test_spinner_no_progress() {
        let config = OutputConfig {
            no_progress: true,
            ..Default::default()
        };
        assert!(ProgressBar::spinner(&config).bar.is_none());
    }

    #[test]
    fn test_spinner_normal() {
        let bar = ProgressBar::spinner(&OutputConfig::default());
        assert!(bar.bar.is_some());
        bar.finish_and_clear();
    }
}
