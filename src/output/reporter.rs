//! Presentation-layer implementations of `ProgressReporter`.

use indicatif::ProgressBar;

use crate::application::ports::ProgressReporter;

/// Reporter that drives a terminal spinner.
///
/// - `step()` and `success()` replace the spinner message
/// - `warn()` prints above the spinner
pub struct SpinnerReporter {
    pb: ProgressBar,
}

impl SpinnerReporter {
    /// Wrap an existing spinner.
    #[must_use]
    pub fn new(pb: ProgressBar) -> Self {
        Self { pb }
    }

    /// The wrapped spinner, for finishing once the use-case returns.
    #[must_use]
    pub fn bar(&self) -> &ProgressBar {
        &self.pb
    }
}

impl ProgressReporter for SpinnerReporter {
    fn step(&self, message: &str) {
        self.pb.set_message(message.to_string());
    }

    fn success(&self, message: &str) {
        self.pb.set_message(message.to_string());
    }

    fn warn(&self, message: &str) {
        self.pb.println(format!("  ! {message}"));
    }
}

/// Reporter for JSON, quiet, and non-TTY output: records nothing.
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {
    fn step(&self, _: &str) {}
    fn success(&self, _: &str) {}
    fn warn(&self, _: &str) {}
}
