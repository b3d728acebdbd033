//! Progress indicator for search job polling.
//!
//! Responsibilities:
//! - Implement `sumo_client::PollProgress` on top of an `indicatif` bar.
//! - Ensure ALL progress output is written to STDERR (never stdout), so machine-readable
//!   command output (json/csv/yaml) is not contaminated.
//!
//! Non-responsibilities:
//! - This module does not decide *when* progress should be shown; callers do.
//! - This module does not print command results; stdout remains reserved for results.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Duration;
use sumo_client::PollProgress;

/// Step-based bar driven by the client's poll loop.
///
/// The client adds the maximum number of polls when a job is submitted and
/// advances once per poll, so the bar reaches its end when the job finishes
/// or is abandoned.
pub(crate) struct SearchProgress {
    label: String,
    pb: ProgressBar,
}

impl SearchProgress {
    pub(crate) fn new(label: impl Into<String>) -> Self {
        let label = label.into();

        let pb = ProgressBar::new(0);
        pb.set_draw_target(ProgressDrawTarget::stderr());
        if let Ok(style) =
            ProgressStyle::with_template("{spinner} {msg} [{bar:40.cyan/blue}] {pos}/{len} polls")
        {
            pb.set_style(style.progress_chars("=>-"));
        }
        pb.set_message(label.clone());
        pb.enable_steady_tick(Duration::from_millis(100));

        Self { label, pb }
    }

    /// Finish the progress indicator with a stable message (on STDERR).
    pub(crate) fn finish(&self) {
        self.pb.finish_with_message(format!("{} done", self.label));
    }
}

impl PollProgress for SearchProgress {
    fn add_steps(&self, n: u64) {
        self.pb.inc_length(n);
    }

    fn advance(&self, n: u64) {
        self.pb.inc(n);
    }
}

impl Drop for SearchProgress {
    fn drop(&mut self) {
        // Clear an unfinished bar so it does not interleave with error output.
        if !self.pb.is_finished() {
            self.pb.finish_and_clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steps_accumulate() {
        let progress = SearchProgress::new("search");
        progress.pb.set_draw_target(ProgressDrawTarget::hidden());

        progress.add_steps(10);
        progress.advance(3);
        progress.advance(7);

        assert_eq!(progress.pb.length(), Some(10));
        assert_eq!(progress.pb.position(), 10);
    }
}
