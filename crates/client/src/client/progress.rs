//! Progress reporting hook for search job polling.

/// Receives poll progress from a running search job.
///
/// On submission the client adds one step per allowed poll attempt, advances
/// one step per poll, and advances the unused remainder when polling ends, so
/// a progress bar always finishes full.
pub trait PollProgress: Send + Sync {
    /// Grow the total by `n` steps.
    fn add_steps(&self, n: u64);

    /// Mark `n` steps as done.
    fn advance(&self, n: u64);
}
