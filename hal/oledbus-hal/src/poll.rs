//! Bounded polling
//!
//! All waits on peripheral status flags go through [`poll_until`], which
//! gives up after a fixed number of iterations rather than wall-clock time.

/// Result of waiting on a status flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PollOutcome {
    /// The flag asserted within the bound
    Ready,
    /// The bound was exhausted first
    Timeout,
}

impl PollOutcome {
    /// Check if the wait succeeded
    pub const fn is_ready(self) -> bool {
        matches!(self, PollOutcome::Ready)
    }
}

/// Poll `ready` until it returns true or `timeout` retries have elapsed
///
/// The condition is sampled at most `timeout + 1` times. With a timeout of
/// zero it is sampled exactly once.
pub fn poll_until<F>(timeout: u32, mut ready: F) -> PollOutcome
where
    F: FnMut() -> bool,
{
    let mut counter: u32 = 0;
    while !ready() {
        if counter >= timeout {
            return PollOutcome::Timeout;
        }
        counter += 1;
    }
    PollOutcome::Ready
}
