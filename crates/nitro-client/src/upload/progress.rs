//! # Upload Progress

/// Rounded percentage of `done` out of `total`, clamped to `0..=100`.
///
/// An empty file counts as complete.
#[must_use]
pub fn percent(done: u64, total: u64) -> u8 {
    if total == 0 {
        return 100;
    }
    let done = u128::from(done.min(total));
    let total = u128::from(total);
    // Round half up.
    let pct = (done * 200 + total) / (total * 2);
    u8::try_from(pct).unwrap_or(100)
}

/// Turns cumulative flushed byte counts into percentage updates, skipping
/// updates that would not change the displayed value.
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    total: u64,
    last: Option<u8>,
}

impl ProgressTracker {
    /// Creates a tracker for an upload of `total` bytes.
    #[must_use]
    pub fn new(total: u64) -> Self {
        Self { total, last: None }
    }

    /// Records that `flushed` bytes have been sent so far. Returns the new
    /// percentage if it differs from the last one reported.
    pub fn update(&mut self, flushed: u64) -> Option<u8> {
        let pct = percent(flushed, self.total);
        if self.last == Some(pct) {
            return None;
        }
        self.last = Some(pct);
        Some(pct)
    }

    /// The last percentage reported.
    #[must_use]
    pub fn last(&self) -> Option<u8> {
        self.last
    }
}
