use std::sync::atomic::{AtomicU64, Ordering};

/// Key under which the total is reported
pub const TOTAL_REQUESTS_KEY: &str = "total_requests";

/// Process-wide count of inbound requests.
///
/// Created once at startup and shared through the router state. Starts at 0 and
/// is not persisted across restarts.
#[derive(Debug, Default)]
pub struct RequestCounter {
    total: AtomicU64,
}

impl RequestCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one request
    pub fn increment(&self) {
        self.total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn read(&self) -> u64 {
        self.total.load(Ordering::Relaxed)
    }
}
