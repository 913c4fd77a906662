//! Deliberate UX pacing delays.
//!
//! The client holds its spinners for a beat so refresh and
//! infinite-scroll feel intentional rather than jittery. These are not
//! network timeouts or backoff; the delays elapse even when the
//! request returns instantly. Tests run with everything zeroed.

use std::time::Duration;

/// Pacing policy for the feed and the profile shelf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    /// How long the pull-to-refresh spinner stays visible on the feed.
    pub refresh: Duration,
    /// Pause before an infinite-scroll page fetch starts.
    pub load_more: Duration,
    /// How long the profile refresh spinner stays visible.
    pub shelf_refresh: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            refresh: Duration::from_millis(800),
            load_more: Duration::from_millis(1000),
            shelf_refresh: Duration::from_millis(500),
        }
    }
}

impl Pacing {
    /// Zero every delay.
    pub fn none() -> Self {
        Self {
            refresh: Duration::ZERO,
            load_more: Duration::ZERO,
            shelf_refresh: Duration::ZERO,
        }
    }
}
