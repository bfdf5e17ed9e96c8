//! # Refresh Sinks
//!
//! Where refresh targets go once a recalculation is done.
//!
//! The host implements [`RefreshSink`] over its own "refresh field"
//! primitive. Refreshing is cosmetic: it synchronizes the view and has no
//! effect on the document.

use landed_core::RefreshTarget;
use tracing::trace;

/// Receives every field or table the form must redisplay.
pub trait RefreshSink {
    fn refresh(&mut self, target: RefreshTarget);
}

impl<T: RefreshSink + ?Sized> RefreshSink for &mut T {
    fn refresh(&mut self, target: RefreshTarget) {
        (**self).refresh(target);
    }
}

/// Discards refreshes. For headless use.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl RefreshSink for NoopSink {
    fn refresh(&mut self, _target: RefreshTarget) {}
}

/// Logs each refresh at TRACE level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl RefreshSink for TracingSink {
    fn refresh(&mut self, target: RefreshTarget) {
        trace!(refreshed = target.name(), "refresh");
    }
}

/// Keeps every refresh in order, duplicates included.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    targets: Vec<RefreshTarget>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything recorded so far.
    pub fn targets(&self) -> &[RefreshTarget] {
        &self.targets
    }

    /// Host names of everything recorded so far.
    pub fn names(&self) -> Vec<&'static str> {
        self.targets.iter().map(RefreshTarget::name).collect()
    }

    /// Drains the recording.
    pub fn take(&mut self) -> Vec<RefreshTarget> {
        std::mem::take(&mut self.targets)
    }
}

impl RefreshSink for RecordingSink {
    fn refresh(&mut self, target: RefreshTarget) {
        self.targets.push(target);
    }
}
