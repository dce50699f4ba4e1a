//! Two-phase layout adjustment.
//!
//! Some layouts depend on measured control sizes that only exist after the
//! first layout pass. Such layouts implement [`LayoutAdjuster`]: they start
//! [`AdjustPhase::Provisional`], and each call to [`LayoutAdjuster::adjust`]
//! either completes the layout or leaves it provisional for a later retry.

use parking_lot::Mutex;

/// Whether a deferred layout has been finalized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum AdjustPhase {
    /// Waiting for measured sizes.
    #[default]
    Provisional,
    /// Final geometry applied.
    Adjusted,
}

/// A layout that finishes after controls have been measured.
pub trait LayoutAdjuster: Send + Sync {
    /// Try to finalize the layout. Returns the resulting phase.
    ///
    /// Must be a silent no-op returning [`AdjustPhase::Provisional`] when
    /// the required measurements are not available yet.
    fn adjust(&self) -> AdjustPhase;

    /// The current phase.
    fn phase(&self) -> AdjustPhase;
}

/// Phase storage shared by adjusters.
#[derive(Debug, Default)]
pub(crate) struct PhaseCell(Mutex<AdjustPhase>);

impl PhaseCell {
    pub(crate) fn get(&self) -> AdjustPhase {
        *self.0.lock()
    }

    pub(crate) fn set(&self, phase: AdjustPhase) {
        *self.0.lock() = phase;
    }
}
