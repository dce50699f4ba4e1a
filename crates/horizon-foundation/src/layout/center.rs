//! Horizontal centering on a percentage of the parent.

use std::sync::Arc;

use horizon_foundation_core::logging::targets;

use super::adjust::{AdjustPhase, LayoutAdjuster, PhaseCell};
use super::attachment::Attachment;
use crate::environment::Environment;
use crate::error::ControlResult;
use crate::widget::ControlId;

/// Centers a control on `percent` of its parent's width.
///
/// A form attachment cannot express "center on a point", so the left edge
/// is rewritten to `percent` with an offset of minus half the control's
/// measured width once that width is known.
pub struct CenterLayout {
    env: Arc<Environment>,
    control: ControlId,
    percent: i32,
    phase: PhaseCell,
}

impl CenterLayout {
    /// Center `control` on `percent` (0 to 100) of its parent's width.
    pub fn new(env: Arc<Environment>, control: ControlId, percent: i32) -> Self {
        Self {
            env,
            control,
            percent: percent.clamp(0, 100),
            phase: PhaseCell::default(),
        }
    }

    /// The centered control.
    pub fn control(&self) -> ControlId {
        self.control
    }

    /// The horizontal center as a percentage of the parent.
    pub fn percent(&self) -> i32 {
        self.percent
    }

    fn try_adjust(&self) -> ControlResult<AdjustPhase> {
        let controls = self.env.controls();
        let width = controls.size(self.control)?.width;
        if width <= 0 {
            tracing::trace!(target: targets::LAYOUT, control = ?self.control, "center layout waiting for measurement");
            return Ok(AdjustPhase::Provisional);
        }

        let mut data = controls.layout_data(self.control)?.unwrap_or_default();
        data.left = Some(Attachment::percent(self.percent, -(width / 2)));
        controls.set_layout_data(self.control, Some(data))?;
        if let Some(parent) = controls.parent(self.control)? {
            controls.layout(parent)?;
        }
        Ok(AdjustPhase::Adjusted)
    }
}

impl LayoutAdjuster for CenterLayout {
    fn adjust(&self) -> AdjustPhase {
        let phase = self.try_adjust().unwrap_or_else(|err| {
            tracing::debug!(target: targets::LAYOUT, control = ?self.control, %err, "center layout skipped");
            AdjustPhase::Provisional
        });
        self.phase.set(phase);
        phase
    }

    fn phase(&self) -> AdjustPhase {
        self.phase.get()
    }
}

impl std::fmt::Debug for CenterLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CenterLayout")
            .field("control", &self.control)
            .field("percent", &self.percent)
            .field("phase", &self.phase.get())
            .finish()
    }
}
