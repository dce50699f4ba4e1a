//! Stacked label/control rows with right-justified labels.
//!
//! Rows are stacked top to bottom with a fixed vertical distance. Labels
//! start out left-aligned on the group's left attachment; once they have
//! been measured the widest label keeps that attachment and every other
//! label is right-aligned to the widest one's right edge, so all labels end
//! at the same x without wasting space.
//!
//! Justification is recomputed when a label is painted while the group is
//! provisional. Adding or removing rows and label size changes make the
//! group provisional again.

use std::sync::{Arc, Weak};

use horizon_foundation_core::logging::targets;
use horizon_foundation_core::ConnectionGuard;
use parking_lot::Mutex;

use super::adjust::{AdjustPhase, LayoutAdjuster, PhaseCell};
use super::attachment::{Alignment, Attachment, FormData};
use crate::environment::Environment;
use crate::error::ControlResult;
use crate::geometry::Size;
use crate::widget::ControlId;

struct GroupRow {
    label: ControlId,
    control: ControlId,
    _painted: ConnectionGuard<()>,
    _resized: ConnectionGuard<Size>,
}

struct GroupState {
    left: Option<Attachment>,
    right: Option<Attachment>,
    top: Option<Attachment>,
    x_increment: i32,
    y_increment: i32,
    rows: Vec<GroupRow>,
}

struct GroupInner {
    env: Arc<Environment>,
    parent: ControlId,
    state: Mutex<GroupState>,
    phase: PhaseCell,
}

/// A group of label/control rows inside one form-layout container.
///
/// Cloning yields another handle to the same group. Paint-triggered
/// justification stops once every handle has been dropped, so keep one
/// alive (for example by registering the group as a frame adjuster).
#[derive(Clone)]
pub struct LayoutGroup {
    inner: Arc<GroupInner>,
}

impl LayoutGroup {
    /// Create a group whose rows live in `parent`.
    ///
    /// `left` and `right` place the label column start and the control
    /// column end; `top` places the first row.
    pub fn new(
        env: Arc<Environment>,
        parent: ControlId,
        left: Option<Attachment>,
        right: Option<Attachment>,
        top: Option<Attachment>,
    ) -> Self {
        let layout = &env.config().layout;
        let state = GroupState {
            left,
            right,
            top,
            x_increment: layout.group_x_increment,
            y_increment: layout.group_y_increment,
            rows: Vec::new(),
        };
        Self {
            inner: Arc::new(GroupInner {
                env,
                parent,
                state: Mutex::new(state),
                phase: PhaseCell::default(),
            }),
        }
    }

    /// Horizontal gap between a label and its control.
    pub fn x_increment(&self) -> i32 {
        self.inner.state.lock().x_increment
    }

    /// Set the gap between a label and its control for rows added later.
    pub fn set_x_increment(&self, increment: i32) {
        self.inner.state.lock().x_increment = increment;
    }

    /// Vertical distance between rows.
    pub fn y_increment(&self) -> i32 {
        self.inner.state.lock().y_increment
    }

    /// Set the row distance for rows added later.
    pub fn set_y_increment(&self, increment: i32) {
        self.inner.state.lock().y_increment = increment;
    }

    /// Labels in row order.
    pub fn labels(&self) -> Vec<ControlId> {
        self.inner.state.lock().rows.iter().map(|r| r.label).collect()
    }

    /// Controls in row order.
    pub fn controls(&self) -> Vec<ControlId> {
        self.inner.state.lock().rows.iter().map(|r| r.control).collect()
    }

    /// Append a label/control row and return the control's layout data.
    ///
    /// The first row is placed by the group's top attachment, later rows
    /// below the previous row's control. `bottom` optionally anchors the
    /// control's bottom edge.
    pub fn add_pair(
        &self,
        label: ControlId,
        control: ControlId,
        bottom: Option<Attachment>,
    ) -> ControlResult<FormData> {
        let controls = self.inner.env.controls();

        let (label_data, control_data) = {
            let state = self.inner.state.lock();
            let top = match state.rows.last() {
                Some(previous) => Some(Attachment::control(previous.control, state.y_increment)),
                None => state.top,
            };
            let label_data = FormData {
                left: state.left,
                top,
                ..FormData::default()
            };
            let control_data = FormData {
                left: Some(Attachment::control(label, state.x_increment)),
                right: state.right,
                top: Some(Attachment::aligned(label, 0, Alignment::Top)),
                bottom,
                ..FormData::default()
            };
            (label_data, control_data)
        };

        controls.set_layout_data(label, Some(label_data))?;
        controls.set_layout_data(control, Some(control_data))?;

        let signals = controls.signals(label)?;
        let weak = Arc::downgrade(&self.inner);
        let painted = signals.painted.connect_scoped(move |_| {
            if let Some(inner) = Weak::upgrade(&weak) {
                if inner.phase.get() == AdjustPhase::Provisional {
                    inner.adjust();
                }
            }
        });
        let weak = Arc::downgrade(&self.inner);
        let resized = signals.resized.connect_scoped(move |_| {
            if let Some(inner) = Weak::upgrade(&weak) {
                inner.phase.set(AdjustPhase::Provisional);
            }
        });

        self.inner.state.lock().rows.push(GroupRow {
            label,
            control,
            _painted: painted,
            _resized: resized,
        });
        self.inner.phase.set(AdjustPhase::Provisional);
        tracing::trace!(target: targets::LAYOUT, ?label, ?control, "layout group row added");

        Ok(control_data)
    }

    /// Append a row of a label and two controls side by side.
    ///
    /// The second control is attached to the group's right edge and the
    /// first control ends one x-increment before it.
    pub fn add_triplet(
        &self,
        label: ControlId,
        first: ControlId,
        second: ControlId,
        bottom: Option<Attachment>,
    ) -> ControlResult<()> {
        let mut first_data = self.add_pair(label, first, bottom)?;
        let (right, x_increment) = {
            let state = self.inner.state.lock();
            (state.right, state.x_increment)
        };

        let second_data = FormData {
            right,
            top: first_data.top,
            bottom,
            ..FormData::default()
        };
        first_data.right = Some(Attachment::control(second, -x_increment));

        let controls = self.inner.env.controls();
        controls.set_layout_data(second, Some(second_data))?;
        controls.set_layout_data(first, Some(first_data))?;
        Ok(())
    }

    /// Remove the row whose label is `label`, closing the gap it leaves.
    ///
    /// The row below takes over the removed row's top attachment and the row
    /// above takes over its bottom attachments. The removed controls are
    /// left untouched. Unknown labels are ignored.
    pub fn remove_pair(&self, label: ControlId) -> ControlResult<()> {
        let controls = self.inner.env.controls();
        let mut state = self.inner.state.lock();
        let Some(index) = state.rows.iter().position(|r| r.label == label) else {
            return Ok(());
        };

        let removed = &state.rows[index];
        let removed_label = controls.layout_data(removed.label)?.unwrap_or_default();
        let removed_control = controls.layout_data(removed.control)?.unwrap_or_default();

        if let Some(below) = state.rows.get(index + 1) {
            let mut data = controls.layout_data(below.label)?.unwrap_or_default();
            data.top = removed_label.top;
            controls.set_layout_data(below.label, Some(data))?;
        }
        if index > 0 {
            let above = &state.rows[index - 1];
            let mut label_data = controls.layout_data(above.label)?.unwrap_or_default();
            label_data.bottom = removed_label.bottom;
            controls.set_layout_data(above.label, Some(label_data))?;

            let mut control_data = controls.layout_data(above.control)?.unwrap_or_default();
            control_data.bottom = removed_control.bottom;
            controls.set_layout_data(above.control, Some(control_data))?;
        }

        let row = state.rows.remove(index);
        drop(state);
        drop(row);
        self.inner.phase.set(AdjustPhase::Provisional);
        tracing::trace!(target: targets::LAYOUT, ?label, "layout group row removed");
        Ok(())
    }
}

impl GroupInner {
    fn adjust(&self) -> AdjustPhase {
        let phase = self.try_adjust().unwrap_or_else(|err| {
            tracing::debug!(target: targets::LAYOUT, %err, "layout group adjustment skipped");
            AdjustPhase::Provisional
        });
        self.phase.set(phase);
        phase
    }

    fn try_adjust(&self) -> ControlResult<AdjustPhase> {
        let controls = self.env.controls();
        let (labels, left) = {
            let state = self.state.lock();
            let labels: Vec<ControlId> = state.rows.iter().map(|r| r.label).collect();
            (labels, state.left)
        };
        match labels.as_slice() {
            [] => return Ok(AdjustPhase::Adjusted),
            // A lone label may still be right-aligned to a removed row.
            &[label] => {
                let mut data = controls.layout_data(label)?.unwrap_or_default();
                if data.left != left || data.right.is_some() {
                    data.left = left;
                    data.right = None;
                    controls.set_layout_data(label, Some(data))?;
                    controls.layout(self.parent)?;
                }
                return Ok(AdjustPhase::Adjusted);
            }
            _ => {}
        }

        let mut widest: Option<(ControlId, i32)> = None;
        for &label in &labels {
            let width = controls.size(label)?.width;
            if width > widest.map_or(0, |(_, w)| w) {
                widest = Some((label, width));
            }
        }
        let Some((widest, _)) = widest else {
            tracing::trace!(target: targets::LAYOUT, "layout group waiting for measurement");
            return Ok(AdjustPhase::Provisional);
        };

        let aligned_right = Attachment::aligned(widest, 0, Alignment::Right);
        for &label in &labels {
            let mut data = controls.layout_data(label)?.unwrap_or_default();
            if label == widest {
                data.left = left;
                data.right = None;
            } else {
                data.left = None;
                data.right = Some(aligned_right);
            }
            controls.set_layout_data(label, Some(data))?;
        }

        controls.layout(self.parent)?;
        Ok(AdjustPhase::Adjusted)
    }
}

impl LayoutAdjuster for LayoutGroup {
    fn adjust(&self) -> AdjustPhase {
        self.inner.adjust()
    }

    fn phase(&self) -> AdjustPhase {
        self.inner.phase.get()
    }
}

impl std::fmt::Debug for LayoutGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutGroup")
            .field("parent", &self.inner.parent)
            .field("rows", &self.inner.state.lock().rows.len())
            .field("phase", &self.inner.phase.get())
            .finish()
    }
}

static_assertions::assert_impl_all!(LayoutGroup: Send, Sync);
