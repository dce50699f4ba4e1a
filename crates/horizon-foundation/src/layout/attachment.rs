//! Edge attachments and per-control layout data.

use crate::widget::ControlId;

/// Which edge of a sibling an attachment refers to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Alignment {
    /// The sibling edge facing this control: a left or top edge attaches to
    /// the sibling's right or bottom, a right or bottom edge to its left or top.
    #[default]
    Adjacent,
    /// The sibling's top edge.
    Top,
    /// The sibling's bottom edge.
    Bottom,
    /// The sibling's left edge.
    Left,
    /// The sibling's right edge.
    Right,
    /// The sibling's center line, with this control centered on it.
    Center,
}

/// What an edge is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttachTarget {
    /// A percentage (0 to 100) of the parent's extent.
    Percent(i32),
    /// An edge of a sibling control.
    Control {
        /// The sibling.
        id: ControlId,
        /// The sibling edge used.
        align: Alignment,
    },
}

/// Constraint placing one edge of a control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Attachment {
    /// Percent of the parent or a sibling edge.
    pub target: AttachTarget,
    /// Pixels added to the target position.
    pub offset: i32,
}

impl Attachment {
    /// Attach at `percent` of the parent's extent plus `offset`.
    ///
    /// The percentage is clamped to 0..=100.
    pub fn percent(percent: i32, offset: i32) -> Self {
        Self {
            target: AttachTarget::Percent(percent.clamp(0, 100)),
            offset,
        }
    }

    /// Attach to the facing edge of `sibling` plus `offset`.
    pub fn control(sibling: ControlId, offset: i32) -> Self {
        Self::aligned(sibling, offset, Alignment::Adjacent)
    }

    /// Attach to the given edge of `sibling` plus `offset`.
    pub fn aligned(sibling: ControlId, offset: i32, align: Alignment) -> Self {
        Self {
            target: AttachTarget::Control { id: sibling, align },
            offset,
        }
    }

    /// The sibling this attachment depends on, if any.
    pub fn sibling(&self) -> Option<ControlId> {
        match self.target {
            AttachTarget::Percent(_) => None,
            AttachTarget::Control { id, .. } => Some(id),
        }
    }
}

/// Build an attachment from the loose form used by the layout helpers.
///
/// A sibling takes precedence over a percentage. When there is no sibling
/// and both `percent` and `offset` are zero the edge is left unattached;
/// use [`Attachment::percent`]`(0, 0)` to pin an edge to the parent origin.
pub fn form_attachment(
    sibling: Option<ControlId>,
    percent: i32,
    offset: i32,
) -> Option<Attachment> {
    match sibling {
        Some(id) => Some(Attachment::control(id, offset)),
        None if percent == 0 && offset == 0 => None,
        None => Some(Attachment::percent(percent, offset)),
    }
}

/// Layout constraints of one control inside a form-layout container.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct FormData {
    /// Left edge.
    pub left: Option<Attachment>,
    /// Right edge.
    pub right: Option<Attachment>,
    /// Top edge.
    pub top: Option<Attachment>,
    /// Bottom edge.
    pub bottom: Option<Attachment>,
    /// Width override used when the horizontal size is not spanned.
    pub width: Option<i32>,
    /// Height override used when the vertical size is not spanned.
    pub height: Option<i32>,
}

impl FormData {
    /// Empty layout data.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach all four edges to the parent with `margin` inset.
    pub fn filled(margin: i32) -> Self {
        Self {
            left: Some(Attachment::percent(0, margin)),
            right: Some(Attachment::percent(100, -margin)),
            top: Some(Attachment::percent(0, margin)),
            bottom: Some(Attachment::percent(100, -margin)),
            ..Self::default()
        }
    }
}
