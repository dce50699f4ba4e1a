//! Form-attachment layout.
//!
//! Containers place their children with [`FormData`]: each edge attaches to
//! a percentage of the container or to a sibling's edge. On top of the
//! solver this module provides:
//!
//! - [`helpers`]: fill, center-on-point and one-call edge setup
//! - [`CenterLayout`]: centering that needs the control's measured width
//! - [`LayoutGroup`]: stacked label/control rows with justified labels
//!
//! Layouts that need measured sizes implement [`LayoutAdjuster`] and move
//! from [`AdjustPhase::Provisional`] to [`AdjustPhase::Adjusted`] once the
//! measurements exist.

mod adjust;
mod attachment;
mod center;
pub mod form_layout;
mod group;
pub mod helpers;

pub use adjust::{AdjustPhase, LayoutAdjuster};
pub use attachment::{Alignment, AttachTarget, Attachment, FormData, form_attachment};
pub use center::CenterLayout;
pub use group::LayoutGroup;
pub use helpers::EdgeSpec;
