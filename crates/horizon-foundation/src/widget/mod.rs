//! Headless control model.
//!
//! The native toolkit is represented by a retained registry of controls.
//! Each control is addressed by a [`ControlId`] and carries the state the
//! foundation layer reads and writes: text, bounds, layout data, visibility,
//! parent/children and a set of notification signals.
//!
//! Nothing is drawn. A paint pass only delivers [`ControlSignals::painted`]
//! notifications, and user input is injected through
//! [`SharedControlRegistry::type_text`], [`SharedControlRegistry::click`] and
//! friends.

mod registry;
mod style;
mod widgets;

use horizon_foundation_core::Signal;
use slotmap::new_key_type;

use crate::geometry::Size;

pub use registry::{ControlRegistry, SharedControlRegistry, TableColumnSpec};
pub use style::{Accelerator, Color, Style, TextAlignment};
pub use widgets::{CallbackButton, CallbackMenuItem};

new_key_type! {
    /// Handle to a control in the registry.
    pub struct ControlId;
}

/// The kinds of controls the foundation layer works with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlKind {
    /// A top-level window.
    Shell,
    /// A plain container.
    Composite,
    /// Static text or image.
    Label,
    /// Editable text field.
    Text,
    /// Drop-down with editable text.
    Combo,
    /// Push button.
    Button,
    /// Menu entry.
    MenuItem,
    /// Multi-column table.
    Table,
}

impl ControlKind {
    /// Whether controls of this kind may have children.
    pub fn is_container(self) -> bool {
        matches!(self, Self::Shell | Self::Composite)
    }

    /// Whether this kind holds user-editable text.
    pub fn is_editable_text(self) -> bool {
        matches!(self, Self::Text | Self::Combo)
    }
}

/// Notifications a control delivers.
///
/// Signals are emitted by the shared registry after its lock is released,
/// so slots may freely call back into the registry.
#[derive(Default)]
pub struct ControlSignals {
    /// The text changed (text fields and combos).
    pub modified: Signal<()>,
    /// The control was painted.
    pub painted: Signal<()>,
    /// The control was disposed. Emitted children first.
    pub disposed: Signal<()>,
    /// Single activation: button press, menu selection, table row click.
    pub selected: Signal<()>,
    /// Double activation: table row double click.
    pub default_selected: Signal<()>,
    /// A table column header was clicked.
    pub column_clicked: Signal<usize>,
    /// The control's size changed during layout.
    pub resized: Signal<Size>,
}

impl std::fmt::Debug for ControlSignals {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControlSignals")
            .field("modified", &self.modified.connection_count())
            .field("painted", &self.painted.connection_count())
            .field("disposed", &self.disposed.connection_count())
            .field("selected", &self.selected.connection_count())
            .finish_non_exhaustive()
    }
}

static_assertions::assert_impl_all!(ControlSignals: Send, Sync);
static_assertions::assert_impl_all!(SharedControlRegistry: Send, Sync);
