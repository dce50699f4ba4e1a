//! Controls that invoke a [`Callback`] when activated.

use std::sync::Arc;

use horizon_foundation_core::ConnectionId;
use horizon_foundation_core::logging::targets;

use super::{Accelerator, ControlId, ControlKind, ControlSignals, SharedControlRegistry, Style};
use crate::error::ControlResult;
use crate::reflect::Callback;

/// Connect `callback` to the `selected` notification of `control`.
///
/// The connection lives as long as the control.
fn wire(
    controls: &SharedControlRegistry,
    control: ControlId,
    callback: &Callback,
) -> ControlResult<(Arc<ControlSignals>, ConnectionId)> {
    let signals = controls.signals(control)?;
    let callback = callback.clone();
    let connection = signals.selected.connect(move |_| {
        tracing::trace!(target: targets::CONTROL, ?control, method = callback.name(), "activated");
        callback.invoke();
    });
    Ok((signals, connection))
}

/// A push button that invokes a callback when pressed.
#[derive(Debug)]
pub struct CallbackButton {
    control: ControlId,
    callback: Callback,
    signals: Arc<ControlSignals>,
    connection: ConnectionId,
}

impl CallbackButton {
    /// Create a button labelled `label` inside `parent`.
    pub fn new(
        controls: &SharedControlRegistry,
        parent: ControlId,
        label: &str,
        callback: Callback,
    ) -> ControlResult<Self> {
        let control = controls.create(ControlKind::Button, Some(parent), Style::NONE)?;
        controls.set_text(control, label)?;
        let (signals, connection) = wire(controls, control, &callback)?;
        Ok(Self {
            control,
            callback,
            signals,
            connection,
        })
    }

    /// The button control.
    pub fn control(&self) -> ControlId {
        self.control
    }

    /// The callback invoked on press.
    pub fn callback(&self) -> &Callback {
        &self.callback
    }

    /// Stop invoking the callback. The button itself stays.
    pub fn detach(&self) -> bool {
        self.signals.selected.disconnect(self.connection)
    }
}

/// A menu entry that invokes a callback when chosen.
#[derive(Debug)]
pub struct CallbackMenuItem {
    control: ControlId,
    callback: Callback,
    signals: Arc<ControlSignals>,
    connection: ConnectionId,
}

impl CallbackMenuItem {
    /// Create a menu entry labelled `label` inside `parent`, optionally with
    /// a keyboard accelerator.
    ///
    /// The accelerator is shown after a tab in the entry's text, e.g.
    /// `"Save\tCtrl+S"`.
    pub fn new(
        controls: &SharedControlRegistry,
        parent: ControlId,
        label: &str,
        callback: Callback,
        accelerator: Option<Accelerator>,
    ) -> ControlResult<Self> {
        let control = controls.create(ControlKind::MenuItem, Some(parent), Style::NONE)?;
        let text = match accelerator {
            Some(accelerator) => format!("{label}\t{accelerator}"),
            None => label.to_string(),
        };
        controls.set_text(control, &text)?;
        controls.set_accelerator(control, accelerator)?;
        let (signals, connection) = wire(controls, control, &callback)?;
        Ok(Self {
            control,
            callback,
            signals,
            connection,
        })
    }

    /// The menu item control.
    pub fn control(&self) -> ControlId {
        self.control
    }

    /// The callback invoked on selection.
    pub fn callback(&self) -> &Callback {
        &self.callback
    }

    /// Stop invoking the callback.
    pub fn detach(&self) -> bool {
        self.signals.selected.disconnect(self.connection)
    }
}
