//! A small frame showing a message and an OK button.

use std::sync::{Arc, Weak};

use horizon_foundation_core::MetaObjectBuilder;
use horizon_foundation_core::logging::targets;
use horizon_foundation_core::shared;
use horizon_foundation_macros::Reflect;

use super::frame::{FrameConfig, MainFrame};
use crate::environment::Environment;
use crate::error::ControlResult;
use crate::layout::{Attachment, FormData};
use crate::reflect::Callback;
use crate::widget::{CallbackButton, ControlId, ControlKind, Style};

/// Target of the OK button.
#[derive(Reflect)]
#[reflect(methods = "MessageActions::register")]
struct MessageActions {
    #[reflect(skip)]
    env: Weak<Environment>,
    #[reflect(skip)]
    shell: ControlId,
}

impl MessageActions {
    fn register(builder: MetaObjectBuilder<Self>) -> MetaObjectBuilder<Self> {
        builder.try_method0("ok", Self::ok)
    }

    fn ok(&mut self) -> ControlResult<()> {
        let Some(env) = self.env.upgrade() else {
            return Ok(());
        };
        if env.controls().contains(self.shell) {
            env.controls().dispose(self.shell)?;
            tracing::debug!(target: targets::WINDOW, shell = ?self.shell, "message acknowledged");
        }
        Ok(())
    }
}

/// A packed frame with a message label above a centered OK button that
/// closes it.
#[derive(Debug)]
pub struct MessageFrame {
    frame: MainFrame,
    label: ControlId,
    ok: CallbackButton,
}

impl MessageFrame {
    /// Build the message frame for `text`. It is not opened.
    pub fn new(env: &Arc<Environment>, parent: Option<ControlId>, text: &str) -> ControlResult<Self> {
        let mut config = FrameConfig::new("Message").with_kind("message");
        if let Some(parent) = parent {
            config = config.with_parent(parent);
        }
        let frame = MainFrame::new(env, config)?;
        let shell = frame.shell();
        let controls = env.controls();

        let label = controls.create(ControlKind::Label, Some(shell), Style::NONE)?;
        controls.set_text(label, text)?;
        controls.set_layout_data(
            label,
            Some(FormData {
                top: Some(Attachment::percent(0, 30)),
                left: Some(Attachment::percent(0, 20)),
                right: Some(Attachment::percent(100, -20)),
                ..FormData::default()
            }),
        )?;

        let actions = shared(MessageActions {
            env: Arc::downgrade(env),
            shell,
        });
        let ok = CallbackButton::new(controls, shell, "OK", Callback::new(actions, "ok", None))?;
        controls.set_layout_data(
            ok.control(),
            Some(FormData {
                top: Some(Attachment::control(label, 30)),
                left: Some(Attachment::percent(50, -30)),
                ..FormData::default()
            }),
        )?;

        controls.pack(shell)?;
        Ok(Self { frame, label, ok })
    }

    /// The underlying frame.
    pub fn frame(&self) -> &MainFrame {
        &self.frame
    }

    /// The message label.
    pub fn label(&self) -> ControlId {
        self.label
    }

    /// The OK button.
    pub fn ok_button(&self) -> ControlId {
        self.ok.control()
    }

    /// Show the frame.
    pub fn open(&self) -> ControlResult<()> {
        self.frame.open()
    }

    /// Dispatch events until the frame is closed.
    pub fn run(&self) {
        self.frame.run();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Rect, Size};

    #[test]
    fn test_message_frame_is_packed() {
        let env = Environment::with_defaults();
        let message = MessageFrame::new(&env, None, "Saved").unwrap();
        let controls = env.controls();

        // "Saved": 5 * 7 + 2 * 3 = 41 wide, 15 + 6 = 21 high.
        assert_eq!(controls.bounds(message.label()).unwrap(), Rect::new(20, 30, 41, 21));
        // "OK": 2 * 7 + 6 = 20 wide.
        let ok = controls.bounds(message.ok_button()).unwrap();
        assert_eq!(ok.y, 30 + 21 + 30);
        assert_eq!(ok.size(), Size::new(20, 21));
        assert_eq!(message.frame().bounds().unwrap().size(), Size::new(81, 102));
    }

    #[test]
    fn test_ok_closes_frame() {
        let env = Environment::with_defaults();
        let message = MessageFrame::new(&env, None, "Done").unwrap();
        message.open().unwrap();
        assert_eq!(env.windows_of_kind("message"), vec![message.frame().shell()]);

        env.controls().click(message.ok_button()).unwrap();
        assert!(!message.frame().is_open());
        assert!(env.windows().is_empty());
    }
}
