//! Borderless startup splash.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use horizon_foundation_core::TimerId;
use horizon_foundation_core::logging::targets;
use image::error::{ImageError, LimitError, LimitErrorKind};

use super::frame::{FrameConfig, MainFrame};
use crate::environment::Environment;
use crate::error::{ControlResult, FoundationError, Result};
use crate::geometry::Size;
use crate::layout::FormData;
use crate::widget::{ControlId, ControlKind, Style};

/// How often a splash waiting for background work checks the flag.
const BACKGROUND_POLL: Duration = Duration::from_millis(50);

/// A centered, untrimmed frame showing one label with text or an image.
///
/// The splash ends after the time given to
/// [`set_splash_time`](Self::set_splash_time). When it was told to wait for
/// background work, it instead stays up until the shared background flag
/// is raised (see [`crate::Application::background_initialization_complete`]).
pub struct SplashScreen {
    frame: MainFrame,
    label: ControlId,
    background_ready: Arc<AtomicBool>,
    wait_for_background: AtomicBool,
}

impl SplashScreen {
    /// Create a splash of `size`. `background_ready` is the flag raised
    /// when background initialization has finished.
    pub fn new(env: &Arc<Environment>, size: Size, background_ready: Arc<AtomicBool>) -> ControlResult<Self> {
        let frame = MainFrame::new(
            env,
            FrameConfig::new("")
                .with_size(size.width, size.height)
                .with_style(Style::NO_TRIM)
                .with_centered(true)
                .with_kind("splash"),
        )?;
        let controls = env.controls();
        let label = controls.create(ControlKind::Label, Some(frame.shell()), Style::NONE)?;
        controls.set_layout_data(label, Some(FormData::filled(0)))?;

        Ok(Self {
            frame,
            label,
            background_ready,
            wait_for_background: AtomicBool::new(false),
        })
    }

    /// The underlying frame.
    pub fn frame(&self) -> &MainFrame {
        &self.frame
    }

    /// The label filling the splash.
    pub fn label(&self) -> ControlId {
        self.label
    }

    /// Show text in the splash.
    pub fn set_label_text(&self, text: &str) -> ControlResult<()> {
        self.frame.env().controls().set_text(self.label, text)
    }

    /// Show an image of `size` and shrink the splash to fit it.
    pub fn set_image(&self, size: Size) -> ControlResult<()> {
        let controls = self.frame.env().controls();
        controls.set_image(self.label, Some(size))?;
        controls.pack(self.frame.shell())
    }

    /// Show the image stored at `path`.
    ///
    /// Only the image header is read to size the splash.
    pub fn set_image_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let (width, height) = image::image_dimensions(path).map_err(|source| FoundationError::Image {
            path: path.to_path_buf(),
            source,
        })?;
        let size = image_size(width, height).ok_or_else(|| FoundationError::Image {
            path: path.to_path_buf(),
            source: ImageError::Limits(LimitError::from_kind(LimitErrorKind::DimensionError)),
        })?;
        tracing::debug!(target: targets::WINDOW, path = %path.display(), width, height, "splash image");
        self.set_image(size)?;
        Ok(())
    }

    /// Whether the splash waits for background work once its time is up.
    pub fn set_wait_for_background(&self, wait: bool) {
        self.wait_for_background.store(wait, Ordering::Release);
    }

    /// Whether waiting for background work is armed.
    pub fn wait_for_background(&self) -> bool {
        self.wait_for_background.load(Ordering::Acquire)
    }

    /// Schedule the end of the splash after `duration`.
    ///
    /// If waiting for background work was requested before this call, the
    /// timer only arms the wait; otherwise it closes the splash.
    pub fn set_splash_time(&self, duration: Duration) -> TimerId {
        let wait = self.wait_for_background.swap(false, Ordering::AcqRel);
        let env = Arc::downgrade(self.frame.env());
        let shell = self.frame.shell();
        let ready = Arc::clone(&self.background_ready);
        self.frame.env().event_loop().timer_exec(duration, move || {
            if wait {
                poll_background(env, shell, ready);
            } else if let Some(env) = env.upgrade() {
                close_splash(&env, shell);
            }
        })
    }

    /// Open the splash centered on the screen.
    pub fn open(&self) -> ControlResult<()> {
        self.frame.open()
    }

    /// Dispatch events until the splash has closed.
    pub fn run(&self) {
        self.frame.run();
    }

    /// Close the splash now.
    pub fn close(&self) -> ControlResult<()> {
        self.frame.close()
    }
}

impl std::fmt::Debug for SplashScreen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SplashScreen")
            .field("shell", &self.frame.shell())
            .field("wait_for_background", &self.wait_for_background())
            .finish()
    }
}

fn poll_background(env: Weak<Environment>, shell: ControlId, ready: Arc<AtomicBool>) {
    let Some(strong) = env.upgrade() else {
        return;
    };
    if ready.load(Ordering::Acquire) {
        close_splash(&strong, shell);
    } else if strong.controls().contains(shell) {
        tracing::trace!(target: targets::WINDOW, "splash waiting for background work");
        strong
            .event_loop()
            .timer_exec(BACKGROUND_POLL, move || poll_background(env, shell, ready));
    }
}

fn image_size(width: u32, height: u32) -> Option<Size> {
    Some(Size::new(i32::try_from(width).ok()?, i32::try_from(height).ok()?))
}

fn close_splash(env: &Environment, shell: ControlId) {
    if !env.controls().contains(shell) {
        return;
    }
    match env.controls().dispose(shell) {
        Ok(()) => tracing::debug!(target: targets::WINDOW, "splash closed"),
        Err(err) => tracing::warn!(target: targets::WINDOW, %err, "failed to close splash"),
    }
}
