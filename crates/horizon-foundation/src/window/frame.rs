//! Top-level frames.
//!
//! A [`MainFrame`] owns one shell laid out with form attachments, an
//! optional status line along its bottom edge and the deferred layouts
//! ([`LayoutAdjuster`]s) that must run once the shell has been measured.
//! Opening a frame places it (explicitly, centered or cascaded), shows it,
//! finishes the deferred layouts and delivers the first paint.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use horizon_foundation_core::logging::targets;
use parking_lot::Mutex;

use super::placement::{AlignFlags, center_origin, snap_origin};
use crate::environment::Environment;
use crate::error::ControlResult;
use crate::geometry::{Point, Rect, Size};
use crate::layout::helpers::{self, EdgeSpec};
use crate::layout::{AdjustPhase, Attachment, CenterLayout, FormData, LayoutAdjuster, LayoutGroup};
use crate::widget::{ControlId, ControlKind, Style};

/// Options for creating a [`MainFrame`].
///
/// # Example
///
/// ```ignore
/// let frame = MainFrame::new(&env, FrameConfig::new("Customers")
///     .with_size(640, 480)
///     .with_status(true))?;
/// ```
#[derive(Debug, Clone)]
pub struct FrameConfig {
    title: String,
    parent: Option<ControlId>,
    size: Size,
    style: Style,
    status: bool,
    centered: bool,
    kind: &'static str,
}

impl FrameConfig {
    /// A 400x300 titled frame with standard trim.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            parent: None,
            size: Size::new(400, 300),
            style: Style::SHELL_TRIM,
            status: false,
            centered: false,
            kind: "frame",
        }
    }

    /// Make the frame a child of another shell.
    pub fn with_parent(mut self, parent: ControlId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Set the initial size.
    pub fn with_size(mut self, width: i32, height: i32) -> Self {
        self.size = Size::new(width, height);
        self
    }

    /// Set the shell style.
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Add a read-only status line along the bottom edge.
    pub fn with_status(mut self, status: bool) -> Self {
        self.status = status;
        self
    }

    /// Center on the screen instead of cascading.
    pub fn with_centered(mut self, centered: bool) -> Self {
        self.centered = centered;
        self
    }

    /// Set the kind recorded in the environment's window registry.
    pub fn with_kind(mut self, kind: &'static str) -> Self {
        self.kind = kind;
        self
    }
}

/// A top-level window with form layout.
pub struct MainFrame {
    env: Arc<Environment>,
    shell: ControlId,
    status: Option<ControlId>,
    centered: bool,
    kind: &'static str,
    location_set: AtomicBool,
    exit_requested: AtomicBool,
    adjusters: Mutex<Vec<Arc<dyn LayoutAdjuster>>>,
}

impl MainFrame {
    /// Create the shell (and status line) without showing it.
    pub fn new(env: &Arc<Environment>, config: FrameConfig) -> ControlResult<Self> {
        let controls = env.controls();
        let shell = controls.create(ControlKind::Shell, config.parent, config.style)?;
        controls.set_text(shell, &config.title)?;
        controls.set_size(shell, config.size)?;

        let status = if config.status {
            let status = controls.create(ControlKind::Text, Some(shell), Style::READ_ONLY)?;
            let margin = env.config().layout.status_margin;
            controls.set_layout_data(
                status,
                Some(FormData {
                    left: Some(Attachment::percent(0, margin)),
                    right: Some(Attachment::percent(100, -margin)),
                    bottom: Some(Attachment::percent(100, -margin)),
                    ..FormData::default()
                }),
            )?;
            Some(status)
        } else {
            None
        };

        tracing::debug!(target: targets::WINDOW, ?shell, title = %config.title, "frame created");
        Ok(Self {
            env: Arc::clone(env),
            shell,
            status,
            centered: config.centered,
            kind: config.kind,
            location_set: AtomicBool::new(false),
            exit_requested: AtomicBool::new(false),
            adjusters: Mutex::new(Vec::new()),
        })
    }

    /// The environment this frame lives in.
    pub fn env(&self) -> &Arc<Environment> {
        &self.env
    }

    /// The shell control.
    pub fn shell(&self) -> ControlId {
        self.shell
    }

    /// The status line, if the frame has one.
    pub fn status(&self) -> Option<ControlId> {
        self.status
    }

    /// The kind recorded in the window registry.
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// Whether the shell still exists.
    pub fn is_open(&self) -> bool {
        self.env.controls().contains(self.shell)
    }

    /// Current bounds of the shell.
    pub fn bounds(&self) -> ControlResult<Rect> {
        self.env.controls().bounds(self.shell)
    }

    /// Register, place, show and lay out the frame.
    ///
    /// Without an explicit location the frame is centered on the placement
    /// bounds when configured so, otherwise it takes the next cascade
    /// position. Every registered adjuster then gets its first chance to
    /// measure, and the frame is painted.
    #[tracing::instrument(skip(self), target = "horizon_foundation::window", level = "debug")]
    pub fn open(&self) -> ControlResult<()> {
        let controls = self.env.controls();
        self.env.register_window(self.shell, self.kind)?;

        if !self.location_set.load(Ordering::Acquire) {
            let size = controls.size(self.shell)?;
            let origin = if self.centered {
                center_origin(self.env.screen().placement_bounds(), size)
            } else {
                self.env.next_cascade_origin(size)
            };
            controls.set_location(self.shell, origin)?;
        }

        controls.set_visible(self.shell, true)?;
        controls.layout(self.shell)?;
        let pending = self.adjust_layouts();
        if pending > 0 {
            tracing::trace!(target: targets::LAYOUT, pending, "adjusters still provisional after open");
        }
        controls.paint(self.shell)
    }

    /// Run every provisional adjuster once. Returns how many remain
    /// provisional.
    pub fn adjust_layouts(&self) -> usize {
        let adjusters: Vec<_> = self.adjusters.lock().clone();
        adjusters
            .iter()
            .filter(|adjuster| adjuster.phase() == AdjustPhase::Provisional)
            .filter(|adjuster| adjuster.adjust() == AdjustPhase::Provisional)
            .count()
    }

    /// Dispatch events until exit is requested or the shell is disposed.
    pub fn run(&self) {
        self.run_with_hook(|_| {});
    }

    /// Like [`run`](Self::run), calling `hook` after every dispatch.
    ///
    /// Returns early when nothing is left that could end the loop.
    pub fn run_with_hook<F>(&self, mut hook: F)
    where
        F: FnMut(&Self),
    {
        let event_loop = self.env.event_loop();
        while !self.exit_requested() && self.is_open() {
            let dispatched = event_loop.read_and_dispatch();
            hook(self);
            if !dispatched && !event_loop.sleep() {
                tracing::debug!(target: targets::WINDOW, shell = ?self.shell, "frame loop idle, nothing scheduled");
                break;
            }
        }
    }

    /// Make [`run`](Self::run) return after the current dispatch.
    pub fn request_exit(&self) {
        self.exit_requested.store(true, Ordering::Release);
    }

    /// Whether exit was requested.
    pub fn exit_requested(&self) -> bool {
        self.exit_requested.load(Ordering::Acquire)
    }

    /// Dispose the shell. Closing a closed frame does nothing.
    pub fn close(&self) -> ControlResult<()> {
        if self.is_open() {
            self.env.controls().dispose(self.shell)?;
            tracing::debug!(target: targets::WINDOW, shell = ?self.shell, "frame closed");
        }
        Ok(())
    }

    /// Move the frame. Disables automatic placement on open.
    pub fn set_location(&self, location: Point) -> ControlResult<()> {
        self.env.controls().set_location(self.shell, location)?;
        self.location_set.store(true, Ordering::Release);
        Ok(())
    }

    /// Resize the frame.
    pub fn set_size(&self, size: Size) -> ControlResult<()> {
        self.env.controls().set_size(self.shell, size)
    }

    /// Move the frame so the chosen edges touch `other`.
    pub fn snap_to(&self, other: &MainFrame, flags: AlignFlags) -> ControlResult<()> {
        self.snap_to_rect(other.bounds()?, flags)
    }

    /// Move the frame so the chosen edges touch `reference`.
    pub fn snap_to_rect(&self, reference: Rect, flags: AlignFlags) -> ControlResult<()> {
        let size = self.env.controls().size(self.shell)?;
        self.set_location(snap_origin(reference, size, flags))
    }

    /// Keep `adjuster` and run it on open and on [`adjust_layouts`](Self::adjust_layouts).
    pub fn register_adjuster(&self, adjuster: Arc<dyn LayoutAdjuster>) {
        self.adjusters.lock().push(adjuster);
    }

    /// Number of registered adjusters.
    pub fn adjuster_count(&self) -> usize {
        self.adjusters.lock().len()
    }

    /// Center `control` horizontally on `percent` of its parent once it has
    /// been measured.
    pub fn center_on(&self, control: ControlId, percent: i32) -> Arc<CenterLayout> {
        let center = Arc::new(CenterLayout::new(Arc::clone(&self.env), control, percent));
        self.register_adjuster(center.clone());
        center
    }

    /// See [`helpers::center_near_bottom`]. The centering is registered.
    pub fn center_near_bottom(&self, control: ControlId, x_center: i32, y_offset: i32) -> ControlResult<FormData> {
        let (data, center) = helpers::center_near_bottom(&self.env, control, x_center, y_offset)?;
        self.register_adjuster(Arc::new(center));
        Ok(data)
    }

    /// See [`helpers::center_near_top`]. The centering is registered.
    pub fn center_near_top(&self, control: ControlId, x_center: i32, y_offset: i32) -> ControlResult<FormData> {
        let (data, center) = helpers::center_near_top(&self.env, control, x_center, y_offset)?;
        self.register_adjuster(Arc::new(center));
        Ok(data)
    }

    /// See [`helpers::center_below`]. The centering is registered.
    pub fn center_below(&self, control: ControlId, above: ControlId, y_offset: i32) -> ControlResult<FormData> {
        let (data, center) = helpers::center_below(&self.env, control, above, y_offset)?;
        self.register_adjuster(Arc::new(center));
        Ok(data)
    }

    /// Stretch `control` over the frame, stopping above the status line.
    pub fn fill_panel(&self, control: ControlId) -> ControlResult<FormData> {
        helpers::fill(&self.env, control, self.status)
    }

    /// See [`helpers::layout`].
    pub fn layout(
        &self,
        control: ControlId,
        left: EdgeSpec,
        right: EdgeSpec,
        top: EdgeSpec,
        bottom: EdgeSpec,
    ) -> ControlResult<FormData> {
        helpers::layout(&self.env, control, left, right, top, bottom)
    }

    /// See [`helpers::set_height`].
    pub fn set_height(&self, control: ControlId, height: i32) -> ControlResult<()> {
        helpers::set_height(&self.env, control, height)
    }

    /// Start a label/control group in the shell. The group is registered.
    pub fn layout_group(
        &self,
        left: Option<Attachment>,
        right: Option<Attachment>,
        top: Option<Attachment>,
    ) -> LayoutGroup {
        self.layout_group_in(self.shell, left, right, top)
    }

    /// Start a label/control group in a nested container. The group is
    /// registered.
    pub fn layout_group_in(
        &self,
        parent: ControlId,
        left: Option<Attachment>,
        right: Option<Attachment>,
        top: Option<Attachment>,
    ) -> LayoutGroup {
        let group = LayoutGroup::new(Arc::clone(&self.env), parent, left, right, top);
        self.register_adjuster(Arc::new(group.clone()));
        group
    }

    /// Lay out the shell again.
    pub fn relayout(&self) -> ControlResult<()> {
        self.env.controls().layout(self.shell)
    }

    /// Set the text of a field or label; `None` clears it.
    pub fn set_text_field(&self, control: ControlId, text: Option<&str>) -> ControlResult<()> {
        self.env.controls().set_text(control, text.unwrap_or(""))
    }

    /// Text of a field, trimmed. Blank text reads as `None`.
    pub fn text_field(&self, control: ControlId) -> ControlResult<Option<String>> {
        let text = self.env.controls().text(control)?;
        let trimmed = text.trim();
        Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
    }

    /// Show `text` in the status line. Frames without one ignore it.
    pub fn set_status(&self, text: &str) -> ControlResult<()> {
        match self.status {
            Some(status) => {
                tracing::debug!(target: targets::WINDOW, status = text);
                self.env.controls().set_text(status, text)
            }
            None => Ok(()),
        }
    }

    /// Empty the status line.
    pub fn clear_status(&self) -> ControlResult<()> {
        self.set_status("")
    }
}

impl std::fmt::Debug for MainFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MainFrame")
            .field("shell", &self.shell)
            .field("kind", &self.kind)
            .field("status", &self.status)
            .field("adjusters", &self.adjusters.lock().len())
            .finish_non_exhaustive()
    }
}

static_assertions::assert_impl_all!(MainFrame: Send, Sync);
