//! The process-wide UI context.
//!
//! An [`Environment`] is created once at startup and shared as
//! `Arc<Environment>` with every frame, binding, layout helper and table
//! view. It owns the control registry, the event loop, the screen geometry,
//! the cascade placement state and the registry of open windows.

use std::sync::{Arc, Weak};

use horizon_foundation_core::EventLoop;
use horizon_foundation_core::logging::targets;
use parking_lot::Mutex;

use crate::config::FoundationConfig;
use crate::error::ControlResult;
use crate::geometry::{Point, Size};
use crate::widget::{Color, ControlId, SharedControlRegistry};
use crate::window::placement::CascadeState;
use crate::window::screen::ScreenInfo;

/// Named colors available to every frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// Black.
    pub black: Color,
    /// White.
    pub white: Color,
    /// Green.
    pub green: Color,
    /// Red.
    pub red: Color,
    /// Yellow.
    pub yellow: Color,
    /// Blue.
    pub blue: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            black: Color::BLACK,
            white: Color::WHITE,
            green: Color::GREEN,
            red: Color::RED,
            yellow: Color::YELLOW,
            blue: Color::BLUE,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct WindowRecord {
    shell: ControlId,
    kind: &'static str,
}

/// Shared UI context.
pub struct Environment {
    config: FoundationConfig,
    screen: ScreenInfo,
    palette: Palette,
    controls: SharedControlRegistry,
    event_loop: EventLoop,
    cascade: Mutex<CascadeState>,
    windows: Mutex<Vec<WindowRecord>>,
}

impl Environment {
    /// Create the context from a configuration.
    pub fn new(config: FoundationConfig) -> Arc<Self> {
        let screen = ScreenInfo::from(&config.screen);
        let controls = SharedControlRegistry::new(config.metrics.clone());
        let cascade = CascadeState::new(config.placement.cascade_step);
        tracing::debug!(
            target: targets::WINDOW,
            bounds = ?screen.placement_bounds(),
            "environment created"
        );
        Arc::new(Self {
            config,
            screen,
            palette: Palette::default(),
            controls,
            event_loop: EventLoop::new(),
            cascade: Mutex::new(cascade),
            windows: Mutex::new(Vec::new()),
        })
    }

    /// Create the context with default configuration.
    pub fn with_defaults() -> Arc<Self> {
        Self::new(FoundationConfig::default())
    }

    /// The configuration in effect.
    pub fn config(&self) -> &FoundationConfig {
        &self.config
    }

    /// Screen geometry.
    pub fn screen(&self) -> &ScreenInfo {
        &self.screen
    }

    /// Named colors.
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// The control registry.
    pub fn controls(&self) -> &SharedControlRegistry {
        &self.controls
    }

    /// The event loop.
    pub fn event_loop(&self) -> &EventLoop {
        &self.event_loop
    }

    /// Advance the cascade and return the origin for a window of `size`.
    pub fn next_cascade_origin(&self, size: Size) -> Point {
        let bounds = self.screen.placement_bounds();
        self.cascade.lock().next_origin(bounds, size)
    }

    /// Current cascade state.
    pub fn cascade_state(&self) -> CascadeState {
        *self.cascade.lock()
    }

    /// Track an open window until its shell is disposed.
    ///
    /// Registering the same shell twice has no effect.
    pub fn register_window(self: &Arc<Self>, shell: ControlId, kind: &'static str) -> ControlResult<()> {
        {
            let mut windows = self.windows.lock();
            if windows.iter().any(|w| w.shell == shell) {
                return Ok(());
            }
            windows.push(WindowRecord { shell, kind });
        }

        let weak: Weak<Self> = Arc::downgrade(self);
        self.controls.signals(shell)?.disposed.connect(move |_| {
            if let Some(env) = weak.upgrade() {
                env.unregister_window(shell);
            }
        });
        tracing::debug!(target: targets::WINDOW, ?shell, kind, "window registered");
        Ok(())
    }

    fn unregister_window(&self, shell: ControlId) {
        self.windows.lock().retain(|w| w.shell != shell);
        tracing::debug!(target: targets::WINDOW, ?shell, "window unregistered");
    }

    /// Shells of every open window, in opening order.
    pub fn windows(&self) -> Vec<ControlId> {
        self.windows.lock().iter().map(|w| w.shell).collect()
    }

    /// Shells of open windows registered with `kind`.
    pub fn windows_of_kind(&self, kind: &str) -> Vec<ControlId> {
        self.windows
            .lock()
            .iter()
            .filter(|w| w.kind == kind)
            .map(|w| w.shell)
            .collect()
    }

    /// Dispatch events until every registered window has closed.
    ///
    /// Returns early when windows remain but nothing is left that could
    /// ever close them.
    pub fn run(&self) {
        while !self.windows.lock().is_empty() {
            if !self.event_loop.read_and_dispatch() && !self.event_loop.sleep() {
                tracing::debug!(target: targets::WINDOW, "no pending events, leaving dispatch loop");
                break;
            }
        }
    }
}

impl std::fmt::Debug for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Environment")
            .field("screen", &self.screen)
            .field("windows", &self.windows.lock().len())
            .finish_non_exhaustive()
    }
}

static_assertions::assert_impl_all!(Environment: Send, Sync);
