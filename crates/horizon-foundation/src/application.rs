//! The application shell.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use horizon_foundation_core::logging::targets;

use crate::config::FoundationConfig;
use crate::environment::Environment;
use crate::error::{ControlResult, Result};
use crate::geometry::Size;
use crate::window::SplashScreen;

/// Owns the environment and tracks whether background initialization has
/// finished.
///
/// # Example
///
/// ```no_run
/// use horizon_foundation::{Application, FrameConfig, MainFrame};
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let app = Application::with_defaults();
///     let frame = MainFrame::new(app.env(), FrameConfig::new("Contacts"))?;
///     frame.open()?;
///     app.run();
///     Ok(())
/// }
/// ```
pub struct Application {
    env: Arc<Environment>,
    background_ready: Arc<AtomicBool>,
}

impl Application {
    /// Create the application from a configuration.
    pub fn new(config: FoundationConfig) -> Self {
        Self {
            env: Environment::new(config),
            background_ready: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Create the application with the default configuration.
    pub fn with_defaults() -> Self {
        Self::new(FoundationConfig::default())
    }

    /// Create the application from a TOML configuration file.
    pub fn from_config_file(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(FoundationConfig::load(path)?))
    }

    /// The shared environment.
    pub fn env(&self) -> &Arc<Environment> {
        &self.env
    }

    /// The flag raised by [`background_initialization_complete`](Self::background_initialization_complete).
    pub fn background_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.background_ready)
    }

    /// Report that background initialization has finished. A splash waiting
    /// for it closes on its next check.
    pub fn background_initialization_complete(&self) {
        self.background_ready.store(true, Ordering::Release);
        tracing::debug!(target: targets::WINDOW, "background initialization complete");
    }

    /// Whether background initialization has finished.
    pub fn is_background_ready(&self) -> bool {
        self.background_ready.load(Ordering::Acquire)
    }

    /// Create a splash screen tied to this application's background flag.
    pub fn splash(&self, size: Size) -> ControlResult<SplashScreen> {
        SplashScreen::new(&self.env, size, self.background_flag())
    }

    /// Dispatch events until every window has closed.
    pub fn run(&self) {
        self.env.run();
    }
}

impl std::fmt::Debug for Application {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Application")
            .field("env", &self.env)
            .field("background_ready", &self.is_background_ready())
            .finish()
    }
}

static_assertions::assert_impl_all!(Application: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::{FrameConfig, MainFrame};
    use std::time::Duration;

    #[test]
    fn test_run_returns_without_windows() {
        let app = Application::with_defaults();
        app.run();
        assert!(app.env().windows().is_empty());
    }

    #[test]
    fn test_run_until_last_window_closes() {
        let app = Application::with_defaults();
        let first = MainFrame::new(app.env(), FrameConfig::new("One")).unwrap();
        let second = MainFrame::new(app.env(), FrameConfig::new("Two")).unwrap();
        first.open().unwrap();
        second.open().unwrap();
        assert_eq!(app.env().windows_of_kind("frame").len(), 2);

        let env = Arc::downgrade(app.env());
        let (a, b) = (first.shell(), second.shell());
        app.env().event_loop().timer_exec(Duration::from_millis(5), move || {
            if let Some(env) = env.upgrade() {
                env.controls().dispose(a).unwrap();
                env.controls().dispose(b).unwrap();
            }
        });
        app.run();
        assert!(app.env().windows().is_empty());
    }

    #[test]
    fn test_splash_closes_after_background_work() {
        let app = Application::with_defaults();
        let splash = app.splash(Size::new(200, 100)).unwrap();
        splash.open().unwrap();
        splash.set_wait_for_background(true);
        splash.set_splash_time(Duration::from_millis(1));

        app.background_initialization_complete();
        assert!(app.is_background_ready());
        app.run();
        assert!(!splash.frame().is_open());
    }

    #[test]
    fn test_from_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("foundation.toml");
        std::fs::write(&path, "[placement]\ncascade_step = { x = 10, y = 10 }\n").unwrap();

        let app = Application::from_config_file(&path).unwrap();
        assert_eq!(app.env().config().placement.cascade_step.x, 10);
        assert!(Application::from_config_file(dir.path().join("missing.toml")).is_err());
    }
}
