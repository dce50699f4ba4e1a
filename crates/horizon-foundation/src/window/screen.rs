//! Display and monitor geometry.

use crate::config::ScreenConfig;
use crate::geometry::Rect;

/// One monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Monitor {
    /// Bounds in display coordinates.
    pub bounds: Rect,
    /// Whether this is the primary monitor.
    pub primary: bool,
}

/// The display and its monitors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenInfo {
    display: Rect,
    monitors: Vec<Monitor>,
}

impl ScreenInfo {
    /// Create from explicit geometry.
    pub fn new(display: Rect, monitors: Vec<Monitor>) -> Self {
        Self { display, monitors }
    }

    /// Bounds of the whole display.
    pub fn display_bounds(&self) -> Rect {
        self.display
    }

    /// All monitors.
    pub fn monitors(&self) -> &[Monitor] {
        &self.monitors
    }

    /// The primary monitor, if one is marked.
    pub fn primary_monitor(&self) -> Option<&Monitor> {
        self.monitors.iter().find(|m| m.primary)
    }

    /// Area used for automatic window placement: the primary monitor, else
    /// the whole display.
    pub fn placement_bounds(&self) -> Rect {
        self.primary_monitor()
            .map(|m| m.bounds)
            .unwrap_or(self.display)
    }
}

impl From<&ScreenConfig> for ScreenInfo {
    fn from(config: &ScreenConfig) -> Self {
        Self::new(
            config.display,
            config
                .monitors
                .iter()
                .map(|m| Monitor {
                    bounds: m.bounds,
                    primary: m.primary,
                })
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placement_prefers_primary_monitor() {
        let screen = ScreenInfo::new(
            Rect::new(0, 0, 3200, 1080),
            vec![
                Monitor {
                    bounds: Rect::new(0, 0, 1920, 1080),
                    primary: false,
                },
                Monitor {
                    bounds: Rect::new(1920, 0, 1280, 1024),
                    primary: true,
                },
            ],
        );
        assert_eq!(screen.placement_bounds(), Rect::new(1920, 0, 1280, 1024));
    }

    #[test]
    fn test_placement_falls_back_to_display() {
        let screen = ScreenInfo::new(Rect::new(0, 0, 1024, 768), Vec::new());
        assert_eq!(screen.placement_bounds(), Rect::new(0, 0, 1024, 768));
        assert!(screen.primary_monitor().is_none());
    }

    #[test]
    fn test_from_default_config() {
        let screen = ScreenInfo::from(&ScreenConfig::default());
        assert_eq!(screen.placement_bounds(), Rect::new(0, 0, 1920, 1080));
        assert_eq!(screen.monitors().len(), 1);
    }
}
