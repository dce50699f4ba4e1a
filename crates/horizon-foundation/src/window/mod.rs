//! Top-level windows and their placement.
//!
//! - [`MainFrame`]: a shell with form layout, status line and deferred
//!   layouts, placed automatically when opened
//! - [`SplashScreen`] and [`MessageFrame`]: ready-made frames
//! - [`placement`]: cascade, centering and edge snapping math
//! - [`screen`]: display and monitor geometry

mod frame;
mod message;
pub mod placement;
pub mod screen;
mod splash;

pub use frame::{FrameConfig, MainFrame};
pub use message::MessageFrame;
pub use placement::{AlignFlags, CascadeState};
pub use screen::{Monitor, ScreenInfo};
pub use splash::SplashScreen;
