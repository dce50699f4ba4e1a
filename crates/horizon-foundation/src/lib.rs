//! Horizon Foundation - a thin foundation layer for desktop toolkits.
//!
//! This crate provides the glue most desktop applications write over and
//! over on top of a widget toolkit:
//!
//! - **Frames**: top-level windows placed by cascading, centering or
//!   snapping to another window, with a status line and a dispatch loop
//! - **Form layout**: attachment-based layout helpers, label/control groups
//!   with justified labels, and centered controls
//! - **Binding**: text controls kept in sync with object properties found by
//!   name
//! - **Table views**: sortable tables whose cells are derived from row
//!   objects
//! - **Callbacks**: buttons and menu items that call a named method
//!
//! Name-based access goes through the [`Reflect`] trait: types describe
//! their methods and fields in a [`MetaObject`], usually with
//! `#[derive(Reflect)]` plus a method registration hook.
//!
//! # Example
//!
//! ```no_run
//! use horizon_foundation::{
//!     Application, BoundText, ControlKind, FrameConfig, MainFrame, MetaObjectBuilder, Reflect,
//!     Style, shared,
//! };
//!
//! #[derive(Reflect)]
//! #[reflect(methods = "Person::register")]
//! struct Person {
//!     name: String,
//! }
//!
//! impl Person {
//!     fn register(builder: MetaObjectBuilder<Self>) -> MetaObjectBuilder<Self> {
//!         builder
//!             .getter("get_name", |p| p.name.clone())
//!             .setter("set_name", |p, name: String| p.name = name)
//!     }
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let app = Application::with_defaults();
//!     let frame = MainFrame::new(app.env(), FrameConfig::new("Person").with_status(true))?;
//!     let field = app
//!         .env()
//!         .controls()
//!         .create(ControlKind::Text, Some(frame.shell()), Style::BORDER)?;
//!
//!     let person = shared(Person { name: "Ann".into() });
//!     let _binding = BoundText::bind(app.env(), field, person, "name")?;
//!
//!     frame.open()?;
//!     app.run();
//!     Ok(())
//! }
//! ```

mod application;
mod binding;
pub mod config;
mod environment;
mod error;
pub mod geometry;
pub mod layout;
pub mod reflect;
pub mod table;
pub mod widget;
pub mod window;

pub use application::Application;
pub use binding::BoundText;
pub use config::{FontMetrics, FoundationConfig, MonitorConfig, NamingConvention};
pub use environment::{Environment, Palette};
pub use error::{ConfigError, ControlError, ControlResult, FoundationError, Result};
pub use geometry::{Point, Rect, Size};
pub use layout::{
    AdjustPhase, Alignment, AttachTarget, Attachment, CenterLayout, EdgeSpec, FormData,
    LayoutAdjuster, LayoutGroup,
};
pub use reflect::Callback;
pub use table::{RowColorProvider, SortOrder, TableView, TableViewColumn};
pub use widget::{
    Accelerator, CallbackButton, CallbackMenuItem, Color, ControlId, ControlKind, ControlSignals,
    SharedControlRegistry, Style, TextAlignment,
};
pub use window::{AlignFlags, FrameConfig, MainFrame, MessageFrame, SplashScreen};

pub use horizon_foundation_core::{
    ConnectionGuard, ConnectionId, DumpOptions, EventLoop, FieldMeta, FromValue, IntoValue,
    MetaError, MetaObject, MetaObjectBuilder, MetaResult, MethodMeta, ObjectDump, PerfSpan,
    Reflect, SharedObject, Signal, TimerId, Value, shared,
};
pub use horizon_foundation_macros::Reflect;
