//! Error types for the foundation layer.

use std::fmt;
use std::io;
use std::path::PathBuf;

use horizon_foundation_core::{CoreError, MetaError, TimerError};

use crate::widget::{ControlId, ControlKind};

/// The main error type for foundation operations.
#[derive(Debug)]
pub enum FoundationError {
    /// Core system error (timers, signals).
    Core(CoreError),
    /// Meta-object resolution or invocation error.
    Meta(MetaError),
    /// Control registry error.
    Control(ControlError),
    /// Configuration loading error.
    Config(ConfigError),
    /// An image file could not be read.
    Image {
        /// The image file.
        path: PathBuf,
        /// The decoder error.
        source: image::ImageError,
    },
}

impl fmt::Display for FoundationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Core(err) => write!(f, "Core error: {err}"),
            Self::Meta(err) => write!(f, "Meta-object error: {err}"),
            Self::Control(err) => write!(f, "Control error: {err}"),
            Self::Config(err) => write!(f, "Configuration error: {err}"),
            Self::Image { path, source } => {
                write!(f, "Failed to read image {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for FoundationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Core(err) => Some(err),
            Self::Meta(err) => Some(err),
            Self::Control(err) => Some(err),
            Self::Config(err) => Some(err),
            Self::Image { source, .. } => Some(source),
        }
    }
}

/// Errors from the control registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlError {
    /// The control ID is invalid or the control was disposed.
    InvalidControlId(ControlId),
    /// The operation is not supported by this kind of control.
    UnsupportedKind {
        /// The control the operation was attempted on.
        id: ControlId,
        /// Its kind.
        kind: ControlKind,
        /// The operation name.
        operation: &'static str,
    },
    /// A container was requested as parent but the control cannot hold children.
    NotAContainer(ControlId),
    /// A table column or row index is out of range.
    IndexOutOfRange {
        /// The offending index.
        index: usize,
        /// The number of entries.
        len: usize,
    },
}

impl fmt::Display for ControlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidControlId(id) => write!(f, "Invalid or disposed control {id:?}"),
            Self::UnsupportedKind {
                id,
                kind,
                operation,
            } => write!(f, "{operation} is not supported by {kind:?} control {id:?}"),
            Self::NotAContainer(id) => write!(f, "Control {id:?} cannot contain children"),
            Self::IndexOutOfRange { index, len } => {
                write!(f, "Index {index} out of range (len {len})")
            }
        }
    }
}

impl std::error::Error for ControlError {}

/// Errors from loading configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    Io {
        /// The file that failed.
        path: PathBuf,
        /// The underlying I/O error.
        source: io::Error,
    },
    /// The configuration text is not valid TOML for the expected schema.
    Parse(toml::de::Error),
    /// The configuration could not be serialized.
    Serialize(toml::ser::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "Failed to read {}: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "Invalid configuration: {err}"),
            Self::Serialize(err) => write!(f, "Failed to serialize configuration: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::Serialize(err) => Some(err),
        }
    }
}

impl From<CoreError> for FoundationError {
    fn from(err: CoreError) -> Self {
        Self::Core(err)
    }
}

impl From<TimerError> for FoundationError {
    fn from(err: TimerError) -> Self {
        Self::Core(CoreError::Timer(err))
    }
}

impl From<MetaError> for FoundationError {
    fn from(err: MetaError) -> Self {
        Self::Meta(err)
    }
}

impl From<ControlError> for FoundationError {
    fn from(err: ControlError) -> Self {
        Self::Control(err)
    }
}

impl From<ConfigError> for FoundationError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

/// A specialized Result type for foundation operations.
pub type Result<T> = std::result::Result<T, FoundationError>;

/// Result type for control registry operations.
pub type ControlResult<T> = std::result::Result<T, ControlError>;
