//! Control style flags, colors, alignment and accelerators.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use serde::{Deserialize, Serialize};

/// Creation-time style bits of a control.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Style(u32);

impl Style {
    /// No style bits.
    pub const NONE: Self = Self(0);
    /// Draw a border.
    pub const BORDER: Self = Self(1 << 0);
    /// Text cannot be edited by the user.
    pub const READ_ONLY: Self = Self(1 << 1);
    /// Window without title bar or frame.
    pub const NO_TRIM: Self = Self(1 << 2);
    /// Standard top-level window decorations.
    pub const SHELL_TRIM: Self = Self(1 << 3);
    /// Multiple rows may be selected.
    pub const MULTI: Self = Self(1 << 4);
    /// Selection highlights the whole row.
    pub const FULL_SELECTION: Self = Self(1 << 5);
    /// Center content.
    pub const CENTER: Self = Self(1 << 6);

    /// Check whether all bits of `other` are set.
    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Raw bits.
    pub fn bits(self) -> u32 {
        self.0
    }
}

impl BitOr for Style {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Style {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// An RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    /// Red component.
    pub r: u8,
    /// Green component.
    pub g: u8,
    /// Blue component.
    pub b: u8,
}

impl Color {
    /// Create a color from components.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// White.
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    /// Green.
    pub const GREEN: Self = Self::rgb(0, 255, 0);
    /// Red.
    pub const RED: Self = Self::rgb(255, 0, 0);
    /// Yellow.
    pub const YELLOW: Self = Self::rgb(255, 255, 0);
    /// Blue.
    pub const BLUE: Self = Self::rgb(0, 0, 255);
}

/// Horizontal alignment of text within a cell or label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TextAlignment {
    /// Left-aligned.
    #[default]
    Left,
    /// Centered.
    Center,
    /// Right-aligned.
    Right,
}

/// A keyboard accelerator for a menu item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Accelerator {
    /// Control (Command on macOS) modifier.
    pub ctrl: bool,
    /// Shift modifier.
    pub shift: bool,
    /// Alt modifier.
    pub alt: bool,
    /// The key, upper-cased for letters.
    pub key: char,
}

impl Accelerator {
    /// Ctrl + `key`.
    pub fn ctrl(key: char) -> Self {
        Self {
            ctrl: true,
            shift: false,
            alt: false,
            key: key.to_ascii_uppercase(),
        }
    }

    /// Add the shift modifier.
    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    /// Add the alt modifier.
    pub fn with_alt(mut self) -> Self {
        self.alt = true;
        self
    }
}

impl fmt::Display for Accelerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ctrl {
            f.write_str("Ctrl+")?;
        }
        if self.shift {
            f.write_str("Shift+")?;
        }
        if self.alt {
            f.write_str("Alt+")?;
        }
        write!(f, "{}", self.key)
    }
}
