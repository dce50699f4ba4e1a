//! Automatic window placement: cascading, centering and snapping.
//!
//! All functions are pure; the cascade position is carried in a
//! [`CascadeState`] owned by the environment.

use std::ops::BitOr;

use crate::geometry::{Point, Rect, Size};

/// Bouncing cascade of newly opened windows.
///
/// Each placement moves by `delta` from the previous one. When a window
/// would leave the placement bounds it is reflected back inside and the
/// step for that axis changes sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CascadeState {
    /// Last cascaded position, relative to the bounds origin.
    pub last: Point,
    /// Current step per axis.
    pub delta: Point,
}

impl CascadeState {
    /// Start at the bounds origin stepping by `step`.
    pub fn new(step: Point) -> Self {
        Self {
            last: Point::ZERO,
            delta: step,
        }
    }

    /// Compute the next cascade origin for a window of `size` and remember it.
    ///
    /// The returned point is in display coordinates and always keeps the
    /// window inside `bounds` when it fits.
    pub fn next_origin(&mut self, bounds: Rect, size: Size) -> Point {
        let (x, dx) = bounce(self.last.x + self.delta.x, self.delta.x, size.width, bounds.width);
        let (y, dy) = bounce(self.last.y + self.delta.y, self.delta.y, size.height, bounds.height);
        self.delta = Point::new(dx, dy);
        self.last = Point::new(x, y);
        Point::new(bounds.x + x, bounds.y + y)
    }
}

/// Reflect `pos` back into `0..=extent - size` on one axis.
fn bounce(pos: i32, delta: i32, size: i32, extent: i32) -> (i32, i32) {
    let (pos, delta) = if pos < 0 {
        (-pos, -delta)
    } else if pos + size > extent {
        let overshoot = pos + size - extent;
        (pos - 2 * overshoot, -delta)
    } else {
        (pos, delta)
    };
    let max = (extent - size).max(0);
    (pos.clamp(0, max), delta)
}

/// Origin that centers a window of `size` within `bounds`.
pub fn center_origin(bounds: Rect, size: Size) -> Point {
    Point::new(
        bounds.x + (bounds.width - size.width) / 2,
        bounds.y + (bounds.height - size.height) / 2,
    )
}

/// Edge alignment flags for [`snap_origin`].
///
/// One vertical and one horizontal flag are honored. Within an axis the
/// flags are checked in declaration order; with no flag for an axis the
/// leading edges are aligned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct AlignFlags(u8);

impl AlignFlags {
    /// No alignment requested: tops and lefts are aligned.
    pub const NONE: Self = Self(0);
    /// Align top edges.
    pub const TOP_TO_TOP: Self = Self(0x01);
    /// Align bottom edges.
    pub const BOTTOM_TO_BOTTOM: Self = Self(0x02);
    /// Place this window's top at the reference's bottom.
    pub const TOP_TO_BOTTOM: Self = Self(0x04);
    /// Place this window's bottom at the reference's top.
    pub const BOTTOM_TO_TOP: Self = Self(0x08);
    /// Align left edges.
    pub const LEFT_TO_LEFT: Self = Self(0x10);
    /// Align right edges.
    pub const RIGHT_TO_RIGHT: Self = Self(0x20);
    /// Place this window's left at the reference's right.
    pub const LEFT_TO_RIGHT: Self = Self(0x40);
    /// Place this window's right at the reference's left.
    pub const RIGHT_TO_LEFT: Self = Self(0x80);

    /// Check whether all bits of `other` are set.
    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for AlignFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Origin placing a window of `size` against `reference`.
pub fn snap_origin(reference: Rect, size: Size, flags: AlignFlags) -> Point {
    let y = if flags.contains(AlignFlags::TOP_TO_TOP) {
        reference.y
    } else if flags.contains(AlignFlags::BOTTOM_TO_BOTTOM) {
        reference.bottom() - size.height
    } else if flags.contains(AlignFlags::TOP_TO_BOTTOM) {
        reference.bottom()
    } else if flags.contains(AlignFlags::BOTTOM_TO_TOP) {
        reference.y - size.height
    } else {
        reference.y
    };

    let x = if flags.contains(AlignFlags::LEFT_TO_LEFT) {
        reference.x
    } else if flags.contains(AlignFlags::RIGHT_TO_RIGHT) {
        reference.right() - size.width
    } else if flags.contains(AlignFlags::LEFT_TO_RIGHT) {
        reference.right()
    } else if flags.contains(AlignFlags::RIGHT_TO_LEFT) {
        reference.x - size.width
    } else {
        reference.x
    };

    Point::new(x, y)
}
