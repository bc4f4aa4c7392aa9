//! Continuous positions, integer extents and compass directions.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// Largest coordinate magnitude, in tiles, a position may take. Game maps
/// end one million tiles from the origin.
pub const MAX_COORDINATE: f64 = 1_000_000.0;

/// A point on the blueprint plane, in tile units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Round both coordinates to two decimal places.
    pub fn rounded(self) -> Self {
        Self {
            x: (self.x * 100.0).round() / 100.0,
            y: (self.y * 100.0).round() / 100.0,
        }
    }

    /// Both coordinates finite and no further than [`MAX_COORDINATE`] from
    /// the origin.
    pub fn in_bounds(self) -> bool {
        [self.x, self.y]
            .iter()
            .all(|v| v.is_finite() && v.abs() <= MAX_COORDINATE)
    }

    /// Offset by a size, scaled per axis (0.0 keeps the axis, 1.0 adds the full extent).
    pub fn offset_by(self, size: Size, fx: f64, fy: f64) -> Self {
        Self {
            x: self.x + f64::from(size.width) * fx,
            y: self.y + f64::from(size.height) * fy,
        }
    }
}

impl Add for Position {
    type Output = Position;

    fn add(self, rhs: Position) -> Position {
        Position::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Position {
    type Output = Position;

    fn sub(self, rhs: Position) -> Position {
        Position::new(self.x - rhs.x, self.y - rhs.y)
    }
}

// ---------------------------------------------------------------------------
// Size
// ---------------------------------------------------------------------------

/// The axis-aligned extent of an entity, in whole tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// A 1x1 extent.
    pub fn single() -> Self {
        Self::new(1, 1)
    }

    /// Width and height exchanged.
    pub fn swapped(self) -> Self {
        Self {
            width: self.height,
            height: self.width,
        }
    }

    /// Half the extent as a position offset.
    pub fn half(self) -> Position {
        Position::new(f64::from(self.width) / 2.0, f64::from(self.height) / 2.0)
    }
}

impl Default for Size {
    fn default() -> Self {
        Self::single()
    }
}

// ---------------------------------------------------------------------------
// Direction
// ---------------------------------------------------------------------------

/// An 8-way compass direction as stored in the external schema.
///
/// Only even values are meaningful for placed entities (0 north, 2 east,
/// 4 south, 6 west); odd values are kept verbatim.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Direction(pub u8);

impl Direction {
    pub const NORTH: Direction = Direction(0);
    pub const EAST: Direction = Direction(2);
    pub const SOUTH: Direction = Direction(4);
    pub const WEST: Direction = Direction(6);

    /// `dir % 4`: directions sharing a parity share a bounding box orientation.
    pub fn axis_parity(self) -> u8 {
        self.0 % 4
    }

    /// Whether moving from `self` to `next` exchanges width and height.
    pub fn swaps_axes(self, next: Direction) -> bool {
        self.axis_parity() != next.axis_parity()
    }
}

impl From<u8> for Direction {
    fn from(value: u8) -> Self {
        Direction(value)
    }
}
