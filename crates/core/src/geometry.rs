//! Geometric primitives for axis-aligned box placement.
//!
//! All coordinate comparisons in the engine go through the tolerance
//! [`EPSILON`]. Faces that touch within the tolerance do not count as
//! overlapping, which lets items sit flush against each other and
//! against container walls.

use nalgebra::Vector3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Coordinate tolerance for all geometric comparisons.
pub const EPSILON: f64 = 1e-6;

/// The six axis-aligned orientations of a box, as index permutations of
/// its (width, depth, height) dimensions.
pub const AXIS_PERMUTATIONS: [[usize; 3]; 6] = [
    [0, 1, 2],
    [0, 2, 1],
    [1, 0, 2],
    [1, 2, 0],
    [2, 0, 1],
    [2, 1, 0],
];

/// Applies one of the six axis permutations to a dimension triple.
///
/// Out-of-range orientation indices fall back to the original
/// orientation.
pub fn oriented(dimensions: &Vector3<f64>, orientation: usize) -> Vector3<f64> {
    let perm = AXIS_PERMUTATIONS
        .get(orientation)
        .copied()
        .unwrap_or([0, 1, 2]);
    Vector3::new(
        dimensions[perm[0]],
        dimensions[perm[1]],
        dimensions[perm[2]],
    )
}

/// A point or extent triple along the width, depth and height axes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Coordinates {
    /// Offset or length along the width axis.
    pub width: f64,
    /// Offset or length along the depth axis.
    pub depth: f64,
    /// Offset or length along the height axis.
    pub height: f64,
}

impl Coordinates {
    /// Creates a new coordinate triple.
    pub fn new(width: f64, depth: f64, height: f64) -> Self {
        Self {
            width,
            depth,
            height,
        }
    }

    /// The origin (0, 0, 0).
    pub fn origin() -> Self {
        Self::default()
    }
}

/// The axis-aligned bounding box of a placed item inside a container.
///
/// Invariant: `end` exceeds `start` on every axis (positive volume).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Position {
    /// Minimum corner.
    pub start: Coordinates,
    /// Maximum corner.
    pub end: Coordinates,
}

impl Position {
    /// Creates a position from explicit corners.
    pub fn new(start: Coordinates, end: Coordinates) -> Self {
        Self { start, end }
    }

    /// Creates a position from a minimum corner and an oriented size.
    pub fn from_origin(start: Coordinates, size: &Vector3<f64>) -> Self {
        Self {
            start,
            end: Coordinates::new(
                start.width + size.x,
                start.depth + size.y,
                start.height + size.z,
            ),
        }
    }

    /// Returns the extents (width, depth, height) of the box.
    pub fn extents(&self) -> Vector3<f64> {
        Vector3::new(
            self.end.width - self.start.width,
            self.end.depth - self.start.depth,
            self.end.height - self.start.height,
        )
    }

    /// Returns the volume of the box.
    pub fn volume(&self) -> f64 {
        let e = self.extents();
        e.x * e.y * e.z
    }

    /// Returns true if the box has strictly positive extent on every axis.
    pub fn is_well_formed(&self) -> bool {
        self.end.width > self.start.width
            && self.end.depth > self.start.depth
            && self.end.height > self.start.height
    }

    /// Checks whether two boxes have strictly positive overlap on every
    /// axis. Touching faces (within `epsilon`) do not overlap.
    pub fn overlaps(&self, other: &Position, epsilon: f64) -> bool {
        let separated_w = self.end.width <= other.start.width + epsilon
            || other.end.width <= self.start.width + epsilon;
        let separated_d = self.end.depth <= other.start.depth + epsilon
            || other.end.depth <= self.start.depth + epsilon;
        let separated_h = self.end.height <= other.start.height + epsilon
            || other.end.height <= self.start.height + epsilon;
        !(separated_w || separated_d || separated_h)
    }

    /// Checks whether the (width, depth) projections of two boxes have
    /// strictly positive overlap area. Heights are ignored.
    pub fn footprint_overlaps(&self, other: &Position, epsilon: f64) -> bool {
        let separated_w = self.end.width <= other.start.width + epsilon
            || other.end.width <= self.start.width + epsilon;
        let separated_d = self.end.depth <= other.start.depth + epsilon
            || other.end.depth <= self.start.depth + epsilon;
        !(separated_w || separated_d)
    }

    /// Checks whether the box lies inside a cavity spanning
    /// `[0, bounds]` on every axis, within `epsilon`.
    pub fn fits_within(&self, bounds: &Vector3<f64>, epsilon: f64) -> bool {
        self.start.width >= -epsilon
            && self.start.depth >= -epsilon
            && self.start.height >= -epsilon
            && self.end.width <= bounds.x + epsilon
            && self.end.depth <= bounds.y + epsilon
            && self.end.height <= bounds.z + epsilon
    }
}
