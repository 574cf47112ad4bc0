//! Container records.

use crate::geometry::Position;
use crate::{Error, Result};
use nalgebra::Vector3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Unique identifier for a container.
pub type ContainerId = String;

/// A rectangular container with an internal cavity spanning
/// `[0, width] x [0, depth] x [0, height]`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Container {
    /// Unique identifier.
    id: ContainerId,

    /// Zone this container belongs to.
    zone: String,

    /// Internal cavity dimensions (width, depth, height).
    dimensions: Vector3<f64>,
}

impl Container {
    /// Creates a new container with the given cavity dimensions.
    pub fn new(
        id: impl Into<ContainerId>,
        zone: impl Into<String>,
        width: f64,
        depth: f64,
        height: f64,
    ) -> Self {
        Self {
            id: id.into(),
            zone: zone.into(),
            dimensions: Vector3::new(width, depth, height),
        }
    }

    /// Returns the unique identifier.
    pub fn id(&self) -> &ContainerId {
        &self.id
    }

    /// Returns the zone.
    pub fn zone(&self) -> &str {
        &self.zone
    }

    /// Returns the cavity dimensions (width, depth, height).
    pub fn dimensions(&self) -> &Vector3<f64> {
        &self.dimensions
    }

    /// Returns the cavity width.
    pub fn width(&self) -> f64 {
        self.dimensions.x
    }

    /// Returns the cavity depth.
    pub fn depth(&self) -> f64 {
        self.dimensions.y
    }

    /// Returns the cavity height.
    pub fn height(&self) -> f64 {
        self.dimensions.z
    }

    /// Returns the cavity volume.
    pub fn volume(&self) -> f64 {
        self.dimensions.x * self.dimensions.y * self.dimensions.z
    }

    /// Checks whether a position lies fully inside the cavity.
    pub fn contains(&self, position: &Position, epsilon: f64) -> bool {
        position.fits_within(&self.dimensions, epsilon)
    }

    /// Validates the container and returns an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if self.dimensions.x <= 0.0 || self.dimensions.y <= 0.0 || self.dimensions.z <= 0.0 {
            return Err(Error::InvalidContainer(format!(
                "All dimensions for '{}' must be positive",
                self.id
            )));
        }

        Ok(())
    }
}
