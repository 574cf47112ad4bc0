//! Item records for incoming cargo.

use crate::geometry::{self, AXIS_PERMUTATIONS};
use crate::{Error, Result};
use nalgebra::Vector3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Unique identifier for an item.
pub type ItemId = String;

/// An item to be placed.
///
/// Only the dimensions, priority and preferred zone influence the
/// placement search; `name`, `mass`, `expiry` and `usage_limit` are
/// carried through untouched for downstream consumers.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Item {
    /// Unique identifier.
    id: ItemId,

    /// Human-readable name.
    name: String,

    /// Dimensions (width, depth, height).
    dimensions: Vector3<f64>,

    /// Mass of the item.
    mass: Option<f64>,

    /// Placement priority. Higher values are placed first.
    priority: i32,

    /// Expiry timestamp, carried as an opaque ISO-8601 string.
    expiry: Option<String>,

    /// Remaining usage count.
    usage_limit: Option<u32>,

    /// Zone the item should preferentially land in.
    preferred_zone: Option<String>,
}

impl Item {
    /// Creates a new item with the given ID and dimensions.
    pub fn new(id: impl Into<ItemId>, width: f64, depth: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            dimensions: Vector3::new(width, depth, height),
            mass: None,
            priority: 0,
            expiry: None,
            usage_limit: None,
            preferred_zone: None,
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the mass.
    pub fn with_mass(mut self, mass: f64) -> Self {
        self.mass = Some(mass);
        self
    }

    /// Sets the placement priority.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the expiry timestamp.
    pub fn with_expiry(mut self, expiry: impl Into<String>) -> Self {
        self.expiry = Some(expiry.into());
        self
    }

    /// Sets the usage limit.
    pub fn with_usage_limit(mut self, limit: u32) -> Self {
        self.usage_limit = Some(limit);
        self
    }

    /// Sets the preferred zone.
    pub fn with_preferred_zone(mut self, zone: impl Into<String>) -> Self {
        self.preferred_zone = Some(zone.into());
        self
    }

    /// Returns the unique identifier.
    pub fn id(&self) -> &ItemId {
        &self.id
    }

    /// Returns the display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the dimensions (width, depth, height).
    pub fn dimensions(&self) -> &Vector3<f64> {
        &self.dimensions
    }

    /// Returns the width.
    pub fn width(&self) -> f64 {
        self.dimensions.x
    }

    /// Returns the depth.
    pub fn depth(&self) -> f64 {
        self.dimensions.y
    }

    /// Returns the height.
    pub fn height(&self) -> f64 {
        self.dimensions.z
    }

    /// Returns the mass.
    pub fn mass(&self) -> Option<f64> {
        self.mass
    }

    /// Returns the placement priority.
    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// Returns the expiry timestamp.
    pub fn expiry(&self) -> Option<&str> {
        self.expiry.as_deref()
    }

    /// Returns the usage limit.
    pub fn usage_limit(&self) -> Option<u32> {
        self.usage_limit
    }

    /// Returns the preferred zone.
    pub fn preferred_zone(&self) -> Option<&str> {
        self.preferred_zone.as_deref()
    }

    /// Returns the volume of the item.
    pub fn volume(&self) -> f64 {
        self.dimensions.x * self.dimensions.y * self.dimensions.z
    }

    /// Returns the number of axis-aligned orientations.
    pub fn orientation_count() -> usize {
        AXIS_PERMUTATIONS.len()
    }

    /// Returns the dimensions for a given orientation index.
    pub fn oriented_dimensions(&self, orientation: usize) -> Vector3<f64> {
        geometry::oriented(&self.dimensions, orientation)
    }

    /// Validates the item and returns an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if self.dimensions.x <= 0.0 || self.dimensions.y <= 0.0 || self.dimensions.z <= 0.0 {
            return Err(Error::InvalidItem(format!(
                "All dimensions for '{}' must be positive",
                self.id
            )));
        }

        if let Some(mass) = self.mass {
            if mass < 0.0 {
                return Err(Error::InvalidItem(format!(
                    "Mass for '{}' cannot be negative",
                    self.id
                )));
            }
        }

        Ok(())
    }
}
