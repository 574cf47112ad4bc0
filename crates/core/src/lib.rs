//! # Stowage Core
//!
//! Core types for the stowage placement engine.
//!
//! This crate provides the shared vocabulary between the placement
//! engine and its callers: geometric primitives, item and container
//! records, committed placements, rearrangement steps and the batch
//! result envelope.
//!
//! ## Core Components
//!
//! - **Geometry**: [`Coordinates`], [`Position`], the [`EPSILON`]
//!   tolerance and the six axis-aligned orientation permutations
//! - **Records**: [`Item`], [`Container`], [`Placement`]
//! - **Results**: [`ItemPlacement`], [`RearrangementStep`],
//!   [`BatchResult`], [`BatchSummary`]
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization/deserialization support

pub mod container;
pub mod error;
pub mod geometry;
pub mod item;
pub mod placement;
pub mod result;

// Re-exports
pub use container::{Container, ContainerId};
pub use error::{Error, Result};
pub use geometry::{oriented, Coordinates, Position, AXIS_PERMUTATIONS, EPSILON};
pub use item::{Item, ItemId};
pub use placement::{ItemPlacement, Placement, RearrangementAction, RearrangementStep};
pub use result::{BatchResult, BatchSummary};
