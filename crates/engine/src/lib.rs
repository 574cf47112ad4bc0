//! # Stowage Engine
//!
//! Priority-aware 3D placement engine with rearrangement planning.
//!
//! Given a batch of incoming items, a set of containers and the live
//! placements inside them, the engine computes a final placement for
//! every item plus the moves of already-placed items needed to make
//! room for high-priority arrivals. The computation is pure and
//! deterministic: identical inputs produce byte-identical output.
//!
//! ## Features
//!
//! - Six-orientation axis-aligned placement search
//! - Gravity-support checking (floor or any positive top-face overlap)
//! - Preferred-zone, rearrangement and fallback phases
//! - All-or-nothing rollback of failed rearrangement attempts
//!
//! ## Example
//!
//! ```rust
//! use std::collections::HashMap;
//! use stowage_engine::{Container, Item, PlacementEngine};
//!
//! let containers = vec![Container::new("C1", "Z1", 10.0, 10.0, 10.0)];
//! let items = vec![Item::new("I1", 2.0, 3.0, 1.0)
//!     .with_priority(80)
//!     .with_preferred_zone("Z1")];
//!
//! let engine = PlacementEngine::default();
//! let result = engine.place_batch(&items, &containers, &HashMap::new());
//! assert!(result.success);
//! ```

pub mod config;
pub mod engine;
pub mod rearrange;
pub mod spot;
pub mod stability;
pub mod state;

// Re-exports
pub use config::EngineConfig;
pub use engine::PlacementEngine;
pub use spot::{find_spot, Spot};
pub use stability::is_supported;
pub use state::SimulationState;
pub use stowage_core::{
    BatchResult, BatchSummary, Container, ContainerId, Coordinates, Error, Item, ItemId,
    ItemPlacement, Placement, Position, RearrangementAction, RearrangementStep, Result, EPSILON,
};
