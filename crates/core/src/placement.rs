//! Placement records: simulation state entries, final placements and
//! rearrangement moves.

use crate::container::ContainerId;
use crate::geometry::Position;
use crate::item::ItemId;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An item committed to a container in the simulation.
///
/// Each item id appears in at most one container at a time. The
/// priority is carried so rearrangement can rank eviction candidates
/// without access to the original item record.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Placement {
    /// The placed item.
    pub item_id: ItemId,

    /// The container holding the item.
    pub container_id: ContainerId,

    /// The bounding box of the item inside the container.
    pub position: Position,

    /// Priority of the placed item.
    pub priority: i32,
}

impl Placement {
    /// Creates a new placement.
    pub fn new(
        item_id: impl Into<ItemId>,
        container_id: impl Into<ContainerId>,
        position: Position,
        priority: i32,
    ) -> Self {
        Self {
            item_id: item_id.into(),
            container_id: container_id.into(),
            position,
            priority,
        }
    }

    /// Returns the volume occupied by this placement.
    pub fn volume(&self) -> f64 {
        self.position.volume()
    }
}

/// The final public placement for one item.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ItemPlacement {
    /// The placed item.
    pub item_id: ItemId,

    /// The container holding the item.
    pub container_id: ContainerId,

    /// The bounding box of the item inside the container.
    pub position: Position,
}

impl ItemPlacement {
    /// Creates a new item placement.
    pub fn new(
        item_id: impl Into<ItemId>,
        container_id: impl Into<ContainerId>,
        position: Position,
    ) -> Self {
        Self {
            item_id: item_id.into(),
            container_id: container_id.into(),
            position,
        }
    }
}

/// The kind of rearrangement performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum RearrangementAction {
    /// Relocation of an already-placed item.
    Move,
}

impl std::fmt::Display for RearrangementAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Move => write!(f, "move"),
        }
    }
}

/// One recorded move of an already-placed item, made to free room for a
/// higher-priority arrival.
///
/// `from_container` and `from_position` are both present for moves of
/// existing placements; step numbers start at 1 and increase in the
/// order the moves were committed.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct RearrangementStep {
    /// 1-based sequence number.
    pub step: u32,

    /// The action performed.
    pub action: RearrangementAction,

    /// The item being moved.
    pub item_id: ItemId,

    /// Source container, if the item was already placed.
    pub from_container: Option<ContainerId>,

    /// Source position, if the item was already placed.
    pub from_position: Option<Position>,

    /// Destination container.
    pub to_container: ContainerId,

    /// Destination position.
    pub to_position: Position,
}
