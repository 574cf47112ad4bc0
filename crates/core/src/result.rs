//! Batch result representation.

use crate::item::ItemId;
use crate::placement::{ItemPlacement, RearrangementStep};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Result of one placement batch.
///
/// `success` is true exactly when `failed_item_ids` is empty; when any
/// item fails, `error` carries a human-readable summary listing the
/// failed ids.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct BatchResult {
    /// Whether every incoming item found a placement.
    pub success: bool,

    /// Failure summary, absent on success.
    pub error: Option<String>,

    /// Final placement for every successfully placed item, including
    /// untouched pre-existing placements.
    pub placements: Vec<ItemPlacement>,

    /// Moves of already-placed items required by this batch, in
    /// execution order.
    pub rearrangements: Vec<RearrangementStep>,

    /// Ids of incoming items that could not be placed.
    pub failed_item_ids: Vec<ItemId>,
}

impl BatchResult {
    /// Builds a result from the assembled outcome, deriving `success`
    /// and the error summary from the failed-item list.
    pub fn from_outcome(
        placements: Vec<ItemPlacement>,
        rearrangements: Vec<RearrangementStep>,
        failed_item_ids: Vec<ItemId>,
    ) -> Self {
        let success = failed_item_ids.is_empty();
        let error = if success {
            None
        } else {
            Some(format!(
                "Placement incomplete. Failed items: {}",
                failed_item_ids.join(", ")
            ))
        };

        Self {
            success,
            error,
            placements,
            rearrangements,
            failed_item_ids,
        }
    }

    /// Builds a result for a batch rejected before any placement was
    /// attempted. Every incoming item is reported as failed.
    pub fn rejected(error: impl Into<String>, failed_item_ids: Vec<ItemId>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            placements: Vec::new(),
            rearrangements: Vec::new(),
            failed_item_ids,
        }
    }

    /// Returns true if no item failed.
    pub fn all_placed(&self) -> bool {
        self.failed_item_ids.is_empty()
    }

    /// Returns the number of final placements.
    pub fn placed_count(&self) -> usize {
        self.placements.len()
    }

    /// Returns the number of failed items.
    pub fn failed_count(&self) -> usize {
        self.failed_item_ids.len()
    }

    /// Looks up the final placement of an item.
    pub fn placement_of(&self, item_id: &str) -> Option<&ItemPlacement> {
        self.placements.iter().find(|p| p.item_id == item_id)
    }
}

/// Summary statistics for a batch result.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct BatchSummary {
    /// Total final placements.
    pub placed: usize,
    /// Items that could not be placed.
    pub failed: usize,
    /// Rearrangement moves performed.
    pub moves: usize,
    /// Whether the batch succeeded.
    pub success: bool,
}

impl From<&BatchResult> for BatchSummary {
    fn from(result: &BatchResult) -> Self {
        Self {
            placed: result.placements.len(),
            failed: result.failed_item_ids.len(),
            moves: result.rearrangements.len(),
            success: result.success,
        }
    }
}
