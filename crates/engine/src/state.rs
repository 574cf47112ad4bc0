//! In-memory simulation state for one engine invocation.
//!
//! The state owns a private copy of the live placements, keyed by
//! container. Rearrangement attempts mutate it optimistically through a
//! [`Journal`] so a rejected attempt can be unwound to a bit-identical
//! pre-attempt state.

use crate::stability::is_supported;
use std::collections::{HashMap, HashSet};
use stowage_core::{Container, ContainerId, Error, ItemId, Placement, Result};

/// Mutable mapping from container to the placements it holds.
///
/// Invariants across all mutations: placements within a container are
/// pairwise non-overlapping, in bounds and supported, and every item id
/// appears in at most one container. [`SimulationState::validate`]
/// re-checks them on demand.
#[derive(Debug, Clone)]
pub struct SimulationState {
    by_container: HashMap<ContainerId, Vec<Placement>>,
}

impl SimulationState {
    /// Clones the caller-supplied live placements into a fresh state,
    /// ensuring an entry for every known container.
    pub fn from_live(
        current: &HashMap<ContainerId, Vec<Placement>>,
        containers: &[Container],
    ) -> Self {
        let mut by_container: HashMap<ContainerId, Vec<Placement>> = current.clone();
        for container in containers {
            by_container.entry(container.id().clone()).or_default();
        }
        Self { by_container }
    }

    /// Returns the placements currently in a container.
    pub fn in_container(&self, container_id: &str) -> &[Placement] {
        self.by_container
            .get(container_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Returns the total number of placements across all containers.
    pub fn placement_count(&self) -> usize {
        self.by_container.values().map(Vec::len).sum()
    }

    /// Appends a placement to its container.
    pub fn commit(&mut self, placement: Placement) {
        self.by_container
            .entry(placement.container_id.clone())
            .or_default()
            .push(placement);
    }

    /// Removes an item from a container, returning the index it held
    /// and the removed placement.
    pub fn remove(&mut self, container_id: &str, item_id: &str) -> Option<(usize, Placement)> {
        let placements = self.by_container.get_mut(container_id)?;
        let index = placements.iter().position(|p| p.item_id == item_id)?;
        Some((index, placements.remove(index)))
    }

    /// Re-inserts a placement at a specific index, restoring the
    /// original ordering of its container.
    fn insert_at(&mut self, container_id: &str, index: usize, placement: Placement) {
        let placements = self.by_container.entry(container_id.to_string()).or_default();
        let index = index.min(placements.len());
        placements.insert(index, placement);
    }

    /// Re-checks the simulation invariants against the given containers.
    ///
    /// A violation here is a programmer error in the engine, reported as
    /// [`Error::Internal`] with a diagnostic naming the breach.
    pub fn validate(&self, containers: &[Container], epsilon: f64) -> Result<()> {
        let lookup: HashMap<&str, &Container> =
            containers.iter().map(|c| (c.id().as_str(), c)).collect();

        let mut seen: HashSet<&ItemId> = HashSet::new();
        for (container_id, placements) in &self.by_container {
            let container = lookup.get(container_id.as_str()).ok_or_else(|| {
                Error::Internal(format!("simulation references unknown container '{container_id}'"))
            })?;

            for (i, p) in placements.iter().enumerate() {
                if !seen.insert(&p.item_id) {
                    return Err(Error::Internal(format!(
                        "item '{}' is placed more than once",
                        p.item_id
                    )));
                }
                if !container.contains(&p.position, epsilon) {
                    return Err(Error::Internal(format!(
                        "item '{}' is out of bounds in container '{container_id}'",
                        p.item_id
                    )));
                }
                for q in &placements[i + 1..] {
                    if p.position.overlaps(&q.position, epsilon) {
                        return Err(Error::Internal(format!(
                            "items '{}' and '{}' overlap in container '{container_id}'",
                            p.item_id, q.item_id
                        )));
                    }
                }
                let others: Vec<Placement> = placements
                    .iter()
                    .filter(|q| q.item_id != p.item_id)
                    .cloned()
                    .collect();
                if !is_supported(&p.position, &others, epsilon) {
                    return Err(Error::Internal(format!(
                        "item '{}' is unsupported in container '{container_id}'",
                        p.item_id
                    )));
                }
            }
        }

        Ok(())
    }
}

/// Operations recorded while a rearrangement attempt mutates the state.
#[derive(Debug, Clone)]
enum JournalOp {
    Committed {
        container_id: ContainerId,
        item_id: ItemId,
    },
    Removed {
        container_id: ContainerId,
        index: usize,
        placement: Placement,
    },
}

/// Undo journal for one rearrangement attempt.
///
/// Each commit/remove performed during the attempt is recorded here;
/// [`Journal::unwind`] replays the record in reverse to restore the
/// pre-attempt state exactly, including placement order.
#[derive(Debug, Default)]
pub struct Journal {
    ops: Vec<JournalOp>,
}

impl Journal {
    /// Creates an empty journal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a commit performed on the state.
    pub fn record_commit(&mut self, container_id: &str, item_id: &str) {
        self.ops.push(JournalOp::Committed {
            container_id: container_id.to_string(),
            item_id: item_id.to_string(),
        });
    }

    /// Records a removal performed on the state.
    pub fn record_remove(&mut self, container_id: &str, index: usize, placement: Placement) {
        self.ops.push(JournalOp::Removed {
            container_id: container_id.to_string(),
            index,
            placement,
        });
    }

    /// Returns the number of recorded operations.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Returns true if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Reverts every recorded operation, newest first.
    pub fn unwind(self, state: &mut SimulationState) {
        for op in self.ops.into_iter().rev() {
            match op {
                JournalOp::Committed {
                    container_id,
                    item_id,
                } => {
                    state.remove(&container_id, &item_id);
                }
                JournalOp::Removed {
                    container_id,
                    index,
                    placement,
                } => {
                    state.insert_at(&container_id, index, placement);
                }
            }
        }
    }
}
