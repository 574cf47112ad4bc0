//! Phase-2 rearrangement: making room for high-priority arrivals by
//! relocating lower-priority placements.
//!
//! An attempt targets one container. Eviction candidates are the
//! placements with strictly lower priority than the arrival, tried
//! lowest-priority first (larger volume first on ties). Victims are
//! removed one at a time until the arrival fits; each victim is then
//! re-homed into another container. The attempt is all-or-nothing: if
//! any victim cannot be re-homed, the journal unwinds every mutation
//! and the state is restored exactly.

use crate::config::EngineConfig;
use crate::spot::{find_spot, Spot};
use crate::state::{Journal, SimulationState};
use log::{debug, trace};
use std::cmp::Ordering;
use stowage_core::{Container, ContainerId, Item, ItemId, Placement, Position};

/// A relocation performed during a successful attempt.
#[derive(Debug, Clone)]
pub(crate) struct PlannedMove {
    pub item_id: ItemId,
    pub from_container: ContainerId,
    pub from_position: Position,
    pub to_container: ContainerId,
    pub to_position: Position,
}

/// Outcome of a successful attempt: the spot freed for the arrival and
/// the relocations that freed it, in execution order. The relocations
/// are already committed to the simulation; the arrival itself is not.
#[derive(Debug)]
pub(crate) struct RoomPlan {
    pub spot: Spot,
    pub moves: Vec<PlannedMove>,
}

/// Tries to free a spot for `item` in `target` by evicting
/// lower-priority placements and re-homing them elsewhere.
///
/// On success the simulation already reflects every relocation and the
/// returned plan describes them; on failure the simulation is unchanged.
pub(crate) fn try_make_room(
    item: &Item,
    target: &Container,
    containers: &[Container],
    state: &mut SimulationState,
    config: &EngineConfig,
) -> Option<RoomPlan> {
    let mut evictable: Vec<Placement> = state
        .in_container(target.id())
        .iter()
        .filter(|p| p.priority < item.priority())
        .cloned()
        .collect();
    evictable.sort_by(|a, b| {
        a.priority.cmp(&b.priority).then_with(|| {
            b.volume()
                .partial_cmp(&a.volume())
                .unwrap_or(Ordering::Equal)
        })
    });

    if evictable.is_empty() {
        trace!(
            "no evictable placements in '{}' for item '{}'",
            target.id(),
            item.id()
        );
        return None;
    }

    let mut journal = Journal::new();
    let mut evicted: Vec<Placement> = Vec::new();
    let mut spot: Option<Spot> = None;

    // Evict the smallest prefix of victims that frees a spot.
    for victim in &evictable {
        if let Some((index, removed)) = state.remove(target.id(), &victim.item_id) {
            journal.record_remove(target.id(), index, removed.clone());
            evicted.push(removed);
        }

        if let Some(found) = find_spot(
            item.dimensions(),
            target,
            state.in_container(target.id()),
            config.is_high_priority(item.priority()),
            config,
        ) {
            spot = Some(found);
            break;
        }
    }

    let Some(spot) = spot else {
        trace!(
            "evicting all {} candidates from '{}' still leaves no room for '{}'",
            evictable.len(),
            target.id(),
            item.id()
        );
        journal.unwind(state);
        return None;
    };

    // Re-home every victim into another container, in input order.
    let mut moves = Vec::with_capacity(evicted.len());
    for victim in &evicted {
        let extents = victim.position.extents();
        let high_priority = config.is_high_priority(victim.priority);

        let mut new_home = None;
        for container in containers {
            if container.id() == target.id() {
                continue;
            }
            if let Some(found) = find_spot(
                &extents,
                container,
                state.in_container(container.id()),
                high_priority,
                config,
            ) {
                new_home = Some((container.id().clone(), found));
                break;
            }
        }

        let Some((destination, found)) = new_home else {
            debug!(
                "cannot re-home evicted item '{}'; rolling back attempt on '{}'",
                victim.item_id,
                target.id()
            );
            journal.unwind(state);
            return None;
        };

        state.commit(Placement::new(
            victim.item_id.clone(),
            destination.clone(),
            found.position,
            victim.priority,
        ));
        journal.record_commit(&destination, &victim.item_id);

        moves.push(PlannedMove {
            item_id: victim.item_id.clone(),
            from_container: victim.container_id.clone(),
            from_position: victim.position,
            to_container: destination,
            to_position: found.position,
        });
    }

    debug!(
        "freed a spot in '{}' for item '{}' by moving {} placement(s)",
        target.id(),
        item.id(),
        moves.len()
    );
    Some(RoomPlan { spot, moves })
}
