//! The placement engine: batch orchestration across the three phases.
//!
//! A batch runs through:
//!
//! 1. **Preferred zone**: each incoming item is tried in the containers
//!    whose zone matches its preference;
//! 2. **Rearrangement**: high-priority leftovers may evict
//!    lower-priority placements to free a spot;
//! 3. **Any container**: whatever remains is tried everywhere, and
//!    items that still do not fit are reported as failed.
//!
//! The engine is pure: it clones the live placements into a private
//! simulation, performs no I/O and returns a fully assembled
//! [`BatchResult`].

use crate::config::EngineConfig;
use crate::rearrange::try_make_room;
use crate::spot::find_spot;
use crate::state::SimulationState;
use log::{debug, trace, warn};
use std::collections::{BTreeMap, HashMap, HashSet};
use stowage_core::{
    BatchResult, Container, ContainerId, Error, Item, ItemId, ItemPlacement, Placement, Position,
    RearrangementAction, RearrangementStep, Result,
};

/// Priority-aware 3D placement engine.
#[derive(Debug, Clone, Default)]
pub struct PlacementEngine {
    config: EngineConfig,
}

impl PlacementEngine {
    /// Creates an engine with the given configuration.
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Returns the engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Computes placements for a batch of incoming items.
    ///
    /// `current_placements` is the live state for the involved
    /// containers; it is cloned on entry and never mutated. The result
    /// contains the final placement of every item (including untouched
    /// pre-existing ones), the rearrangement moves the batch requires,
    /// and the ids of items that could not be placed.
    pub fn place_batch(
        &self,
        items: &[Item],
        containers: &[Container],
        current_placements: &HashMap<ContainerId, Vec<Placement>>,
    ) -> BatchResult {
        if let Err(err) = self.validate_inputs(items, containers, current_placements) {
            warn!("rejecting batch: {err}");
            return BatchResult::rejected(
                err.to_string(),
                items.iter().map(|i| i.id().clone()).collect(),
            );
        }

        let mut state = SimulationState::from_live(current_placements, containers);

        // Final placement per item, seeded with the live state so
        // untouched items appear in the output.
        let mut final_map: BTreeMap<ItemId, ItemPlacement> = BTreeMap::new();
        for placements in current_placements.values() {
            for p in placements {
                final_map.insert(
                    p.item_id.clone(),
                    ItemPlacement::new(p.item_id.clone(), p.container_id.clone(), p.position),
                );
            }
        }

        // Priority descending, stable on ties so input order is kept.
        let mut ordered: Vec<&Item> = items.iter().collect();
        ordered.sort_by(|a, b| b.priority().cmp(&a.priority()));

        debug!(
            "placing {} item(s) into {} container(s), {} pre-existing placement(s)",
            items.len(),
            containers.len(),
            state.placement_count()
        );

        let backlog = self.run_preferred_zone_phase(&ordered, containers, &mut state, &mut final_map);

        let mut rearrangements: Vec<RearrangementStep> = Vec::new();
        let leftovers = self.run_rearrangement_phase(
            backlog,
            containers,
            &mut state,
            &mut final_map,
            &mut rearrangements,
        );

        let failed = self.run_final_phase(leftovers, containers, &mut state, &mut final_map);

        debug_assert!(
            state.validate(containers, self.config.epsilon).is_ok(),
            "simulation invariants broken after batch"
        );

        let failed_set: HashSet<&ItemId> = failed.iter().collect();
        let placements: Vec<ItemPlacement> = final_map
            .into_values()
            .filter(|p| !failed_set.contains(&p.item_id))
            .collect();

        BatchResult::from_outcome(placements, rearrangements, failed)
    }

    /// Phase 1: try each item in the containers of its preferred zone.
    /// Returns the items that still need a home.
    fn run_preferred_zone_phase<'a>(
        &self,
        ordered: &[&'a Item],
        containers: &[Container],
        state: &mut SimulationState,
        final_map: &mut BTreeMap<ItemId, ItemPlacement>,
    ) -> Vec<&'a Item> {
        let mut backlog = Vec::new();

        for item in ordered {
            let high_priority = self.config.is_high_priority(item.priority());
            let mut placed = false;

            if let Some(zone) = item.preferred_zone() {
                for container in containers.iter().filter(|c| c.zone() == zone) {
                    if let Some(spot) = find_spot(
                        item.dimensions(),
                        container,
                        state.in_container(container.id()),
                        high_priority,
                        &self.config,
                    ) {
                        trace!(
                            "item '{}' placed in preferred container '{}'",
                            item.id(),
                            container.id()
                        );
                        self.commit(item, container.id(), spot.position, state, final_map);
                        placed = true;
                        break;
                    }
                }
            }

            if !placed {
                trace!("item '{}' deferred past the preferred-zone phase", item.id());
                backlog.push(*item);
            }
        }

        backlog
    }

    /// Phase 2: attempt rearrangement for high-priority backlog items.
    /// Returns the items left for the final phase.
    fn run_rearrangement_phase<'a>(
        &self,
        backlog: Vec<&'a Item>,
        containers: &[Container],
        state: &mut SimulationState,
        final_map: &mut BTreeMap<ItemId, ItemPlacement>,
        rearrangements: &mut Vec<RearrangementStep>,
    ) -> Vec<&'a Item> {
        let mut leftovers = Vec::new();

        for item in backlog {
            if !self.config.is_high_priority(item.priority()) {
                leftovers.push(item);
                continue;
            }

            let candidates: Vec<&Container> = match item.preferred_zone() {
                Some(zone) => containers.iter().filter(|c| c.zone() == zone).collect(),
                None => containers.iter().collect(),
            };

            let mut resolved = false;
            for target in candidates {
                let Some(plan) = try_make_room(item, target, containers, state, &self.config)
                else {
                    continue;
                };

                for planned in &plan.moves {
                    let step = rearrangements.len() as u32 + 1;
                    rearrangements.push(RearrangementStep {
                        step,
                        action: RearrangementAction::Move,
                        item_id: planned.item_id.clone(),
                        from_container: Some(planned.from_container.clone()),
                        from_position: Some(planned.from_position),
                        to_container: planned.to_container.clone(),
                        to_position: planned.to_position,
                    });
                    final_map.insert(
                        planned.item_id.clone(),
                        ItemPlacement::new(
                            planned.item_id.clone(),
                            planned.to_container.clone(),
                            planned.to_position,
                        ),
                    );
                }

                self.commit(item, target.id(), plan.spot.position, state, final_map);
                resolved = true;
                break;
            }

            if !resolved {
                trace!(
                    "no feasible rearrangement for item '{}'; deferring to final phase",
                    item.id()
                );
                leftovers.push(item);
            }
        }

        leftovers
    }

    /// Phase 3: try every container in input order; whatever still does
    /// not fit is failed.
    fn run_final_phase(
        &self,
        leftovers: Vec<&Item>,
        containers: &[Container],
        state: &mut SimulationState,
        final_map: &mut BTreeMap<ItemId, ItemPlacement>,
    ) -> Vec<ItemId> {
        let mut failed = Vec::new();

        for item in leftovers {
            let high_priority = self.config.is_high_priority(item.priority());
            let mut placed = false;

            for container in containers {
                if let Some(spot) = find_spot(
                    item.dimensions(),
                    container,
                    state.in_container(container.id()),
                    high_priority,
                    &self.config,
                ) {
                    trace!(
                        "item '{}' placed in fallback container '{}'",
                        item.id(),
                        container.id()
                    );
                    self.commit(item, container.id(), spot.position, state, final_map);
                    placed = true;
                    break;
                }
            }

            if !placed {
                warn!("no container can hold item '{}'", item.id());
                failed.push(item.id().clone());
            }
        }

        failed
    }

    /// Commits an incoming item into the simulation and the final map.
    fn commit(
        &self,
        item: &Item,
        container_id: &ContainerId,
        position: Position,
        state: &mut SimulationState,
        final_map: &mut BTreeMap<ItemId, ItemPlacement>,
    ) {
        state.commit(Placement::new(
            item.id().clone(),
            container_id.clone(),
            position,
            item.priority(),
        ));
        final_map.insert(
            item.id().clone(),
            ItemPlacement::new(item.id().clone(), container_id.clone(), position),
        );
    }

    /// Checks the batch inputs before any placement is attempted.
    fn validate_inputs(
        &self,
        items: &[Item],
        containers: &[Container],
        current_placements: &HashMap<ContainerId, Vec<Placement>>,
    ) -> Result<()> {
        self.config.validate()?;

        let mut container_ids = HashSet::new();
        for container in containers {
            container.validate()?;
            if !container_ids.insert(container.id()) {
                return Err(Error::InvalidContainer(format!(
                    "Duplicate container id '{}'",
                    container.id()
                )));
            }
        }

        let mut item_ids = HashSet::new();
        for item in items {
            item.validate()?;
            if !item_ids.insert(item.id()) {
                return Err(Error::InvalidItem(format!(
                    "Duplicate item id '{}'",
                    item.id()
                )));
            }
        }

        let container_lookup: HashMap<&str, &Container> =
            containers.iter().map(|c| (c.id().as_str(), c)).collect();

        let mut dangling: Vec<&ContainerId> = current_placements
            .keys()
            .filter(|id| !container_lookup.contains_key(id.as_str()))
            .collect();
        dangling.sort();
        if let Some(container_id) = dangling.first() {
            return Err(Error::InvalidPlacement(format!(
                "Placements reference unknown container '{container_id}'"
            )));
        }

        let mut placed_ids: HashSet<&ItemId> = HashSet::new();

        // Walk containers in input order so a batch with several seed
        // violations always reports the same one.
        for container in containers {
            let container_id = container.id();
            let Some(placements) = current_placements.get(container_id) else {
                continue;
            };

            for (i, p) in placements.iter().enumerate() {
                if p.container_id != *container_id {
                    return Err(Error::InvalidPlacement(format!(
                        "Placement of '{}' is filed under container '{container_id}' but records '{}'",
                        p.item_id, p.container_id
                    )));
                }
                if !p.position.is_well_formed() {
                    return Err(Error::InvalidPlacement(format!(
                        "Placement of '{}' has a degenerate bounding box",
                        p.item_id
                    )));
                }
                if !placed_ids.insert(&p.item_id) {
                    return Err(Error::InvalidPlacement(format!(
                        "Item '{}' is placed in more than one container",
                        p.item_id
                    )));
                }
                if item_ids.contains(&p.item_id) {
                    return Err(Error::InvalidPlacement(format!(
                        "Incoming item '{}' is already placed",
                        p.item_id
                    )));
                }
                if !container.contains(&p.position, self.config.epsilon) {
                    return Err(Error::InvalidPlacement(format!(
                        "Placement of '{}' is out of bounds in container '{container_id}'",
                        p.item_id
                    )));
                }
                for q in &placements[i + 1..] {
                    if p.position.overlaps(&q.position, self.config.epsilon) {
                        return Err(Error::InvalidPlacement(format!(
                            "Placements of '{}' and '{}' overlap in container '{container_id}'",
                            p.item_id, q.item_id
                        )));
                    }
                }
            }
        }

        Ok(())
    }
}
