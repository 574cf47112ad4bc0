//! Integration tests for the stowage placement engine.
//!
//! Every scenario runs the full invariant suite afterwards: no-overlap,
//! in-bounds, stability, uniqueness, completeness-or-declared-failure,
//! rearrangement integrity and success consistency.

use approx::assert_relative_eq;
use std::collections::{HashMap, HashSet};
use stowage_engine::{
    is_supported, BatchResult, Container, ContainerId, Coordinates, Item, ItemPlacement,
    Placement, PlacementEngine, Position, EPSILON,
};

fn engine() -> PlacementEngine {
    PlacementEngine::default()
}

fn position(start: (f64, f64, f64), end: (f64, f64, f64)) -> Position {
    Position::new(
        Coordinates::new(start.0, start.1, start.2),
        Coordinates::new(end.0, end.1, end.2),
    )
}

fn live(entries: Vec<Placement>) -> HashMap<ContainerId, Vec<Placement>> {
    let mut map: HashMap<ContainerId, Vec<Placement>> = HashMap::new();
    for p in entries {
        map.entry(p.container_id.clone()).or_default().push(p);
    }
    map
}

/// Runs the full post-call invariant suite.
fn assert_invariants(
    result: &BatchResult,
    items: &[Item],
    containers: &[Container],
    seed: &HashMap<ContainerId, Vec<Placement>>,
) {
    // Success consistency.
    assert_eq!(result.success, result.failed_item_ids.is_empty());
    if result.success {
        assert!(result.error.is_none());
    } else {
        assert!(result.error.is_some());
    }

    // Uniqueness.
    let mut placed_ids: HashSet<&str> = HashSet::new();
    for p in &result.placements {
        assert!(
            placed_ids.insert(&p.item_id),
            "item '{}' appears in more than one placement",
            p.item_id
        );
    }

    // Completeness or declared failure.
    for item in items {
        let placed = placed_ids.contains(item.id().as_str());
        let failed = result.failed_item_ids.contains(item.id());
        assert!(
            placed ^ failed,
            "item '{}' must appear in exactly one of placements/failed",
            item.id()
        );
    }

    // In-bounds, no-overlap and stability per container.
    let lookup: HashMap<&str, &Container> =
        containers.iter().map(|c| (c.id().as_str(), c)).collect();
    let mut by_container: HashMap<&str, Vec<&ItemPlacement>> = HashMap::new();
    for p in &result.placements {
        let container = lookup
            .get(p.container_id.as_str())
            .unwrap_or_else(|| panic!("placement of '{}' references an unknown container", p.item_id));
        assert!(
            container.contains(&p.position, EPSILON),
            "item '{}' is out of bounds in '{}'",
            p.item_id,
            p.container_id
        );
        by_container.entry(p.container_id.as_str()).or_default().push(p);
    }

    for (container_id, group) in &by_container {
        for (i, p) in group.iter().enumerate() {
            for q in &group[i + 1..] {
                assert!(
                    !p.position.overlaps(&q.position, EPSILON),
                    "items '{}' and '{}' overlap in '{container_id}'",
                    p.item_id,
                    q.item_id
                );
            }

            let others: Vec<Placement> = group
                .iter()
                .filter(|q| q.item_id != p.item_id)
                .map(|q| Placement::new(q.item_id.clone(), q.container_id.clone(), q.position, 0))
                .collect();
            assert!(
                is_supported(&p.position, &others, EPSILON),
                "item '{}' is unsupported in '{container_id}'",
                p.item_id
            );
        }
    }

    // Rearrangement integrity.
    let seed_lookup: HashMap<&str, &Placement> = seed
        .values()
        .flatten()
        .map(|p| (p.item_id.as_str(), p))
        .collect();
    let mut last_step_of: HashMap<&str, u32> = HashMap::new();
    for (i, step) in result.rearrangements.iter().enumerate() {
        assert_eq!(step.step, i as u32 + 1, "step numbers must be 1, 2, ...");
        assert!(
            placed_ids.contains(step.item_id.as_str()),
            "moved item '{}' must appear in placements",
            step.item_id
        );

        if let (Some(from_container), Some(from_position)) =
            (&step.from_container, &step.from_position)
        {
            if !last_step_of.contains_key(step.item_id.as_str()) {
                let origin = seed_lookup
                    .get(step.item_id.as_str())
                    .unwrap_or_else(|| panic!("moved item '{}' was not in the live state", step.item_id));
                assert_eq!(*from_container, origin.container_id);
                assert_eq!(*from_position, origin.position);
            }
        }
        last_step_of.insert(&step.item_id, step.step);
    }
    for step in &result.rearrangements {
        if last_step_of.get(step.item_id.as_str()) == Some(&step.step) {
            let final_placement = result
                .placement_of(&step.item_id)
                .unwrap_or_else(|| panic!("moved item '{}' missing from placements", step.item_id));
            assert_eq!(final_placement.container_id, step.to_container);
            assert_eq!(final_placement.position, step.to_position);
        }
    }
}

mod scenarios {
    use super::*;

    #[test]
    fn floor_fit_in_empty_container_lands_at_the_back() {
        let containers = vec![Container::new("C1", "Z1", 10.0, 10.0, 10.0)];
        let items = vec![Item::new("A", 2.0, 3.0, 1.0)
            .with_priority(50)
            .with_preferred_zone("Z1")];
        let seed = HashMap::new();

        let result = engine().place_batch(&items, &containers, &seed);

        assert!(result.success);
        assert!(result.rearrangements.is_empty());
        assert_eq!(result.placements.len(), 1);

        let a = result.placement_of("A").unwrap();
        assert_eq!(a.container_id, "C1");
        // Back-first depth iteration: the first candidate 9.6 clamps to
        // 10 - 3 = 7.
        assert_relative_eq!(a.position.start.width, 0.0, epsilon = EPSILON);
        assert_relative_eq!(a.position.start.depth, 7.0, epsilon = EPSILON);
        assert_relative_eq!(a.position.start.height, 0.0, epsilon = EPSILON);
        assert_relative_eq!(a.position.end.width, 2.0, epsilon = EPSILON);
        assert_relative_eq!(a.position.end.depth, 10.0, epsilon = EPSILON);
        assert_relative_eq!(a.position.end.height, 1.0, epsilon = EPSILON);

        assert_invariants(&result, &items, &containers, &seed);
    }

    #[test]
    fn high_priority_item_lands_at_the_front() {
        let containers = vec![Container::new("C1", "Z1", 10.0, 10.0, 10.0)];
        let items = vec![Item::new("A", 2.0, 3.0, 1.0)
            .with_priority(80)
            .with_preferred_zone("Z1")];
        let seed = HashMap::new();

        let result = engine().place_batch(&items, &containers, &seed);

        assert!(result.success);
        let a = result.placement_of("A").unwrap();
        assert_relative_eq!(a.position.start.width, 0.0, epsilon = EPSILON);
        assert_relative_eq!(a.position.start.depth, 0.0, epsilon = EPSILON);
        assert_relative_eq!(a.position.start.height, 0.0, epsilon = EPSILON);

        assert_invariants(&result, &items, &containers, &seed);
    }

    #[test]
    fn item_stacks_on_a_full_floor() {
        let containers = vec![Container::new("C1", "Z1", 4.0, 4.0, 4.0)];
        let seed = live(vec![Placement::new(
            "B",
            "C1",
            position((0.0, 0.0, 0.0), (4.0, 4.0, 1.0)),
            50,
        )]);
        let items = vec![Item::new("A", 2.0, 2.0, 1.0)
            .with_priority(80)
            .with_preferred_zone("Z1")];

        let result = engine().place_batch(&items, &containers, &seed);

        assert!(result.success);
        let a = result.placement_of("A").unwrap();
        assert_relative_eq!(a.position.start.width, 0.0, epsilon = EPSILON);
        assert_relative_eq!(a.position.start.depth, 0.0, epsilon = EPSILON);
        assert_relative_eq!(a.position.start.height, 1.0, epsilon = EPSILON);
        // The untouched base item is still reported.
        assert!(result.placement_of("B").is_some());

        assert_invariants(&result, &items, &containers, &seed);
    }

    #[test]
    fn high_priority_arrival_evicts_a_low_priority_blocker() {
        // C1 is too short to stack anything above the blocker, so the
        // arrival can only fit after the blocker moves to C2.
        let containers = vec![
            Container::new("C1", "Z1", 4.0, 4.0, 2.0),
            Container::new("C2", "Z2", 4.0, 4.0, 4.0),
        ];
        let seed = live(vec![Placement::new(
            "L",
            "C1",
            position((0.0, 0.0, 0.0), (4.0, 4.0, 1.0)),
            10,
        )]);
        let items = vec![Item::new("H", 4.0, 4.0, 2.0)
            .with_priority(90)
            .with_preferred_zone("Z1")];

        let result = engine().place_batch(&items, &containers, &seed);

        assert!(result.success);
        assert_eq!(result.rearrangements.len(), 1);

        let step = &result.rearrangements[0];
        assert_eq!(step.step, 1);
        assert_eq!(step.action.to_string(), "move");
        assert_eq!(step.item_id, "L");
        assert_eq!(step.from_container.as_deref(), Some("C1"));
        assert_eq!(step.to_container, "C2");
        assert_eq!(step.to_position, position((0.0, 0.0, 0.0), (4.0, 4.0, 1.0)));

        let h = result.placement_of("H").unwrap();
        assert_eq!(h.container_id, "C1");
        assert_eq!(h.position, position((0.0, 0.0, 0.0), (4.0, 4.0, 2.0)));

        let l = result.placement_of("L").unwrap();
        assert_eq!(l.container_id, "C2");

        assert_invariants(&result, &items, &containers, &seed);
    }

    #[test]
    fn oversized_item_fails_the_batch() {
        let containers = vec![Container::new("C1", "Z1", 1.0, 1.0, 1.0)];
        let items = vec![Item::new("A", 2.0, 2.0, 2.0).with_priority(50)];
        let seed = HashMap::new();

        let result = engine().place_batch(&items, &containers, &seed);

        assert!(!result.success);
        assert_eq!(result.failed_item_ids, vec!["A".to_string()]);
        assert!(result.placements.is_empty());
        assert!(result.error.as_deref().unwrap().contains("A"));

        assert_invariants(&result, &items, &containers, &seed);
    }

    #[test]
    fn zone_miss_falls_back_to_any_container() {
        let containers = vec![
            Container::new("C1", "Z1", 5.0, 5.0, 5.0),
            Container::new("C2", "Z2", 5.0, 5.0, 5.0),
        ];
        let items = vec![Item::new("A", 1.0, 1.0, 1.0)
            .with_priority(50)
            .with_preferred_zone("Z3")];
        let seed = HashMap::new();

        let result = engine().place_batch(&items, &containers, &seed);

        assert!(result.success);
        let a = result.placement_of("A").unwrap();
        // First container in input order wins; back-first depth clamps
        // 4.8 down to 5 - 1 = 4.
        assert_eq!(a.container_id, "C1");
        assert_relative_eq!(a.position.start.width, 0.0, epsilon = EPSILON);
        assert_relative_eq!(a.position.start.depth, 4.0, epsilon = EPSILON);
        assert_relative_eq!(a.position.start.height, 0.0, epsilon = EPSILON);

        assert_invariants(&result, &items, &containers, &seed);
    }

    #[test]
    fn rearrangement_is_all_or_nothing() {
        // The only other container is too small for the blocker, so the
        // attempt must roll back and the arrival must fail without
        // disturbing the blocker.
        let containers = vec![
            Container::new("C1", "Z1", 4.0, 4.0, 2.0),
            Container::new("C2", "Z2", 1.0, 1.0, 1.0),
        ];
        let seed = live(vec![Placement::new(
            "L",
            "C1",
            position((0.0, 0.0, 0.0), (4.0, 4.0, 1.0)),
            10,
        )]);
        let items = vec![Item::new("H", 4.0, 4.0, 2.0)
            .with_priority(90)
            .with_preferred_zone("Z1")];

        let result = engine().place_batch(&items, &containers, &seed);

        assert!(!result.success);
        assert_eq!(result.failed_item_ids, vec!["H".to_string()]);
        assert!(result.rearrangements.is_empty());

        let l = result.placement_of("L").unwrap();
        assert_eq!(l.container_id, "C1");
        assert_eq!(l.position, position((0.0, 0.0, 0.0), (4.0, 4.0, 1.0)));

        assert_invariants(&result, &items, &containers, &seed);
    }

    #[test]
    fn mixed_batch_places_and_fails_independently() {
        let containers = vec![
            Container::new("C1", "Z1", 6.0, 6.0, 4.0),
            Container::new("C2", "Z2", 6.0, 6.0, 4.0),
        ];
        let items = vec![
            Item::new("big", 10.0, 10.0, 10.0).with_priority(90),
            Item::new("small", 2.0, 2.0, 2.0)
                .with_priority(60)
                .with_preferred_zone("Z2"),
            Item::new("medium", 4.0, 4.0, 2.0).with_priority(30),
        ];
        let seed = HashMap::new();

        let result = engine().place_batch(&items, &containers, &seed);

        assert!(!result.success);
        assert_eq!(result.failed_item_ids, vec!["big".to_string()]);
        assert_eq!(result.placements.len(), 2);
        assert_eq!(result.placement_of("small").unwrap().container_id, "C2");

        assert_invariants(&result, &items, &containers, &seed);
    }
}

mod laws {
    use super::*;

    #[test]
    fn empty_batch_returns_live_placements_unchanged() {
        let containers = vec![
            Container::new("C1", "Z1", 10.0, 10.0, 10.0),
            Container::new("C2", "Z2", 10.0, 10.0, 10.0),
        ];
        let seed = live(vec![
            Placement::new("A", "C1", position((0.0, 0.0, 0.0), (2.0, 2.0, 1.0)), 50),
            Placement::new("B", "C2", position((1.0, 1.0, 0.0), (3.0, 4.0, 2.0)), 90),
        ]);

        let result = engine().place_batch(&[], &containers, &seed);

        assert!(result.success);
        assert!(result.rearrangements.is_empty());
        assert_eq!(result.placements.len(), 2);
        assert_eq!(
            result.placement_of("A").unwrap().position,
            position((0.0, 0.0, 0.0), (2.0, 2.0, 1.0))
        );
        assert_eq!(
            result.placement_of("B").unwrap().position,
            position((1.0, 1.0, 0.0), (3.0, 4.0, 2.0))
        );

        assert_invariants(&result, &[], &containers, &seed);
    }

    #[test]
    fn identical_inputs_give_identical_output() {
        let containers = vec![
            Container::new("C1", "Z1", 8.0, 8.0, 6.0),
            Container::new("C2", "Z2", 8.0, 8.0, 6.0),
        ];
        let seed = live(vec![Placement::new(
            "old",
            "C1",
            position((0.0, 0.0, 0.0), (8.0, 8.0, 1.0)),
            20,
        )]);
        let items = vec![
            Item::new("a", 3.0, 3.0, 2.0).with_priority(90).with_preferred_zone("Z1"),
            Item::new("b", 2.0, 5.0, 2.0).with_priority(50),
            Item::new("c", 4.0, 2.0, 3.0).with_priority(75).with_preferred_zone("Z2"),
        ];

        let first = engine().place_batch(&items, &containers, &seed);
        let second = engine().place_batch(&items, &containers, &seed);

        assert_eq!(first, second);
        assert_invariants(&first, &items, &containers, &seed);
    }

    #[test]
    fn permuting_equal_priority_items_places_the_same_set() {
        let containers = vec![Container::new("C1", "Z1", 6.0, 6.0, 6.0)];
        let items = vec![
            Item::new("a", 2.0, 2.0, 2.0).with_priority(50),
            Item::new("b", 3.0, 3.0, 2.0).with_priority(50),
            Item::new("c", 2.0, 4.0, 2.0).with_priority(50),
        ];
        let permuted = vec![items[2].clone(), items[0].clone(), items[1].clone()];
        let seed = HashMap::new();

        let original = engine().place_batch(&items, &containers, &seed);
        let shuffled = engine().place_batch(&permuted, &containers, &seed);

        let ids = |r: &BatchResult| -> HashSet<String> {
            r.placements.iter().map(|p| p.item_id.clone()).collect()
        };
        assert_eq!(ids(&original), ids(&shuffled));

        assert_invariants(&original, &items, &containers, &seed);
        assert_invariants(&shuffled, &permuted, &containers, &seed);
    }

    #[test]
    fn pass_through_fields_do_not_influence_placement() {
        let containers = vec![Container::new("C1", "Z1", 10.0, 10.0, 10.0)];
        let bare = vec![Item::new("A", 2.0, 3.0, 1.0).with_priority(50)];
        let decorated = vec![Item::new("A", 2.0, 3.0, 1.0)
            .with_priority(50)
            .with_name("Oxygen Filter")
            .with_mass(12.5)
            .with_expiry("2027-01-01T00:00:00Z")
            .with_usage_limit(5)];
        let seed = HashMap::new();

        let first = engine().place_batch(&bare, &containers, &seed);
        let second = engine().place_batch(&decorated, &containers, &seed);

        assert_eq!(first.placements, second.placements);
    }
}

mod validation {
    use super::*;

    #[test]
    fn nonpositive_dimensions_fail_every_item() {
        let containers = vec![Container::new("C1", "Z1", 10.0, 10.0, 10.0)];
        let items = vec![
            Item::new("good", 1.0, 1.0, 1.0),
            Item::new("bad", 0.0, 1.0, 1.0),
        ];

        let result = engine().place_batch(&items, &containers, &HashMap::new());

        assert!(!result.success);
        assert!(result.placements.is_empty());
        assert!(result.rearrangements.is_empty());
        assert_eq!(
            result.failed_item_ids,
            vec!["good".to_string(), "bad".to_string()]
        );
    }

    #[test]
    fn duplicate_container_ids_are_rejected() {
        let containers = vec![
            Container::new("C1", "Z1", 10.0, 10.0, 10.0),
            Container::new("C1", "Z2", 5.0, 5.0, 5.0),
        ];
        let items = vec![Item::new("A", 1.0, 1.0, 1.0)];

        let result = engine().place_batch(&items, &containers, &HashMap::new());

        assert!(!result.success);
        assert!(result
            .error
            .as_deref()
            .unwrap()
            .contains("Duplicate container id"));
    }

    #[test]
    fn seed_item_in_two_containers_is_rejected() {
        let containers = vec![
            Container::new("C1", "Z1", 10.0, 10.0, 10.0),
            Container::new("C2", "Z2", 10.0, 10.0, 10.0),
        ];
        let seed = live(vec![
            Placement::new("A", "C1", position((0.0, 0.0, 0.0), (1.0, 1.0, 1.0)), 50),
            Placement::new("A", "C2", position((0.0, 0.0, 0.0), (1.0, 1.0, 1.0)), 50),
        ]);

        let result = engine().place_batch(&[], &containers, &seed);

        assert!(!result.success);
        assert!(result
            .error
            .as_deref()
            .unwrap()
            .contains("more than one container"));
    }

    #[test]
    fn incoming_item_colliding_with_live_state_is_rejected() {
        let containers = vec![Container::new("C1", "Z1", 10.0, 10.0, 10.0)];
        let seed = live(vec![Placement::new(
            "A",
            "C1",
            position((0.0, 0.0, 0.0), (1.0, 1.0, 1.0)),
            50,
        )]);
        let items = vec![Item::new("A", 1.0, 1.0, 1.0)];

        let result = engine().place_batch(&items, &containers, &seed);

        assert!(!result.success);
        assert!(result.error.as_deref().unwrap().contains("already placed"));
    }
}
