//! Spot finding: the per-container placement search.
//!
//! For one item and one container the finder walks a fixed candidate
//! order and returns the first position that is in bounds, collision
//! free and supported. The order is part of the engine's contract:
//!
//! 1. the six axis-aligned orientations;
//! 2. candidate base heights ascending (the floor, then the top face of
//!    every placed item, deduplicated under the shelf tolerance);
//! 3. the depth grid, front-first for high-priority items and
//!    back-first otherwise;
//! 4. the width grid ascending.
//!
//! Low base heights keep stacks short; the depth direction steers
//! high-priority items toward the accessible front face and pushes
//! low-priority items to the back.

use crate::config::EngineConfig;
use crate::stability::is_supported;
use nalgebra::Vector3;
use std::cmp::Ordering;
use stowage_core::{oriented, Container, Coordinates, Placement, Position, AXIS_PERMUTATIONS};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A valid placement candidate: a position plus the orientation index
/// that produced it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Spot {
    /// The bounding box of the candidate.
    pub position: Position,
    /// Orientation index into the axis-permutation table.
    pub orientation: usize,
}

/// Candidate base heights for a container: the floor plus the top face
/// of every placed item, ascending, deduplicated under the shelf
/// tolerance.
fn base_heights(placed: &[Placement], shelf_tolerance: f64) -> Vec<f64> {
    let mut heights = vec![0.0];
    for p in placed {
        let top = p.position.end.height;
        if !heights.iter().any(|h| (h - top).abs() < shelf_tolerance) {
            heights.push(top);
        }
    }
    heights.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    heights
}

/// Searches one container for a spot holding a box with the given
/// dimensions, avoiding every placement in `placed`.
///
/// Returns the first valid candidate in the fixed search order, or
/// `None` when no orientation fits anywhere.
pub fn find_spot(
    dimensions: &Vector3<f64>,
    container: &Container,
    placed: &[Placement],
    high_priority: bool,
    config: &EngineConfig,
) -> Option<Spot> {
    let eps = config.epsilon;
    let bounds = container.dimensions();

    let heights = base_heights(placed, config.shelf_tolerance());

    let depth_step = (bounds.y / config.grid_divisions).max(config.min_grid_step);
    let width_step = (bounds.x / config.grid_divisions).max(config.min_grid_step);
    let depth_steps = (bounds.y / depth_step) as usize + 2;
    let width_steps = (bounds.x / width_step) as usize + 2;

    for orientation in 0..AXIS_PERMUTATIONS.len() {
        let dims = oriented(dimensions, orientation);
        if dims.x > bounds.x + eps || dims.y > bounds.y + eps || dims.z > bounds.z + eps {
            continue;
        }

        for &start_h in &heights {
            if start_h + dims.z > bounds.z + eps {
                continue;
            }

            for d_idx in 0..depth_steps {
                let raw_d = if high_priority {
                    d_idx as f64 * depth_step
                } else {
                    bounds.y - (d_idx + 1) as f64 * depth_step
                };
                let start_d = raw_d.min(bounds.y - dims.y).max(0.0);
                if start_d + dims.y > bounds.y + eps {
                    continue;
                }

                for w_idx in 0..width_steps {
                    let start_w = (w_idx as f64 * width_step).min(bounds.x - dims.x).max(0.0);
                    if start_w + dims.x > bounds.x + eps {
                        continue;
                    }

                    let candidate =
                        Position::from_origin(Coordinates::new(start_w, start_d, start_h), &dims);

                    if !candidate.fits_within(bounds, eps) {
                        continue;
                    }
                    if placed.iter().any(|p| candidate.overlaps(&p.position, eps)) {
                        continue;
                    }
                    if !is_supported(&candidate, placed, eps) {
                        continue;
                    }

                    return Some(Spot {
                        position: candidate,
                        orientation,
                    });
                }
            }
        }
    }

    None
}
