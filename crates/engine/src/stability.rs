//! Gravity-support checking for candidate placements.
//!
//! The support model is deliberately simple: a box is stable when it
//! rests on the container floor, or when at least one placed box
//! presents a top face at the candidate's base height with strictly
//! positive footprint overlap. Fractional-area support thresholds are
//! out of scope.

use stowage_core::{Placement, Position};

/// Returns true if a box at `candidate` would rest on a support.
///
/// - Floor rule: a base height within `epsilon` of zero is stable.
/// - Support rule: otherwise some placed box must have its top face
///   within `epsilon` of the base height and overlap the candidate's
///   (width, depth) footprint with positive area.
pub fn is_supported(candidate: &Position, placed: &[Placement], epsilon: f64) -> bool {
    if candidate.start.height.abs() < epsilon {
        return true;
    }

    placed.iter().any(|p| {
        (p.position.end.height - candidate.start.height).abs() < epsilon
            && candidate.footprint_overlaps(&p.position, epsilon)
    })
}
