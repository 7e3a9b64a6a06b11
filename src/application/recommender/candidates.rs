//! Candidate generation: which catalog players could replace which squad members.

use crate::domain::entities::player::Player;
use crate::domain::entities::squad::Squad;
use crate::domain::entities::swap::SwapCandidate;
use crate::domain::values::position::Position;
use crate::domain::values::units::point_units;

/// Every upgrading `(current, substitute)` pair for one position.
///
/// A substitute shares the position, is not already in the squad (by id or
/// by name), and projects strictly more points than the player it replaces.
/// Pairs come back sorted by improvement, best first; equal improvements keep
/// squad order, then catalog order. An empty result is not an error.
pub fn generate_candidates(squad: &Squad, catalog: &[Player], position: Position) -> Vec<SwapCandidate> {
    let available: Vec<&Player> = catalog
        .iter()
        .filter(|p| p.position == position && !squad.contains(p))
        .collect();

    let mut candidates = Vec::new();
    for current in squad.players(position) {
        let current_points = point_units(current.projected_points);
        for substitute in &available {
            if point_units(substitute.projected_points) > current_points {
                candidates.push(SwapCandidate::new(current.clone(), (*substitute).clone()));
            }
        }
    }

    // stable sort keeps generation order for ties
    candidates.sort_by(|a, b| {
        b.improvement
            .partial_cmp(&a.improvement)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    candidates
}

/// Candidates for every occupied position, in squad order.
pub fn generate_all(squad: &Squad, catalog: &[Player]) -> Vec<(Position, Vec<SwapCandidate>)> {
    Position::ALL
        .into_iter()
        .filter(|p| !squad.players(*p).is_empty())
        .map(|p| (p, generate_candidates(squad, catalog, p)))
        .collect()
}
