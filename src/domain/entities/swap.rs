use crate::domain::entities::player::Player;
use crate::domain::values::position::Position;
use crate::domain::values::units::{cost_from_units, cost_units, point_units, points_from_units};
use serde::{Deserialize, Serialize};

/// A proposed replacement of one squad member with a non-squad player.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SwapCandidate {
    pub position: Position,
    pub current_player: Player,
    pub substitute: Player,
    pub improvement: f64,
    pub cost_difference: f64,
}

impl SwapCandidate {
    pub fn new(current_player: Player, substitute: Player) -> Self {
        let improvement = points_from_units(
            point_units(substitute.projected_points) - point_units(current_player.projected_points),
        );
        let cost_difference =
            cost_from_units(cost_units(substitute.cost) - cost_units(current_player.cost));
        Self {
            position: current_player.position,
            current_player,
            substitute,
            improvement,
            cost_difference,
        }
    }

    pub fn cost_difference_units(&self) -> i64 {
        cost_units(self.substitute.cost) - cost_units(self.current_player.cost)
    }

    pub fn description(&self) -> String {
        format!(
            "Replace {} with {}",
            self.current_player.name, self.substitute.name
        )
    }
}

/// Why a package came back the way it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PackageStatus {
    /// The best package under the constraints was found.
    Optimal,
    /// No non-empty package satisfies the constraints; the package is empty.
    NoFeasiblePackage,
}

/// A set of non-conflicting swaps proposed together.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Package {
    pub swaps: Vec<SwapCandidate>,
    pub status: PackageStatus,
}

impl Package {
    pub fn empty() -> Self {
        Self {
            swaps: Vec::new(),
            status: PackageStatus::NoFeasiblePackage,
        }
    }

    pub fn len(&self) -> usize {
        self.swaps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.swaps.is_empty()
    }

    pub fn total_improvement(&self) -> f64 {
        points_from_units(
            self.swaps
                .iter()
                .map(|s| point_units(s.substitute.projected_points) - point_units(s.current_player.projected_points))
                .sum(),
        )
    }

    pub fn total_cost_change_units(&self) -> i64 {
        self.swaps.iter().map(|s| s.cost_difference_units()).sum()
    }

    pub fn total_cost_change(&self) -> f64 {
        cost_from_units(self.total_cost_change_units())
    }
}

/// A swap named by player names, as a client submits it for simulation or
/// application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwapRequest {
    pub position: Position,
    pub current_player: String,
    pub substitute: String,
}

impl From<&SwapCandidate> for SwapRequest {
    fn from(c: &SwapCandidate) -> Self {
        Self {
            position: c.position,
            current_player: c.current_player.name.clone(),
            substitute: c.substitute.name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_deltas() {
        let cur = Player::new("A".into(), Position::Forward, "X".into(), 7.5, 4.2, None);
        let sub = Player::new("B".into(), Position::Forward, "Y".into(), 8.0, 5.9, None);
        let c = SwapCandidate::new(cur, sub);
        assert_eq!(c.position, Position::Forward);
        assert!((c.improvement - 1.7).abs() < 1e-9);
        assert!((c.cost_difference - 0.5).abs() < 1e-9);
        assert_eq!(c.cost_difference_units(), 5);
        assert_eq!(c.description(), "Replace A with B");
    }

    #[test]
    fn test_empty_package() {
        let p = Package::empty();
        assert!(p.is_empty());
        assert_eq!(p.total_improvement(), 0.0);
        assert_eq!(p.total_cost_change(), 0.0);
        assert_eq!(p.status, PackageStatus::NoFeasiblePackage);
    }
}
