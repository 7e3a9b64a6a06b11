use crate::application::snapshot;
use crate::domain::entities::player::Player;
use crate::domain::entities::squad::Squad;
use crate::domain::entities::swap::SwapRequest;
use crate::domain::error::DomainError;
use crate::domain::ports::player_catalog::PlayerCatalog;
use crate::domain::ports::squad_repository::SquadRepository;
use crate::domain::values::units::{budget_units, cost_units, round1};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    pub success: bool,
    pub original_total_points: f64,
    pub new_total_points: f64,
    pub point_change: f64,
    pub original_total_cost: f64,
    pub new_total_cost: f64,
    pub cost_change: f64,
    pub season_budget: f64,
    pub within_budget: bool,
    pub swaps_applied: usize,
    pub errors: Vec<String>,
    pub resulting_squad: Squad,
}

/// Apply `swaps` to a copy of `squad`. Invalid swaps are reported and skipped.
pub fn simulate(squad: &Squad, catalog: &[Player], swaps: &[SwapRequest], season_budget: f64) -> SimulationReport {
    let mut after = squad.clone();
    let mut errors = Vec::new();
    let mut applied = 0;

    for swap in swaps {
        let Some(incoming) = catalog.iter().find(|p| p.has_name(&swap.substitute)) else {
            errors.push(format!("Unknown player: {}", swap.substitute));
            continue;
        };
        match after.replace(swap.position, &swap.current_player, incoming.clone()) {
            Ok(_) => applied += 1,
            Err(e) => errors.push(e.to_string()),
        }
    }

    let original_points = squad.total_points();
    let new_points = after.total_points();
    let original_cost = squad.total_cost();
    let new_cost = after.total_cost();
    SimulationReport {
        success: errors.is_empty(),
        original_total_points: original_points,
        new_total_points: new_points,
        point_change: round1(new_points - original_points),
        original_total_cost: round1(original_cost),
        new_total_cost: round1(new_cost),
        cost_change: round1(new_cost - original_cost),
        season_budget: round1(season_budget),
        within_budget: cost_units(new_cost) <= budget_units(season_budget),
        swaps_applied: applied,
        errors,
        resulting_squad: after,
    }
}

pub struct SimulateUseCase {
    squads: Arc<dyn SquadRepository>,
    catalog: Arc<dyn PlayerCatalog>,
    season_budget: f64,
}

impl SimulateUseCase {
    pub fn new(squads: Arc<dyn SquadRepository>, catalog: Arc<dyn PlayerCatalog>, season_budget: f64) -> Self {
        Self {
            squads,
            catalog,
            season_budget,
        }
    }

    pub fn simulate(&self, swaps: &[SwapRequest]) -> Result<SimulationReport, DomainError> {
        if swaps.is_empty() {
            return Err(DomainError::InvalidInput("No substitutions provided".into()));
        }
        let snap = snapshot::load(self.squads.as_ref(), self.catalog.as_ref())?;
        Ok(simulate(&snap.squad, &snap.catalog, swaps, self.season_budget))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::values::position::Position;

    fn player(name: &str, position: Position, cost: f64, points: f64) -> Player {
        Player::new(name.into(), position, "T".into(), cost, points, None)
    }

    fn request(position: Position, out: &str, inc: &str) -> SwapRequest {
        SwapRequest {
            position,
            current_player: out.into(),
            substitute: inc.into(),
        }
    }

    #[test]
    fn test_simulation_leaves_squad_untouched() {
        let mut squad = Squad::default();
        squad.add(player("F1", Position::Forward, 7.0, 4.0)).unwrap();
        let catalog = vec![player("F2", Position::Forward, 9.0, 6.5)];

        let report = simulate(&squad, &catalog, &[request(Position::Forward, "f1", "F2")], 10.0);
        assert!(report.success);
        assert_eq!(report.swaps_applied, 1);
        assert_eq!(report.point_change, 2.5);
        assert_eq!(report.cost_change, 2.0);
        assert!(report.within_budget);
        assert_eq!(squad.forwards[0].name, "F1");
        assert_eq!(report.resulting_squad.forwards[0].name, "F2");
    }

    #[test]
    fn test_invalid_swaps_reported() {
        let mut squad = Squad::default();
        squad.add(player("F1", Position::Forward, 7.0, 4.0)).unwrap();
        let catalog = vec![
            player("F1", Position::Forward, 7.0, 4.0),
            player("M1", Position::Midfielder, 5.0, 5.0),
        ];
        let report = simulate(
            &squad,
            &catalog,
            &[
                request(Position::Forward, "F1", "Nobody"),
                request(Position::Forward, "F1", "M1"),
                request(Position::Forward, "Ghost", "F1"),
            ],
            100.0,
        );
        assert!(!report.success);
        assert_eq!(report.swaps_applied, 0);
        assert_eq!(report.errors.len(), 3);
    }
}
