use serde::Serialize;

use crate::domain::entities::player::PlayerSummary;
use crate::domain::entities::squad::Squad;
use crate::domain::entities::swap::{Package, PackageStatus, SwapCandidate};
use crate::domain::values::formation::Formation;
use crate::domain::values::units::{budget_units, cost_units, round1};

#[derive(Debug, Clone, Serialize)]
pub struct RecommendedSwap {
    /// Squad group key, e.g. `defenders`.
    pub position: String,
    pub current_player: PlayerSummary,
    pub substitute: PlayerSummary,
    pub improvement: f64,
    pub cost_difference: f64,
    pub swap_description: String,
}

impl From<&SwapCandidate> for RecommendedSwap {
    fn from(c: &SwapCandidate) -> Self {
        Self {
            position: c.position.group_key().to_string(),
            current_player: c.current_player.summary(),
            substitute: c.substitute.summary(),
            improvement: round1(c.improvement),
            cost_difference: round1(c.cost_difference),
            swap_description: c.description(),
        }
    }
}

/// Post-hoc checks on the chosen package.
#[derive(Debug, Clone, Serialize)]
pub struct Verification {
    pub budget_respected: bool,
    pub formation_maintained: bool,
    pub substitution_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecommendationReport {
    pub success: bool,
    pub optimization_status: PackageStatus,
    pub current_formation: String,
    /// False when the squad shape matches no offered formation.
    pub formation_recognised: bool,
    pub current_total_points: f64,
    pub current_total_cost: f64,
    pub budget_constraint: f64,
    pub available_budget: f64,
    pub total_potential_improvement: f64,
    pub projected_new_total: f64,
    pub total_cost_change: f64,
    pub number_of_recommendations: usize,
    pub recommended_substitutes: Vec<RecommendedSwap>,
    pub verification: Verification,
}

/// Turn a package into the response clients render.
pub fn assemble(squad: &Squad, package: &Package, budget_constraint: f64) -> RecommendationReport {
    let current_total_points = squad.total_points();
    let current_total_cost = squad.total_cost();
    let improvement = package.total_improvement();
    let cost_change = package.total_cost_change();
    let new_cost_units = cost_units(current_total_cost) + package.total_cost_change_units();

    RecommendationReport {
        success: true,
        optimization_status: package.status,
        current_formation: squad.formation().to_string(),
        formation_recognised: squad.formation().recognised,
        current_total_points,
        current_total_cost: round1(current_total_cost),
        budget_constraint: round1(budget_constraint),
        available_budget: round1(budget_constraint - current_total_cost - cost_change),
        total_potential_improvement: round1(improvement),
        projected_new_total: round1(current_total_points + improvement),
        total_cost_change: round1(cost_change),
        number_of_recommendations: package.len(),
        recommended_substitutes: package.swaps.iter().map(RecommendedSwap::from).collect(),
        verification: Verification {
            budget_respected: new_cost_units <= budget_units(budget_constraint),
            formation_maintained: formation_after(squad, package) == Some(squad.formation()),
            substitution_count: package.len(),
        },
    }
}

fn formation_after(squad: &Squad, package: &Package) -> Option<Formation> {
    let mut after = squad.clone();
    for swap in &package.swaps {
        after
            .replace(swap.position, &swap.current_player.name, swap.substitute.clone())
            .ok()?;
    }
    Some(after.formation())
}
