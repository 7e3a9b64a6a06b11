//! Greedy one-for-one upgrades, as opposed to the package search.

use crate::application::recommender::assembler::RecommendedSwap;
use crate::application::snapshot;
use crate::domain::entities::player::{Player, PlayerSummary};
use crate::domain::entities::squad::Squad;
use crate::domain::entities::swap::SwapCandidate;
use crate::domain::error::DomainError;
use crate::domain::ports::player_catalog::PlayerCatalog;
use crate::domain::ports::squad_repository::SquadRepository;
use crate::domain::values::position::Position;
use crate::domain::values::units::{
    budget_units, cost_from_units, cost_units, point_units, points_from_units, round1,
};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;

pub const DEFAULT_INDIVIDUAL_BUDGET: f64 = 82.5;

/// How close a cheaper alternative must be to count as similar.
#[derive(Debug, Clone, Copy)]
pub struct SimilarityThresholds {
    /// Most projected points the alternative may give up.
    pub point_threshold: f64,
    /// Least it must save.
    pub min_cost_saving: f64,
}

impl Default for SimilarityThresholds {
    fn default() -> Self {
        Self {
            point_threshold: 1.0,
            min_cost_saving: 1.0,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CheaperAlternative {
    pub position: String,
    pub current_player: PlayerSummary,
    pub cheaper_player: PlayerSummary,
    pub point_difference: f64,
    pub cost_saving: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct IndividualReport {
    pub success: bool,
    pub budget_constraint: f64,
    pub individual_recommendations: Vec<RecommendedSwap>,
    pub cheaper_similar_recommendations: Vec<CheaperAlternative>,
    pub total_cost_change: f64,
    pub count: usize,
}

/// Walk the squad in order and give each member its best affordable upgrade.
///
/// The running squad cost includes every upgrade picked so far, and a
/// substitute picked for one member is not offered to the next.
pub fn recommend_individual(
    squad: &Squad,
    catalog: &[Player],
    budget_constraint: f64,
    thresholds: SimilarityThresholds,
) -> IndividualReport {
    let cap = budget_units(budget_constraint);
    let mut running = cost_units(squad.total_cost());
    let mut used: HashSet<&str> = HashSet::new();
    let mut picks = Vec::new();
    let mut cheaper = Vec::new();
    let mut change = 0i64;

    for position in Position::ALL {
        let available: Vec<&Player> = catalog
            .iter()
            .filter(|p| p.position == position && !squad.contains(p))
            .collect();

        for current in squad.players(position) {
            let current_points = point_units(current.projected_points);
            let mut best: Option<&Player> = None;
            let mut best_gain = 0i64;
            for &sub in &available {
                if used.contains(sub.id.as_str()) {
                    continue;
                }
                let gain = point_units(sub.projected_points) - current_points;
                let diff = cost_units(sub.cost) - cost_units(current.cost);
                if gain > best_gain && running + diff <= cap {
                    best = Some(sub);
                    best_gain = gain;
                }
            }
            if let Some(sub) = best {
                let candidate = SwapCandidate::new(current.clone(), sub.clone());
                let diff = candidate.cost_difference_units();
                running += diff;
                change += diff;
                used.insert(sub.id.as_str());
                picks.push(RecommendedSwap::from(&candidate));
            }

            cheaper.extend(cheaper_similar(current, &available, thresholds));
        }
    }

    IndividualReport {
        success: true,
        budget_constraint: round1(budget_constraint),
        count: picks.len(),
        individual_recommendations: picks,
        cheaper_similar_recommendations: cheaper,
        total_cost_change: round1(cost_from_units(change)),
    }
}

/// Non-squad players slightly worse than `current` but meaningfully cheaper.
pub fn cheaper_similar(
    current: &Player,
    available: &[&Player],
    thresholds: SimilarityThresholds,
) -> Vec<CheaperAlternative> {
    let max_drop = point_units(thresholds.point_threshold);
    let min_saving = cost_units(thresholds.min_cost_saving);
    available
        .iter()
        .filter_map(|p| {
            let drop = point_units(current.projected_points) - point_units(p.projected_points);
            let saving = cost_units(current.cost) - cost_units(p.cost);
            (drop > 0 && drop <= max_drop && saving >= min_saving).then(|| CheaperAlternative {
                position: current.position.group_key().to_string(),
                current_player: current.summary(),
                cheaper_player: p.summary(),
                point_difference: round1(points_from_units(drop)),
                cost_saving: round1(cost_from_units(saving)),
            })
        })
        .collect()
}

pub struct IndividualUseCase {
    squads: Arc<dyn SquadRepository>,
    catalog: Arc<dyn PlayerCatalog>,
}

impl IndividualUseCase {
    pub fn new(squads: Arc<dyn SquadRepository>, catalog: Arc<dyn PlayerCatalog>) -> Self {
        Self { squads, catalog }
    }

    pub fn recommend(&self, budget_constraint: f64) -> Result<IndividualReport, DomainError> {
        if !budget_constraint.is_finite() || budget_constraint < 0.0 {
            return Err(DomainError::InvalidInput(
                "budget_constraint must be a non-negative number".into(),
            ));
        }
        let snap = snapshot::load(self.squads.as_ref(), self.catalog.as_ref())?;
        Ok(recommend_individual(
            &snap.squad,
            &snap.catalog,
            budget_constraint,
            SimilarityThresholds::default(),
        ))
    }
}
