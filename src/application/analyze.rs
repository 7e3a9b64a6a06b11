use crate::application::snapshot;
use crate::domain::entities::squad::Squad;
use crate::domain::error::DomainError;
use crate::domain::ports::player_catalog::PlayerCatalog;
use crate::domain::ports::squad_repository::SquadRepository;
use crate::domain::values::position::Position;
use crate::domain::values::units::round1;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

const STRONG_POINTS: f64 = 80.0;
const AVERAGE_POINTS: f64 = 60.0;
/// Points per unit of cost below which a weak position gets a suggestion.
const EFFICIENCY_FLOOR: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Strength {
    Strong,
    Average,
    Weak,
}

impl Strength {
    pub fn from_points(points: f64) -> Self {
        if points >= STRONG_POINTS {
            Strength::Strong
        } else if points >= AVERAGE_POINTS {
            Strength::Average
        } else {
            Strength::Weak
        }
    }
}

impl fmt::Display for Strength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Strength::Strong => "Strong",
            Strength::Average => "Average",
            Strength::Weak => "Weak",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PositionStats {
    pub position: String,
    pub player_count: usize,
    pub total_projected_points: f64,
    pub average_projected_points: f64,
    pub total_cost: f64,
    pub efficiency: f64,
}

impl PositionStats {
    fn of(squad: &Squad, position: Position) -> Self {
        let players = squad.players(position);
        let points: f64 = players.iter().map(|p| p.projected_points).sum();
        let cost: f64 = players.iter().map(|p| p.cost).sum();
        let average = if players.is_empty() {
            0.0
        } else {
            points / players.len() as f64
        };
        let efficiency = if players.is_empty() {
            0.0
        } else {
            ((points / cost.max(0.1)) * 100.0).round() / 100.0
        };
        Self {
            position: position.group_key().to_string(),
            player_count: players.len(),
            total_projected_points: round1(points),
            average_projected_points: round1(average),
            total_cost: round1(cost),
            efficiency,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SquadAnalysis {
    pub success: bool,
    pub current_formation: String,
    pub formation_recognised: bool,
    pub total_projected_points: f64,
    pub total_cost: f64,
    pub position_analysis: Vec<PositionStats>,
    pub overall_strength: Strength,
    pub strongest_positions: Vec<String>,
    pub weakest_positions: Vec<String>,
    pub improvement_suggestions: Vec<String>,
}

pub fn analyze(squad: &Squad) -> SquadAnalysis {
    let stats: Vec<PositionStats> = Position::ALL
        .into_iter()
        .map(|p| PositionStats::of(squad, p))
        .collect();

    // rank occupied groups only; stable sort keeps squad order on ties
    let mut ranked: Vec<&PositionStats> = stats.iter().filter(|s| s.player_count > 0).collect();
    ranked.sort_by(|a, b| {
        b.efficiency
            .partial_cmp(&a.efficiency)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    let strongest: Vec<String> = ranked.iter().take(2).map(|s| s.position.clone()).collect();
    let weakest: Vec<&PositionStats> = ranked.iter().skip(ranked.len().saturating_sub(2)).copied().collect();

    let suggestions = weakest
        .iter()
        .filter(|s| s.efficiency < EFFICIENCY_FLOOR)
        .map(|s| {
            format!(
                "Consider upgrading {} - current efficiency: {}",
                s.position, s.efficiency
            )
        })
        .collect();

    let total_points = squad.total_points();
    SquadAnalysis {
        success: true,
        current_formation: squad.formation().to_string(),
        formation_recognised: squad.formation().recognised,
        total_projected_points: total_points,
        total_cost: round1(squad.total_cost()),
        overall_strength: Strength::from_points(total_points),
        strongest_positions: strongest,
        weakest_positions: weakest.iter().map(|s| s.position.clone()).collect(),
        improvement_suggestions: suggestions,
        position_analysis: stats,
    }
}

pub struct AnalyzeUseCase {
    squads: Arc<dyn SquadRepository>,
    catalog: Arc<dyn PlayerCatalog>,
}

impl AnalyzeUseCase {
    pub fn new(squads: Arc<dyn SquadRepository>, catalog: Arc<dyn PlayerCatalog>) -> Self {
        Self { squads, catalog }
    }

    pub fn analyze(&self) -> Result<SquadAnalysis, DomainError> {
        let snap = snapshot::load(self.squads.as_ref(), self.catalog.as_ref())?;
        Ok(analyze(&snap.squad))
    }
}
