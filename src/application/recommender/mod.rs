//! Package recommendation: candidates, budget pre-filter, exact search, report.

pub mod assembler;
pub mod cancel;
pub mod candidates;
pub mod feasibility;
pub mod optimizer;

use std::sync::Arc;

use serde_json::Value;
use tracing::info;

use crate::application::snapshot;
use crate::domain::entities::player::Player;
use crate::domain::entities::squad::Squad;
use crate::domain::entities::swap::Package;
use crate::domain::error::DomainError;
use crate::domain::ports::player_catalog::PlayerCatalog;
use crate::domain::ports::squad_repository::SquadRepository;

use self::assembler::{assemble, RecommendationReport};
use self::cancel::CancelFlag;
use self::optimizer::{Optimizer, SolverConfig};

pub const DEFAULT_MAX_RECOMMENDATIONS: usize = 4;
pub const DEFAULT_BUDGET_CONSTRAINT: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecommendRequest {
    pub max_recommendations: usize,
    /// Absolute cap on the post-swap squad cost.
    pub budget_constraint: f64,
}

impl Default for RecommendRequest {
    fn default() -> Self {
        Self {
            max_recommendations: DEFAULT_MAX_RECOMMENDATIONS,
            budget_constraint: DEFAULT_BUDGET_CONSTRAINT,
        }
    }
}

impl RecommendRequest {
    pub fn new(max_recommendations: i64, budget_constraint: f64) -> Result<Self, DomainError> {
        if max_recommendations < 0 {
            return Err(DomainError::InvalidInput(
                "max_recommendations must be a non-negative integer".into(),
            ));
        }
        if !budget_constraint.is_finite() || budget_constraint < 0.0 {
            return Err(DomainError::InvalidInput(
                "budget_constraint must be a non-negative number".into(),
            ));
        }
        Ok(Self {
            max_recommendations: max_recommendations as usize,
            budget_constraint,
        })
    }

    /// Read a request body. Missing or null fields take their defaults;
    /// numeric strings are accepted the way form-encoded clients send them.
    pub fn from_value(body: &Value) -> Result<Self, DomainError> {
        let max = match body.get("max_recommendations") {
            None | Some(Value::Null) => DEFAULT_MAX_RECOMMENDATIONS as i64,
            Some(v) => integer_field(v).ok_or_else(|| {
                DomainError::InvalidInput("max_recommendations must be a non-negative integer".into())
            })?,
        };
        let budget = budget_field(body, DEFAULT_BUDGET_CONSTRAINT)?;
        Self::new(max, budget)
    }
}

/// `budget_constraint` from a request body, or `default` when absent.
pub fn budget_field(body: &Value, default: f64) -> Result<f64, DomainError> {
    let budget = match body.get("budget_constraint") {
        None | Some(Value::Null) => default,
        Some(v) => number_field(v).ok_or_else(|| {
            DomainError::InvalidInput("budget_constraint must be a non-negative number".into())
        })?,
    };
    if !budget.is_finite() || budget < 0.0 {
        return Err(DomainError::InvalidInput(
            "budget_constraint must be a non-negative number".into(),
        ));
    }
    Ok(budget)
}

fn number_field(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn integer_field(v: &Value) -> Option<i64> {
    if let Some(i) = v.as_i64() {
        return Some(i);
    }
    if let Value::String(s) = v {
        return s.trim().parse().ok();
    }
    // 3.0 is an integer, 3.5 is not
    let f = v.as_f64()?;
    (f.fract() == 0.0 && f.abs() < i64::MAX as f64).then_some(f as i64)
}

/// Run candidate generation, the budget filter and the search over one
/// squad/catalog pair. Neither input is modified.
pub fn plan_package(
    squad: &Squad,
    catalog: &[Player],
    request: &RecommendRequest,
    optimizer: &Optimizer,
    cancel: &CancelFlag,
) -> Result<Package, DomainError> {
    let current_total_cost = squad.total_cost();
    let pools = candidates::generate_all(squad, catalog);
    let pools = feasibility::filter_candidates(
        pools,
        current_total_cost,
        request.budget_constraint,
        request.max_recommendations,
    );
    optimizer.solve(
        &pools,
        current_total_cost,
        request.max_recommendations,
        request.budget_constraint,
        cancel,
    )
}

pub struct RecommendUseCase {
    squads: Arc<dyn SquadRepository>,
    catalog: Arc<dyn PlayerCatalog>,
    optimizer: Optimizer,
}

impl RecommendUseCase {
    pub fn new(
        squads: Arc<dyn SquadRepository>,
        catalog: Arc<dyn PlayerCatalog>,
        config: SolverConfig,
    ) -> Self {
        Self {
            squads,
            catalog,
            optimizer: Optimizer::new(config),
        }
    }

    pub fn recommend(
        &self,
        request: &RecommendRequest,
        cancel: &CancelFlag,
    ) -> Result<RecommendationReport, DomainError> {
        let snap = snapshot::load(self.squads.as_ref(), self.catalog.as_ref())?;
        info!(
            squad_size = snap.squad.len(),
            catalog_size = snap.catalog.len(),
            max_recommendations = request.max_recommendations,
            budget_constraint = request.budget_constraint,
            "recommending substitutes"
        );
        let package = plan_package(&snap.squad, &snap.catalog, request, &self.optimizer, cancel)?;
        Ok(assemble(&snap.squad, &package, request.budget_constraint))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_defaults() {
        let r = RecommendRequest::from_value(&json!({})).unwrap();
        assert_eq!(r, RecommendRequest::default());
        let r = RecommendRequest::from_value(&json!({"max_recommendations": null})).unwrap();
        assert_eq!(r.max_recommendations, 4);
    }

    #[test]
    fn test_request_accepts_numeric_strings() {
        let r = RecommendRequest::from_value(&json!({"max_recommendations": "2", "budget_constraint": "82.5"}))
            .unwrap();
        assert_eq!(r.max_recommendations, 2);
        assert_eq!(r.budget_constraint, 82.5);
        let r = RecommendRequest::from_value(&json!({"max_recommendations": 3.0})).unwrap();
        assert_eq!(r.max_recommendations, 3);
    }

    #[test]
    fn test_request_rejects_bad_input() {
        for body in [
            json!({"max_recommendations": -1}),
            json!({"max_recommendations": 2.5}),
            json!({"max_recommendations": "many"}),
            json!({"max_recommendations": [1]}),
            json!({"budget_constraint": -0.1}),
            json!({"budget_constraint": "lots"}),
            json!({"budget_constraint": true}),
        ] {
            let err = RecommendRequest::from_value(&body).unwrap_err();
            assert!(matches!(err, DomainError::InvalidInput(_)), "{body}");
        }
    }
}
