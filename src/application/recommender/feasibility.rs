//! Budget pre-filter applied to single swaps before the package search.
//!
//! The filter only removes swaps that cannot appear in any package within the
//! budget. A swap that costs more than the headroom may still be affordable
//! when other swaps in the same package free money, so each candidate is
//! judged against a baseline that already subtracts the largest savings the
//! rest of the package could contribute.

use std::collections::HashMap;

use tracing::debug;

use crate::domain::entities::swap::SwapCandidate;
use crate::domain::values::position::Position;
use crate::domain::values::units::{budget_units, cost_from_units, cost_units};

/// Whether `baseline + cost_difference` stays within `budget_constraint`.
pub fn is_admissible(candidate: &SwapCandidate, budget_constraint: f64, baseline: f64) -> bool {
    cost_units(baseline) + candidate.cost_difference_units() <= budget_units(budget_constraint)
}

/// Largest savings each squad member's replacement can free.
#[derive(Debug, Clone)]
pub struct SavingsBound {
    /// `(current player id, best saving in cost units)`, largest first.
    savings: Vec<(String, i64)>,
    other_swaps: usize,
}

impl SavingsBound {
    pub fn new<'a>(
        candidates: impl IntoIterator<Item = &'a SwapCandidate>,
        max_recommendations: usize,
    ) -> Self {
        let mut best: HashMap<&str, i64> = HashMap::new();
        let mut order: Vec<&str> = Vec::new();
        for c in candidates {
            let saving = (-c.cost_difference_units()).max(0);
            let id = c.current_player.id.as_str();
            match best.get_mut(id) {
                Some(b) => *b = (*b).max(saving),
                None => {
                    best.insert(id, saving);
                    order.push(id);
                }
            }
        }
        let mut savings: Vec<(String, i64)> = order
            .into_iter()
            .map(|id| (id.to_string(), best[id]))
            .filter(|(_, s)| *s > 0)
            .collect();
        savings.sort_by(|a, b| b.1.cmp(&a.1));
        Self {
            savings,
            other_swaps: max_recommendations.saturating_sub(1),
        }
    }

    /// Savings the other swaps of a package could free, in cost units.
    pub fn excluding(&self, current_id: &str) -> i64 {
        self.savings
            .iter()
            .filter(|(id, _)| id != current_id)
            .take(self.other_swaps)
            .map(|(_, s)| *s)
            .sum()
    }

    /// The running cost baseline a candidate is judged against.
    pub fn baseline(&self, current_total_cost: f64, candidate: &SwapCandidate) -> f64 {
        current_total_cost - cost_from_units(self.excluding(&candidate.current_player.id))
    }
}

/// Drop candidates that no package within the budget could contain.
pub fn filter_candidates(
    pools: Vec<(Position, Vec<SwapCandidate>)>,
    current_total_cost: f64,
    budget_constraint: f64,
    max_recommendations: usize,
) -> Vec<(Position, Vec<SwapCandidate>)> {
    let bound = SavingsBound::new(pools.iter().flat_map(|(_, c)| c.iter()), max_recommendations);

    pools
        .into_iter()
        .map(|(position, candidates)| {
            let before = candidates.len();
            let kept: Vec<SwapCandidate> = candidates
                .into_iter()
                .filter(|c| is_admissible(c, budget_constraint, bound.baseline(current_total_cost, c)))
                .collect();
            debug!(
                position = %position,
                before,
                kept = kept.len(),
                "feasibility filter"
            );
            (position, kept)
        })
        .collect()
}
