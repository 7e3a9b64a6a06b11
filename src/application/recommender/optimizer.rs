//! Exact package search.
//!
//! Choosing swaps is a knapsack with exclusivity groups: every squad member
//! is replaced at most once, every substitute is used at most once, the
//! package holds at most `max_recommendations` swaps, and the post-swap squad
//! cost may not exceed the budget cap. Costs (0.1 units) and points (0.01
//! units) are scaled to integers and the search is a bounded dynamic program:
//!
//! 1. Per position, for each subset of removable squad members, a knapsack
//!    over the substitute pool (highest projections first) finds the best
//!    point gain for each substitute cost. A set of substitutes can replace a
//!    set of members exactly when, both sorted by projection, each substitute
//!    out-projects the member it is paired with, so the pairing never needs
//!    to be searched. The per-position results are reduced to their Pareto
//!    frontier (cheaper or better).
//! 2. Positions are combined over `(swaps used, cost delta)` states, again
//!    keeping only undominated states.
//!
//! Ties in total improvement go to the cheaper package; remaining ties go to
//! the first state reached, which makes the output a pure function of the
//! input order.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashSet};
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::application::recommender::cancel::CancelFlag;
use crate::domain::entities::player::Player;
use crate::domain::entities::swap::{Package, PackageStatus, SwapCandidate};
use crate::domain::error::DomainError;
use crate::domain::values::position::Position;
use crate::domain::values::units::{budget_units, cost_units, point_units};

/// Squad groups larger than this are rejected as invalid input instead of
/// enumerated.
const MAX_GROUP_SIZE: usize = 16;

/// How often (in search steps) the deadline is re-read.
const CLOCK_INTERVAL: u64 = 256;

#[derive(Debug, Clone, Default)]
pub struct SolverConfig {
    /// Abort with a solver failure once the search has run this long.
    pub time_limit: Option<Duration>,
}

pub struct Optimizer {
    config: SolverConfig,
}

#[derive(Debug, Clone, Copy)]
struct Unit {
    cost: i64,
    points: i64,
}

impl Unit {
    fn of(player: &Player) -> Self {
        Self {
            cost: cost_units(player.cost),
            points: point_units(player.projected_points),
        }
    }
}

/// One way to handle a position: which members leave and which substitutes
/// arrive (indexes into the pool, `removed[i]` pairs with `added[i]`).
#[derive(Debug, Clone)]
struct PositionChoice {
    cost: i64,
    value: i64,
    removed: Vec<usize>,
    added: Vec<usize>,
}

impl PositionChoice {
    fn keep() -> Self {
        Self {
            cost: 0,
            value: 0,
            removed: Vec::new(),
            added: Vec::new(),
        }
    }
}

/// Distinct members and substitutes of one position, best projection first.
struct PositionPool<'a> {
    position: Position,
    currents: Vec<&'a Player>,
    subs: Vec<&'a Player>,
}

impl<'a> PositionPool<'a> {
    fn from_candidates(position: Position, candidates: &'a [SwapCandidate]) -> Self {
        let mut seen_current = HashSet::new();
        let mut seen_sub = HashSet::new();
        let mut currents = Vec::new();
        let mut subs = Vec::new();
        for c in candidates {
            if seen_current.insert(c.current_player.id.as_str()) {
                currents.push(&c.current_player);
            }
            if seen_sub.insert(c.substitute.id.as_str()) {
                subs.push(&c.substitute);
            }
        }
        // stable sorts: equal projections keep candidate order
        currents.sort_by_key(|p| std::cmp::Reverse(point_units(p.projected_points)));
        subs.sort_by_key(|p| std::cmp::Reverse(point_units(p.projected_points)));
        Self {
            position,
            currents,
            subs,
        }
    }
}

struct SearchGuard<'a> {
    cancel: &'a CancelFlag,
    deadline: Option<Instant>,
    steps: u64,
}

impl<'a> SearchGuard<'a> {
    fn new(cancel: &'a CancelFlag, time_limit: Option<Duration>) -> Self {
        Self {
            cancel,
            deadline: time_limit.map(|d| Instant::now() + d),
            steps: 0,
        }
    }

    fn tick(&mut self) -> Result<(), DomainError> {
        if self.cancel.is_cancelled() {
            return Err(DomainError::Cancelled);
        }
        self.steps += 1;
        if self.steps % CLOCK_INTERVAL == 0 {
            if let Some(deadline) = self.deadline {
                if Instant::now() >= deadline {
                    return Err(DomainError::Solver(
                        "optimizer exceeded its time limit".into(),
                    ));
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
struct Plan {
    value: i64,
    /// `(swaps, choice index)` for each position combined so far.
    parts: Vec<(usize, usize)>,
}

impl Optimizer {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    /// Pick the package with the largest total improvement.
    ///
    /// `pools` holds the filtered candidates of each position. Returns an
    /// empty package with status `NoFeasiblePackage` when no non-empty
    /// package fits; errors only on cancellation or solver failure.
    pub fn solve(
        &self,
        pools: &[(Position, Vec<SwapCandidate>)],
        current_total_cost: f64,
        max_recommendations: usize,
        budget_constraint: f64,
        cancel: &CancelFlag,
    ) -> Result<Package, DomainError> {
        let mut guard = SearchGuard::new(cancel, self.config.time_limit);
        guard.tick()?;

        let headroom = budget_units(budget_constraint) - cost_units(current_total_cost);
        let pools: Vec<PositionPool> = pools
            .iter()
            .filter(|(_, candidates)| !candidates.is_empty())
            .map(|(position, candidates)| PositionPool::from_candidates(*position, candidates))
            .collect();

        let max_swaps = max_recommendations.min(pools.iter().map(|p| p.currents.len()).sum());
        if max_swaps == 0 {
            debug!(max_recommendations, "nothing to search");
            return Ok(Package::empty());
        }

        let mut frontiers = Vec::with_capacity(pools.len());
        for pool in &pools {
            let frontier = position_frontier(pool, max_swaps, &mut guard)?;
            debug!(
                position = %pool.position,
                members = pool.currents.len(),
                substitutes = pool.subs.len(),
                choices = frontier.iter().map(Vec::len).sum::<usize>(),
                "position frontier"
            );
            frontiers.push(frontier);
        }

        let states = combine(&frontiers, max_swaps, headroom, &mut guard)?;

        let mut best: Option<(i64, &Plan)> = None;
        for (&(used, cost), plan) in &states {
            if used == 0 || cost > headroom {
                continue;
            }
            let better = match best {
                None => true,
                Some((best_cost, best_plan)) => {
                    plan.value > best_plan.value
                        || (plan.value == best_plan.value && cost < best_cost)
                }
            };
            if better {
                best = Some((cost, plan));
            }
        }

        let Some((_, plan)) = best else {
            info!(headroom, "no feasible package");
            return Ok(Package::empty());
        };

        let mut swaps = Vec::new();
        for (pi, &(count, ci)) in plan.parts.iter().enumerate() {
            let choice = &frontiers[pi][count][ci];
            let pool = &pools[pi];
            for (&cur, &sub) in choice.removed.iter().zip(&choice.added) {
                swaps.push(SwapCandidate::new(
                    pool.currents[cur].clone(),
                    pool.subs[sub].clone(),
                ));
            }
        }

        let package = Package {
            swaps,
            status: PackageStatus::Optimal,
        };
        if package.total_cost_change_units() > headroom || package.len() > max_recommendations {
            return Err(DomainError::Solver(
                "optimizer produced an inconsistent package".into(),
            ));
        }
        info!(
            swaps = package.len(),
            improvement = package.total_improvement(),
            cost_change = package.total_cost_change(),
            "package selected"
        );
        Ok(package)
    }
}

/// Undominated choices for one position, indexed by number of swaps and
/// ordered by cost (cheapest first, value strictly increasing).
fn position_frontier(
    pool: &PositionPool,
    max_swaps: usize,
    guard: &mut SearchGuard,
) -> Result<Vec<Vec<PositionChoice>>, DomainError> {
    let currents: Vec<Unit> = pool.currents.iter().map(|p| Unit::of(p)).collect();
    let subs: Vec<Unit> = pool.subs.iter().map(|p| Unit::of(p)).collect();
    let m = currents.len();
    if m > MAX_GROUP_SIZE {
        return Err(DomainError::InvalidInput(format!(
            "{} group has {m} players, more than the {MAX_GROUP_SIZE} the search supports",
            pool.position.group_key()
        )));
    }

    let limit = max_swaps.min(m).min(subs.len());
    let mut best: Vec<BTreeMap<i64, PositionChoice>> = vec![BTreeMap::new(); limit + 1];
    best[0].insert(0, PositionChoice::keep());

    for mask in 1u32..(1u32 << m) {
        let removed: Vec<usize> = (0..m).filter(|i| mask & (1 << i) != 0).collect();
        let r = removed.len();
        if r > limit {
            continue;
        }
        guard.tick()?;

        // members are sorted by projection, so thresholds are descending
        let thresholds: Vec<i64> = removed.iter().map(|&i| currents[i].points).collect();
        let removed_cost: i64 = removed.iter().map(|&i| currents[i].cost).sum();
        let removed_points: i64 = thresholds.iter().sum();

        for (sub_cost, (sub_points, picks)) in fill_slots(&subs, &thresholds, guard)? {
            let choice = PositionChoice {
                cost: sub_cost - removed_cost,
                value: sub_points - removed_points,
                removed: removed.clone(),
                added: picks,
            };
            match best[r].entry(choice.cost) {
                Entry::Vacant(e) => {
                    e.insert(choice);
                }
                Entry::Occupied(mut e) => {
                    if choice.value > e.get().value {
                        e.insert(choice);
                    }
                }
            }
        }
    }

    Ok(best.into_iter().map(pareto).collect())
}

/// Best substitute point totals for filling every vacated slot, keyed by the
/// substitutes' summed cost. Slot `t` needs a substitute out-projecting
/// `thresholds[t]`; substitutes are taken in descending projection order.
fn fill_slots(
    subs: &[Unit],
    thresholds: &[i64],
    guard: &mut SearchGuard,
) -> Result<BTreeMap<i64, (i64, Vec<usize>)>, DomainError> {
    let r = thresholds.len();
    let weakest = thresholds[r - 1];
    let mut layers: Vec<BTreeMap<i64, (i64, Vec<usize>)>> = vec![BTreeMap::new(); r + 1];
    layers[0].insert(0, (0, Vec::new()));

    for (si, sub) in subs.iter().enumerate() {
        if sub.points <= weakest {
            break;
        }
        guard.tick()?;
        for t in (0..r).rev() {
            if sub.points <= thresholds[t] || layers[t].is_empty() {
                continue;
            }
            let moves: Vec<(i64, i64, Vec<usize>)> = layers[t]
                .iter()
                .map(|(cost, (points, picks))| {
                    let mut picks = picks.clone();
                    picks.push(si);
                    (cost + sub.cost, points + sub.points, picks)
                })
                .collect();
            for (cost, points, picks) in moves {
                match layers[t + 1].entry(cost) {
                    Entry::Vacant(e) => {
                        e.insert((points, picks));
                    }
                    Entry::Occupied(mut e) => {
                        if points > e.get().0 {
                            e.insert((points, picks));
                        }
                    }
                }
            }
        }
    }

    Ok(layers.pop().unwrap_or_default())
}

fn pareto(choices: BTreeMap<i64, PositionChoice>) -> Vec<PositionChoice> {
    let mut out = Vec::new();
    let mut best = i64::MIN;
    for (_, choice) in choices {
        if choice.value > best {
            best = choice.value;
            out.push(choice);
        }
    }
    out
}

fn combine(
    frontiers: &[Vec<Vec<PositionChoice>>],
    max_swaps: usize,
    headroom: i64,
    guard: &mut SearchGuard,
) -> Result<BTreeMap<(usize, i64), Plan>, DomainError> {
    // most money each remaining position could still free
    let mut still_free = vec![0i64; frontiers.len() + 1];
    for (i, frontier) in frontiers.iter().enumerate().rev() {
        let saving = frontier
            .iter()
            .flatten()
            .map(|c| -c.cost)
            .max()
            .unwrap_or(0)
            .max(0);
        still_free[i] = still_free[i + 1] + saving;
    }

    let mut states: BTreeMap<(usize, i64), Plan> = BTreeMap::new();
    states.insert(
        (0, 0),
        Plan {
            value: 0,
            parts: Vec::new(),
        },
    );

    for (pi, frontier) in frontiers.iter().enumerate() {
        let mut next: BTreeMap<(usize, i64), Plan> = BTreeMap::new();
        for (&(used, cost), plan) in &states {
            guard.tick()?;
            for (count, choices) in frontier.iter().enumerate() {
                if used + count > max_swaps {
                    break;
                }
                for (ci, choice) in choices.iter().enumerate() {
                    let new_cost = cost + choice.cost;
                    // choices are cost-ordered: the rest cannot come back under the cap either
                    if new_cost - still_free[pi + 1] > headroom {
                        break;
                    }
                    let value = plan.value + choice.value;
                    let key = (used + count, new_cost);
                    if next.get(&key).map_or(true, |p| value > p.value) {
                        let mut parts = plan.parts.clone();
                        parts.push((count, ci));
                        next.insert(key, Plan { value, parts });
                    }
                }
            }
        }
        states = prune(next);
    }

    Ok(states)
}

/// Keep, for each swap count, only states that beat every cheaper state.
fn prune(states: BTreeMap<(usize, i64), Plan>) -> BTreeMap<(usize, i64), Plan> {
    let mut out = BTreeMap::new();
    let mut current_used = usize::MAX;
    let mut best = i64::MIN;
    for ((used, cost), plan) in states {
        if used != current_used {
            current_used = used;
            best = i64::MIN;
        }
        if plan.value > best {
            best = plan.value;
            out.insert((used, cost), plan);
        }
    }
    out
}
