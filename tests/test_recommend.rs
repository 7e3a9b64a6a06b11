mod common;

use common::*;
use squadrec::application::recommender::cancel::CancelFlag;
use squadrec::application::recommender::candidates::generate_all;
use squadrec::application::recommender::optimizer::{Optimizer, SolverConfig};
use squadrec::application::recommender::{plan_package, RecommendRequest};
use squadrec::domain::entities::player::Player;
use squadrec::domain::entities::squad::Squad;
use squadrec::domain::entities::swap::{Package, PackageStatus, SwapCandidate};
use squadrec::domain::ports::squad_repository::SquadMember;
use squadrec::domain::values::position::Position;
use squadrec::domain::values::units::{budget_units, cost_units, point_units};
use squadrec::SquadRec;
use std::collections::HashSet;

struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0 >> 33
    }

    fn range(&mut self, lo: u64, hi: u64) -> u64 {
        lo + self.next() % (hi - lo + 1)
    }
}

struct Instance {
    squad: Squad,
    catalog: Vec<Player>,
}

fn random_instance(rng: &mut Lcg) -> Instance {
    let mut squad = Squad::default();
    let mut catalog = Vec::new();
    let mut n = 0;
    for position in Position::ALL {
        for _ in 0..rng.range(0, 3) {
            let p = player(
                &format!("Cur{n}"),
                position,
                rng.range(40, 100) as f64 / 10.0,
                rng.range(10, 90) as f64 / 10.0,
            );
            n += 1;
            squad.add(p.clone()).unwrap();
            catalog.push(p);
        }
        for _ in 0..rng.range(0, 3) {
            catalog.push(player(
                &format!("Sub{n}"),
                position,
                rng.range(40, 100) as f64 / 10.0,
                rng.range(10, 90) as f64 / 10.0,
            ));
            n += 1;
        }
    }
    Instance { squad, catalog }
}

fn value_units(package: &Package) -> i64 {
    package
        .swaps
        .iter()
        .map(|s| point_units(s.substitute.projected_points) - point_units(s.current_player.projected_points))
        .sum()
}

/// Best `(value, cost)` over every non-empty valid package, by exhaustive search.
fn brute_force(candidates: &[SwapCandidate], headroom: i64, k: usize) -> Option<(i64, i64)> {
    fn walk(
        candidates: &[SwapCandidate],
        start: usize,
        left: usize,
        currents: &mut Vec<String>,
        subs: &mut Vec<String>,
        value: i64,
        cost: i64,
        headroom: i64,
        best: &mut Option<(i64, i64)>,
    ) {
        if !currents.is_empty() && cost <= headroom {
            let better = match best {
                None => true,
                Some((v, c)) => value > *v || (value == *v && cost < *c),
            };
            if better {
                *best = Some((value, cost));
            }
        }
        if left == 0 {
            return;
        }
        for i in start..candidates.len() {
            let c = &candidates[i];
            if currents.contains(&c.current_player.id) || subs.contains(&c.substitute.id) {
                continue;
            }
            currents.push(c.current_player.id.clone());
            subs.push(c.substitute.id.clone());
            walk(
                candidates,
                i + 1,
                left - 1,
                currents,
                subs,
                value + point_units(c.substitute.projected_points)
                    - point_units(c.current_player.projected_points),
                cost + c.cost_difference_units(),
                headroom,
                best,
            );
            currents.pop();
            subs.pop();
        }
    }

    let mut best = None;
    walk(candidates, 0, k, &mut vec![], &mut vec![], 0, 0, headroom, &mut best);
    best
}

fn solve(instance: &Instance, max: usize, budget: f64) -> Package {
    let request = RecommendRequest {
        max_recommendations: max,
        budget_constraint: budget,
    };
    plan_package(
        &instance.squad,
        &instance.catalog,
        &request,
        &Optimizer::new(SolverConfig::default()),
        &CancelFlag::new(),
    )
    .unwrap()
}

fn assert_valid(instance: &Instance, package: &Package, max: usize, budget: f64) {
    assert!(package.len() <= max);
    let currents: HashSet<&str> = package.swaps.iter().map(|s| s.current_player.id.as_str()).collect();
    let subs: HashSet<&str> = package.swaps.iter().map(|s| s.substitute.id.as_str()).collect();
    assert_eq!(currents.len(), package.len(), "current players must be distinct");
    assert_eq!(subs.len(), package.len(), "substitutes must be distinct");
    for s in &package.swaps {
        assert_eq!(s.current_player.position, s.substitute.position);
        assert!(instance.squad.contains(&s.current_player));
        assert!(!instance.squad.contains(&s.substitute));
    }
    assert!(
        cost_units(instance.squad.total_cost()) + package.total_cost_change_units() <= budget_units(budget)
            || package.is_empty()
    );
}

#[test]
fn test_matches_exhaustive_search() {
    let mut rng = Lcg(7);
    for round in 0..120 {
        let instance = random_instance(&mut rng);
        let max = rng.range(0, 4) as usize;
        let budget = (cost_units(instance.squad.total_cost()) as f64 + rng.range(0, 60) as f64 - 30.0) / 10.0;
        let budget = budget.max(0.0);

        let package = solve(&instance, max, budget);
        assert_valid(&instance, &package, max, budget);

        let candidates: Vec<SwapCandidate> = generate_all(&instance.squad, &instance.catalog)
            .into_iter()
            .flat_map(|(_, c)| c)
            .collect();
        let headroom = budget_units(budget) - cost_units(instance.squad.total_cost());
        match brute_force(&candidates, headroom, max) {
            None => {
                assert!(package.is_empty(), "round {round}");
                assert_eq!(package.status, PackageStatus::NoFeasiblePackage);
            }
            Some((value, cost)) => {
                assert_eq!(value_units(&package), value, "round {round}");
                assert_eq!(package.total_cost_change_units(), cost, "round {round}: cheaper tie exists");
                assert_eq!(package.status, PackageStatus::Optimal);
            }
        }
    }
}

#[test]
fn test_monotone_in_budget() {
    let mut rng = Lcg(99);
    for _ in 0..60 {
        let instance = random_instance(&mut rng);
        let max = rng.range(1, 4) as usize;
        let base = instance.squad.total_cost();
        let mut last = 0;
        for delta in [-3.0, -1.0, 0.0, 1.5, 4.0, 10.0] {
            let budget = (base + delta).max(0.0);
            let value = value_units(&solve(&instance, max, budget));
            assert!(value >= last, "raising the budget lowered the improvement");
            last = value;
        }
    }
}

#[test]
fn test_deterministic_and_non_mutating() {
    let mut rng = Lcg(2024);
    for _ in 0..20 {
        let instance = random_instance(&mut rng);
        let squad_before = instance.squad.clone();
        let catalog_before = instance.catalog.clone();
        let budget = instance.squad.total_cost() + 5.0;

        let first = solve(&instance, 3, budget);
        let second = solve(&instance, 3, budget);
        assert_eq!(first, second);
        assert_eq!(instance.squad, squad_before);
        assert_eq!(instance.catalog, catalog_before);
    }
}

#[test]
fn test_cardinality_respected() {
    let app = seeded();
    for max in 0..=5 {
        let request = RecommendRequest::new(max, 100.0).unwrap();
        let report = app.recommend(&request, &CancelFlag::new()).unwrap();
        assert!(report.number_of_recommendations <= max as usize);
        assert_eq!(report.recommended_substitutes.len(), report.number_of_recommendations);
        assert!(report.verification.budget_respected);
        assert!(report.verification.formation_maintained);
    }
}

#[test]
fn test_zero_max_returns_empty_package() {
    let app = seeded();
    let request = RecommendRequest::new(0, 100.0).unwrap();
    let report = app.recommend(&request, &CancelFlag::new()).unwrap();
    assert!(report.success);
    assert_eq!(report.number_of_recommendations, 0);
    assert_eq!(report.total_potential_improvement, 0.0);
    assert_eq!(report.projected_new_total, report.current_total_points);
}

#[test]
fn test_seeded_report_totals() {
    let app = seeded();
    let report = app
        .recommend(&RecommendRequest::default(), &CancelFlag::new())
        .unwrap();
    assert!(report.success);
    assert_eq!(report.current_total_cost, 74.0);
    assert_eq!(report.current_total_points, 48.3);
    assert_eq!(report.current_formation, "4-4-2");
    assert_eq!(report.number_of_recommendations, 4);
    assert_eq!(report.optimization_status, PackageStatus::Optimal);

    // both forwards, Palmer for Rice, Trippier for Timber
    assert_eq!(report.total_potential_improvement, 12.0);
    assert_eq!(report.total_cost_change, 16.5);
    assert_eq!(report.projected_new_total, 60.3);
    assert_eq!(report.available_budget, 9.5);
    assert!(report.verification.budget_respected);
    for swap in &report.recommended_substitutes {
        assert!(swap.improvement > 0.0);
        assert!(swap.swap_description.starts_with("Replace "));
    }
}

fn squad_from(app: &SquadRec, squad: &[(&str, Position, f64, f64)], others: &[(&str, Position, f64, f64)]) {
    let rows = squad
        .iter()
        .chain(others.iter())
        .map(|(n, p, c, pts)| import(n, *p, *c, *pts))
        .collect();
    app.import_players(rows).unwrap();
    let members: Vec<SquadMember> = squad
        .iter()
        .map(|(n, p, _, _)| SquadMember {
            position: *p,
            player_name: n.to_string(),
        })
        .collect();
    app.replace_squad(&members).unwrap();
}

const EXPENSIVE_SQUAD: [(&str, Position, f64, f64); 5] = [
    ("Keeper", Position::Goalkeeper, 12.5, 3.0),
    ("Back", Position::Defender, 20.0, 4.0),
    ("Middle", Position::Midfielder, 20.0, 5.0),
    ("Wing", Position::Midfielder, 20.0, 5.0),
    ("Front", Position::Forward, 20.0, 6.0),
];

#[test]
fn test_over_budget_squad_without_big_saving_is_empty() {
    // 92.5 squad under an 82.5 cap: every package must free 10.0
    let app = setup();
    squad_from(
        &app,
        &EXPENSIVE_SQUAD,
        &[
            ("Keeper2", Position::Goalkeeper, 10.0, 3.5),
            ("Back2", Position::Defender, 18.0, 4.5),
            ("Front2", Position::Forward, 21.0, 7.0),
        ],
    );
    let request = RecommendRequest::new(4, 82.5).unwrap();
    let report = app.recommend(&request, &CancelFlag::new()).unwrap();
    assert_eq!(report.current_total_cost, 92.5);
    assert!(report.success);
    assert_eq!(report.number_of_recommendations, 0);
    assert_eq!(report.total_potential_improvement, 0.0);
    assert_eq!(report.optimization_status, PackageStatus::NoFeasiblePackage);
}

#[test]
fn test_over_budget_squad_with_enough_savings() {
    let app = setup();
    squad_from(
        &app,
        &EXPENSIVE_SQUAD,
        &[
            ("Keeper2", Position::Goalkeeper, 10.0, 3.5),
            ("Back2", Position::Defender, 12.0, 4.5),
        ],
    );
    // 2.5 + 8.0 = 10.5 saved, only together
    let request = RecommendRequest::new(4, 82.5).unwrap();
    let report = app.recommend(&request, &CancelFlag::new()).unwrap();
    assert_eq!(report.number_of_recommendations, 2);
    assert_eq!(report.total_cost_change, -10.5);
    assert_eq!(report.total_potential_improvement, 1.0);
    assert!(report.verification.budget_respected);

    let request = RecommendRequest::new(1, 82.5).unwrap();
    let report = app.recommend(&request, &CancelFlag::new()).unwrap();
    assert_eq!(report.number_of_recommendations, 0);
}

#[test]
fn test_no_candidates() {
    let app = setup();
    squad_from(
        &app,
        &[
            ("Best", Position::Goalkeeper, 5.0, 6.0),
            ("Star", Position::Forward, 12.0, 9.0),
        ],
        &[
            ("Worse", Position::Goalkeeper, 4.0, 3.0),
            ("Bench", Position::Forward, 6.0, 4.0),
        ],
    );
    let report = app
        .recommend(&RecommendRequest::default(), &CancelFlag::new())
        .unwrap();
    assert!(report.success);
    assert_eq!(report.number_of_recommendations, 0);
    assert_eq!(report.total_potential_improvement, 0.0);
    assert_eq!(report.total_cost_change, 0.0);
}

#[test]
fn test_cancelled_request() {
    let app = seeded();
    let cancel = CancelFlag::new();
    cancel.cancel();
    let result = app.recommend(&RecommendRequest::default(), &cancel);
    assert!(matches!(
        result,
        Err(squadrec::domain::error::DomainError::Cancelled)
    ));
}

#[test]
fn test_off_grid_prices_cannot_break_the_cap() {
    let app = setup();
    let summary = app
        .import_players(vec![
            import("Cur", Position::Forward, 5.06, 4.0),
            import("Sub", Position::Forward, 5.14, 6.0),
        ])
        .unwrap();
    assert_eq!(summary.inserted, 0);
    assert_eq!(summary.skipped.len(), 2);

    squad_from(
        &app,
        &[("Cur", Position::Forward, 5.1, 4.0)],
        &[("Sub", Position::Forward, 5.2, 6.0)],
    );
    let request = RecommendRequest::new(1, 5.1).unwrap();
    let report = app.recommend(&request, &CancelFlag::new()).unwrap();
    assert_eq!(report.number_of_recommendations, 0);

    let request = RecommendRequest::new(1, 5.2).unwrap();
    let report = app.recommend(&request, &CancelFlag::new()).unwrap();
    assert_eq!(report.number_of_recommendations, 1);
    assert_eq!(report.total_cost_change, 0.1);
    assert!(report.current_total_cost + report.total_cost_change <= 5.2 + 1e-9);
}

#[test]
fn test_solver_deadline_fails_without_partial_output() {
    let mut config = test_config();
    config.solver_timeout = std::time::Duration::ZERO;
    let app = setup_with_config(&config);
    seed_crowded_midfield(&app, 12);
    let result = app.recommend(&RecommendRequest::default(), &CancelFlag::new());
    assert!(matches!(
        result,
        Err(squadrec::domain::error::DomainError::Solver(_))
    ));
}
