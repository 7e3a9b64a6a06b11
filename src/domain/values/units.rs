//! Fixed-point conversions for costs and projected points.
//!
//! Player prices move in steps of 0.1 budget units and projections are
//! published with at most two decimals, so the optimizer works on scaled
//! integers. Budget comparisons then never depend on float rounding.

/// Cost resolution: one unit is 0.1 of the budget currency.
pub const COST_SCALE: f64 = 10.0;

/// Points resolution: one unit is 0.01 projected points.
pub const POINTS_SCALE: f64 = 100.0;

/// Tolerance used when comparing reported (rounded) decimals.
pub const EPSILON: f64 = 1e-6;

/// Largest accepted player price. Keeps unit sums far from `i64` limits.
pub const MAX_COST: f64 = 1000.0;

/// Largest accepted projection, in either direction.
pub const MAX_POINTS: f64 = 1.0e6;

pub fn cost_units(cost: f64) -> i64 {
    (cost * COST_SCALE).round() as i64
}

/// A budget cap in cost units, rounded down so the cap is never exceeded.
pub fn budget_units(budget: f64) -> i64 {
    (budget * COST_SCALE + EPSILON).floor() as i64
}

pub fn point_units(points: f64) -> i64 {
    (points * POINTS_SCALE).round() as i64
}

/// Accept a price only when it sits on the 0.1 grid and within range.
///
/// Off-grid prices would be rounded by `cost_units`, and a package built on
/// rounded prices can overshoot the real budget cap.
pub fn validate_cost(cost: f64) -> Result<f64, String> {
    if !cost.is_finite() || !(0.0..=MAX_COST).contains(&cost) {
        return Err(format!("cost {cost} must be between 0 and {MAX_COST}"));
    }
    let snapped = cost_from_units(cost_units(cost));
    if (cost - snapped).abs() > EPSILON {
        return Err(format!("cost {cost} is not a multiple of 0.1"));
    }
    Ok(snapped)
}

pub fn validate_points(points: f64) -> Result<f64, String> {
    if !points.is_finite() || points.abs() > MAX_POINTS {
        return Err(format!("projected points {points} out of range"));
    }
    Ok(points)
}

pub fn cost_from_units(units: i64) -> f64 {
    units as f64 / COST_SCALE
}

pub fn points_from_units(units: i64) -> f64 {
    units as f64 / POINTS_SCALE
}

/// Round to one decimal place, as the API reports every decimal.
pub fn round1(value: f64) -> f64 {
    let rounded = (value * 10.0).round() / 10.0;
    // avoid "-0.0" in JSON output
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}
