pub mod analyze;
pub mod apply_swaps;
pub mod catalog;
pub mod individual;
pub mod recommender;
pub mod refresh_costs;
pub mod simulate;
pub mod snapshot;
pub mod squad;
