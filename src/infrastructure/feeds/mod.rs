//! Price feeds implementing [`CostFeed`](crate::domain::ports::cost_feed::CostFeed).

pub mod fpl;
