pub mod formation;
pub mod position;
pub mod units;
