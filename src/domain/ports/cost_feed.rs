use crate::domain::error::DomainError;
use crate::domain::values::position::Position;
use async_trait::async_trait;
use serde::Serialize;

/// A current price published by an external source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceQuote {
    /// Full name, e.g. "Bukayo Saka".
    pub name: String,
    /// Short display name, e.g. "Saka".
    pub display_name: Option<String>,
    pub cost: f64,
    pub position: Option<Position>,
    pub team: Option<String>,
}

/// A source of up-to-date player prices.
#[async_trait]
pub trait CostFeed: Send + Sync {
    fn name(&self) -> &str;

    async fn fetch_prices(&self) -> Result<Vec<PriceQuote>, DomainError>;
}
