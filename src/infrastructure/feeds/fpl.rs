use crate::domain::error::DomainError;
use crate::domain::ports::cost_feed::{CostFeed, PriceQuote};
use crate::domain::values::position::Position;
use async_trait::async_trait;
use std::collections::HashMap;
use tracing::debug;

pub const DEFAULT_FPL_URL: &str = "https://fantasy.premierleague.com/api/bootstrap-static/";

/// Fantasy Premier League prices from the public bootstrap endpoint.
/// No auth required.
pub struct FplFeed {
    url: String,
    client: reqwest::Client,
}

impl FplFeed {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::builder()
                .user_agent("squadrec/0.1")
                .build()
                .unwrap_or_default(),
        }
    }
}

impl Default for FplFeed {
    fn default() -> Self {
        Self::new(DEFAULT_FPL_URL)
    }
}

#[derive(Debug, serde::Deserialize)]
struct BootstrapResponse {
    elements: Vec<FplElement>,
    #[serde(default)]
    teams: Vec<FplTeam>,
}

#[derive(Debug, serde::Deserialize)]
struct FplElement {
    #[serde(default)]
    first_name: String,
    #[serde(default)]
    second_name: String,
    #[serde(default)]
    web_name: Option<String>,
    /// Price in tenths, e.g. 101 for 10.1.
    now_cost: i64,
    #[serde(default)]
    element_type: Option<u8>,
    #[serde(default)]
    team: Option<i64>,
}

#[derive(Debug, serde::Deserialize)]
struct FplTeam {
    id: i64,
    name: String,
}

fn to_quotes(data: BootstrapResponse) -> Vec<PriceQuote> {
    let teams: HashMap<i64, String> = data.teams.into_iter().map(|t| (t.id, t.name)).collect();
    data.elements
        .into_iter()
        .filter_map(|e| {
            let name = format!("{} {}", e.first_name.trim(), e.second_name.trim())
                .trim()
                .to_string();
            if name.is_empty() && e.web_name.is_none() {
                return None;
            }
            Some(PriceQuote {
                name,
                display_name: e.web_name,
                cost: e.now_cost as f64 / 10.0,
                position: e.element_type.and_then(Position::from_element_type),
                team: e.team.and_then(|id| teams.get(&id).cloned()),
            })
        })
        .collect()
}

#[async_trait]
impl CostFeed for FplFeed {
    fn name(&self) -> &str {
        "fpl"
    }

    async fn fetch_prices(&self) -> Result<Vec<PriceQuote>, DomainError> {
        let resp = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| DomainError::Feed(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(DomainError::Feed(format!(
                "FPL API returned {}",
                resp.status()
            )));
        }

        let data: BootstrapResponse = resp
            .json()
            .await
            .map_err(|e| DomainError::Parse(e.to_string()))?;
        let quotes = to_quotes(data);
        debug!(quotes = quotes.len(), "fetched FPL prices");
        Ok(quotes)
    }
}
