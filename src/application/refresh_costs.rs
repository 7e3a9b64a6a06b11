use crate::domain::entities::player::Player;
use crate::domain::error::DomainError;
use crate::domain::ports::cost_feed::{CostFeed, PriceQuote};
use crate::domain::ports::player_catalog::PlayerCatalog;
use crate::domain::values::units::round1;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Price moves at or below this are treated as noise.
pub const COST_CHANGE_THRESHOLD: f64 = 0.05;

pub struct RefreshCostsUseCase {
    catalog: Arc<dyn PlayerCatalog>,
}

#[derive(Debug, Serialize)]
pub struct CostChange {
    pub name: String,
    pub old_cost: f64,
    pub new_cost: f64,
}

#[derive(Debug, Serialize)]
pub struct RefreshReport {
    pub success: bool,
    pub source: String,
    pub quotes_fetched: usize,
    pub players_checked: usize,
    pub updated: Vec<CostChange>,
    pub unchanged: usize,
    pub unmatched: Vec<String>,
    pub errors: Vec<String>,
}

/// Quotes grouped by lowercase full name and by lowercase display name.
struct QuoteIndex<'a> {
    by_name: HashMap<String, Vec<&'a PriceQuote>>,
    by_display: HashMap<String, Vec<&'a PriceQuote>>,
}

fn key(name: &str) -> String {
    name.trim().to_lowercase()
}

impl<'a> QuoteIndex<'a> {
    fn new(quotes: &'a [PriceQuote]) -> Self {
        let mut by_name: HashMap<String, Vec<&PriceQuote>> = HashMap::new();
        let mut by_display: HashMap<String, Vec<&PriceQuote>> = HashMap::new();
        for q in quotes {
            by_name.entry(key(&q.name)).or_default().push(q);
            if let Some(d) = &q.display_name {
                by_display.entry(key(d)).or_default().push(q);
            }
        }
        Self { by_name, by_display }
    }

    /// Price for `player`, matched on full name first and display name second.
    /// Quotes for another position never match. When several quotes remain the
    /// team breaks the tie; a name that stays ambiguous resolves to nothing.
    fn resolve(&self, player: &Player) -> Option<f64> {
        let name = key(&player.name);
        for table in [&self.by_name, &self.by_display] {
            let Some(found) = table.get(&name) else {
                continue;
            };
            let mut candidates: Vec<&PriceQuote> = found
                .iter()
                .copied()
                .filter(|q| q.position.map_or(true, |p| p == player.position))
                .collect();
            if candidates.len() > 1 {
                candidates.retain(|q| same_team(q.team.as_deref(), &player.team));
            }
            match candidates.as_slice() {
                [only] => return Some(only.cost),
                [] => continue,
                _ => return None,
            }
        }
        None
    }
}

fn same_team(quoted: Option<&str>, team: &str) -> bool {
    match quoted {
        Some(q) => key(q) == key(team),
        None => false,
    }
}

impl RefreshCostsUseCase {
    pub fn new(catalog: Arc<dyn PlayerCatalog>) -> Self {
        Self { catalog }
    }

    /// Pull current prices and update catalog costs that moved.
    pub async fn execute(&self, feed: &dyn CostFeed) -> Result<RefreshReport, DomainError> {
        let quotes = feed.fetch_prices().await?;
        let index = QuoteIndex::new(&quotes);
        let players = self.catalog.all_players()?;

        let mut updated = Vec::new();
        let mut unchanged = 0;
        let mut unmatched = Vec::new();
        let mut errors = Vec::new();

        for player in &players {
            let Some(new_cost) = index.resolve(player) else {
                debug!(player = %player.name, "no price quote");
                unmatched.push(player.name.clone());
                continue;
            };
            if (new_cost - player.cost).abs() <= COST_CHANGE_THRESHOLD {
                unchanged += 1;
                continue;
            }
            match self.catalog.update_cost(&player.name, new_cost) {
                Ok(()) => updated.push(CostChange {
                    name: player.name.clone(),
                    old_cost: round1(player.cost),
                    new_cost: round1(new_cost),
                }),
                Err(e) => errors.push(format!("Failed to update {}: {e}", player.name)),
            }
        }

        info!(
            source = feed.name(),
            quotes = quotes.len(),
            updated = updated.len(),
            unchanged,
            unmatched = unmatched.len(),
            "costs refreshed"
        );
        Ok(RefreshReport {
            success: errors.is_empty(),
            source: feed.name().to_string(),
            quotes_fetched: quotes.len(),
            players_checked: players.len(),
            updated,
            unchanged,
            unmatched,
            errors,
        })
    }
}
