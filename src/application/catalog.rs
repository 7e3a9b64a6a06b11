use crate::domain::entities::player::{Player, PlayerImport};
use crate::domain::error::DomainError;
use crate::domain::ports::player_catalog::{PlayerCatalog, PlayerFilter, UpsertOutcome};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportSummary {
    pub inserted: usize,
    pub updated: usize,
    pub skipped: Vec<String>,
}

pub struct CatalogUseCase {
    catalog: Arc<dyn PlayerCatalog>,
}

impl CatalogUseCase {
    pub fn new(catalog: Arc<dyn PlayerCatalog>) -> Self {
        Self { catalog }
    }

    pub fn list(&self, filter: &PlayerFilter) -> Result<Vec<Player>, DomainError> {
        self.catalog.list(filter)
    }

    /// Upsert rows by name. Invalid rows are reported and skipped.
    pub fn import_players(&self, rows: Vec<PlayerImport>) -> Result<ImportSummary, DomainError> {
        let mut summary = ImportSummary::default();
        for row in rows {
            let label = row.name.clone();
            let player = match row.into_player() {
                Ok(p) => p,
                Err(e) => {
                    warn!(player = %label, error = %e, "skipping import row");
                    summary.skipped.push(e);
                    continue;
                }
            };
            match self.catalog.upsert(&player)? {
                UpsertOutcome::Inserted => summary.inserted += 1,
                UpsertOutcome::Updated => summary.updated += 1,
            }
        }
        info!(
            inserted = summary.inserted,
            updated = summary.updated,
            skipped = summary.skipped.len(),
            "players imported"
        );
        Ok(summary)
    }

    /// Import a JSON array of players from disk.
    pub fn import_file(&self, path: &Path) -> Result<ImportSummary, DomainError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| DomainError::InvalidInput(format!("Cannot read {}: {e}", path.display())))?;
        let rows: Vec<PlayerImport> = serde_json::from_str(&raw)
            .map_err(|e| DomainError::Parse(format!("{}: {e}", path.display())))?;
        self.import_players(rows)
    }
}
