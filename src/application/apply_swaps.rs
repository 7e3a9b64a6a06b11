use crate::application::snapshot;
use crate::domain::entities::squad::Squad;
use crate::domain::entities::swap::SwapRequest;
use crate::domain::error::DomainError;
use crate::domain::ports::player_catalog::PlayerCatalog;
use crate::domain::ports::squad_repository::SquadRepository;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Clone, Serialize)]
pub struct SwapOutcome {
    pub position: String,
    pub current_player: String,
    pub substitute: String,
    pub applied: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApplyReport {
    /// True only when every swap was applied.
    pub success: bool,
    pub applied: usize,
    pub failed: usize,
    pub results: Vec<SwapOutcome>,
    pub squad: Squad,
}

/// Applies swaps to the stored squad one at a time. Each swap is atomic;
/// the list as a whole is not.
pub struct ApplySwapsUseCase {
    squads: Arc<dyn SquadRepository>,
    catalog: Arc<dyn PlayerCatalog>,
}

impl ApplySwapsUseCase {
    pub fn new(squads: Arc<dyn SquadRepository>, catalog: Arc<dyn PlayerCatalog>) -> Self {
        Self { squads, catalog }
    }

    pub fn apply(&self, swaps: &[SwapRequest]) -> Result<ApplyReport, DomainError> {
        if swaps.is_empty() {
            return Err(DomainError::InvalidInput("No substitutions provided".into()));
        }

        let mut results = Vec::with_capacity(swaps.len());
        for swap in swaps {
            let outcome = self.apply_one(swap);
            if let Err(e) = &outcome {
                warn!(
                    current = %swap.current_player,
                    substitute = %swap.substitute,
                    error = %e,
                    "swap not applied"
                );
            }
            results.push(SwapOutcome {
                position: swap.position.group_key().to_string(),
                current_player: swap.current_player.clone(),
                substitute: swap.substitute.clone(),
                applied: outcome.is_ok(),
                error: outcome.err().map(|e| e.to_string()),
            });
        }

        let applied = results.iter().filter(|r| r.applied).count();
        let failed = results.len() - applied;
        info!(applied, failed, "swaps applied");
        Ok(ApplyReport {
            success: failed == 0,
            applied,
            failed,
            results,
            squad: snapshot::load(self.squads.as_ref(), self.catalog.as_ref())?.squad,
        })
    }

    fn apply_one(&self, swap: &SwapRequest) -> Result<(), DomainError> {
        let incoming = self
            .catalog
            .get_by_name(swap.substitute.trim())?
            .ok_or_else(|| DomainError::InvalidInput(format!("Unknown player: {}", swap.substitute)))?;
        if incoming.position != swap.position {
            return Err(DomainError::InvalidInput(format!(
                "{} is a {}, not a {}",
                incoming.name, incoming.position, swap.position
            )));
        }

        let members = self.squads.members()?;
        if members.iter().any(|m| incoming.has_name(&m.player_name)) {
            return Err(DomainError::InvalidInput(format!(
                "{} is already in the squad",
                incoming.name
            )));
        }
        let outgoing = members
            .into_iter()
            .find(|m| m.position == swap.position && m.player_name.eq_ignore_ascii_case(swap.current_player.trim()))
            .ok_or_else(|| {
                DomainError::NotFound(format!(
                    "{} not found in {}",
                    swap.current_player,
                    swap.position.group_key()
                ))
            })?;

        self.squads.swap_member(&outgoing, &incoming.name)
    }
}
