use crate::application::snapshot;
use crate::domain::entities::player::Player;
use crate::domain::entities::squad::Squad;
use crate::domain::error::DomainError;
use crate::domain::ports::player_catalog::PlayerCatalog;
use crate::domain::ports::squad_repository::{SquadMember, SquadRepository, SwapLogEntry};
use crate::domain::values::position::Position;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::info;

pub struct SquadUseCase {
    squads: Arc<dyn SquadRepository>,
    catalog: Arc<dyn PlayerCatalog>,
}

impl SquadUseCase {
    pub fn new(squads: Arc<dyn SquadRepository>, catalog: Arc<dyn PlayerCatalog>) -> Self {
        Self { squads, catalog }
    }

    pub fn get(&self) -> Result<Squad, DomainError> {
        Ok(snapshot::load(self.squads.as_ref(), self.catalog.as_ref())?.squad)
    }

    /// Add a catalog player to the squad under `position`.
    pub fn add_player(&self, position: Position, name: &str) -> Result<Squad, DomainError> {
        let player = self.resolve(position, name)?;
        if self
            .squads
            .members()?
            .iter()
            .any(|m| player.has_name(&m.player_name))
        {
            return Err(DomainError::InvalidInput(format!(
                "{} is already in the squad",
                player.name
            )));
        }
        self.squads.add_member(&SquadMember {
            position,
            player_name: player.name.clone(),
        })?;
        info!(player = %player.name, position = %position, "player added");
        self.get()
    }

    pub fn remove_player(&self, position: Position, name: &str) -> Result<Squad, DomainError> {
        let name = name.trim();
        let member = self
            .squads
            .members()?
            .into_iter()
            .find(|m| m.position == position && m.player_name.eq_ignore_ascii_case(name))
            .ok_or_else(|| {
                DomainError::NotFound(format!("{name} not found in {}", position.group_key()))
            })?;
        self.squads.remove_member(&member)?;
        info!(player = %member.player_name, position = %position, "player removed");
        self.get()
    }

    /// Replace the whole squad. Every member must exist in the catalog at the
    /// given position and appear once.
    pub fn replace(&self, members: &[SquadMember]) -> Result<Squad, DomainError> {
        let mut seen = HashSet::new();
        let mut resolved = Vec::with_capacity(members.len());
        for m in members {
            let player = self.resolve(m.position, &m.player_name)?;
            if !seen.insert(player.name.to_lowercase()) {
                return Err(DomainError::InvalidInput(format!(
                    "{} appears more than once",
                    player.name
                )));
            }
            resolved.push(SquadMember {
                position: m.position,
                player_name: player.name,
            });
        }
        self.squads.replace_all(&resolved)?;
        info!(members = resolved.len(), "squad replaced");
        self.get()
    }

    pub fn history(&self, limit: usize) -> Result<Vec<SwapLogEntry>, DomainError> {
        self.squads.swap_log(limit)
    }

    fn resolve(&self, position: Position, name: &str) -> Result<Player, DomainError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::InvalidInput("player_name is required".into()));
        }
        let player = self
            .catalog
            .get_by_name(name)?
            .ok_or_else(|| DomainError::InvalidInput(format!("Unknown player: {name}")))?;
        if player.position != position {
            return Err(DomainError::InvalidInput(format!(
                "{} is a {}, not a {position}",
                player.name, player.position
            )));
        }
        Ok(player)
    }
}
