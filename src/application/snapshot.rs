use tracing::warn;

use crate::domain::entities::player::Player;
use crate::domain::entities::squad::Squad;
use crate::domain::error::DomainError;
use crate::domain::ports::player_catalog::PlayerCatalog;
use crate::domain::ports::squad_repository::SquadRepository;

/// A consistent read of the squad and the catalog it was resolved against.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub squad: Squad,
    pub catalog: Vec<Player>,
}

/// Resolve stored squad members against the catalog.
///
/// Members the catalog no longer knows, or whose stored position disagrees
/// with the catalog, are skipped with a warning rather than failing the read.
pub fn load(squads: &dyn SquadRepository, catalog: &dyn PlayerCatalog) -> Result<Snapshot, DomainError> {
    let members = squads.members()?;
    let players = catalog.all_players()?;

    let mut squad = Squad::default();
    for member in members {
        let Some(player) = players.iter().find(|p| p.has_name(&member.player_name)) else {
            warn!(player = %member.player_name, "squad member missing from catalog, skipping");
            continue;
        };
        if player.position != member.position {
            warn!(
                player = %member.player_name,
                stored = %member.position,
                catalog = %player.position,
                "squad member position disagrees with catalog, skipping"
            );
            continue;
        }
        if let Err(e) = squad.add(player.clone()) {
            warn!(player = %member.player_name, error = %e, "duplicate squad member, skipping");
        }
    }

    Ok(Snapshot {
        squad,
        catalog: players,
    })
}
