use crate::domain::entities::player::Player;
use crate::domain::error::DomainError;
use crate::domain::values::position::Position;

#[derive(Debug, Clone, Default)]
pub struct PlayerFilter {
    pub position: Option<Position>,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Updated,
}

/// Read/write access to the player catalog.
///
/// `all_players` returns players in a stable order (projected points
/// descending, then name) so every consumer sees the same snapshot order.
pub trait PlayerCatalog: Send + Sync {
    fn all_players(&self) -> Result<Vec<Player>, DomainError>;
    fn list(&self, filter: &PlayerFilter) -> Result<Vec<Player>, DomainError>;
    fn get_by_name(&self, name: &str) -> Result<Option<Player>, DomainError>;
    fn upsert(&self, player: &Player) -> Result<UpsertOutcome, DomainError>;
    fn update_cost(&self, name: &str, cost: f64) -> Result<(), DomainError>;
}
