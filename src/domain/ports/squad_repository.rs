use crate::domain::error::DomainError;
use crate::domain::values::position::Position;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A squad slot as stored: the player is resolved against the catalog on read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SquadMember {
    pub position: Position,
    #[serde(alias = "name")]
    pub player_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwapAction {
    Add,
    Remove,
}

#[derive(Debug, Clone, Serialize)]
pub struct SwapLogEntry {
    pub id: i64,
    pub action: SwapAction,
    pub position: Position,
    pub player_name: String,
    pub created_at: DateTime<Utc>,
}

/// Storage for the single current squad. Every method is atomic.
pub trait SquadRepository: Send + Sync {
    /// Members in squad order.
    fn members(&self) -> Result<Vec<SquadMember>, DomainError>;
    fn add_member(&self, member: &SquadMember) -> Result<(), DomainError>;
    fn remove_member(&self, member: &SquadMember) -> Result<(), DomainError>;
    /// Replace `outgoing` with `incoming_name` in the same slot, or change nothing.
    fn swap_member(&self, outgoing: &SquadMember, incoming_name: &str) -> Result<(), DomainError>;
    fn replace_all(&self, members: &[SquadMember]) -> Result<(), DomainError>;
    fn swap_log(&self, limit: usize) -> Result<Vec<SwapLogEntry>, DomainError>;
}
