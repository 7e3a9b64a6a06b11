use crate::domain::entities::player::Player;
use crate::domain::error::DomainError;
use crate::domain::values::formation::Formation;
use crate::domain::values::position::Position;
use crate::domain::values::units::{cost_from_units, cost_units, round1};
use serde::{Deserialize, Serialize};

/// The user's current players, one ordered list per position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Squad {
    #[serde(default)]
    pub goalkeepers: Vec<Player>,
    #[serde(default)]
    pub defenders: Vec<Player>,
    #[serde(default)]
    pub midfielders: Vec<Player>,
    #[serde(default)]
    pub forwards: Vec<Player>,
}

impl Squad {
    pub fn players(&self, position: Position) -> &[Player] {
        match position {
            Position::Goalkeeper => &self.goalkeepers,
            Position::Defender => &self.defenders,
            Position::Midfielder => &self.midfielders,
            Position::Forward => &self.forwards,
        }
    }

    fn players_mut(&mut self, position: Position) -> &mut Vec<Player> {
        match position {
            Position::Goalkeeper => &mut self.goalkeepers,
            Position::Defender => &mut self.defenders,
            Position::Midfielder => &mut self.midfielders,
            Position::Forward => &mut self.forwards,
        }
    }

    /// All players in squad order (goalkeepers first).
    pub fn iter(&self) -> impl Iterator<Item = &Player> {
        Position::ALL
            .into_iter()
            .flat_map(move |p| self.players(p).iter())
    }

    pub fn len(&self) -> usize {
        Position::ALL.iter().map(|p| self.players(*p).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total cost, summed in cost units so repeated sums stay exact.
    pub fn total_cost(&self) -> f64 {
        cost_from_units(self.iter().map(|p| cost_units(p.cost)).sum())
    }

    pub fn total_points(&self) -> f64 {
        round1(self.iter().map(|p| p.projected_points).sum())
    }

    pub fn contains(&self, player: &Player) -> bool {
        self.iter().any(|p| p.same_person(player))
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.iter().any(|p| p.has_name(name))
    }

    pub fn formation(&self) -> Formation {
        Formation::detect(
            self.goalkeepers.len(),
            self.defenders.len(),
            self.midfielders.len(),
            self.forwards.len(),
        )
    }

    /// Append a player to the group matching its position.
    pub fn add(&mut self, player: Player) -> Result<(), DomainError> {
        if self.contains(&player) {
            return Err(DomainError::InvalidInput(format!(
                "{} is already in the squad",
                player.name
            )));
        }
        self.players_mut(player.position).push(player);
        Ok(())
    }

    pub fn remove(&mut self, position: Position, name: &str) -> Result<Player, DomainError> {
        let group = self.players_mut(position);
        let idx = group.iter().position(|p| p.has_name(name)).ok_or_else(|| {
            DomainError::NotFound(format!(
                "{name} not found in {}",
                position.group_key()
            ))
        })?;
        Ok(group.remove(idx))
    }

    /// Put `incoming` in the slot held by `outgoing_name`, keeping squad order.
    pub fn replace(
        &mut self,
        position: Position,
        outgoing_name: &str,
        incoming: Player,
    ) -> Result<Player, DomainError> {
        if incoming.position != position {
            return Err(DomainError::InvalidInput(format!(
                "{} is a {}, not a {position}",
                incoming.name, incoming.position
            )));
        }
        if self.contains(&incoming) {
            return Err(DomainError::InvalidInput(format!(
                "{} is already in the squad",
                incoming.name
            )));
        }
        let group = self.players_mut(position);
        let idx = group
            .iter()
            .position(|p| p.has_name(outgoing_name))
            .ok_or_else(|| {
                DomainError::NotFound(format!(
                    "{outgoing_name} not found in {}",
                    position.group_key()
                ))
            })?;
        Ok(std::mem::replace(&mut group[idx], incoming))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(name: &str, position: Position, cost: f64, points: f64) -> Player {
        Player::new(name.into(), position, "TEAM".into(), cost, points, None)
    }

    fn squad() -> Squad {
        let mut s = Squad::default();
        s.add(player("Raya", Position::Goalkeeper, 5.5, 4.0)).unwrap();
        s.add(player("Saliba", Position::Defender, 6.0, 4.5)).unwrap();
        s.add(player("Gabriel", Position::Defender, 6.1, 4.2)).unwrap();
        s.add(player("Saka", Position::Midfielder, 10.1, 6.3)).unwrap();
        s
    }

    #[test]
    fn test_totals_are_exact() {
        let s = squad();
        assert_eq!(s.len(), 4);
        assert_eq!(s.total_cost(), 27.7);
        assert_eq!(s.total_points(), 19.0);
    }

    #[test]
    fn test_add_rejects_duplicate() {
        let mut s = squad();
        let dup = player("saka", Position::Midfielder, 10.1, 6.3);
        assert!(matches!(s.add(dup), Err(DomainError::InvalidInput(_))));
    }

    #[test]
    fn test_remove_wrong_position_is_not_found() {
        let mut s = squad();
        assert!(matches!(
            s.remove(Position::Forward, "Saka"),
            Err(DomainError::NotFound(_))
        ));
        let removed = s.remove(Position::Midfielder, "SAKA").unwrap();
        assert_eq!(removed.name, "Saka");
        assert_eq!(s.len(), 3);
    }

    #[test]
    fn test_replace_keeps_slot() {
        let mut s = squad();
        let white = player("White", Position::Defender, 5.8, 4.9);
        let out = s.replace(Position::Defender, "Saliba", white).unwrap();
        assert_eq!(out.name, "Saliba");
        assert_eq!(s.defenders[0].name, "White");
        assert_eq!(s.defenders[1].name, "Gabriel");
    }

    #[test]
    fn test_formation_of_partial_squad_is_default() {
        let s = squad();
        assert!(!s.formation().recognised);
    }
}
