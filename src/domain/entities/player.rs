use crate::domain::values::position::Position;
use crate::domain::values::units::{round1, validate_cost, validate_points};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: String,
    pub name: String,
    pub position: Position,
    #[serde(default)]
    pub team: String,
    pub cost: f64,
    #[serde(default)]
    pub projected_points: f64,
    #[serde(default)]
    pub elo: Option<f64>,
}

impl Player {
    pub fn new(
        name: String,
        position: Position,
        team: String,
        cost: f64,
        projected_points: f64,
        elo: Option<f64>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            position,
            team,
            cost,
            projected_points,
            elo,
        }
    }

    /// Players are the same person when ids match or names match ignoring case.
    pub fn same_person(&self, other: &Player) -> bool {
        self.id == other.id || self.has_name(&other.name)
    }

    pub fn has_name(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name.trim())
    }

    pub fn summary(&self) -> PlayerSummary {
        PlayerSummary {
            name: self.name.clone(),
            team: self.team.clone(),
            cost: round1(self.cost),
            projected_points: round1(self.projected_points),
        }
    }
}

/// The player fields echoed back in recommendation responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSummary {
    pub name: String,
    pub team: String,
    pub cost: f64,
    pub projected_points: f64,
}

/// A catalog row as it appears in an import file. `id` is generated when absent.
#[derive(Debug, Clone, Deserialize)]
pub struct PlayerImport {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    pub position: Position,
    #[serde(default)]
    pub team: Option<String>,
    pub cost: f64,
    #[serde(default)]
    pub projected_points: Option<f64>,
    #[serde(default)]
    pub elo: Option<f64>,
}

impl PlayerImport {
    pub fn into_player(self) -> Result<Player, String> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err("Player name must not be empty".into());
        }
        let cost = validate_cost(self.cost).map_err(|e| format!("Invalid {e} for {name}"))?;
        let projected_points = validate_points(self.projected_points.unwrap_or(0.0))
            .map_err(|e| format!("Invalid {e} for {name}"))?;
        let mut player = Player::new(
            name,
            self.position,
            self.team.unwrap_or_default(),
            cost,
            projected_points,
            self.elo,
        );
        if let Some(id) = self.id.filter(|id| !id.trim().is_empty()) {
            player.id = id;
        }
        Ok(player)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_person_by_name_ignores_case() {
        let a = Player::new("Bukayo Saka".into(), Position::Midfielder, "ARS".into(), 10.0, 6.0, None);
        let mut b = a.clone();
        b.id = "other".into();
        b.name = "bukayo saka".into();
        assert!(a.same_person(&b));
    }

    #[test]
    fn test_import_keeps_given_id() {
        let import: PlayerImport = serde_json::from_str(
            r#"{"id": "p-1", "name": " Salah ", "position": "MID", "cost": 13.0}"#,
        )
        .unwrap();
        let player = import.into_player().unwrap();
        assert_eq!(player.id, "p-1");
        assert_eq!(player.name, "Salah");
        assert_eq!(player.projected_points, 0.0);
        assert_eq!(player.team, "");
    }

    #[test]
    fn test_import_rejects_negative_cost() {
        let import: PlayerImport =
            serde_json::from_str(r#"{"name": "X", "position": "DEF", "cost": -1.0}"#).unwrap();
        assert!(import.into_player().is_err());
    }

    #[test]
    fn test_import_rejects_off_grid_and_huge_costs() {
        for raw in [
            r#"{"name": "X", "position": "FWD", "cost": 5.06}"#,
            r#"{"name": "X", "position": "FWD", "cost": 1e300}"#,
            r#"{"name": "X", "position": "FWD", "cost": 5.0, "projected_points": 1e300}"#,
        ] {
            let import: PlayerImport = serde_json::from_str(raw).unwrap();
            assert!(import.into_player().is_err(), "{raw}");
        }
        let import: PlayerImport =
            serde_json::from_str(r#"{"name": "X", "position": "FWD", "cost": 5.1}"#).unwrap();
        assert_eq!(import.into_player().unwrap().cost, 5.1);
    }
}
