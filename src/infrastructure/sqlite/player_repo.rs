use crate::domain::entities::player::Player;
use crate::domain::error::DomainError;
use crate::domain::ports::player_catalog::*;
use crate::domain::values::units::validate_cost;
use crate::infrastructure::sqlite::migrations::run_migrations;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::Mutex;
use tracing::warn;

const COLUMNS: &str = "id, name, position, team, cost, projected_points, elo";

pub struct SqlitePlayerRepo {
    conn: Mutex<Connection>,
}

impl SqlitePlayerRepo {
    pub fn new(conn: Connection) -> Result<Self, DomainError> {
        run_migrations(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn row_to_player(row: &rusqlite::Row) -> Result<Player, rusqlite::Error> {
        let pos_str: String = row.get(2)?;
        let position = pos_str.parse().map_err(|e: String| {
            rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, e.into())
        })?;
        Ok(Player {
            id: row.get(0)?,
            name: row.get(1)?,
            position,
            team: row.get(3)?,
            cost: row.get(4)?,
            projected_points: row.get(5)?,
            elo: row.get(6)?,
        })
    }

    fn collect(rows: impl Iterator<Item = Result<Player, rusqlite::Error>>) -> Vec<Player> {
        rows.filter_map(|r| match r {
            Ok(p) => Some(p),
            Err(e) => {
                warn!(error = %e, "skipping unreadable player row");
                None
            }
        })
        .collect()
    }
}

impl PlayerCatalog for SqlitePlayerRepo {
    fn all_players(&self) -> Result<Vec<Player>, DomainError> {
        self.list(&PlayerFilter::default())
    }

    fn list(&self, filter: &PlayerFilter) -> Result<Vec<Player>, DomainError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))?;
        let mut sql = format!("SELECT {COLUMNS} FROM players WHERE 1=1");
        let mut param_values: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();

        if let Some(position) = filter.position {
            sql.push_str(&format!(" AND position = ?{}", param_values.len() + 1));
            param_values.push(Box::new(position.to_string()));
        }
        // rowid keeps the order total when points and names tie
        sql.push_str(" ORDER BY projected_points DESC, name COLLATE NOCASE ASC, rowid ASC");
        if let Some(limit) = filter.limit {
            sql.push_str(&format!(" LIMIT ?{}", param_values.len() + 1));
            param_values.push(Box::new(limit as i64));
        }

        let params_refs: Vec<&dyn rusqlite::types::ToSql> =
            param_values.iter().map(|p| p.as_ref()).collect();
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_refs.as_slice(), Self::row_to_player)?;
        Ok(Self::collect(rows))
    }

    fn get_by_name(&self, name: &str) -> Result<Option<Player>, DomainError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))?;
        let player = conn
            .query_row(
                &format!("SELECT {COLUMNS} FROM players WHERE name = ?1"),
                params![name.trim()],
                Self::row_to_player,
            )
            .optional()?;
        Ok(player)
    }

    fn upsert(&self, player: &Player) -> Result<UpsertOutcome, DomainError> {
        let mut conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))?;
        let tx = conn.transaction()?;
        let existing: Option<String> = tx
            .query_row(
                "SELECT id FROM players WHERE name = ?1",
                params![player.name],
                |row| row.get(0),
            )
            .optional()?;
        let now = chrono::Utc::now().to_rfc3339();
        let outcome = match existing {
            Some(id) => {
                tx.execute(
                    "UPDATE players SET name = ?1, position = ?2, team = ?3, cost = ?4, projected_points = ?5, elo = ?6, updated_at = ?7 WHERE id = ?8",
                    params![
                        player.name,
                        player.position.to_string(),
                        player.team,
                        player.cost,
                        player.projected_points,
                        player.elo,
                        now,
                        id
                    ],
                )
                .map_err(|e| DomainError::Database(format!("Failed to update player: {e}")))?;
                UpsertOutcome::Updated
            }
            None => {
                tx.execute(
                    "INSERT INTO players (id, name, position, team, cost, projected_points, elo, updated_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                    params![
                        player.id,
                        player.name,
                        player.position.to_string(),
                        player.team,
                        player.cost,
                        player.projected_points,
                        player.elo,
                        now
                    ],
                )
                .map_err(|e| DomainError::Database(format!("Failed to add player: {e}")))?;
                UpsertOutcome::Inserted
            }
        };
        tx.commit()?;
        Ok(outcome)
    }

    fn update_cost(&self, name: &str, cost: f64) -> Result<(), DomainError> {
        let cost = validate_cost(cost).map_err(|e| DomainError::InvalidInput(format!("{name}: {e}")))?;
        let conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))?;
        let rows = conn
            .execute(
                "UPDATE players SET cost = ?1, updated_at = ?2 WHERE name = ?3",
                params![cost, chrono::Utc::now().to_rfc3339(), name],
            )
            .map_err(|e| DomainError::Database(format!("Failed to update cost: {e}")))?;
        if rows == 0 {
            return Err(DomainError::NotFound(format!("Player not found: {name}")));
        }
        Ok(())
    }
}
