use crate::domain::error::DomainError;
use crate::domain::ports::squad_repository::*;
use crate::domain::values::position::Position;
use crate::infrastructure::sqlite::migrations::run_migrations;
use chrono::DateTime;
use rusqlite::{params, Connection, OptionalExtension, Transaction};
use std::sync::Mutex;

pub struct SqliteSquadRepo {
    conn: Mutex<Connection>,
}

fn log_action(tx: &Transaction, action: SwapAction, position: Position, name: &str) -> Result<(), DomainError> {
    let action = match action {
        SwapAction::Add => "add",
        SwapAction::Remove => "remove",
    };
    tx.execute(
        "INSERT INTO swap_log (action, position, player_name, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![action, position.to_string(), name, chrono::Utc::now().to_rfc3339()],
    )
    .map_err(|e| DomainError::Database(format!("Failed to write swap log: {e}")))?;
    Ok(())
}

fn is_member(tx: &Transaction, name: &str) -> Result<bool, DomainError> {
    let found: Option<i64> = tx
        .query_row(
            "SELECT 1 FROM squad_members WHERE player_name = ?1",
            params![name],
            |row| row.get(0),
        )
        .optional()?;
    Ok(found.is_some())
}

impl SqliteSquadRepo {
    pub fn new(conn: Connection) -> Result<Self, DomainError> {
        run_migrations(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn row_to_log(row: &rusqlite::Row) -> Result<SwapLogEntry, rusqlite::Error> {
        let action_str: String = row.get(1)?;
        let pos_str: String = row.get(2)?;
        let created_str: String = row.get(4)?;
        Ok(SwapLogEntry {
            id: row.get(0)?,
            action: if action_str == "remove" {
                SwapAction::Remove
            } else {
                SwapAction::Add
            },
            position: pos_str.parse().map_err(|e: String| {
                rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, e.into())
            })?,
            player_name: row.get(3)?,
            created_at: DateTime::parse_from_rfc3339(&created_str)
                .map(|dt| dt.with_timezone(&chrono::Utc))
                .unwrap_or_else(|_| chrono::Utc::now()),
        })
    }
}

impl SquadRepository for SqliteSquadRepo {
    fn members(&self) -> Result<Vec<SquadMember>, DomainError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))?;
        let mut stmt = conn.prepare("SELECT position, player_name FROM squad_members ORDER BY slot ASC")?;
        let rows = stmt.query_map([], |row| {
            let pos_str: String = row.get(0)?;
            Ok((pos_str, row.get::<_, String>(1)?))
        })?;

        let mut members = Vec::new();
        for row in rows {
            let (pos_str, player_name) = row?;
            let position = pos_str
                .parse()
                .map_err(|e: String| DomainError::Database(format!("Corrupt squad row: {e}")))?;
            members.push(SquadMember {
                position,
                player_name,
            });
        }
        Ok(members)
    }

    fn add_member(&self, member: &SquadMember) -> Result<(), DomainError> {
        let mut conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))?;
        let tx = conn.transaction()?;
        if is_member(&tx, &member.player_name)? {
            return Err(DomainError::InvalidInput(format!(
                "{} is already in the squad",
                member.player_name
            )));
        }
        let slot: i64 = tx.query_row(
            "SELECT COALESCE(MAX(slot), -1) + 1 FROM squad_members",
            [],
            |row| row.get(0),
        )?;
        tx.execute(
            "INSERT INTO squad_members (player_name, position, slot, added_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                member.player_name,
                member.position.to_string(),
                slot,
                chrono::Utc::now().to_rfc3339()
            ],
        )
        .map_err(|e| DomainError::Database(format!("Failed to add squad member: {e}")))?;
        log_action(&tx, SwapAction::Add, member.position, &member.player_name)?;
        tx.commit()?;
        Ok(())
    }

    fn remove_member(&self, member: &SquadMember) -> Result<(), DomainError> {
        let mut conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))?;
        let tx = conn.transaction()?;
        let rows = tx.execute(
            "DELETE FROM squad_members WHERE player_name = ?1 AND position = ?2",
            params![member.player_name, member.position.to_string()],
        )?;
        if rows == 0 {
            return Err(DomainError::NotFound(format!(
                "{} not found in {}",
                member.player_name,
                member.position.group_key()
            )));
        }
        log_action(&tx, SwapAction::Remove, member.position, &member.player_name)?;
        tx.commit()?;
        Ok(())
    }

    fn swap_member(&self, outgoing: &SquadMember, incoming_name: &str) -> Result<(), DomainError> {
        let mut conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))?;
        // dropping the transaction on an early return rolls it back
        let tx = conn.transaction()?;
        if is_member(&tx, incoming_name)? {
            return Err(DomainError::InvalidInput(format!(
                "{incoming_name} is already in the squad"
            )));
        }
        let rows = tx.execute(
            "UPDATE squad_members SET player_name = ?1, added_at = ?2 WHERE player_name = ?3 AND position = ?4",
            params![
                incoming_name,
                chrono::Utc::now().to_rfc3339(),
                outgoing.player_name,
                outgoing.position.to_string()
            ],
        )?;
        if rows == 0 {
            return Err(DomainError::NotFound(format!(
                "{} not found in {}",
                outgoing.player_name,
                outgoing.position.group_key()
            )));
        }
        log_action(&tx, SwapAction::Remove, outgoing.position, &outgoing.player_name)?;
        log_action(&tx, SwapAction::Add, outgoing.position, incoming_name)?;
        tx.commit()?;
        Ok(())
    }

    fn replace_all(&self, members: &[SquadMember]) -> Result<(), DomainError> {
        let mut conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))?;
        let tx = conn.transaction()?;

        let previous: Vec<(String, String)> = {
            let mut stmt = tx.prepare("SELECT position, player_name FROM squad_members ORDER BY slot")?;
            let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
            rows.collect::<Result<Vec<_>, rusqlite::Error>>()?
        };
        tx.execute("DELETE FROM squad_members", [])?;
        for (pos_str, name) in previous {
            if let Ok(position) = pos_str.parse::<Position>() {
                log_action(&tx, SwapAction::Remove, position, &name)?;
            }
        }

        let now = chrono::Utc::now().to_rfc3339();
        for (slot, m) in members.iter().enumerate() {
            tx.execute(
                "INSERT INTO squad_members (player_name, position, slot, added_at) VALUES (?1, ?2, ?3, ?4)",
                params![m.player_name, m.position.to_string(), slot as i64, now],
            )
            .map_err(|e| DomainError::Database(format!("Failed to add squad member: {e}")))?;
            log_action(&tx, SwapAction::Add, m.position, &m.player_name)?;
        }
        tx.commit()?;
        Ok(())
    }

    fn swap_log(&self, limit: usize) -> Result<Vec<SwapLogEntry>, DomainError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::Database(e.to_string()))?;
        let mut stmt = conn.prepare(
            "SELECT id, action, position, player_name, created_at FROM swap_log ORDER BY id DESC LIMIT ?1",
        )?;
        let entries = stmt
            .query_map(params![limit as i64], Self::row_to_log)?
            .filter_map(|r| r.ok())
            .collect();
        Ok(entries)
    }
}
