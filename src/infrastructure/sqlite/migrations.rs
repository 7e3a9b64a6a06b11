use crate::domain::error::DomainError;
use rusqlite::Connection;

/// Idempotent schema setup. Every store runs this on its own connection.
pub fn run_migrations(conn: &Connection) -> Result<(), DomainError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS players (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL UNIQUE COLLATE NOCASE,
            position TEXT NOT NULL,
            team TEXT NOT NULL DEFAULT '',
            cost REAL NOT NULL,
            projected_points REAL NOT NULL DEFAULT 0,
            elo REAL,
            updated_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS squad_members (
            player_name TEXT PRIMARY KEY COLLATE NOCASE,
            position TEXT NOT NULL,
            slot INTEGER NOT NULL,
            added_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS swap_log (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            action TEXT NOT NULL,
            position TEXT NOT NULL,
            player_name TEXT NOT NULL,
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_players_position ON players(position);
        CREATE INDEX IF NOT EXISTS idx_players_points ON players(projected_points);
        CREATE INDEX IF NOT EXISTS idx_squad_slot ON squad_members(slot);
        ",
    )
    .map_err(|e| DomainError::Database(format!("Migration failed: {e}")))
}
