use chrono::Utc;
use rusqlite::Connection;
use tracing::info;

use crate::error::AppResult;

const USER_VERSION: i32 = 2;

pub fn run(conn: &Connection) -> AppResult<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS migration_history (
            version INTEGER PRIMARY KEY,
            description TEXT NOT NULL,
            applied_at TEXT NOT NULL,
            rollback_sql TEXT
        );
        "#,
    )?;

    let mut current_version: i32 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;

    if current_version < 1 {
        info!(target: "app::db", version = current_version, "running migration v1");
        migrate_to_v1(conn)?;
        current_version = 1;
        conn.execute(&format!("PRAGMA user_version = {}", current_version), [])?;
        record_migration(conn, 1, "Add confirmed flag and positionen to assignments", None)?;
    }

    if current_version < 2 {
        info!(target: "app::db", version = current_version, "running migration v2");
        migrate_to_v2(conn)?;
        current_version = 2;
        conn.execute(&format!("PRAGMA user_version = {}", current_version), [])?;
        record_migration(
            conn,
            2,
            "Add week_start and person lookup indexes",
            Some("DROP INDEX IF EXISTS idx_assignments_week_start; DROP INDEX IF EXISTS idx_assignments_person;"),
        )?;
    }

    debug_assert!(current_version == USER_VERSION);

    Ok(())
}

fn migrate_to_v1(conn: &Connection) -> AppResult<()> {
    if !column_exists(conn, "assignments", "confirmed")? {
        conn.execute_batch("ALTER TABLE assignments ADD COLUMN confirmed INTEGER NOT NULL DEFAULT 0;")?;
    }
    if !column_exists(conn, "assignments", "positionen")? {
        conn.execute_batch("ALTER TABLE assignments ADD COLUMN positionen TEXT;")?;
    }
    Ok(())
}

fn migrate_to_v2(conn: &Connection) -> AppResult<()> {
    conn.execute_batch(
        r#"
        CREATE INDEX IF NOT EXISTS idx_assignments_week_start ON assignments (week_start);
        CREATE INDEX IF NOT EXISTS idx_assignments_person ON assignments (person);
        "#,
    )?;
    Ok(())
}

fn column_exists(conn: &Connection, table: &str, column: &str) -> AppResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", table))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let name: String = row.get("name")?;
        if name == column {
            return Ok(true);
        }
    }
    Ok(false)
}

fn record_migration(
    conn: &Connection,
    version: i32,
    description: &str,
    rollback_sql: Option<&str>,
) -> AppResult<()> {
    conn.execute(
        "INSERT OR IGNORE INTO migration_history (version, description, applied_at, rollback_sql)
         VALUES (?1, ?2, ?3, ?4)",
        rusqlite::params![version, description, Utc::now().to_rfc3339(), rollback_sql],
    )?;
    Ok(())
}
