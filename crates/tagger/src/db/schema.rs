use crate::error::Result;
use rusqlite::Connection;

pub const SCHEMA_VERSION: i32 = 2;

pub fn initialize_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        );
        "#,
    )?;

    // Version 1 keyed snapshots on label, which the store does not keep unique.
    // Snapshots are rewritten on every commit, so the old table is dropped.
    if matches!(get_schema_version(conn)?, Some(version) if version < 2) {
        conn.execute_batch("DROP TABLE IF EXISTS label_snapshots;")?;
    }

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS label_snapshots (
            scheme          TEXT NOT NULL,
            position        INTEGER NOT NULL,
            store_id        TEXT NOT NULL,
            label           TEXT NOT NULL,
            name            TEXT NOT NULL,
            slug            TEXT NOT NULL,
            frequency       INTEGER NOT NULL DEFAULT 0,
            include_pattern TEXT,
            exclude_pattern TEXT,
            precision       REAL,
            recall          REAL,
            f1score         REAL,
            accuracy        REAL,
            flushed_at      TEXT DEFAULT (datetime('now')),
            PRIMARY KEY (scheme, position)
        );

        CREATE TABLE IF NOT EXISTS commit_log (
            id              INTEGER PRIMARY KEY,
            committed_at    TEXT NOT NULL,
            scheme          TEXT NOT NULL,
            label           TEXT NOT NULL,
            include_pattern TEXT NOT NULL,
            exclude_pattern TEXT,
            relevant        INTEGER NOT NULL,
            selected        INTEGER NOT NULL,
            precision       REAL,
            recall          REAL,
            f1score         REAL,
            accuracy        REAL,
            upstream        TEXT NOT NULL
        );
        "#,
    )?;

    create_indexes(conn)?;
    set_schema_version(conn)?;

    Ok(())
}

fn create_indexes(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE INDEX IF NOT EXISTS idx_label_snapshots_label ON label_snapshots(scheme, label);
        CREATE INDEX IF NOT EXISTS idx_commit_log_label ON commit_log(scheme, label);
        CREATE INDEX IF NOT EXISTS idx_commit_log_committed_at ON commit_log(committed_at);
        "#,
    )?;
    Ok(())
}

fn set_schema_version(conn: &Connection) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO schema_version (version) VALUES (?1)",
        [SCHEMA_VERSION],
    )?;
    Ok(())
}

pub fn get_schema_version(conn: &Connection) -> Result<Option<i32>> {
    let mut stmt = conn.prepare("SELECT MAX(version) FROM schema_version")?;
    let mut rows = stmt.query([])?;

    match rows.next()? {
        Some(row) => Ok(row.get(0)?),
        None => Ok(None),
    }
}
