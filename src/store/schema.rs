//! Schema creation and version bookkeeping

use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};

use crate::error::{IsidoreError, Result};

/// Schema version written to `Metadata.version`.
pub const SCHEMA_VERSION: u32 = 1;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS Metadata (
        KeyName TEXT PRIMARY KEY,
        Value   TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS Host (
        HostID           INTEGER PRIMARY KEY AUTOINCREMENT,
        Hostname         TEXT NOT NULL UNIQUE,
        CommissionDate   TEXT,
        DecommissionDate TEXT,
        Description      TEXT,
        Variables        TEXT NOT NULL DEFAULT '{}'
    );

    CREATE TABLE IF NOT EXISTS Tag (
        TagID       INTEGER PRIMARY KEY AUTOINCREMENT,
        TagName     TEXT NOT NULL UNIQUE,
        TagGroup    TEXT,
        Description TEXT,
        Variables   TEXT NOT NULL DEFAULT '{}'
    );

    CREATE TABLE IF NOT EXISTS HostHasTag (
        HostID INTEGER NOT NULL REFERENCES Host (HostID) ON DELETE RESTRICT,
        TagID  INTEGER NOT NULL REFERENCES Tag (TagID) ON DELETE RESTRICT,
        UNIQUE (HostID, TagID)
    );

    CREATE INDEX IF NOT EXISTS HostHasTagByTag ON HostHasTag (TagID);
";

/// Create any missing tables and check the recorded schema version.
pub(crate) fn migrate(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;

    let recorded: Option<String> = conn
        .query_row(
            "SELECT Value FROM Metadata WHERE KeyName = 'version'",
            [],
            |row| row.get(0),
        )
        .optional()?;

    match recorded {
        None => {
            conn.execute(
                "INSERT INTO Metadata (KeyName, Value) VALUES ('version', ?1)",
                params![SCHEMA_VERSION.to_string()],
            )?;
            info!(version = SCHEMA_VERSION, "initialised database schema");
        }
        Some(found) => {
            let supported = found
                .parse::<u32>()
                .map(|v| v <= SCHEMA_VERSION)
                .unwrap_or(false);
            if !supported {
                return Err(IsidoreError::UnsupportedSchema {
                    found,
                    supported: SCHEMA_VERSION.to_string(),
                });
            }
            debug!(version = %found, "database schema is current");
        }
    }

    Ok(())
}
