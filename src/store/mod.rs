//! Entity store: hosts, tags, their assignments and variable trees, kept in
//! SQLite.
//!
//! Every mutation is a single statement that takes effect immediately, so
//! later reads within the same shell command see it. [`Store::command`] wraps
//! one whole command in a transaction, which gives that command a consistent
//! view while still picking up what other sessions committed in between.

mod hosts;
pub mod model;
pub mod schema;
mod tags;
mod vars;

pub use model::{format_date, Host, HostFilter, Tag, TagGroup, TagOrder, DATE_FORMAT, UNGROUPED};
pub use vars::VarOwner;

use std::path::Path;
use std::time::Duration;

use rusqlite::{ffi, Connection, ErrorCode};
use tracing::{debug, error};

use crate::error::Result;

/// Handle on an Isidore database. Pass it to whatever needs the data; there
/// is no global connection.
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open (and if needed initialise) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "opening database");
        let conn = Connection::open(path)?;
        conn.busy_timeout(Duration::from_secs(5))?;
        conn.query_row("PRAGMA journal_mode = WAL", [], |_| Ok(()))?;
        Self::init(conn)
    }

    /// Private in-memory database, used by tests and dry runs.
    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", "ON")?;
        schema::migrate(&conn)?;
        Ok(Self { conn })
    }

    /// Run one top-level command inside a transaction. Committed when `f`
    /// returns `Ok`, rolled back otherwise. Not reentrant.
    pub fn command<T>(&self, f: impl FnOnce(&Store) -> Result<T>) -> Result<T> {
        let tx = self.conn.unchecked_transaction()?;
        let out = f(self)?;
        tx.commit()?;
        Ok(out)
    }

    /// Schema version recorded in the database.
    pub fn database_version(&self) -> Result<String> {
        Ok(self.conn.query_row(
            "SELECT Value FROM Metadata WHERE KeyName = 'version'",
            [],
            |row| row.get(0),
        )?)
    }

    /// Version of this library.
    pub fn library_version() -> &'static str {
        env!("CARGO_PKG_VERSION")
    }

    /// Every (host id, tag id) assignment.
    pub fn assignments(&self) -> Result<Vec<(i64, i64)>> {
        let mut stmt = self
            .conn
            .prepare("SELECT HostID, TagID FROM HostHasTag ORDER BY HostID, TagID")?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }
}

/// Constraint a failed statement ran into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Constraint {
    Unique,
    ForeignKey,
}

/// Classify a SQLite failure by its extended result code. Anything that is
/// not a uniqueness or foreign key violation yields `None`.
pub(crate) fn violated_constraint(err: &rusqlite::Error) -> Option<Constraint> {
    match err {
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation => {
            match e.extended_code {
                ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
                    Some(Constraint::Unique)
                }
                ffi::SQLITE_CONSTRAINT_FOREIGNKEY => Some(Constraint::ForeignKey),
                _ => {
                    error!(error = %err, "unexpected constraint failure");
                    None
                }
            }
        }
        _ => None,
    }
}
