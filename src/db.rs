use std::fs;
use std::path::Path;

use rusqlite::{params, Connection, ErrorCode};
use thiserror::Error;
use tracing::debug;

use crate::parser::ContactRecord;

pub const DEFAULT_DB_PATH: &str = "contacts.db";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    #[error("cannot create {path}: {source}")]
    Dir {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Open the contact store, creating the file (and its directory) if needed.
pub fn connect(path: &Path) -> Result<Connection> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(|source| StoreError::Dir {
            path: dir.display().to_string(),
            source,
        })?;
    }
    Ok(Connection::open(path)?)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS contacts (
            iid       INTEGER PRIMARY KEY AUTOINCREMENT,
            name      TEXT NOT NULL,
            secondary TEXT NOT NULL,
            email     TEXT NOT NULL UNIQUE
        );
        ",
    )?;
    Ok(())
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == ErrorCode::ConstraintViolation
                && e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

/// Insert every record whose email is not stored yet. First occurrence wins.
///
/// Runs in one transaction. Only duplicate-email rejections are absorbed;
/// any other failure rolls the batch back and is returned.
pub fn save_all(conn: &Connection, records: &[ContactRecord]) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    let mut inserted = 0usize;
    {
        let mut stmt =
            tx.prepare("INSERT INTO contacts (name, secondary, email) VALUES (?1, ?2, ?3)")?;
        for r in records {
            match stmt.execute(params![r.name, r.secondary, r.email]) {
                Ok(n) => inserted += n,
                Err(e) if is_unique_violation(&e) => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }
    tx.commit()?;
    debug!(inserted, skipped = records.len().saturating_sub(inserted), "saved contacts");
    Ok(())
}

/// Every stored contact in insertion order.
pub fn load_all(conn: &Connection) -> Result<Vec<ContactRecord>> {
    let mut stmt = conn.prepare("SELECT name, secondary, email FROM contacts ORDER BY iid")?;
    let rows = stmt
        .query_map([], |row| {
            Ok(ContactRecord {
                name: row.get(0)?,
                secondary: row.get(1)?,
                email: row.get(2)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

pub fn count(conn: &Connection) -> Result<usize> {
    Ok(conn.query_row("SELECT COUNT(*) FROM contacts", [], |r| r.get(0))?)
}
