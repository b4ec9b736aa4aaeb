use std::path::Path;

use tracing::info;

use crate::db;
use crate::error::{Result, ScrapeError};
use crate::fetch::Fetcher;
use crate::parser::{self, ContactRecord, ExtractionRuleset};

/// fetch → extract → store. Returns the records found on the page.
///
/// A failed fetch leaves the store untouched. An empty extraction skips the
/// store entirely.
pub async fn scrape(
    url: &str,
    ruleset: &ExtractionRuleset,
    fetcher: &Fetcher,
    db_path: &Path,
) -> Result<Vec<ContactRecord>> {
    let url = url.trim();
    if url.is_empty() {
        return Err(ScrapeError::MissingUrl);
    }

    let markup = fetcher.fetch(url).await?;
    let records = parser::extract(&markup, ruleset);
    info!("Extracted {} contacts with ruleset '{}'", records.len(), ruleset.id);

    if !records.is_empty() {
        let conn = db::connect(db_path)?;
        db::init_schema(&conn)?;
        db::save_all(&conn, &records)?;
    }
    Ok(records)
}

pub fn init_store(db_path: &Path) -> Result<usize> {
    let conn = db::connect(db_path)?;
    db::init_schema(&conn)?;
    Ok(db::count(&conn)?)
}

pub fn stored_contacts(db_path: &Path) -> Result<Vec<ContactRecord>> {
    let conn = db::connect(db_path)?;
    db::init_schema(&conn)?;
    Ok(db::load_all(&conn)?)
}
