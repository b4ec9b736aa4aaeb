use thiserror::Error;

use crate::db::StoreError;
use crate::fetch::FetchError;

/// Everything a scrape can report to the user. Duplicate emails never show up here.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("no URL given")]
    MissingUrl,

    #[error("could not fetch page: {0}")]
    Fetch(#[from] FetchError),

    #[error("contact store error: {0}")]
    Storage(#[from] StoreError),

    #[error("configuration error: {0}")]
    Config(String),
}

impl From<config::ConfigError> for ScrapeError {
    fn from(e: config::ConfigError) -> Self {
        ScrapeError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ScrapeError>;
