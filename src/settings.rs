use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File};
use serde::Deserialize;
use tracing::debug;

use crate::db::DEFAULT_DB_PATH;
use crate::error::{Result, ScrapeError};
use crate::parser::rules::DEFAULT_RULESET;
use crate::parser::ExtractionRuleset;
use crate::table::Columns;

pub const CONFIG_FILE: &str = "contact_scraper.toml";
const ENV_PREFIX: &str = "CONTACTS";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// A ruleset declared in the config file.
#[derive(Debug, Clone, Deserialize)]
pub struct RulesetDef {
    pub label: String,
    pub name: String,
    pub secondary: String,
    pub email: String,
    /// Pattern that marks the start of each record block.
    pub block_start: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub db_path: PathBuf,
    /// `0` disables the request timeout.
    pub timeout_secs: u64,
    pub ruleset: String,
    pub url: Option<String>,
    pub columns: Columns,
    pub rulesets: BTreeMap<String, RulesetDef>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            ruleset: DEFAULT_RULESET.to_string(),
            url: None,
            columns: Columns::default(),
            rulesets: BTreeMap::new(),
        }
    }
}

impl Settings {
    /// Defaults, then the config file, then `CONTACTS_*` env vars.
    ///
    /// An explicit `path` must exist; the default file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (file, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => match env::var_os("CONTACTS_CONFIG") {
                Some(p) => (PathBuf::from(p), true),
                None => (PathBuf::from(CONFIG_FILE), false),
            },
        };

        let settings: Settings = Config::builder()
            .add_source(File::from(file.as_path()).required(required))
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()?;

        debug!(?settings, "settings loaded");
        Ok(settings)
    }

    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }

    /// Config-file rulesets shadow built-ins with the same id.
    ///
    /// Ids are case-insensitive: the config loader lowercases table keys.
    pub fn resolve_ruleset(&self, id: &str) -> Result<ExtractionRuleset> {
        let id = id.to_lowercase();
        if let Some(def) = self.rulesets.get(&id) {
            return ExtractionRuleset::compile(
                &id,
                &def.label,
                &def.name,
                &def.secondary,
                &def.email,
                def.block_start.as_deref(),
            )
            .map_err(|e| ScrapeError::Config(format!("ruleset '{}': {}", id, e)));
        }
        ExtractionRuleset::builtin(&id)
            .ok_or_else(|| ScrapeError::Config(format!("unknown ruleset '{}'", id)))
    }

    /// All ruleset ids with their secondary-column label, built-ins first.
    pub fn ruleset_labels(&self) -> Vec<(String, String)> {
        let mut out: Vec<(String, String)> = ExtractionRuleset::builtin_ids()
            .iter()
            .filter(|id| !self.rulesets.contains_key(**id))
            .filter_map(|id| ExtractionRuleset::builtin(id))
            .map(|r| (r.id, r.secondary_label))
            .collect();
        out.extend(
            self.rulesets
                .iter()
                .map(|(id, def)| (id.clone(), def.label.clone())),
        );
        out
    }
}
