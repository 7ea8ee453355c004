use crate::classify::{Classifier, SearchBackend, DEFAULT_TLDS};
use crate::history::HistoryStore;
use crate::storage::JsonFileStorage;
use crate::suggest::{
    HttpSuggestionProvider, SuggestClient, DEFAULT_ENDPOINT, DEFAULT_QUERY_PARAM,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

pub const SETTINGS_FILE: &str = "settings.json";
pub const STORAGE_FILE: &str = "storage.json";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Settings {
    /// When enabled the application initialises the logger at debug level.
    /// Defaults to `false` when the field is missing in the settings file.
    #[serde(default)]
    pub debug_logging: bool,
    /// Optional file receiving log output in addition to stderr.
    #[serde(default)]
    pub log_file: Option<PathBuf>,
    /// Location of the persisted history document. If `None`, a file in the
    /// platform data directory is used.
    #[serde(default)]
    pub storage_path: Option<PathBuf>,
    /// Query remote autocomplete while typing.
    #[serde(default = "default_remote_suggestions")]
    pub remote_suggestions: bool,
    #[serde(default = "default_suggest_endpoint")]
    pub suggest_endpoint: String,
    /// Name of the query parameter carrying the typed fragment.
    #[serde(default = "default_suggest_param")]
    pub suggest_param: String,
    #[serde(default = "default_suggest_timeout")]
    pub suggest_timeout_secs: u64,
    /// Quiet period after the last keystroke before a remote request fires.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default)]
    pub default_backend: SearchBackend,
    /// Top-level domains that make a bare host name navigable.
    #[serde(default = "default_tlds")]
    pub tlds: Vec<String>,
    /// Maximum number of URLs and of queries kept. `None` keeps everything.
    #[serde(default = "default_history_limit")]
    pub history_limit: Option<usize>,
}

fn default_remote_suggestions() -> bool {
    true
}

fn default_suggest_endpoint() -> String {
    DEFAULT_ENDPOINT.into()
}

fn default_suggest_param() -> String {
    DEFAULT_QUERY_PARAM.into()
}

fn default_suggest_timeout() -> u64 {
    5
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_tlds() -> Vec<String> {
    DEFAULT_TLDS.iter().map(|t| t.to_string()).collect()
}

fn default_history_limit() -> Option<usize> {
    Some(100)
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug_logging: false,
            log_file: None,
            storage_path: None,
            remote_suggestions: default_remote_suggestions(),
            suggest_endpoint: default_suggest_endpoint(),
            suggest_param: default_suggest_param(),
            suggest_timeout_secs: default_suggest_timeout(),
            debounce_ms: default_debounce_ms(),
            default_backend: SearchBackend::Web,
            tlds: default_tlds(),
            history_limit: default_history_limit(),
        }
    }
}

impl Settings {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path).unwrap_or_default();
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &str) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Configured storage path, or `popup-search/storage.json` under the
    /// platform data directory, or the working directory as a last resort.
    pub fn storage_path(&self) -> PathBuf {
        if let Some(p) = &self.storage_path {
            return p.clone();
        }
        match dirs_next::data_dir() {
            Some(dir) => dir.join("popup-search").join(STORAGE_FILE),
            None => {
                tracing::warn!("no data directory available; storing history in the working directory");
                PathBuf::from(STORAGE_FILE)
            }
        }
    }

    pub fn classifier(&self) -> Classifier {
        if self.tlds.is_empty() {
            tracing::warn!("empty tld list in settings; using defaults");
            return Classifier::default();
        }
        Classifier::new(&self.tlds)
    }

    pub fn open_history(&self) -> HistoryStore {
        let storage = JsonFileStorage::open_or_empty(self.storage_path());
        HistoryStore::open(Box::new(storage), self.history_limit)
    }

    /// Remote client for the configured endpoint. `None` when remote
    /// suggestions are disabled or the endpoint is unusable.
    pub fn suggest_client(&self) -> Option<SuggestClient> {
        if !self.remote_suggestions {
            return None;
        }
        match HttpSuggestionProvider::new(
            &self.suggest_endpoint,
            &self.suggest_param,
            Duration::from_secs(self.suggest_timeout_secs),
        ) {
            Ok(provider) => Some(SuggestClient::new(Arc::new(provider), self.debounce())),
            Err(e) => {
                tracing::warn!(
                    endpoint = %self.suggest_endpoint,
                    "remote suggestions disabled: {e}"
                );
                None
            }
        }
    }
}
