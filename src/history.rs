use crate::error::SuggestError;
use crate::storage::{MemoryStorage, Storage};
use hashlink::LinkedHashSet;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

pub const RECENT_URLS_KEY: &str = "recentUrls";
pub const RECENT_SEARCHES_KEY: &str = "recentSearches";
pub const DARK_MODE_KEY: &str = "darkMode";

/// A previously issued search query and how often it was committed.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct SearchRecord {
    pub query: String,
    pub count: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HistoryKind {
    Url,
    Query,
}

/// Unified view over both history collections. URLs always report a count
/// of 1.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryEntry {
    pub value: String,
    pub kind: HistoryKind,
    pub count: u32,
}

/// Owned copy of the history taken at one point in time.
///
/// Renders work on a snapshot so that mutating or clearing the store while a
/// render is in progress leaves the render's view untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HistorySnapshot {
    pub urls: Vec<String>,
    pub queries: Vec<SearchRecord>,
}

impl HistorySnapshot {
    /// URLs in insertion order followed by queries by rank.
    pub fn entries(&self) -> impl Iterator<Item = HistoryEntry> + '_ {
        let urls = self.urls.iter().map(|u| HistoryEntry {
            value: u.clone(),
            kind: HistoryKind::Url,
            count: 1,
        });
        let queries = self.queries.iter().map(|q| HistoryEntry {
            value: q.query.clone(),
            kind: HistoryKind::Query,
            count: q.count,
        });
        urls.chain(queries)
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty() && self.queries.is_empty()
    }
}

/// Durable record of visited URLs and issued search queries.
///
/// Every mutation is written through to the backing [`Storage`] before the
/// call returns. When that write fails the error is logged and returned, but
/// the in-memory collections keep the new state for the rest of the session.
pub struct HistoryStore {
    storage: Box<dyn Storage>,
    urls: LinkedHashSet<String>,
    queries: Vec<SearchRecord>,
    dark_mode: bool,
    limit: Option<usize>,
}

impl HistoryStore {
    /// Load history from `storage`. Missing keys start empty; keys that fail
    /// to decode are logged and start empty as well.
    pub fn open(storage: Box<dyn Storage>, limit: Option<usize>) -> Self {
        let stored_urls: Vec<String> = load_key(storage.as_ref(), RECENT_URLS_KEY).unwrap_or_default();
        let stored_queries: Vec<SearchRecord> =
            load_key(storage.as_ref(), RECENT_SEARCHES_KEY).unwrap_or_default();
        let dark_mode = load_key(storage.as_ref(), DARK_MODE_KEY).unwrap_or(true);

        let urls: LinkedHashSet<String> = stored_urls.into_iter().collect();

        let mut queries: Vec<SearchRecord> = Vec::with_capacity(stored_queries.len());
        for rec in stored_queries {
            if rec.query.is_empty() || queries.iter().any(|q| q.query == rec.query) {
                tracing::debug!(query = %rec.query, "skipping duplicate or empty stored search");
                continue;
            }
            queries.push(SearchRecord {
                count: rec.count.max(1),
                ..rec
            });
        }
        // Stored order already encodes recency among equal counts; a stable
        // sort keeps it.
        queries.sort_by(|a, b| b.count.cmp(&a.count));

        let mut store = Self {
            storage,
            urls,
            queries,
            dark_mode,
            limit,
        };
        store.enforce_limit(None);
        tracing::debug!(
            urls = store.urls.len(),
            queries = store.queries.len(),
            "history loaded"
        );
        store
    }

    /// A store that lives only for the current process.
    pub fn in_memory() -> Self {
        Self::open(Box::new(MemoryStorage::new()), None)
    }

    /// Remember a visited URL. Recording a URL that is already known leaves
    /// the store untouched.
    pub fn record_url(&mut self, url: &str) -> Result<(), SuggestError> {
        if url.is_empty() || self.urls.contains(url) {
            return Ok(());
        }
        self.urls.insert(url.to_string());
        self.enforce_limit(None);
        self.persist_urls()
    }

    /// Bump the usage count of `query`, inserting it with a count of 1 if it
    /// was never seen. The touched entry is placed ahead of entries with the
    /// same count.
    pub fn record_query(&mut self, query: &str) -> Result<(), SuggestError> {
        if query.is_empty() {
            return Ok(());
        }
        let count = match self.queries.iter().position(|s| s.query == query) {
            Some(pos) => self.queries.remove(pos).count.saturating_add(1),
            None => 1,
        };
        let idx = self
            .queries
            .iter()
            .position(|s| s.count <= count)
            .unwrap_or(self.queries.len());
        self.queries.insert(
            idx,
            SearchRecord {
                query: query.to_string(),
                count,
            },
        );
        self.enforce_limit(Some(query));
        self.persist_queries()
    }

    /// URLs in insertion order.
    pub fn all_urls(&self) -> Vec<String> {
        self.urls.iter().cloned().collect()
    }

    /// Queries by descending count, most recently written first among ties.
    pub fn all_queries(&self) -> Vec<SearchRecord> {
        self.queries.clone()
    }

    pub fn entries(&self) -> Vec<HistoryEntry> {
        self.snapshot().entries().collect()
    }

    pub fn snapshot(&self) -> HistorySnapshot {
        HistorySnapshot {
            urls: self.all_urls(),
            queries: self.all_queries(),
        }
    }

    /// Drop every URL and query and persist the empty state.
    pub fn clear(&mut self) -> Result<(), SuggestError> {
        self.urls.clear();
        self.queries.clear();
        let urls = self.storage.remove(RECENT_URLS_KEY);
        let queries = self.storage.remove(RECENT_SEARCHES_KEY);
        urls.and(queries).map_err(|e| {
            tracing::error!("failed to persist cleared history: {e}");
            e
        })
    }

    pub fn dark_mode(&self) -> bool {
        self.dark_mode
    }

    pub fn set_dark_mode(&mut self, dark: bool) -> Result<(), SuggestError> {
        self.dark_mode = dark;
        self.write(DARK_MODE_KEY, serde_json::Value::Bool(dark))
    }

    /// Trim both collections to the limit. Queries are evicted from the
    /// lowest rank up, never evicting `keep` while another entry remains.
    fn enforce_limit(&mut self, keep: Option<&str>) {
        let Some(limit) = self.limit else {
            return;
        };
        while self.urls.len() > limit {
            self.urls.pop_front();
        }
        while self.queries.len() > limit {
            let victim = self
                .queries
                .iter()
                .rposition(|s| Some(s.query.as_str()) != keep)
                .unwrap_or(self.queries.len() - 1);
            let evicted = self.queries.remove(victim);
            tracing::debug!(query = %evicted.query, "evicted from search history");
        }
    }

    fn persist_urls(&mut self) -> Result<(), SuggestError> {
        let value = serde_json::to_value(self.all_urls())?;
        self.write(RECENT_URLS_KEY, value)
    }

    fn persist_queries(&mut self) -> Result<(), SuggestError> {
        let value = serde_json::to_value(&self.queries)?;
        self.write(RECENT_SEARCHES_KEY, value)
    }

    fn write(&mut self, key: &str, value: serde_json::Value) -> Result<(), SuggestError> {
        self.storage.set(key, value).map_err(|e| {
            tracing::error!("error saving {key}: {e}");
            e
        })
    }
}

fn load_key<T: DeserializeOwned>(storage: &dyn Storage, key: &str) -> Option<T> {
    let value = match storage.get(key) {
        Ok(Some(v)) if !v.is_null() => v,
        Ok(_) => return None,
        Err(e) => {
            tracing::error!("error retrieving {key}: {e}");
            return None;
        }
    };
    match serde_json::from_value(value) {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::error!("error decoding {key}: {e}");
            None
        }
    }
}
