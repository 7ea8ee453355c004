use serde::{Deserialize, Serialize};
use url::{Host, Url};
use urlencoding::encode;

/// Top-level domains treated as navigable when no list is configured.
pub const DEFAULT_TLDS: &[&str] = &[
    "com", "org", "net", "de", "edu", "gov", "io", "tv", "co", "biz", "info", "site", "at",
    "uk", "ca", "au",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SearchBackend {
    #[default]
    Web,
    Images,
    #[serde(alias = "youtube")]
    Videos,
}

impl SearchBackend {
    /// Search URL for `query` with the query percent-encoded.
    pub fn search_url(&self, query: &str) -> String {
        let q = encode(query);
        match self {
            SearchBackend::Web => format!("https://www.google.com/search?q={q}"),
            SearchBackend::Images => format!("https://www.google.com/search?tbm=isch&q={q}"),
            SearchBackend::Videos => format!("https://www.youtube.com/results?search_query={q}"),
        }
    }
}

impl std::fmt::Display for SearchBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchBackend::Web => write!(f, "web"),
            SearchBackend::Images => write!(f, "images"),
            SearchBackend::Videos => write!(f, "videos"),
        }
    }
}

impl std::str::FromStr for SearchBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "web" | "all" => Ok(SearchBackend::Web),
            "images" | "image" => Ok(SearchBackend::Images),
            "videos" | "video" | "youtube" => Ok(SearchBackend::Videos),
            other => Err(format!("unknown search backend '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    DirectUrl,
    SearchQuery,
}

/// Where a committed string should take the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationTarget {
    pub kind: TargetKind,
    pub destination: String,
    pub search_backend: Option<SearchBackend>,
}

impl NavigationTarget {
    /// Blank input resolves to a search with nowhere to go.
    pub fn is_empty(&self) -> bool {
        self.destination.is_empty()
    }
}

/// Decides whether text is an address to open or a phrase to search for.
#[derive(Debug, Clone)]
pub struct Classifier {
    tlds: Vec<String>,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(DEFAULT_TLDS.iter().copied())
    }
}

impl Classifier {
    pub fn new<I, S>(tlds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tlds = tlds
            .into_iter()
            .map(|t| t.as_ref().trim().trim_start_matches('.').to_ascii_lowercase())
            .filter(|t| !t.is_empty())
            .collect();
        Self { tlds }
    }

    pub fn tlds(&self) -> &[String] {
        &self.tlds
    }

    pub fn classify(&self, text: &str, backend: SearchBackend) -> NavigationTarget {
        let text = text.trim();
        if text.is_empty() {
            return NavigationTarget {
                kind: TargetKind::SearchQuery,
                destination: String::new(),
                search_backend: Some(backend),
            };
        }
        if let Some(destination) = self.as_direct_url(text) {
            return NavigationTarget {
                kind: TargetKind::DirectUrl,
                destination,
                search_backend: None,
            };
        }
        NavigationTarget {
            kind: TargetKind::SearchQuery,
            destination: backend.search_url(text),
            search_backend: Some(backend),
        }
    }

    /// The navigable form of `text`, or `None` if it should be searched.
    ///
    /// The `http://` prefix used for parsing is only a probe; the returned
    /// destination keeps whatever scheme the user typed.
    fn as_direct_url(&self, text: &str) -> Option<String> {
        if text.chars().any(char::is_whitespace) {
            return None;
        }
        let has_scheme = has_http_scheme(text);
        let probe = if has_scheme {
            text.to_string()
        } else {
            format!("http://{text}")
        };
        let url = Url::parse(&probe).ok()?;
        let Some(Host::Domain(host)) = url.host() else {
            return None;
        };
        let (_, tld) = host.trim_end_matches('.').rsplit_once('.')?;
        if !self.tlds.iter().any(|t| t.eq_ignore_ascii_case(tld)) {
            return None;
        }
        Some(probe)
    }
}

fn has_http_scheme(text: &str) -> bool {
    crate::common::strip_prefix_ci(text, "http://").is_some()
        || crate::common::strip_prefix_ci(text, "https://").is_some()
}
