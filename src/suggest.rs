//! Remote autocomplete client.
//!
//! A [`SuggestionProvider`] performs one blocking request. [`SuggestClient`]
//! sits in front of it on the UI thread: it debounces requests, suppresses
//! duplicate fetches for a query that is already in flight and hands
//! finished fetches back through [`SuggestClient::poll`] tagged with the
//! render generation they belong to.

use crate::common::looks_like_url;
use crate::debounce::Debouncer;
use crate::error::SuggestError;
use reqwest::blocking::Client;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

/// Monotonic render counter used to discard stale results.
pub type Generation = u64;

pub const DEFAULT_ENDPOINT: &str = "https://suggestqueries.google.com/complete/search?client=firefox";
pub const DEFAULT_QUERY_PARAM: &str = "q";
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

pub trait SuggestionProvider: Send + Sync {
    /// Return completions for `query` in the provider's rank order.
    fn fetch(&self, query: &str) -> Result<Vec<String>, SuggestError>;
}

/// Fetches completions from an OpenSearch-style JSON endpoint.
pub struct HttpSuggestionProvider {
    client: Client,
    endpoint: Url,
    param: String,
}

impl HttpSuggestionProvider {
    pub fn new(endpoint: &str, param: &str, timeout: Duration) -> anyhow::Result<Self> {
        let endpoint = Url::parse(endpoint)?;
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("popup-search suggest")
            .build()?;
        Ok(Self {
            client,
            endpoint,
            param: param.to_string(),
        })
    }

    /// Endpoint with the fragment appended as the configured query parameter.
    pub fn request_url(&self, query: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair(&self.param, query);
        url
    }
}

impl SuggestionProvider for HttpSuggestionProvider {
    fn fetch(&self, query: &str) -> Result<Vec<String>, SuggestError> {
        let url = self.request_url(query);
        tracing::debug!(%url, "fetching suggestions");
        let resp = self.client.get(url).send()?;
        if !resp.status().is_success() {
            return Err(SuggestError::Network(format!("http status {}", resp.status())));
        }
        let body = resp.text()?;
        parse_suggestions(&body)
    }
}

/// Decode a `[query, [candidates...], ...]` response body.
///
/// Candidates that look like raw URLs are dropped; navigable addresses come
/// from local history instead.
pub fn parse_suggestions(body: &str) -> Result<Vec<String>, SuggestError> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| SuggestError::Protocol(e.to_string()))?;
    let Value::Array(parts) = value else {
        return Err(SuggestError::Protocol("expected a JSON array".into()));
    };
    let Some(Value::Array(candidates)) = parts.get(1) else {
        return Err(SuggestError::Protocol(
            "second element is not a list of candidates".into(),
        ));
    };
    let mut out = Vec::with_capacity(candidates.len());
    for c in candidates {
        let Some(s) = c.as_str() else {
            return Err(SuggestError::Protocol(format!("non-string candidate {c}")));
        };
        if !looks_like_url(s) {
            out.push(s.to_string());
        }
    }
    Ok(out)
}

/// Result of one remote fetch, addressed to the render generation that
/// should receive it.
#[derive(Debug)]
pub struct FetchCompletion {
    pub generation: Generation,
    pub query: String,
    pub result: Result<Vec<String>, SuggestError>,
}

#[derive(Debug)]
struct PendingRequest {
    query: String,
    generation: Generation,
}

type FetchMessage = (String, Result<Vec<String>, SuggestError>);

pub struct SuggestClient {
    provider: Arc<dyn SuggestionProvider>,
    debouncer: Debouncer<PendingRequest>,
    /// Query text of each outstanding fetch and the newest generation
    /// waiting on it.
    in_flight: HashMap<String, Generation>,
    tx: Sender<FetchMessage>,
    rx: Receiver<FetchMessage>,
}

impl SuggestClient {
    pub fn new(provider: Arc<dyn SuggestionProvider>, debounce: Duration) -> Self {
        let (tx, rx) = channel();
        Self {
            provider,
            debouncer: Debouncer::new(debounce),
            in_flight: HashMap::new(),
            tx,
            rx,
        }
    }

    /// Schedule a fetch for `query` one debounce window after `now`,
    /// replacing any request that has not fired yet.
    pub fn request(&mut self, query: &str, generation: Generation, now: Instant) {
        let query = query.trim();
        if query.is_empty() {
            self.cancel();
            return;
        }
        let replaced = self.debouncer.schedule(
            PendingRequest {
                query: query.to_string(),
                generation,
            },
            now,
        );
        if let Some(old) = replaced {
            tracing::trace!(query = %old.query, "debounced suggestion request superseded");
        }
    }

    /// Drop the scheduled request. Fetches already running are unaffected;
    /// their results are filtered by generation on arrival.
    pub fn cancel(&mut self) {
        self.debouncer.cancel();
    }

    /// Fire a due request and collect finished fetches.
    pub fn poll(&mut self, now: Instant) -> Vec<FetchCompletion> {
        if let Some(req) = self.debouncer.poll(now) {
            self.dispatch(req);
        }
        let mut done = Vec::new();
        while let Ok(msg) = self.rx.try_recv() {
            if let Some(c) = self.complete(msg) {
                done.push(c);
            }
        }
        done
    }

    /// Fire the scheduled request immediately, ignoring the debounce window.
    pub fn flush(&mut self) {
        if let Some(req) = self.debouncer.cancel() {
            self.dispatch(req);
        }
    }

    /// Block until the next fetch finishes or `timeout` elapses.
    pub fn wait(&mut self, timeout: Duration) -> Option<FetchCompletion> {
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.rx.recv_timeout(remaining) {
                Ok(msg) => {
                    if let Some(c) = self.complete(msg) {
                        return Some(c);
                    }
                }
                Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                    return None
                }
            }
        }
    }

    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    fn dispatch(&mut self, req: PendingRequest) {
        if let Some(generation) = self.in_flight.get_mut(&req.query) {
            tracing::debug!(query = %req.query, "joining in-flight suggestion fetch");
            *generation = req.generation;
            return;
        }
        self.in_flight.insert(req.query.clone(), req.generation);
        let provider = Arc::clone(&self.provider);
        let tx = self.tx.clone();
        let query = req.query;
        std::thread::spawn(move || {
            let result = provider.fetch(&query);
            let _ = tx.send((query, result));
        });
    }

    fn complete(&mut self, (query, result): FetchMessage) -> Option<FetchCompletion> {
        let generation = self.in_flight.remove(&query)?;
        Some(FetchCompletion {
            generation,
            query,
            result,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_firefox_style_response() {
        let body = r#"["rust",["rust","rust lang","https://rust-lang.org","rust book"]]"#;
        assert_eq!(
            parse_suggestions(body).unwrap(),
            vec!["rust", "rust lang", "rust book"]
        );
    }

    #[test]
    fn extra_elements_are_ignored() {
        let body = r#"["q",["a","b"],[],{"google:suggesttype":["QUERY","QUERY"]}]"#;
        assert_eq!(parse_suggestions(body).unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn malformed_shapes_are_protocol_errors() {
        for body in [
            "not json",
            r#"{"q":"x"}"#,
            r#"["only one"]"#,
            r#"["q","not a list"]"#,
            r#"["q",["ok",3]]"#,
        ] {
            assert!(
                matches!(parse_suggestions(body), Err(SuggestError::Protocol(_))),
                "{body} should be rejected"
            );
        }
    }

    #[test]
    fn request_url_encodes_fragment() {
        let p = HttpSuggestionProvider::new(
            DEFAULT_ENDPOINT,
            DEFAULT_QUERY_PARAM,
            Duration::from_secs(5),
        )
        .unwrap();
        let url = p.request_url("c++ & rust");
        assert_eq!(url.host_str(), Some("suggestqueries.google.com"));
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("client".to_string(), "firefox".to_string()),
                ("q".to_string(), "c++ & rust".to_string()),
            ]
        );
    }
}
