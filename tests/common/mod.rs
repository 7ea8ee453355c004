#![allow(dead_code)]

use popup_search::classify::NavigationTarget;
use popup_search::controller::Navigator;
use popup_search::error::SuggestError;
use popup_search::suggest::SuggestionProvider;
use std::collections::HashMap;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex};

/// Provider whose responses are held back until the test releases them.
///
/// Each query gets its own gate. Dropping a gate's sender lets that query
/// answer immediately.
pub struct GatedProvider {
    responses: HashMap<String, Vec<String>>,
    gates: HashMap<String, Mutex<Receiver<()>>>,
    calls: Mutex<Vec<String>>,
}

impl GatedProvider {
    pub fn new(responses: &[(&str, &[&str])]) -> (Arc<Self>, HashMap<String, Sender<()>>) {
        let mut gates = HashMap::new();
        let mut senders = HashMap::new();
        let mut map = HashMap::new();
        for (query, results) in responses {
            let (tx, rx) = channel();
            gates.insert(query.to_string(), Mutex::new(rx));
            senders.insert(query.to_string(), tx);
            map.insert(
                query.to_string(),
                results.iter().map(|s| s.to_string()).collect(),
            );
        }
        let provider = Arc::new(Self {
            responses: map,
            gates,
            calls: Mutex::new(Vec::new()),
        });
        (provider, senders)
    }

    /// Provider answering every known query straight away.
    pub fn immediate(responses: &[(&str, &[&str])]) -> Arc<Self> {
        let (provider, _senders) = Self::new(responses);
        provider
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl SuggestionProvider for GatedProvider {
    fn fetch(&self, query: &str) -> Result<Vec<String>, SuggestError> {
        self.calls.lock().unwrap().push(query.to_string());
        if let Some(gate) = self.gates.get(query) {
            let _ = gate.lock().unwrap().recv();
        }
        Ok(self.responses.get(query).cloned().unwrap_or_default())
    }
}

pub struct FailingProvider(pub SuggestError);

impl SuggestionProvider for FailingProvider {
    fn fetch(&self, _query: &str) -> Result<Vec<String>, SuggestError> {
        Err(self.0.clone())
    }
}

#[derive(Default)]
pub struct RecordingNavigator {
    pub opened: Vec<NavigationTarget>,
    pub fail: bool,
}

impl Navigator for RecordingNavigator {
    fn open(&mut self, target: &NavigationTarget) -> anyhow::Result<()> {
        if self.fail {
            anyhow::bail!("no browser available");
        }
        self.opened.push(target.clone());
        Ok(())
    }
}
