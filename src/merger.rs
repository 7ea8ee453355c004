use crate::common::{fold_case, strip_prefix_ci};
use crate::history::{HistoryKind, HistorySnapshot};
use crate::suggest::Generation;
use hashlink::LinkedHashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionSource {
    History,
    Remote,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionItem {
    pub text: String,
    pub source: SuggestionSource,
    /// Zero-based position in the merged list.
    pub rank: usize,
}

/// Builds the suggestion list for the current input.
///
/// Each call to [`begin`](Self::begin) starts a new generation. Remote
/// results carry the generation they were requested for and are only merged
/// while that generation is still current, so a slow response for an older
/// keystroke can never leak into the list for newer text.
#[derive(Debug, Default)]
pub struct SuggestionMerger {
    generation: Generation,
    query: String,
    items: Vec<SuggestionItem>,
    seen: LinkedHashSet<String>,
    highlight: Option<String>,
}

impl SuggestionMerger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a render for `text` against `history` and return its generation.
    pub fn begin(&mut self, text: &str, history: &HistorySnapshot) -> Generation {
        self.generation += 1;
        self.query = text.to_string();
        self.items.clear();
        self.seen.clear();

        for entry in history.entries() {
            if strip_prefix_ci(&entry.value, text).is_some() {
                self.push(entry.value, SuggestionSource::History);
            }
        }
        self.highlight = highlight_for(text, history);

        tracing::trace!(
            generation = self.generation,
            local = self.items.len(),
            "suggestion render started"
        );
        self.generation
    }

    /// Append remote results for `generation`. Returns `false` and leaves the
    /// list untouched when the results belong to a superseded render.
    pub fn apply_remote<I>(&mut self, generation: Generation, results: I) -> bool
    where
        I: IntoIterator<Item = String>,
    {
        if generation != self.generation {
            tracing::debug!(
                stale = generation,
                current = self.generation,
                "discarding stale remote suggestions"
            );
            return false;
        }
        for text in results {
            self.push(text, SuggestionSource::Remote);
        }
        true
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn items(&self) -> &[SuggestionItem] {
        &self.items
    }

    pub fn highlight_suffix(&self) -> Option<&str> {
        self.highlight.as_deref()
    }

    fn push(&mut self, text: String, source: SuggestionSource) {
        if text.trim().is_empty() || !self.seen.insert(fold_case(&text)) {
            return;
        }
        let rank = self.items.len();
        self.items.push(SuggestionItem { text, source, rank });
    }
}

/// Inline completion for `text`: the remainder of the best ranked stored
/// query that extends it.
fn highlight_for(text: &str, history: &HistorySnapshot) -> Option<String> {
    if text.is_empty() {
        return None;
    }
    history
        .entries()
        .filter(|e| e.kind == HistoryKind::Query)
        .find_map(|e| {
            strip_prefix_ci(&e.value, text)
                .filter(|rest| !rest.is_empty())
                .map(str::to_string)
        })
}
