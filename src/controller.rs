use crate::classify::{Classifier, NavigationTarget, SearchBackend, TargetKind};
use crate::error::SuggestError;
use crate::history::{HistoryStore, SearchRecord};
use crate::merger::{SuggestionItem, SuggestionMerger};
use crate::suggest::{FetchCompletion, SuggestClient};
use std::time::{Duration, Instant};

/// Opens resolved targets. The popup itself never navigates.
pub trait Navigator {
    fn open(&mut self, target: &NavigationTarget) -> anyhow::Result<()>;
}

/// Opens targets in the system's default browser.
pub struct SystemNavigator;

impl Navigator for SystemNavigator {
    fn open(&mut self, target: &NavigationTarget) -> anyhow::Result<()> {
        tracing::info!(destination = %target.destination, "opening");
        open::that(&target.destination)?;
        Ok(())
    }
}

/// Text box state. `selected_index == None` means the typed text is
/// authoritative.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputState {
    pub raw_text: String,
    pub highlight_suffix: Option<String>,
    pub selected_index: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Enter,
    Escape,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    Navigated(NavigationTarget),
    /// Nothing to commit; no navigation and no history write happened.
    Ignored,
}

/// Keyboard selection and commit handling on top of the suggestion engine.
///
/// All methods run on the caller's thread. Remote results are picked up in
/// [`tick`](Self::tick).
pub struct SearchController<N: Navigator> {
    history: HistoryStore,
    merger: SuggestionMerger,
    remote: Option<SuggestClient>,
    classifier: Classifier,
    navigator: N,
    backend: SearchBackend,
    input: InputState,
    list_visible: bool,
    closed: bool,
}

impl<N: Navigator> SearchController<N> {
    pub fn new(
        history: HistoryStore,
        remote: Option<SuggestClient>,
        classifier: Classifier,
        navigator: N,
        backend: SearchBackend,
    ) -> Self {
        let mut ctrl = Self {
            history,
            merger: SuggestionMerger::new(),
            remote,
            classifier,
            navigator,
            backend,
            input: InputState::default(),
            list_visible: false,
            closed: false,
        };
        ctrl.render_local("");
        ctrl.list_visible = !ctrl.merger.items().is_empty();
        ctrl
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn items(&self) -> &[SuggestionItem] {
        self.merger.items()
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    pub fn backend(&self) -> SearchBackend {
        self.backend
    }

    pub fn set_backend(&mut self, backend: SearchBackend) {
        self.backend = backend;
    }

    pub fn is_list_visible(&self) -> bool {
        self.list_visible
    }

    /// True once a commit has navigated somewhere; the popup should close.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Queries by rank, for the "recent searches" panel.
    pub fn recent_searches(&self) -> Vec<SearchRecord> {
        self.history.all_queries()
    }

    /// What the text box shows: the highlighted suggestion while navigating
    /// the list, the typed text otherwise.
    pub fn display_text(&self) -> &str {
        self.selected_item()
            .map(|item| item.text.as_str())
            .unwrap_or(self.input.raw_text.as_str())
    }

    /// Typed text followed by the inline completion, if one is live.
    pub fn ghost_text(&self) -> Option<String> {
        if self.input.selected_index.is_some() {
            return None;
        }
        self.input
            .highlight_suffix
            .as_ref()
            .map(|suffix| format!("{}{suffix}", self.input.raw_text))
    }

    /// Handle the text box content changing by typing.
    pub fn type_text(&mut self, text: &str, now: Instant) {
        self.input.raw_text = text.to_string();
        self.input.selected_index = None;
        self.list_visible = true;
        self.closed = false;
        let generation = self.render_local(text);
        if let Some(remote) = self.remote.as_mut() {
            remote.request(text, generation, now);
        }
    }

    /// Handle a navigation key. Enter commits and returns the outcome.
    pub fn key(&mut self, key: Key) -> Result<Option<CommitOutcome>, SuggestError> {
        let len = self.merger.items().len();
        match key {
            // The first arrow press after Escape only brings the list back.
            Key::Up | Key::Down if !self.list_visible => self.list_visible = len > 0,
            Key::Down => {
                self.input.selected_index = match self.input.selected_index {
                    None if len > 0 => Some(0),
                    Some(i) if i + 1 < len => Some(i + 1),
                    other => other,
                };
            }
            Key::Up => {
                if let Some(i) = self.input.selected_index {
                    if i > 0 {
                        self.input.selected_index = Some(i - 1);
                    }
                }
            }
            Key::Escape => self.list_visible = false,
            Key::Enter => return self.commit().map(Some),
        }
        Ok(None)
    }

    /// Commit the suggestion at `index`, as a mouse click does.
    pub fn click(&mut self, index: usize) -> Result<CommitOutcome, SuggestError> {
        let Some(item) = self.merger.items().get(index) else {
            tracing::warn!(index, "click outside the suggestion list");
            return Ok(CommitOutcome::Ignored);
        };
        let text = item.text.clone();
        self.commit_exact(&text)
    }

    /// Commit the current input: the selected suggestion, or the typed text
    /// completed by the inline hint, or the typed text as is.
    pub fn commit(&mut self) -> Result<CommitOutcome, SuggestError> {
        let text = match self.selected_item() {
            Some(item) => item.text.clone(),
            None => match &self.input.highlight_suffix {
                Some(suffix) => format!("{}{suffix}", self.input.raw_text),
                None => self.input.raw_text.clone(),
            },
        };
        self.commit_exact(&text)
    }

    /// Drive the remote client. Returns true when the list changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let completions = match self.remote.as_mut() {
            Some(remote) => remote.poll(now),
            None => return false,
        };
        let mut changed = false;
        for done in completions {
            changed |= self.apply_completion(done);
        }
        changed
    }

    /// Fire any debounced request right away and block until one fetch
    /// finishes. Returns true when its results were merged.
    pub fn wait_for_remote(&mut self, timeout: Duration) -> bool {
        let done = match self.remote.as_mut() {
            Some(remote) => {
                remote.flush();
                remote.wait(timeout)
            }
            None => None,
        };
        done.map(|d| self.apply_completion(d)).unwrap_or(false)
    }

    /// Forget every URL and query, then re-render the current input.
    pub fn clear_history(&mut self) {
        if let Err(e) = self.history.clear() {
            tracing::warn!("history cleared in memory only: {e}");
        }
        self.input.selected_index = None;
        let text = self.input.raw_text.clone();
        self.render_local(&text);
        tracing::info!("history cleared");
    }

    fn selected_item(&self) -> Option<&SuggestionItem> {
        self.input
            .selected_index
            .and_then(|i| self.merger.items().get(i))
    }

    fn render_local(&mut self, text: &str) -> crate::suggest::Generation {
        let snapshot = self.history.snapshot();
        let generation = self.merger.begin(text, &snapshot);
        self.input.highlight_suffix = self.merger.highlight_suffix().map(str::to_string);
        generation
    }

    fn apply_completion(&mut self, done: FetchCompletion) -> bool {
        match done.result {
            Ok(list) => self.merger.apply_remote(done.generation, list),
            Err(e) => {
                tracing::warn!(query = %done.query, "suggestions unavailable: {e}");
                false
            }
        }
    }

    fn resolve(&self, text: &str) -> Result<NavigationTarget, SuggestError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SuggestError::EmptyCommit);
        }
        Ok(self.classifier.classify(text, self.backend))
    }

    /// Resolve and open `text` verbatim, then record it in history.
    pub fn commit_exact(&mut self, text: &str) -> Result<CommitOutcome, SuggestError> {
        let target = match self.resolve(text) {
            Ok(t) => t,
            Err(SuggestError::EmptyCommit) => {
                tracing::debug!("ignoring empty commit");
                return Ok(CommitOutcome::Ignored);
            }
            Err(e) => return Err(e),
        };
        if let Err(e) = self.navigator.open(&target) {
            tracing::error!(destination = %target.destination, "navigation failed: {e:#}");
            return Err(SuggestError::Navigation(e.to_string()));
        }

        let text = text.trim();
        let recorded = match target.kind {
            TargetKind::DirectUrl => self.history.record_url(text),
            TargetKind::SearchQuery => self.history.record_query(text),
        };
        if let Err(e) = recorded {
            tracing::warn!("commit not persisted: {e}");
        }

        self.input = InputState::default();
        if let Some(remote) = self.remote.as_mut() {
            remote.cancel();
        }
        self.render_local("");
        self.list_visible = false;
        self.closed = true;
        Ok(CommitOutcome::Navigated(target))
    }
}
