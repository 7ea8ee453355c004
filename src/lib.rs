pub mod classify;
pub mod common;
pub mod controller;
pub mod debounce;
pub mod error;
pub mod history;
pub mod logging;
pub mod merger;
pub mod settings;
pub mod storage;
pub mod suggest;

pub use classify::{Classifier, NavigationTarget, SearchBackend, TargetKind};
pub use controller::{CommitOutcome, InputState, Key, Navigator, SearchController, SystemNavigator};
pub use error::SuggestError;
pub use history::{HistoryEntry, HistoryKind, HistorySnapshot, HistoryStore, SearchRecord};
pub use merger::{SuggestionItem, SuggestionMerger, SuggestionSource};
