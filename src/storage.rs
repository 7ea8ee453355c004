use crate::error::SuggestError;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Key-value persistence used by the history store.
///
/// Values are JSON documents. `get` returns `Ok(None)` for absent keys.
pub trait Storage: Send {
    fn get(&self, key: &str) -> Result<Option<Value>, SuggestError>;
    fn set(&mut self, key: &str, value: Value) -> Result<(), SuggestError>;
    fn remove(&mut self, key: &str) -> Result<(), SuggestError>;
}

/// Storage backed by a single JSON object on disk.
///
/// The whole object is kept in memory and rewritten on every mutation. Writes
/// go to a sibling temp file which is then renamed over the target.
pub struct JsonFileStorage {
    path: PathBuf,
    doc: Map<String, Value>,
}

impl JsonFileStorage {
    /// Open the document at `path`. A missing or empty file yields an empty
    /// document; an unreadable file or one that is not a JSON object is an
    /// error.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SuggestError> {
        let path = path.into();
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(e) => {
                return Err(SuggestError::Persistence(format!(
                    "failed to read {}: {e}",
                    path.display()
                )))
            }
        };
        let doc = if content.trim().is_empty() {
            Map::new()
        } else {
            match serde_json::from_str::<Value>(&content)? {
                Value::Object(map) => map,
                other => {
                    return Err(SuggestError::Persistence(format!(
                        "{} does not contain a JSON object (found {})",
                        path.display(),
                        kind_of(&other)
                    )))
                }
            }
        };
        Ok(Self { path, doc })
    }

    /// Open `path`, falling back to an empty document if the file is
    /// unreadable. The next write replaces the broken file.
    pub fn open_or_empty(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match Self::open(&path) {
            Ok(s) => s,
            Err(e) => {
                tracing::error!("failed to load {}: {e}", path.display());
                Self {
                    path,
                    doc: Map::new(),
                }
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), SuggestError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(&self.doc)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl Storage for JsonFileStorage {
    fn get(&self, key: &str) -> Result<Option<Value>, SuggestError> {
        Ok(self.doc.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: Value) -> Result<(), SuggestError> {
        self.doc.insert(key.to_string(), value);
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<(), SuggestError> {
        if self.doc.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}

/// In-memory storage. Useful for tests and throwaway sessions.
#[derive(Default)]
pub struct MemoryStorage {
    values: HashMap<String, Value>,
    fail_writes: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `set`/`remove` fail, as a full disk would.
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    pub fn with_value(mut self, key: &str, value: Value) -> Self {
        self.values.insert(key.to_string(), value);
        self
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<Value>, SuggestError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: Value) -> Result<(), SuggestError> {
        if self.fail_writes {
            return Err(SuggestError::Persistence("quota exceeded".into()));
        }
        self.values.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), SuggestError> {
        if self.fail_writes {
            return Err(SuggestError::Persistence("quota exceeded".into()));
        }
        self.values.remove(key);
        Ok(())
    }
}

fn kind_of(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
