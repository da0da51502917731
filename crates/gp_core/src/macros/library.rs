use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::model::Macro;

/// Lazily loaded macros, cached by path. A missing or malformed file is
/// cached as "no macro" so a bad binding is not re-read on every press.
#[derive(Debug, Default)]
pub struct MacroLibrary {
    cache: HashMap<PathBuf, Option<Arc<Macro>>>,
}

impl MacroLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&mut self, path: &Path) -> Option<Arc<Macro>> {
        if let Some(cached) = self.cache.get(path) {
            return cached.clone();
        }
        let loaded = match Macro::load(path) {
            Ok(m) => Some(Arc::new(m)),
            Err(e) => {
                log::warn!("Macro {:?} unavailable: {}", path, e);
                None
            }
        };
        self.cache.insert(path.to_path_buf(), loaded.clone());
        loaded
    }

    /// Seed the cache, e.g. with a freshly recorded macro.
    pub fn insert(&mut self, path: impl Into<PathBuf>, macro_: Macro) -> Arc<Macro> {
        let shared = Arc::new(macro_);
        self.cache.insert(path.into(), Some(shared.clone()));
        shared
    }

    /// Forget one path so the next load re-reads it.
    pub fn invalidate(&mut self, path: &Path) {
        self.cache.remove(path);
    }

    pub fn clear(&mut self) {
        self.cache.clear();
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}
