//! Resolve style adapters by identifier

use super::adapter::{DefaultAdapter, StyleAdapter, TableAdapter, DEFAULT_STYLE_SYSTEM};
use crate::error::AdapterLoadError;
use crate::ir::validate::is_style_system_id;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

/// Adapter lookup: in-process registry first, then `<adapters_dir>/<id>.toml`.
///
/// A file is read once; later lookups of the same id are served from a cache
/// shared by every clone of the loader. Failed loads are not cached.
#[derive(Debug, Clone)]
pub struct StyleAdapterLoader {
    registry: HashMap<String, Arc<dyn StyleAdapter>>,
    adapters_dir: Option<PathBuf>,
    builtin: Arc<dyn StyleAdapter>,
    loaded: Arc<RwLock<HashMap<String, Arc<dyn StyleAdapter>>>>,
}

impl Default for StyleAdapterLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl StyleAdapterLoader {
    pub fn new() -> Self {
        Self {
            registry: HashMap::new(),
            adapters_dir: None,
            builtin: Arc::new(DefaultAdapter),
            loaded: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Look for `<id>.toml` adapter definitions in `dir`.
    pub fn with_adapters_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.adapters_dir = Some(dir.into());
        self.loaded = Arc::new(RwLock::new(HashMap::new()));
        self
    }

    /// Forget adapters read from disk so the next lookup re-reads their files.
    pub fn clear_cache(&self) {
        if let Ok(mut loaded) = self.loaded.write() {
            loaded.clear();
        }
    }

    /// Register an in-process adapter under its own id.
    pub fn register(&mut self, adapter: Arc<dyn StyleAdapter>) {
        self.registry.insert(adapter.id().to_string(), adapter);
    }

    /// Built-in fallback adapter.
    pub fn builtin(&self) -> Arc<dyn StyleAdapter> {
        Arc::clone(&self.builtin)
    }

    /// Resolve the adapter for a component.
    ///
    /// Order: the IR's `styleSystem`, then the caller's default, then the
    /// built-in adapter. A failed load is logged and degrades to the built-in
    /// adapter; this never aborts the pipeline.
    pub fn load(&self, ir_style: Option<&str>, caller_default: Option<&str>) -> Arc<dyn StyleAdapter> {
        let Some(id) = ir_style.or(caller_default) else {
            return self.builtin();
        };

        match self.try_load(id) {
            Ok(adapter) => adapter,
            Err(err) => {
                tracing::warn!("Style adapter {:?} unavailable, using built-in: {}", id, err);
                self.builtin()
            }
        }
    }

    /// Resolve an adapter strictly, reporting why it could not be loaded.
    pub fn try_load(&self, id: &str) -> Result<Arc<dyn StyleAdapter>, AdapterLoadError> {
        if id == DEFAULT_STYLE_SYSTEM {
            return Ok(self.builtin());
        }
        if let Some(adapter) = self.registry.get(id) {
            return Ok(Arc::clone(adapter));
        }
        // The id becomes a file name; reject anything that could escape the directory
        if !is_style_system_id(id) {
            return Err(AdapterLoadError::InvalidId(id.to_string()));
        }

        if let Some(adapter) = self.loaded.read().ok().and_then(|loaded| loaded.get(id).cloned()) {
            return Ok(adapter);
        }

        let Some(dir) = self.adapters_dir.as_ref() else {
            return Err(AdapterLoadError::Unknown(id.to_string()));
        };
        let path = dir.join(format!("{}.toml", id));
        if !path.exists() {
            return Err(AdapterLoadError::Unknown(id.to_string()));
        }

        let text = std::fs::read_to_string(&path).map_err(|source| AdapterLoadError::Io {
            id: id.to_string(),
            source,
        })?;
        let adapter = TableAdapter::from_toml(id, &text).map_err(|message| AdapterLoadError::Parse {
            id: id.to_string(),
            message,
        })?;

        tracing::debug!("Loaded style adapter {:?} from {}", id, path.display());
        let adapter: Arc<dyn StyleAdapter> = Arc::new(adapter);
        if let Ok(mut loaded) = self.loaded.write() {
            loaded.insert(id.to_string(), Arc::clone(&adapter));
        }
        Ok(adapter)
    }
}
