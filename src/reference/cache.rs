use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::config::DataConfig;
use crate::error::Result;
use crate::reference::Reference;

/// Session-wide memo of the loaded reference. The first caller pays the
/// load; later callers share the same immutable `Arc<Reference>`.
#[derive(Debug, Default)]
pub struct ReferenceCache {
    slot: Mutex<Option<(PathBuf, Arc<Reference>)>>,
}

impl ReferenceCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_load(&self, data: &DataConfig) -> Result<Arc<Reference>> {
        let mut slot = self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some((dir, reference)) = slot.as_ref() {
            if *dir == data.dir {
                debug!(dir = %dir.display(), "reference_cache_hit");
                return Ok(Arc::clone(reference));
            }
        }
        let reference = Arc::new(Reference::load(data)?);
        *slot = Some((data.dir.clone(), Arc::clone(&reference)));
        Ok(reference)
    }

    pub fn clear(&self) {
        let mut slot = self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        *slot = None;
    }
}
