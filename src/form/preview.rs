use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use uuid::Uuid;

type Registry = Arc<Mutex<HashMap<Uuid, PathBuf>>>;

/// Registry of live preview handles for locally picked image files.
#[derive(Clone, Default)]
pub struct PreviewStore {
    inner: Registry,
}

impl PreviewStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a preview for `path`. The handle is revoked when the guard drops.
    pub fn acquire(&self, path: impl AsRef<Path>) -> PreviewGuard {
        let id = Uuid::new_v4();
        let path = path.as_ref().to_path_buf();
        tracing::trace!(%id, path = %path.display(), "preview acquired");
        lock(&self.inner).insert(id, path);
        PreviewGuard {
            id,
            registry: Arc::clone(&self.inner),
        }
    }

    pub fn resolve(&self, url: &str) -> Option<PathBuf> {
        let id = url.strip_prefix(PreviewGuard::SCHEME)?;
        let id = Uuid::parse_str(id).ok()?;
        lock(&self.inner).get(&id).cloned()
    }

    pub fn live_count(&self) -> usize {
        lock(&self.inner).len()
    }
}

impl fmt::Debug for PreviewStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreviewStore")
            .field("live", &self.live_count())
            .finish()
    }
}

/// Owned preview handle. Unique, so it cannot outlive the value it previews.
pub struct PreviewGuard {
    id: Uuid,
    registry: Registry,
}

impl PreviewGuard {
    const SCHEME: &'static str = "preview://";

    pub fn url(&self) -> String {
        format!("{}{}", Self::SCHEME, self.id)
    }
}

impl fmt::Debug for PreviewGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PreviewGuard").field(&self.id).finish()
    }
}

impl Drop for PreviewGuard {
    fn drop(&mut self) {
        lock(&self.registry).remove(&self.id);
        tracing::trace!(id = %self.id, "preview revoked");
    }
}

// A poisoned registry only means another thread panicked mid-insert; the map
// itself is still usable.
fn lock(registry: &Registry) -> MutexGuard<'_, HashMap<Uuid, PathBuf>> {
    registry
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}
