//! Preview handles for the selected image.
//!
//! A [`PreviewHandle`] is the terminal analogue of a browser object URL:
//! it is registered when an image is selected and unregistered when the
//! handle is dropped. Because release lives in `Drop`, replacing or
//! discarding a selection releases the previous handle exactly once, on
//! every path.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::encoder::SelectedImage;

/// Shared registry of live preview handles. Clones share state.
#[derive(Clone, Default)]
pub struct PreviewRegistry {
    inner: Arc<Mutex<RegistryInner>>,
}

#[derive(Default)]
struct RegistryInner {
    live: HashSet<Uuid>,
    allocated_total: u64,
    released_total: u64,
}

impl PreviewRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a preview for `image`.
    #[must_use]
    pub fn allocate(&self, image: &SelectedImage) -> PreviewHandle {
        let id = Uuid::new_v4();
        let url = format!("preview:{id}/{}", image.name());
        {
            let mut inner = self.inner.lock();
            inner.live.insert(id);
            inner.allocated_total += 1;
        }
        debug!(%url, "Allocated preview");
        PreviewHandle {
            id,
            url,
            registry: self.clone(),
        }
    }

    fn release(&self, id: Uuid, url: &str) {
        let mut inner = self.inner.lock();
        if inner.live.remove(&id) {
            inner.released_total += 1;
            debug!(%url, "Released preview");
        } else {
            warn!(%url, "Preview released twice");
        }
    }

    /// Number of previews currently registered.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.inner.lock().live.len()
    }

    /// Total previews ever allocated.
    #[must_use]
    pub fn allocated_total(&self) -> u64 {
        self.inner.lock().allocated_total
    }

    /// Total previews released.
    #[must_use]
    pub fn released_total(&self) -> u64 {
        self.inner.lock().released_total
    }

    /// Whether `url` belongs to a live preview of this registry.
    #[must_use]
    pub fn is_live(&self, url: &str) -> bool {
        let Some(id) = url
            .strip_prefix("preview:")
            .and_then(|rest| rest.split_once('/'))
            .and_then(|(id, _)| Uuid::parse_str(id).ok())
        else {
            return false;
        };
        self.inner.lock().live.contains(&id)
    }
}

impl fmt::Debug for PreviewRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("PreviewRegistry")
            .field("live", &inner.live.len())
            .field("allocated_total", &inner.allocated_total)
            .field("released_total", &inner.released_total)
            .finish()
    }
}

/// An owned, registered preview. Released when dropped.
pub struct PreviewHandle {
    id: Uuid,
    url: String,
    registry: PreviewRegistry,
}

impl PreviewHandle {
    /// The displayable preview reference.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl fmt::Debug for PreviewHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PreviewHandle").field(&self.url).finish()
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        self.registry.release(self.id, &self.url);
    }
}
