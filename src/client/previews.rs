use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use uuid::Uuid;

use crate::client::models::SelectedFile;

/// Source of local preview URLs for selected files.
///
/// Every URL returned by `create` must eventually be passed to `revoke`.
pub trait PreviewUrlFactory {
    fn create(&mut self, file: &SelectedFile) -> String;
    fn revoke(&mut self, url: &str);
}

/// Issues `blob:` handles backed by an in-process map.
///
/// Clones share the same map, so a caller can keep a handle to inspect
/// live URLs while the client owns another.
#[derive(Debug, Clone, Default)]
pub struct BlobUrlFactory {
    live: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl BlobUrlFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of URLs created and not yet revoked
    pub fn live_count(&self) -> usize {
        self.live
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[cfg(test)]
    pub fn is_live(&self, url: &str) -> bool {
        self.live
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(url)
    }

    /// Bytes behind a live URL
    #[cfg(test)]
    pub fn resolve(&self, url: &str) -> Option<Vec<u8>> {
        self.live
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(url)
            .cloned()
    }
}

impl PreviewUrlFactory for BlobUrlFactory {
    fn create(&mut self, file: &SelectedFile) -> String {
        let url = format!("blob:catfish/{}", Uuid::new_v4());
        self.live
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(url.clone(), file.data.clone());
        url
    }

    fn revoke(&mut self, url: &str) {
        self.live
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(url);
    }
}

/// One preview URL per selected file, index-aligned with the selection.
///
/// Replacing or clearing the selection revokes the previous URLs first, and
/// dropping the set revokes whatever is left.
pub struct PreviewSet<P: PreviewUrlFactory> {
    factory: P,
    urls: Vec<String>,
}

impl<P: PreviewUrlFactory> PreviewSet<P> {
    pub fn new(factory: P) -> Self {
        Self {
            factory,
            urls: Vec::new(),
        }
    }

    pub fn urls(&self) -> &[String] {
        &self.urls
    }

    pub fn replace(&mut self, files: &[SelectedFile]) {
        self.clear();
        self.urls = files.iter().map(|file| self.factory.create(file)).collect();
    }

    pub fn clear(&mut self) {
        for url in self.urls.drain(..) {
            self.factory.revoke(&url);
        }
    }
}

impl<P: PreviewUrlFactory> Drop for PreviewSet<P> {
    fn drop(&mut self) {
        self.clear();
    }
}
