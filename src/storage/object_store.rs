//! Image storage for product uploads
//!
//! Upload transport happens elsewhere; the catalog only receives a
//! reference to a stored object and persists the resolved location.

use crate::core::error::ShopError;
use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};

/// Resolves uploaded object references to stored locations
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Map an upload reference to the location saved on the product
    async fn locate(&self, reference: &str) -> Result<String, ShopError>;
}

/// Objects stored under a local directory
#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    root: PathBuf,
}

impl LocalObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn locate(&self, reference: &str) -> Result<String, ShopError> {
        let reference = reference.trim();
        if reference.is_empty() {
            return Err(ShopError::invalid_input("image", "reference is empty"));
        }

        let relative = Path::new(reference);
        let confined = relative
            .components()
            .all(|component| matches!(component, Component::Normal(_)));
        if !confined || reference.contains('\\') {
            return Err(ShopError::invalid_input(
                "image",
                format!("'{}' escapes the upload directory", reference),
            ));
        }

        Ok(self.root.join(relative).to_string_lossy().into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ErrorKind;

    #[tokio::test]
    async fn test_locate_joins_root() {
        let store = LocalObjectStore::new("uploads");
        let location = store.locate("products/dune.png").await.unwrap();
        assert_eq!(location, Path::new("uploads/products/dune.png").to_string_lossy());
    }

    #[tokio::test]
    async fn test_locate_rejects_escapes() {
        let store = LocalObjectStore::new("uploads");
        for reference in ["../etc/passwd", "/etc/passwd", "a/../../b", "  ", "a\\b"] {
            let err = store.locate(reference).await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidInput, "{}", reference);
        }
    }
}
