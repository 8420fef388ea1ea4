//! Remote document store capability
//!
//! Two provider shapes exist in the wild: a single JSON blob with
//! get/put semantics, and a per-collection file tree with read-modify-
//! write on a revision token. Both sit behind [`RemoteStore`], selected
//! by configuration rather than by inheritance.

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::{RemoteConfig, RemoteProvider};
use crate::model::Document;
use crate::store::blob::BlobStore;
use crate::store::error::{StoreError, StoreResult};
use crate::store::files::FileTreeStore;

/// A remote key-value home for the document
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Short provider label for logs
    fn describe(&self) -> &'static str;

    /// Fetch the full document from the remote store
    async fn load(&self) -> StoreResult<Document>;

    /// Overwrite the remote copy wholesale. No optimistic-concurrency
    /// token at the document level; last write wins.
    async fn save(&self, doc: &Document) -> StoreResult<()>;
}

/// Build the configured remote provider, if any
///
/// Returns `Ok(None)` for explicit local-only mode. A selected provider
/// with incomplete credentials yields [`StoreError::CredentialsMissing`].
pub fn remote_from_config(config: &RemoteConfig) -> StoreResult<Option<Arc<dyn RemoteStore>>> {
    match config.provider {
        RemoteProvider::None => Ok(None),
        RemoteProvider::Blob => {
            let blob = config
                .blob
                .as_ref()
                .ok_or(StoreError::CredentialsMissing)?;
            let store = BlobStore::new(blob.clone(), config.request_timeout_ms)?;
            Ok(Some(Arc::new(store)))
        }
        RemoteProvider::Files => {
            let files = config
                .files
                .as_ref()
                .ok_or(StoreError::CredentialsMissing)?;
            let store = FileTreeStore::new(files.clone(), config.request_timeout_ms)?;
            Ok(Some(Arc::new(store)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BlobProviderConfig;

    #[test]
    fn test_provider_none_builds_no_remote() {
        let config = RemoteConfig::default();
        assert!(remote_from_config(&config).unwrap().is_none());
    }

    #[test]
    fn test_blob_provider_without_credentials_fails() {
        let config = RemoteConfig {
            provider: RemoteProvider::Blob,
            ..RemoteConfig::default()
        };
        assert!(matches!(
            remote_from_config(&config),
            Err(StoreError::CredentialsMissing)
        ));
    }

    #[test]
    fn test_blob_provider_builds() {
        let config = RemoteConfig {
            provider: RemoteProvider::Blob,
            blob: Some(BlobProviderConfig {
                endpoint: "https://api.jsonbin.io/v3/b".to_string(),
                bin_id: "abc123".to_string(),
                api_key: "key".to_string(),
            }),
            ..RemoteConfig::default()
        };

        let remote = remote_from_config(&config).unwrap().unwrap();
        assert_eq!(remote.describe(), "blob");
    }
}
