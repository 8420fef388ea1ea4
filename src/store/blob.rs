//! Single-blob remote provider
//!
//! The whole document lives in one remote JSON bin: `GET <endpoint>/<bin>/latest`
//! returns it, `PUT <endpoint>/<bin>` overwrites it. Authentication is a
//! static master-key header; there is no ETag or version check, so the
//! last PUT wins unconditionally.

use reqwest::Client;

use crate::config::BlobProviderConfig;
use crate::model::Document;
use crate::store::error::{StoreError, StoreResult};
use crate::store::remote::RemoteStore;

/// JSON-bin style single-blob store
pub struct BlobStore {
    client: Client,
    config: BlobProviderConfig,
}

impl BlobStore {
    /// Create a blob store, validating that credentials are present
    pub fn new(config: BlobProviderConfig, request_timeout_ms: u64) -> StoreResult<Self> {
        if config.bin_id.trim().is_empty() || config.api_key.trim().is_empty() {
            return Err(StoreError::CredentialsMissing);
        }

        let client = Client::builder()
            .timeout(std::time::Duration::from_millis(request_timeout_ms))
            .build()
            .map_err(StoreError::from)?;

        Ok(Self { client, config })
    }

    fn bin_url(&self) -> String {
        format!(
            "{}/{}",
            self.config.endpoint.trim_end_matches('/'),
            self.config.bin_id
        )
    }
}

#[async_trait::async_trait]
impl RemoteStore for BlobStore {
    fn describe(&self) -> &'static str {
        "blob"
    }

    async fn load(&self) -> StoreResult<Document> {
        let url = format!("{}/latest", self.bin_url());

        let response = self
            .client
            .get(&url)
            .header("X-Master-Key", &self.config.api_key)
            .header("X-Bin-Meta", "false")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(StoreError::RemoteUnavailable(format!(
                "HTTP {}",
                response.status()
            )));
        }

        let raw = response.text().await?;
        // A corrupt blob is distinct from an absent one: surface it so
        // sync falls back to local instead of overwriting the remote.
        serde_json::from_str(&raw).map_err(|e| StoreError::MalformedData(e.to_string()))
    }

    async fn save(&self, doc: &Document) -> StoreResult<()> {
        let response = self
            .client
            .put(self.bin_url())
            .header("X-Master-Key", &self.config.api_key)
            .header("X-Bin-Meta", "false")
            .json(doc)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(StoreError::RemoteUnavailable(format!(
                "HTTP {}",
                response.status()
            )));
        }

        tracing::debug!("document saved to remote blob");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> BlobProviderConfig {
        BlobProviderConfig {
            endpoint: "https://api.jsonbin.io/v3/b/".to_string(),
            bin_id: "68d27066".to_string(),
            api_key: "secret".to_string(),
        }
    }

    #[test]
    fn test_bin_url_strips_trailing_slash() {
        let store = BlobStore::new(config(), 5000).unwrap();
        assert_eq!(store.bin_url(), "https://api.jsonbin.io/v3/b/68d27066");
    }

    #[test]
    fn test_missing_credentials_rejected() {
        let mut cfg = config();
        cfg.api_key = "".to_string();
        assert!(matches!(
            BlobStore::new(cfg, 5000),
            Err(StoreError::CredentialsMissing)
        ));

        let mut cfg = config();
        cfg.bin_id = "  ".to_string();
        assert!(matches!(
            BlobStore::new(cfg, 5000),
            Err(StoreError::CredentialsMissing)
        ));
    }
}
