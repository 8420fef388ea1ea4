//! Per-collection file-tree remote provider
//!
//! Each top-level collection is one addressable JSON file in a repository
//! contents API (`data/peppers.json`, `data/diary.json`, ...). Files are
//! fetched and written in parallel; each write is a read-modify-write of
//! the file's revision token (its content SHA). Partial success is
//! tolerated: a save is non-fatal as long as at least one collection
//! landed.
//!
//! The cultivar database travels inside the `genealogy` blob, which
//! stores the full lineage graph with self-contained nodes.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use futures_util::future::join_all;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::FilesProviderConfig;
use crate::genealogy::LineageGraph;
use crate::model::{DiaryEntry, Document, Measurement, Plant};
use crate::store::error::{StoreError, StoreResult};
use crate::store::remote::RemoteStore;

const PEPPERS_PATH: &str = "data/peppers.json";
const DIARY_PATH: &str = "data/diary.json";
const NOTES_PATH: &str = "data/notes.json";
const TRACKER_PATH: &str = "data/tracker.json";
const GENEALOGY_PATH: &str = "data/genealogy.json";

/// Repository-contents file-tree store
pub struct FileTreeStore {
    client: Client,
    config: FilesProviderConfig,
}

#[derive(Debug, Deserialize)]
struct ContentsResponse {
    content: String,
    sha: String,
}

#[derive(Debug, Serialize)]
struct UploadRequest<'a> {
    message: String,
    content: String,
    branch: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<String>,
}

impl FileTreeStore {
    /// Create a file-tree store, validating that the repository is named
    pub fn new(config: FilesProviderConfig, request_timeout_ms: u64) -> StoreResult<Self> {
        if config.owner.trim().is_empty() || config.repo.trim().is_empty() {
            return Err(StoreError::CredentialsMissing);
        }

        let client = Client::builder()
            .user_agent(concat!("peppervault/", env!("CARGO_PKG_VERSION")))
            .timeout(std::time::Duration::from_millis(request_timeout_ms))
            .build()
            .map_err(StoreError::from)?;

        Ok(Self { client, config })
    }

    fn file_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/contents/{}",
            self.config.api_base.trim_end_matches('/'),
            self.config.owner,
            self.config.repo,
            path
        )
    }

    /// Fetch one file's decoded text and revision token
    ///
    /// `Ok(None)` for a missing or empty file; both mean "no data yet".
    async fn fetch_file(&self, path: &str) -> StoreResult<Option<(String, String)>> {
        let mut request = self
            .client
            .get(self.file_url(path))
            .query(&[("ref", self.config.branch.as_str())])
            .header("Accept", "application/vnd.github.v3+json");
        if let Some(token) = &self.config.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            tracing::debug!(path, "file not present on remote");
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(StoreError::RemoteUnavailable(format!(
                "HTTP {} for {}",
                response.status(),
                path
            )));
        }

        let contents: ContentsResponse = response
            .json()
            .await
            .map_err(|e| StoreError::MalformedData(e.to_string()))?;

        // Content arrives base64-encoded with embedded newlines
        let cleaned: String = contents
            .content
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        let bytes = BASE64
            .decode(cleaned)
            .map_err(|e| StoreError::MalformedData(e.to_string()))?;
        let text = String::from_utf8(bytes)
            .map_err(|e| StoreError::MalformedData(e.to_string()))?;

        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        Ok(Some((trimmed.to_string(), contents.sha)))
    }

    /// Read-modify-write one file: look up the current revision token,
    /// then overwrite conditionally on it
    async fn upload_file(&self, path: &str, json: String) -> StoreResult<()> {
        // Missing file (or failed lookup) means an unconditional create
        let sha = match self.fetch_file(path).await {
            Ok(Some((_, sha))) => Some(sha),
            Ok(None) => None,
            Err(e) => {
                tracing::debug!(path, error = %e, "revision lookup failed, writing without token");
                None
            }
        };

        let body = UploadRequest {
            message: format!("Update {} - {}", path, chrono::Utc::now().to_rfc3339()),
            content: BASE64.encode(json.as_bytes()),
            branch: &self.config.branch,
            sha,
        };

        let mut request = self
            .client
            .put(self.file_url(path))
            .header("Accept", "application/vnd.github.v3+json")
            .json(&body);
        if let Some(token) = &self.config.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(StoreError::RemoteUnavailable(format!(
                "HTTP {} for {}",
                response.status(),
                path
            )));
        }

        tracing::debug!(path, "collection file saved");
        Ok(())
    }

    /// Parse one fetched collection, tolerating the legacy wrapper object
    fn parse_collection<T: serde::de::DeserializeOwned>(
        path: &str,
        wrapper_key: &str,
        text: &str,
    ) -> Vec<T> {
        if let Ok(items) = serde_json::from_str::<Vec<T>>(text) {
            return items;
        }
        // Some historical files wrap the array: {"peppers": [...]}
        if let Ok(mut value) = serde_json::from_str::<serde_json::Value>(text) {
            if let Some(inner) = value.get_mut(wrapper_key) {
                if let Ok(items) = serde_json::from_value::<Vec<T>>(inner.take()) {
                    return items;
                }
            }
        }
        tracing::warn!(path, "collection file did not parse, treating as empty");
        Vec::new()
    }

    /// Collapse per-collection write results into one save outcome
    ///
    /// Every write failing means the remote itself is unavailable. A
    /// partial failure still counts as a successful save; it is only
    /// warned about, since the local copy is already durable.
    fn collapse_write_results(results: Vec<StoreResult<()>>) -> StoreResult<()> {
        let total = results.len();
        let succeeded = results.iter().filter(|r| r.is_ok()).count();
        for err in results.into_iter().filter_map(|r| r.err()) {
            tracing::warn!(error = %err, "collection write failed");
        }

        if succeeded == 0 {
            return Err(StoreError::RemoteUnavailable(format!(
                "all {total} collection writes failed"
            )));
        }
        if succeeded < total {
            let incomplete = StoreError::PartialRemoteFailure { succeeded, total };
            tracing::warn!("remote save incomplete: {incomplete}");
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl RemoteStore for FileTreeStore {
    fn describe(&self) -> &'static str {
        "files"
    }

    async fn load(&self) -> StoreResult<Document> {
        let paths = [
            PEPPERS_PATH,
            DIARY_PATH,
            NOTES_PATH,
            TRACKER_PATH,
            GENEALOGY_PATH,
        ];
        let results = join_all(paths.iter().map(|p| self.fetch_file(p))).await;

        // All five failing means the remote itself is unreachable
        if results.iter().all(|r| r.is_err()) {
            let mut errors = results.into_iter().filter_map(|r| r.err());
            return Err(errors.next().unwrap_or(StoreError::RemoteUnavailable(
                "no collection files could be fetched".to_string(),
            )));
        }

        let mut texts = results.into_iter().map(|r| match r {
            Ok(Some((text, _sha))) => Some(text),
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(error = %e, "collection fetch failed, treating as empty");
                None
            }
        });
        let peppers = texts.next().flatten();
        let diary = texts.next().flatten();
        let notes = texts.next().flatten();
        let tracker = texts.next().flatten();
        let genealogy = texts.next().flatten();

        let mut doc = Document::empty();
        if let Some(text) = peppers {
            doc.peppers = Self::parse_collection::<Plant>(PEPPERS_PATH, "peppers", &text);
        }
        if let Some(text) = diary {
            doc.diary_entries =
                Self::parse_collection::<DiaryEntry>(DIARY_PATH, "diaryEntries", &text);
        }
        if let Some(text) = notes {
            doc.quick_notes = serde_json::from_str::<String>(&text).unwrap_or(text);
        }
        if let Some(text) = tracker {
            doc.tracker_entries =
                Self::parse_collection::<Measurement>(TRACKER_PATH, "trackerEntries", &text);
        }
        if let Some(text) = genealogy {
            match serde_json::from_str::<LineageGraph>(&text) {
                Ok(graph) => doc.database_peppers = graph.cultivars(),
                Err(e) => {
                    tracing::warn!(error = %e, "genealogy blob did not parse, treating as empty")
                }
            }
        }

        // No document-level timestamp is stored in the file tree; the
        // missing-timestamp-is-epoch rule applies during reconciliation.
        Ok(doc)
    }

    async fn save(&self, doc: &Document) -> StoreResult<()> {
        let genealogy = LineageGraph::build(&doc.database_peppers);

        let payloads: Vec<(&str, String)> = vec![
            (PEPPERS_PATH, serde_json::to_string_pretty(&doc.peppers)?),
            (DIARY_PATH, serde_json::to_string_pretty(&doc.diary_entries)?),
            (NOTES_PATH, serde_json::to_string_pretty(&doc.quick_notes)?),
            (
                TRACKER_PATH,
                serde_json::to_string_pretty(&doc.tracker_entries)?,
            ),
            (GENEALOGY_PATH, serde_json::to_string_pretty(&genealogy)?),
        ];
        let results = join_all(
            payloads
                .into_iter()
                .map(|(path, json)| self.upload_file(path, json)),
        )
        .await;

        Self::collapse_write_results(results)
    }
}
