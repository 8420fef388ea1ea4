//! The sync store: one consistent access point over two backing stores
//!
//! Owns the local file store and the optional remote provider, and
//! defines the reconciliation policy when both hold data: whole-document
//! last-writer-wins on `lastUpdate`. `sync` and `save_data` never let a
//! remote failure escape; the worst case is always "local copy only",
//! reported through [`SaveOutcome`]/[`SyncOutcome`] rather than errors.
//!
//! All mutation+persist paths serialize on one lock, so a sync in flight
//! cannot interleave with a save triggered from another task.

use std::sync::Arc;
use tokio::sync::Mutex;

use crate::config::Config;
use crate::model::{Collection, Document};
use crate::store::error::{SaveOutcome, StoreError, StoreResult, SyncOutcome};
use crate::store::local::LocalStore;
use crate::store::remote::{remote_from_config, RemoteStore};
use crate::store::transform::{PhotoRedaction, RemoteTransform};

/// Storage façade for the application document
pub struct SyncStore {
    local: LocalStore,
    remote: Option<Arc<dyn RemoteStore>>,
    transform: Arc<dyn RemoteTransform>,
    primary: Collection,
    // Serializes sync/save so concurrent tasks cannot clobber each other
    op_lock: Mutex<()>,
}

impl SyncStore {
    /// Assemble a store from its parts
    pub fn new(
        local: LocalStore,
        remote: Option<Arc<dyn RemoteStore>>,
        transform: Arc<dyn RemoteTransform>,
        primary: Collection,
    ) -> Self {
        Self {
            local,
            remote,
            transform,
            primary,
            op_lock: Mutex::new(()),
        }
    }

    /// Build the store described by the configuration
    ///
    /// Uses the photo redaction transform; diary photo payloads never
    /// leave the local store.
    pub fn from_config(config: &Config) -> StoreResult<Self> {
        let local = LocalStore::new(&config.local.data_dir, &config.local.namespace);
        let remote = remote_from_config(&config.remote)?;
        Ok(Self::new(
            local,
            remote,
            Arc::new(PhotoRedaction),
            config.sync.primary_collection,
        ))
    }

    /// The collection whose emptiness drives the sync decision table
    pub fn primary_collection(&self) -> Collection {
        self.primary
    }

    /// Read the local store; absent or corrupt data yields an empty document
    pub fn load_local(&self) -> Document {
        self.local.load()
    }

    /// Persist to the local store, refreshing the save marker
    pub fn save_local(&self, doc: &Document) -> StoreResult<()> {
        self.local.save(doc)
    }

    /// Fetch the remote document as stored (no rehydration)
    ///
    /// Errors here are meaningful to callers that need to distinguish
    /// "definitely synced" from "local only"; `sync` callers never see them.
    pub async fn load_remote(&self) -> StoreResult<Document> {
        let remote = self.remote.as_ref().ok_or(StoreError::CredentialsMissing)?;
        remote.load().await
    }

    /// Push the document to the remote store, redacted for remote storage
    pub async fn save_remote(&self, doc: &Document) -> StoreResult<()> {
        let remote = self.remote.as_ref().ok_or(StoreError::CredentialsMissing)?;
        let redacted = self.transform.redact(doc);
        remote.save(&redacted).await
    }

    /// Reconcile local and remote copies and return the winning document
    ///
    /// Never fails; any remote-layer problem degrades to the local copy.
    pub async fn sync(&self) -> Document {
        self.sync_with_outcome().await.0
    }

    /// [`sync`](Self::sync) plus what the reconciliation decided
    pub async fn sync_with_outcome(&self) -> (Document, SyncOutcome) {
        let _guard = self.op_lock.lock().await;

        let local = self.local.load();
        let has_local = local.has_data(self.primary);

        let cloud = match self.load_remote().await {
            Ok(cloud) => cloud,
            Err(StoreError::CredentialsMissing) => {
                tracing::debug!("no remote configured, local-only mode");
                return self.local_fallback(local);
            }
            Err(e) => {
                tracing::warn!(error = %e, "remote load failed, using local data");
                return self.local_fallback(local);
            }
        };
        let cloud = self.transform.rehydrate(cloud, &local);
        let has_cloud = cloud.has_data(self.primary);

        match (has_local, has_cloud) {
            (false, true) => {
                tracing::info!("first access on this device, adopting remote copy");
                self.persist_local_soft(&cloud);
                (cloud, SyncOutcome::AdoptedCloud)
            }
            (true, false) => {
                tracing::info!("remote is empty, pushing local copy");
                match self.save_remote(&local).await {
                    Ok(()) => (local, SyncOutcome::PushedLocal),
                    Err(e) => {
                        tracing::warn!(error = %e, "initial push failed, staying local");
                        (local, SyncOutcome::LocalFallback)
                    }
                }
            }
            (true, true) => self.reconcile(local, cloud).await,
            (false, false) => self.initialize(),
        }
    }

    /// Both sides hold data: strictly newer `lastUpdate` wins, local on tie
    async fn reconcile(&self, local: Document, cloud: Document) -> (Document, SyncOutcome) {
        let local_ts = local.last_update_or_epoch();
        let cloud_ts = cloud.last_update_or_epoch();

        if cloud_ts > local_ts {
            tracing::info!(%cloud_ts, %local_ts, "remote copy is newer, updating local");
            self.persist_local_soft(&cloud);
            (cloud, SyncOutcome::AdoptedCloud)
        } else if local_ts > cloud_ts {
            tracing::info!(%local_ts, %cloud_ts, "local copy is newer, updating remote");
            match self.save_remote(&local).await {
                Ok(()) => (local, SyncOutcome::PushedLocal),
                Err(e) => {
                    tracing::warn!(error = %e, "remote update failed, staying local");
                    (local, SyncOutcome::LocalFallback)
                }
            }
        } else {
            tracing::debug!("both copies carry the same timestamp, nothing to do");
            (local, SyncOutcome::InSync)
        }
    }

    /// Remote unreachable: hand back the local copy unmodified, unless
    /// nothing exists anywhere yet, in which case a fresh timestamped
    /// document is created so first runs still get a usable dataset
    fn local_fallback(&self, local: Document) -> (Document, SyncOutcome) {
        if local == Document::empty() {
            return self.initialize();
        }
        (local, SyncOutcome::LocalFallback)
    }

    /// Neither side has data: synthesize an empty document and persist it
    fn initialize(&self) -> (Document, SyncOutcome) {
        tracing::info!("no data on either side, creating empty dataset");
        let mut doc = Document::empty();
        doc.touch();
        self.persist_local_soft(&doc);
        (doc, SyncOutcome::Initialized)
    }

    fn persist_local_soft(&self, doc: &Document) {
        if let Err(e) = self.local.save(doc) {
            tracing::warn!(error = %e, "local save failed");
        }
    }

    /// Persist a mutated document: local first (durability), then
    /// best-effort remote. Refreshes `lastUpdate` before writing.
    pub async fn save_data(&self, doc: &mut Document) -> SaveOutcome {
        let _guard = self.op_lock.lock().await;
        self.save_data_locked(doc).await
    }

    async fn save_data_locked(&self, doc: &mut Document) -> SaveOutcome {
        doc.touch();

        if let Err(e) = self.local.save(doc) {
            // Remote may still succeed, but the durability guarantee is gone
            tracing::warn!(error = %e, "local save failed, data at risk");
        }

        match self.save_remote(doc).await {
            Ok(()) => SaveOutcome::Synced,
            Err(StoreError::CredentialsMissing) => {
                tracing::debug!("no remote configured, saved locally");
                SaveOutcome::LocalOnly
            }
            Err(e) => {
                tracing::warn!(error = %e, "remote save failed, data saved locally only");
                SaveOutcome::LocalOnly
            }
        }
    }

    /// Load, mutate, and persist as one atomic unit
    ///
    /// The mutation runs under the same lock as the persist, so a
    /// concurrent `sync` cannot observe or clobber the intermediate state.
    pub async fn update<F>(&self, mutate: F) -> (Document, SaveOutcome)
    where
        F: FnOnce(&mut Document),
    {
        let _guard = self.op_lock.lock().await;
        let mut doc = self.local.load();
        mutate(&mut doc);
        let outcome = self.save_data_locked(&mut doc).await;
        (doc, outcome)
    }

    /// Probe remote reachability (drives the connectivity indicator)
    pub async fn check_connection(&self) -> bool {
        self.load_remote().await.is_ok()
    }

    /// Timestamp of the last successful local save, if known
    pub fn last_local_save(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        self.local.last_save()
    }
}
