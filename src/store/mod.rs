//! Document persistence: local file store, remote providers, and the
//! sync policy that reconciles them

pub mod blob;
pub mod error;
pub mod files;
pub mod local;
pub mod remote;
pub mod sync;
pub mod transform;

pub use blob::BlobStore;
pub use error::{SaveOutcome, StoreError, StoreResult, SyncOutcome};
pub use files::FileTreeStore;
pub use local::LocalStore;
pub use remote::{remote_from_config, RemoteStore};
pub use sync::SyncStore;
pub use transform::{NoRedaction, PhotoRedaction, RemoteTransform};
