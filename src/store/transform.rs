//! Redact/rehydrate transforms for remote persistence
//!
//! Remote stores have practical size limits that embedded photo payloads
//! blow through. A [`RemoteTransform`] shapes the document on its way to
//! and from the remote: `redact` runs before every remote write, and
//! `rehydrate` runs on every remote load with the pre-sync local copy at
//! hand. The sync policy itself never merges; this hook is the one
//! sanctioned place where local and remote state are combined.

use crate::model::Document;

/// Document shaping applied around remote persistence
pub trait RemoteTransform: Send + Sync {
    /// Shape the document for remote storage
    fn redact(&self, doc: &Document) -> Document;

    /// Combine a freshly loaded remote document with the current local
    /// copy, restoring anything `redact` stripped
    fn rehydrate(&self, remote: Document, local: &Document) -> Document;
}

/// Identity transform: the remote holds exactly what the local copy does
pub struct NoRedaction;

impl RemoteTransform for NoRedaction {
    fn redact(&self, doc: &Document) -> Document {
        doc.clone()
    }

    fn rehydrate(&self, remote: Document, _local: &Document) -> Document {
        remote
    }
}

/// Keeps diary photo payloads local-only
///
/// On the way out, every photo loses its `data` field (metadata stays).
/// On the way in, any diary entry whose local counterpart still carries
/// photo payloads gets the local photo list back wholesale.
pub struct PhotoRedaction;

impl RemoteTransform for PhotoRedaction {
    fn redact(&self, doc: &Document) -> Document {
        let mut redacted = doc.clone();
        for entry in &mut redacted.diary_entries {
            entry.photos = entry.photos.iter().map(|p| p.without_data()).collect();
        }
        redacted
    }

    fn rehydrate(&self, mut remote: Document, local: &Document) -> Document {
        for entry in &mut remote.diary_entries {
            let local_entry = local.diary_entries.iter().find(|e| e.id == entry.id);
            if let Some(local_entry) = local_entry {
                if local_entry.has_photo_data() {
                    entry.photos = local_entry.photos.clone();
                }
            }
        }
        remote
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DiaryEntry, Photo};

    fn doc_with_photo() -> Document {
        let mut doc = Document::empty();
        doc.diary_entries.push(
            DiaryEntry::new(1, "Sprouted", "two leaves")
                .photo(Photo::new(1, "sprout.jpg", "image/jpeg", "data:;base64,AAAA")),
        );
        doc
    }

    #[test]
    fn test_redact_strips_payload_keeps_metadata() {
        let doc = doc_with_photo();
        let redacted = PhotoRedaction.redact(&doc);

        let photo = &redacted.diary_entries[0].photos[0];
        assert!(photo.data.is_none());
        assert_eq!(photo.filename, "sprout.jpg");
        assert_eq!(photo.content_type, "image/jpeg");

        // The source document is untouched
        assert!(doc.diary_entries[0].has_photo_data());
    }

    #[test]
    fn test_rehydrate_restores_local_photos() {
        let local = doc_with_photo();
        let remote = PhotoRedaction.redact(&local);

        let rehydrated = PhotoRedaction.rehydrate(remote, &local);
        assert!(rehydrated.diary_entries[0].has_photo_data());
        assert_eq!(
            rehydrated.diary_entries[0].photos,
            local.diary_entries[0].photos
        );
    }

    #[test]
    fn test_rehydrate_keeps_remote_photos_for_unknown_entries() {
        let local = Document::empty();
        let mut remote = doc_with_photo();
        remote.diary_entries[0].photos[0].data = None;

        let rehydrated = PhotoRedaction.rehydrate(remote.clone(), &local);
        // Nothing local to restore from; metadata-only photos survive
        assert_eq!(rehydrated, remote);
    }

    #[test]
    fn test_rehydrate_prefers_remote_metadata() {
        let local = doc_with_photo();
        let mut remote = PhotoRedaction.redact(&local);
        remote.diary_entries[0].title = "Sprouted (edited on phone)".to_string();

        let rehydrated = PhotoRedaction.rehydrate(remote, &local);
        assert_eq!(rehydrated.diary_entries[0].title, "Sprouted (edited on phone)");
        assert!(rehydrated.diary_entries[0].has_photo_data());
    }

    #[test]
    fn test_no_redaction_is_identity() {
        let doc = doc_with_photo();
        assert_eq!(NoRedaction.redact(&doc), doc);
        assert_eq!(NoRedaction.rehydrate(doc.clone(), &Document::empty()), doc);
    }
}
