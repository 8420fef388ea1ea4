//! Diary entries and embedded photo payloads
//!
//! Photos carry their pixel data inline as a base64 data URL. The payload
//! is only ever persisted locally; the remote copy keeps metadata
//! (filename, size, type, upload date) and drops the `data` field. See
//! [`crate::store::PhotoRedaction`] for the strip/restore logic.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A dated diary entry, optionally linked to a plant and carrying photos
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DiaryEntry {
    /// Unique identifier within the document
    pub id: u64,
    /// When the entry was written
    pub date: DateTime<Utc>,
    /// Plant this entry documents, if any
    #[serde(default)]
    pub plant_id: Option<u64>,
    /// Entry title
    pub title: String,
    /// Free-text body
    pub content: String,
    /// Free-form tags
    #[serde(default)]
    pub tags: Vec<String>,
    /// Attached photos
    #[serde(default)]
    pub photos: Vec<Photo>,
}

impl DiaryEntry {
    /// Create an entry dated now
    pub fn new(id: u64, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id,
            date: Utc::now(),
            plant_id: None,
            title: title.into(),
            content: content.into(),
            tags: Vec::new(),
            photos: Vec::new(),
        }
    }

    /// Builder: link to a plant
    pub fn plant(mut self, plant_id: u64) -> Self {
        self.plant_id = Some(plant_id);
        self
    }

    /// Builder: add a tag
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Builder: attach a photo
    pub fn photo(mut self, photo: Photo) -> Self {
        self.photos.push(photo);
        self
    }

    /// True if any attached photo still carries its payload
    pub fn has_photo_data(&self) -> bool {
        self.photos.iter().any(|p| p.data.is_some())
    }
}

/// An embedded photo attachment
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    /// Unique identifier within the entry's document
    pub id: u64,
    /// Original filename
    pub filename: String,
    /// File size in bytes
    pub size: u64,
    /// MIME type (e.g. "image/jpeg")
    #[serde(rename = "type")]
    pub content_type: String,
    /// Base64 data URL payload; present locally, stripped for remote storage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    /// When the photo was attached
    pub upload_date: DateTime<Utc>,
}

impl Photo {
    /// Create a photo with its payload, dated now
    pub fn new(
        id: u64,
        filename: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<String>,
    ) -> Self {
        let data = data.into();
        Self {
            id,
            filename: filename.into(),
            size: data.len() as u64,
            content_type: content_type.into(),
            data: Some(data),
            upload_date: Utc::now(),
        }
    }

    /// Metadata-only copy with the payload dropped
    pub fn without_data(&self) -> Photo {
        Photo {
            data: None,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_photo_without_data_keeps_metadata() {
        let photo = Photo::new(1, "seedling.jpg", "image/jpeg", "data:image/jpeg;base64,AAAA");
        let stripped = photo.without_data();

        assert_eq!(stripped.filename, "seedling.jpg");
        assert_eq!(stripped.size, photo.size);
        assert_eq!(stripped.content_type, "image/jpeg");
        assert_eq!(stripped.upload_date, photo.upload_date);
        assert!(stripped.data.is_none());
    }

    #[test]
    fn test_photo_data_omitted_from_json_when_absent() {
        let photo = Photo::new(1, "a.png", "image/png", "data:image/png;base64,BBBB");
        let stripped = serde_json::to_value(photo.without_data()).unwrap();
        assert!(stripped.get("data").is_none());

        let full = serde_json::to_value(&photo).unwrap();
        assert!(full.get("data").is_some());
        assert!(full.get("uploadDate").is_some());
    }

    #[test]
    fn test_entry_has_photo_data() {
        let entry = DiaryEntry::new(1, "First sprout", "It lives!");
        assert!(!entry.has_photo_data());

        let with_photo = entry
            .clone()
            .photo(Photo::new(1, "sprout.jpg", "image/jpeg", "data:;base64,CCCC"));
        assert!(with_photo.has_photo_data());

        let metadata_only = entry.photo(Photo::new(2, "old.jpg", "image/jpeg", "x").without_data());
        assert!(!metadata_only.has_photo_data());
    }
}
