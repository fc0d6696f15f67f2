// Data carried between the CLI, the workflows and the API client.

use clap::ValueEnum;
use serde::Serialize;
use std::fmt;

/// Who can see the uploaded video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PrivacyStatus {
    Public,
    Private,
    Unlisted,
}

/// Snippet part of a video resource. Absent fields are left out of the
/// request body entirely.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VideoSnippet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(rename = "categoryId", skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
}

impl VideoSnippet {
    fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.tags.is_none()
            && self.category_id.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoStatus {
    #[serde(rename = "privacyStatus")]
    pub privacy_status: PrivacyStatus,
}

/// Metadata sent with a create-video request. Built once per upload from the
/// command line and consumed by the request.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VideoMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet: Option<VideoSnippet>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<VideoStatus>,
}

impl VideoMetadata {
    /// Build metadata from optional flag values. The snippet is omitted when
    /// none of its fields are set, the status when no privacy is given.
    pub fn new(
        title: Option<String>,
        description: Option<String>,
        tags: Option<Vec<String>>,
        category_id: Option<String>,
        privacy_status: Option<PrivacyStatus>,
    ) -> Self {
        let snippet = VideoSnippet {
            title,
            description,
            tags,
            category_id,
        };
        VideoMetadata {
            snippet: (!snippet.is_empty()).then_some(snippet),
            status: privacy_status.map(|privacy_status| VideoStatus { privacy_status }),
        }
    }

    /// Serializes the metadata and returns the body together with the
    /// resource parts it declares. The parts are read back from the body's
    /// top-level keys so the two can never disagree.
    pub fn request_body(&self) -> serde_json::Result<(serde_json::Value, Vec<String>)> {
        let body = serde_json::to_value(self)?;
        let parts = body
            .as_object()
            .map(|object| object.keys().cloned().collect())
            .unwrap_or_default();
        Ok((body, parts))
    }
}

/// Interim upload status reported after a chunk is acknowledged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UploadProgress {
    fraction: f64,
}

impl UploadProgress {
    pub fn new(fraction: f64) -> Self {
        let fraction = if fraction.is_nan() {
            0.0
        } else {
            fraction.clamp(0.0, 1.0)
        };
        UploadProgress { fraction }
    }

    pub fn from_bytes(uploaded: u64, total: u64) -> Self {
        if total == 0 {
            return UploadProgress::new(1.0);
        }
        UploadProgress::new(uploaded as f64 / total as f64)
    }

    pub fn fraction(&self) -> f64 {
        self.fraction
    }

    /// Whole percent, rounded down.
    pub fn percent(&self) -> u32 {
        (self.fraction * 100.0).floor() as u32
    }
}

/// Identifier of a video on the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoId(String);

impl VideoId {
    pub fn new(id: impl Into<String>) -> Self {
        VideoId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A top-level comment as listed for a video. `top_level_comment_id` is the
/// id that delete requests target, not `id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentThread {
    pub id: String,
    pub top_level_comment_id: String,
    pub display_text: String,
}
