// The three remote operations the workflows need from the video platform.
// `api::ApiClient` is the real implementation; tests use an in-memory fake.

use crate::error::ApiResult;
use crate::model::{CommentThread, UploadProgress, VideoId, VideoMetadata};
use std::path::Path;

/// Result of sending one chunk of a resumable upload.
#[derive(Debug, Clone, PartialEq)]
pub enum ChunkStatus {
    /// The service acknowledged the chunk and expects more.
    InProgress(UploadProgress),
    /// The service finished processing the upload and created the video.
    Complete(VideoId),
}

/// An open resumable upload. Each call sends the next chunk.
pub trait UploadSession {
    fn next_chunk(&mut self) -> ApiResult<ChunkStatus>;
}

/// One page of a comment-thread listing.
#[derive(Debug, Clone, Default)]
pub struct CommentThreadPage {
    pub items: Vec<CommentThread>,
    pub next_page_token: Option<String>,
}

pub trait VideoPlatform {
    /// Opens a resumable create-video request for `file`.
    fn insert_video<'a>(
        &'a self,
        metadata: &VideoMetadata,
        file: &Path,
    ) -> ApiResult<Box<dyn UploadSession + 'a>>;

    /// Lists one page of plain-text comment threads for `video_id`.
    fn list_comment_threads(
        &self,
        video_id: &str,
        page_token: Option<&str>,
    ) -> ApiResult<CommentThreadPage>;

    /// Deletes a comment by its comment id.
    fn delete_comment(&self, comment_id: &str) -> ApiResult<()>;
}

impl<T: VideoPlatform + ?Sized> VideoPlatform for &T {
    fn insert_video<'a>(
        &'a self,
        metadata: &VideoMetadata,
        file: &Path,
    ) -> ApiResult<Box<dyn UploadSession + 'a>> {
        (**self).insert_video(metadata, file)
    }

    fn list_comment_threads(
        &self,
        video_id: &str,
        page_token: Option<&str>,
    ) -> ApiResult<CommentThreadPage> {
        (**self).list_comment_threads(video_id, page_token)
    }

    fn delete_comment(&self, comment_id: &str) -> ApiResult<()> {
        (**self).delete_comment(comment_id)
    }
}
