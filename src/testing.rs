// In-memory platform used by the workflow tests. Records every call so tests
// can assert on what would have reached the network.

use crate::error::{ApiError, ApiResult};
use crate::model::{CommentThread, VideoMetadata};
use crate::platform::{ChunkStatus, CommentThreadPage, UploadSession, VideoPlatform};
use std::cell::{Cell, RefCell};
use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};

#[derive(Default)]
pub struct FakePlatform {
    chunks: RefCell<VecDeque<ApiResult<ChunkStatus>>>,
    pages: Vec<Vec<CommentThread>>,
    failing_pages: HashSet<usize>,
    failing_deletes: HashSet<String>,
    pub inserted: RefCell<Vec<(VideoMetadata, PathBuf)>>,
    pub chunks_sent: Cell<usize>,
    pub list_calls: RefCell<Vec<(String, Option<String>)>>,
    pub deleted: RefCell<Vec<String>>,
}

pub fn thread(id: &str, text: &str) -> CommentThread {
    CommentThread {
        id: format!("thread-{id}"),
        top_level_comment_id: format!("comment-{id}"),
        display_text: text.to_string(),
    }
}

impl FakePlatform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_upload_chunks(mut self, chunks: Vec<ApiResult<ChunkStatus>>) -> Self {
        self.chunks = RefCell::new(chunks.into());
        self
    }

    pub fn with_pages(mut self, pages: Vec<Vec<CommentThread>>) -> Self {
        self.pages = pages;
        self
    }

    pub fn failing_page(mut self, index: usize) -> Self {
        self.failing_pages.insert(index);
        self
    }

    pub fn failing_delete(mut self, comment_id: &str) -> Self {
        self.failing_deletes.insert(comment_id.to_string());
        self
    }

    pub fn list_call_count(&self) -> usize {
        self.list_calls.borrow().len()
    }

    pub fn deleted_ids(&self) -> Vec<String> {
        self.deleted.borrow().clone()
    }
}

struct FakeSession<'a> {
    platform: &'a FakePlatform,
}

impl UploadSession for FakeSession<'_> {
    fn next_chunk(&mut self) -> ApiResult<ChunkStatus> {
        self.platform.chunks_sent.set(self.platform.chunks_sent.get() + 1);
        self.platform
            .chunks
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Protocol("no more scripted chunks".into())))
    }
}

impl VideoPlatform for FakePlatform {
    fn insert_video<'a>(
        &'a self,
        metadata: &VideoMetadata,
        file: &Path,
    ) -> ApiResult<Box<dyn UploadSession + 'a>> {
        self.inserted
            .borrow_mut()
            .push((metadata.clone(), file.to_path_buf()));
        Ok(Box::new(FakeSession { platform: self }))
    }

    fn list_comment_threads(
        &self,
        video_id: &str,
        page_token: Option<&str>,
    ) -> ApiResult<CommentThreadPage> {
        self.list_calls
            .borrow_mut()
            .push((video_id.to_string(), page_token.map(str::to_string)));

        let index = match page_token {
            None => 0,
            Some(token) => token
                .strip_prefix("page-")
                .and_then(|n| n.parse::<usize>().ok())
                .ok_or_else(|| ApiError::Protocol(format!("unknown page token {token}")))?,
        };
        if self.failing_pages.contains(&index) {
            return Err(ApiError::Status {
                status: 500,
                message: format!("page {index} failed"),
            });
        }
        let items = self.pages.get(index).cloned().unwrap_or_default();
        let next_page_token = (index + 1 < self.pages.len()).then(|| format!("page-{}", index + 1));
        Ok(CommentThreadPage {
            items,
            next_page_token,
        })
    }

    fn delete_comment(&self, comment_id: &str) -> ApiResult<()> {
        if self.failing_deletes.contains(comment_id) {
            return Err(ApiError::Status {
                status: 403,
                message: "insufficient permissions".into(),
            });
        }
        self.deleted.borrow_mut().push(comment_id.to_string());
        Ok(())
    }
}
