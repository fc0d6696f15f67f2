// API client module: a small blocking HTTP client for the YouTube Data API.
// One request is in flight at a time; the client is read-only once built.

use crate::config::Config;
use crate::error::{ApiError, ApiResult};
use crate::model::{CommentThread, UploadProgress, VideoId, VideoMetadata};
use crate::platform::{ChunkStatus, CommentThreadPage, UploadSession, VideoPlatform};
use anyhow::{Context, Result};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{CONTENT_RANGE, CONTENT_TYPE, LOCATION, RANGE};
use reqwest::redirect;
use serde::Deserialize;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;
use tracing::{debug, info, warn};

/// Resume Incomplete: the chunk was stored and more are expected.
const RESUME_INCOMPLETE: u16 = 308;
/// Consecutive interim replies without new bytes before the upload is
/// considered stuck.
const MAX_STALLED_CHUNKS: u32 = 5;

/// Blocking client holding the connection settings and credentials.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    api_base_url: String,
    upload_base_url: String,
    access_token: Option<String>,
    api_key: Option<String>,
    chunk_size: u64,
}

#[derive(Deserialize, Debug)]
struct CommentThreadListResponse {
    #[serde(default)]
    items: Vec<CommentThreadResource>,
    #[serde(rename = "nextPageToken")]
    next_page_token: Option<String>,
}

#[derive(Deserialize, Debug)]
struct CommentThreadResource {
    id: String,
    snippet: CommentThreadSnippet,
}

#[derive(Deserialize, Debug)]
struct CommentThreadSnippet {
    #[serde(rename = "topLevelComment")]
    top_level_comment: CommentResource,
}

#[derive(Deserialize, Debug)]
struct CommentResource {
    id: String,
    snippet: CommentSnippet,
}

#[derive(Deserialize, Debug)]
struct CommentSnippet {
    #[serde(rename = "textDisplay", default)]
    text_display: String,
}

#[derive(Deserialize, Debug)]
struct VideoResource {
    id: String,
}

#[derive(Deserialize, Debug)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize, Debug)]
struct ErrorBody {
    message: String,
}

impl From<CommentThreadResource> for CommentThread {
    fn from(thread: CommentThreadResource) -> Self {
        let comment = thread.snippet.top_level_comment;
        CommentThread {
            id: thread.id,
            top_level_comment_id: comment.id,
            display_text: comment.snippet.text_display,
        }
    }
}

impl ApiClient {
    /// Build a client from an already resolved configuration.
    pub fn new(config: &Config) -> Result<Self> {
        // A 308 from the upload endpoint is a status report, never a redirect.
        let client = Client::builder()
            .redirect(redirect::Policy::none())
            .build()
            .context("Failed to build HTTP client")?;
        Ok(ApiClient {
            client,
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            upload_base_url: config.upload_base_url.trim_end_matches('/').to_string(),
            access_token: config.access_token.clone(),
            api_key: config.api_key.clone(),
            chunk_size: config.chunk_size,
        })
    }

    /// Build a client configured from the `YOUTUBE_*` environment variables.
    pub fn from_env() -> Result<Self> {
        let config = Config::from_env()?;
        Self::new(&config)
    }

    /// Attach whichever credentials are configured.
    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        let mut req = req;
        if let Some(token) = &self.access_token {
            req = req.bearer_auth(token);
        }
        if let Some(key) = &self.api_key {
            req = req.query(&[("key", key)]);
        }
        req
    }
}

impl VideoPlatform for ApiClient {
    fn insert_video<'a>(
        &'a self,
        metadata: &VideoMetadata,
        file: &Path,
    ) -> ApiResult<Box<dyn UploadSession + 'a>> {
        let handle = File::open(file)
            .map_err(|err| ApiError::io(format!("Failed to open {}", file.display()), err))?;
        let total = handle
            .metadata()
            .map_err(|err| ApiError::io(format!("Failed to stat {}", file.display()), err))?
            .len();
        let content_type = mime_guess::from_path(file)
            .first_or_octet_stream()
            .to_string();
        let (body, parts) = metadata.request_body()?;
        let part = parts.join(",");

        let url = format!("{}/videos", self.upload_base_url);
        debug!(%url, %part, total, "starting resumable upload");
        let req = self
            .client
            .post(&url)
            .query(&[("uploadType", "resumable"), ("part", part.as_str())])
            .header("X-Upload-Content-Length", total)
            .header("X-Upload-Content-Type", content_type.as_str())
            .json(&body);
        let res = check_status(self.authorize(req).send()?)?;

        let session_url = res
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ApiError::Protocol("no upload session URL in response".into()))?
            .to_string();
        info!(file = %file.display(), total, "resumable upload session opened");

        Ok(Box::new(ResumableUpload {
            client: self.client.clone(),
            session_url,
            file: handle,
            content_type,
            total,
            offset: 0,
            chunk_size: self.chunk_size,
            stalled: 0,
        }))
    }

    fn list_comment_threads(
        &self,
        video_id: &str,
        page_token: Option<&str>,
    ) -> ApiResult<CommentThreadPage> {
        let url = format!("{}/commentThreads", self.api_base_url);
        debug!(video_id, page_token, "listing comment threads");
        let req = self
            .client
            .get(&url)
            .query(&comment_thread_query(video_id, page_token));
        let res = check_status(self.authorize(req).send()?)?;
        let list: CommentThreadListResponse = res.json()?;
        Ok(CommentThreadPage {
            items: list.items.into_iter().map(CommentThread::from).collect(),
            next_page_token: list.next_page_token.filter(|token| !token.is_empty()),
        })
    }

    fn delete_comment(&self, comment_id: &str) -> ApiResult<()> {
        let url = format!("{}/comments", self.api_base_url);
        let req = self.client.delete(&url).query(&[("id", comment_id)]);
        check_status(self.authorize(req).send()?)?;
        info!(comment_id, "comment deleted");
        Ok(())
    }
}

/// An open resumable upload session. Each chunk is read from the offset the
/// service last acknowledged.
pub struct ResumableUpload {
    client: Client,
    session_url: String,
    file: File,
    content_type: String,
    total: u64,
    offset: u64,
    chunk_size: u64,
    stalled: u32,
}

impl ResumableUpload {
    fn read_chunk(&mut self) -> ApiResult<Vec<u8>> {
        let want = self.chunk_size.min(self.total.saturating_sub(self.offset));
        self.file
            .seek(SeekFrom::Start(self.offset))
            .map_err(|err| ApiError::io("Failed to seek upload file", err))?;
        let mut buf = Vec::with_capacity(want as usize);
        (&mut self.file)
            .take(want)
            .read_to_end(&mut buf)
            .map_err(|err| ApiError::io("Failed to read upload file", err))?;
        if (buf.len() as u64) < want {
            return Err(ApiError::Protocol(format!(
                "upload file shrank: expected {} bytes at offset {}, read {}",
                want,
                self.offset,
                buf.len()
            )));
        }
        Ok(buf)
    }
}

impl UploadSession for ResumableUpload {
    fn next_chunk(&mut self) -> ApiResult<ChunkStatus> {
        let chunk = self.read_chunk()?;
        let range = content_range(self.offset, chunk.len() as u64, self.total);
        debug!(%range, "sending chunk");

        let res = self
            .client
            .put(&self.session_url)
            .header(CONTENT_TYPE, self.content_type.as_str())
            .header(CONTENT_RANGE, range)
            .body(chunk)
            .send()?;

        let status = res.status();
        if status.as_u16() == RESUME_INCOMPLETE {
            let acknowledged = res
                .headers()
                .get(RANGE)
                .and_then(|value| value.to_str().ok())
                .and_then(acknowledged_bytes)
                .unwrap_or(0);
            if acknowledged > self.offset {
                self.stalled = 0;
            } else {
                self.stalled += 1;
                if self.stalled >= MAX_STALLED_CHUNKS {
                    return Err(ApiError::Protocol(format!(
                        "upload stalled at byte {} of {}",
                        acknowledged, self.total
                    )));
                }
            }
            self.offset = acknowledged;
            return Ok(ChunkStatus::InProgress(UploadProgress::from_bytes(
                self.offset,
                self.total,
            )));
        }

        let res = check_status(res)?;
        let video: VideoResource = res.json()?;
        info!(video_id = %video.id, "resumable upload complete");
        Ok(ChunkStatus::Complete(VideoId::new(video.id)))
    }
}

/// Turn a non-success response into an error carrying the API's message.
fn check_status(res: Response) -> ApiResult<Response> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }
    let body = res.text().unwrap_or_default();
    let message = error_message(&body);
    warn!(status = status.as_u16(), %message, "API request failed");
    Err(ApiError::Status {
        status: status.as_u16(),
        message,
    })
}

/// Extract `error.message` from a Google-style error body, falling back to
/// the raw text.
fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => envelope.error.message,
        Err(_) if body.trim().is_empty() => "empty response body".to_string(),
        Err(_) => body.trim().to_string(),
    }
}

fn comment_thread_query(video_id: &str, page_token: Option<&str>) -> Vec<(&'static str, String)> {
    let mut query = vec![
        ("part", "snippet".to_string()),
        ("videoId", video_id.to_string()),
        ("textFormat", "plainText".to_string()),
    ];
    if let Some(token) = page_token {
        query.push(("pageToken", token.to_string()));
    }
    query
}

/// `Content-Range` for `len` bytes starting at `start`. An empty chunk asks
/// the service for its current status.
fn content_range(start: u64, len: u64, total: u64) -> String {
    if len == 0 {
        format!("bytes */{}", total)
    } else {
        format!("bytes {}-{}/{}", start, start + len - 1, total)
    }
}

/// Number of bytes the service holds, from a `Range: bytes=0-N` header.
fn acknowledged_bytes(header: &str) -> Option<u64> {
    let (_, last) = header.trim().strip_prefix("bytes=")?.split_once('-')?;
    last.trim().parse::<u64>().ok().map(|last| last + 1)
}
