// Upload workflow: drive a resumable session chunk by chunk until the
// service returns the new video's id.

use crate::error::ApiResult;
use crate::model::{UploadProgress, VideoId, VideoMetadata};
use crate::platform::{ChunkStatus, VideoPlatform};
use std::path::Path;
use tracing::info;

/// Uploads `file` with `metadata`, calling `on_progress` after every interim
/// chunk acknowledgment. Reported fractions never go backwards.
///
/// Nothing is persisted between runs: if this returns an error the upload
/// has to be started again from the first byte.
pub fn upload<P, F>(
    platform: &P,
    metadata: &VideoMetadata,
    file: &Path,
    mut on_progress: F,
) -> ApiResult<VideoId>
where
    P: VideoPlatform + ?Sized,
    F: FnMut(UploadProgress),
{
    info!(file = %file.display(), "uploading video");
    let mut session = platform.insert_video(metadata, file)?;
    let mut reported = UploadProgress::new(0.0);
    loop {
        match session.next_chunk()? {
            ChunkStatus::InProgress(progress) => {
                if progress.fraction() > reported.fraction() {
                    reported = progress;
                }
                on_progress(reported);
            }
            ChunkStatus::Complete(id) => return Ok(id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::model::PrivacyStatus;
    use crate::testing::FakePlatform;
    use std::path::PathBuf;

    fn metadata() -> VideoMetadata {
        VideoMetadata::new(
            Some("Demo".into()),
            None,
            Some(vec!["rust".into()]),
            None,
            Some(PrivacyStatus::Private),
        )
    }

    #[test]
    fn reports_progress_until_video_id() {
        let platform = FakePlatform::new().with_upload_chunks(vec![
            Ok(ChunkStatus::InProgress(UploadProgress::new(0.25))),
            Ok(ChunkStatus::InProgress(UploadProgress::new(0.5))),
            Ok(ChunkStatus::InProgress(UploadProgress::new(1.0))),
            Ok(ChunkStatus::Complete(VideoId::new("dQw4w9WgXcQ"))),
        ]);
        let mut seen = Vec::new();
        let id = upload(&platform, &metadata(), &PathBuf::from("demo.mp4"), |p| {
            seen.push(p.fraction())
        })
        .unwrap();

        assert_eq!(id.as_str(), "dQw4w9WgXcQ");
        assert_eq!(seen, vec![0.25, 0.5, 1.0]);
        let inserted = platform.inserted.borrow();
        assert_eq!(inserted.len(), 1);
        assert_eq!(inserted[0].0, metadata());
        assert_eq!(inserted[0].1, PathBuf::from("demo.mp4"));
    }

    #[test]
    fn progress_never_decreases() {
        let platform = FakePlatform::new().with_upload_chunks(vec![
            Ok(ChunkStatus::InProgress(UploadProgress::new(0.6))),
            Ok(ChunkStatus::InProgress(UploadProgress::new(0.3))),
            Ok(ChunkStatus::InProgress(UploadProgress::new(0.9))),
            Ok(ChunkStatus::Complete(VideoId::new("abc"))),
        ]);
        let mut seen = Vec::new();
        upload(&platform, &metadata(), Path::new("v.mp4"), |p| seen.push(p.fraction())).unwrap();

        assert_eq!(seen, vec![0.6, 0.6, 0.9]);
        assert!(seen.windows(2).all(|w| w[0] <= w[1]));
        assert!(seen.iter().all(|f| (0.0..=1.0).contains(f)));
    }

    #[test]
    fn single_chunk_upload_reports_no_progress() {
        let platform = FakePlatform::new()
            .with_upload_chunks(vec![Ok(ChunkStatus::Complete(VideoId::new("short")))]);
        let mut calls = 0;
        let id = upload(&platform, &metadata(), Path::new("v.mp4"), |_| calls += 1).unwrap();
        assert_eq!(id.as_str(), "short");
        assert_eq!(calls, 0);
    }

    #[test]
    fn chunk_error_aborts_upload() {
        let platform = FakePlatform::new().with_upload_chunks(vec![
            Ok(ChunkStatus::InProgress(UploadProgress::new(0.1))),
            Err(ApiError::Status {
                status: 503,
                message: "Backend Error".into(),
            }),
            Ok(ChunkStatus::Complete(VideoId::new("never"))),
        ]);
        let err = upload(&platform, &metadata(), Path::new("v.mp4"), |_| {}).unwrap_err();
        assert!(matches!(err, ApiError::Status { status: 503, .. }));
        assert_eq!(platform.chunks_sent.get(), 2);
    }
}
