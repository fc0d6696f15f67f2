// Comment workflow: page through a video's comment threads, then delete
// the ones whose text contains every keyword.

use crate::error::ApiResult;
use crate::model::CommentThread;
use crate::platform::VideoPlatform;
use tracing::{debug, info, warn};

/// Lazily walks the comment-thread listing of one video, one page per
/// `next()`. Iteration ends after the last page or after the first error.
pub struct CommentPages<'a, P: ?Sized> {
    platform: &'a P,
    video_id: String,
    // `None` once the listing is exhausted or failed.
    cursor: Option<Option<String>>,
}

/// Start a lazy listing of `video_id`. No request is made until the first
/// `next()`.
pub fn comment_pages<'a, P>(platform: &'a P, video_id: &str) -> CommentPages<'a, P>
where
    P: VideoPlatform + ?Sized,
{
    CommentPages {
        platform,
        video_id: video_id.to_string(),
        cursor: Some(None),
    }
}

impl<P> Iterator for CommentPages<'_, P>
where
    P: VideoPlatform + ?Sized,
{
    type Item = ApiResult<Vec<CommentThread>>;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.cursor.take()?;
        match self
            .platform
            .list_comment_threads(&self.video_id, token.as_deref())
        {
            Ok(page) => {
                debug!(items = page.items.len(), more = page.next_page_token.is_some(), "comment page");
                self.cursor = page.next_page_token.map(Some);
                Some(Ok(page.items))
            }
            Err(err) => Some(Err(err)),
        }
    }
}

/// Fetches every comment thread on `video_id`, in service order. The whole
/// listing is held in memory; a failed page fails the whole fetch.
pub fn fetch_all_comments<P>(platform: &P, video_id: &str) -> ApiResult<Vec<CommentThread>>
where
    P: VideoPlatform + ?Sized,
{
    let mut comments = Vec::new();
    for page in comment_pages(platform, video_id) {
        comments.extend(page?);
    }
    info!(video_id, count = comments.len(), "fetched comment threads");
    Ok(comments)
}

/// Case-sensitive substring test; every keyword has to appear.
pub fn matches_all_keywords(text: &str, keywords: &[String]) -> bool {
    keywords.iter().all(|keyword| text.contains(keyword.as_str()))
}

/// Hooks into the deletion loop for confirmation and reporting.
pub trait DeletionObserver {
    /// Called for each matching thread before it is deleted. Returning
    /// `false` skips the thread.
    fn approve(&mut self, _thread: &CommentThread) -> ApiResult<bool> {
        Ok(true)
    }

    fn deleted(&mut self, thread: &CommentThread);
}

/// Deletes the top-level comment of every thread whose display text contains
/// all `keywords`. Stops at the first failed delete.
pub fn delete_matching<P, O>(
    platform: &P,
    comments: &[CommentThread],
    keywords: &[String],
    observer: &mut O,
) -> ApiResult<usize>
where
    P: VideoPlatform + ?Sized,
    O: DeletionObserver + ?Sized,
{
    let mut deleted = 0;
    for thread in comments
        .iter()
        .filter(|thread| matches_all_keywords(&thread.display_text, keywords))
    {
        if !observer.approve(thread)? {
            continue;
        }
        if let Err(err) = platform.delete_comment(&thread.top_level_comment_id) {
            warn!(
                comment_id = %thread.top_level_comment_id,
                deleted,
                "stopping after failed delete"
            );
            return Err(err);
        }
        observer.deleted(thread);
        deleted += 1;
    }
    Ok(deleted)
}
