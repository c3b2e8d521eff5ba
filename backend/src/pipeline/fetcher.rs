use crate::pipeline::video_id::VideoId;
use crate::platform::{CommentPage, PlatformError, VideoPlatform};
use futures::stream::{self, Stream, StreamExt, TryStreamExt};
use log::debug;

/// Comment threads requested per page.
pub const PAGE_SIZE: u32 = 100;
/// Hard cap on pages per request, so at most `PAGE_SIZE * MAX_PAGES` raw comments.
pub const MAX_PAGES: usize = 7;
/// Comments with this many whitespace separated words or fewer are dropped.
pub const MAX_TRIVIAL_WORDS: usize = 2;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchedComments {
    /// Comments that survived filtering, in platform order.
    pub comments: Vec<String>,
    pub raw_count: usize,
    pub pages: usize,
}

enum Cursor {
    Start,
    Next(String),
    Done,
}

/// Lazily pages through the comment threads of `video_id`.
///
/// The stream ends after the first page without a continuation token, after
/// the first error, or after [`MAX_PAGES`] pages, whichever comes first.
pub fn comment_pages<'a>(
    platform: &'a dyn VideoPlatform,
    video_id: &'a VideoId,
) -> impl Stream<Item = Result<CommentPage, PlatformError>> + Send + 'a {
    stream::try_unfold(Cursor::Start, move |cursor| async move {
        let token = match cursor {
            Cursor::Start => None,
            Cursor::Next(token) => Some(token),
            Cursor::Done => return Ok(None),
        };

        let page = platform
            .comment_page(video_id, PAGE_SIZE, token.as_deref())
            .await?;
        let next = match &page.next_page_token {
            Some(token) => Cursor::Next(token.clone()),
            None => Cursor::Done,
        };
        Ok::<_, PlatformError>(Some((page, next)))
    })
    .take(MAX_PAGES)
}

pub fn is_meaningful(comment: &str) -> bool {
    comment.split_whitespace().count() > MAX_TRIVIAL_WORDS
}

/// Collects every meaningful comment from the bounded page stream.
pub async fn fetch_comments(
    platform: &dyn VideoPlatform,
    video_id: &VideoId,
) -> Result<FetchedComments, PlatformError> {
    let mut pages = std::pin::pin!(comment_pages(platform, video_id));
    let mut fetched = FetchedComments::default();

    while let Some(page) = pages.try_next().await? {
        fetched.pages += 1;
        fetched.raw_count += page.comments.len();
        fetched
            .comments
            .extend(page.comments.into_iter().filter(|c| is_meaningful(c)));
    }

    debug!(
        "Fetched {} comments over {} page(s) for {video_id}, {} kept",
        fetched.raw_count,
        fetched.pages,
        fetched.comments.len()
    );
    Ok(fetched)
}
