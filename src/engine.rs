//! Incremental thread checking.
//!
//! A check positions itself on the most recent page of a thread, then walks
//! backward page by page until it meets the checkpoint post. Each page's URL
//! depends on the page before it, so a single check is strictly sequential;
//! checks of different threads share nothing and may run concurrently.

use std::sync::Arc;

use scraper::Html;
use thiserror::Error;
use tracing::{debug, info, trace};

use crate::config::Config;
use crate::content::ProviderMatcher;
use crate::fetch::{FetchError, HttpFetcher, PageFetcher};
use crate::forums::{ForumAdapter, ForumKind, ForumRegistry, NavigationMode, UnsupportedForumKind};
use crate::post::Post;

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    UnsupportedForumKind(#[from] UnsupportedForumKind),
}

/// Entry point for checking threads: a fetcher plus the adapters it serves.
pub struct ThreadChecker {
    fetcher: Arc<dyn PageFetcher>,
    registry: ForumRegistry,
}

impl ThreadChecker {
    #[must_use]
    pub fn new(fetcher: Arc<dyn PageFetcher>, registry: ForumRegistry) -> Self {
        Self { fetcher, registry }
    }

    /// HTTP fetcher and built-in adapters, both driven by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: &Config) -> Result<Self, FetchError> {
        let providers = ProviderMatcher::new(config.download_providers.iter().cloned());
        Ok(Self::new(
            Arc::new(HttpFetcher::new(config)?),
            ForumRegistry::with_defaults(&providers),
        ))
    }

    /// Posts of `thread_url` newer than `last_post_id`, most recent first.
    ///
    /// Without a checkpoint only the single most recent post is returned.
    ///
    /// # Errors
    ///
    /// Returns an error if no adapter handles `kind` (before any request is
    /// made) or if any page fetch fails. No partial results are returned.
    pub async fn check_for_new_posts(
        &self,
        thread_url: &str,
        last_post_id: Option<&str>,
        kind: ForumKind,
    ) -> Result<Vec<Post>, ScrapeError> {
        let adapter = self.registry.adapter(kind)?;
        Ok(check_thread(self.fetcher.as_ref(), adapter, thread_url, last_post_id).await?)
    }
}

enum WalkState {
    Locating,
    Walking { url: String, markup: String },
    Done,
}

/// Run one check of `thread_url` with an explicit fetcher and adapter.
///
/// # Errors
///
/// Returns the first fetch failure; the whole check is abandoned.
pub async fn check_thread(
    fetcher: &dyn PageFetcher,
    adapter: &dyn ForumAdapter,
    thread_url: &str,
    last_post_id: Option<&str>,
) -> Result<Vec<Post>, FetchError> {
    info!(url = %thread_url, last_post_id = ?last_post_id, "Checking thread");

    let mut found = Vec::new();
    let mut state = WalkState::Locating;

    loop {
        state = match state {
            WalkState::Locating => {
                let markup = fetcher.fetch(thread_url).await?;
                let target = {
                    let document = Html::parse_document(&markup);
                    adapter.next_page_url(&document, thread_url, NavigationMode::Locate)
                };

                match target {
                    Some(url) => {
                        debug!(url = %url, "Starting walk from located page");
                        let markup = fetcher.fetch(&url).await?;
                        WalkState::Walking { url, markup }
                    }
                    None => WalkState::Walking {
                        url: thread_url.to_string(),
                        markup,
                    },
                }
            }
            WalkState::Walking { url, markup } => {
                let (posts, previous) = {
                    let document = Html::parse_document(&markup);
                    (
                        adapter.extract_posts(&document, thread_url),
                        adapter.next_page_url(&document, &url, NavigationMode::Previous),
                    )
                };

                match last_post_id {
                    None => {
                        found.extend(posts.into_iter().next());
                        WalkState::Done
                    }
                    Some(checkpoint) => {
                        if collect_newer(posts, checkpoint, &mut found) {
                            debug!(url = %url, "Checkpoint found");
                            WalkState::Done
                        } else if let Some(previous) = previous {
                            debug!(from = %url, to = %previous, "Checkpoint not on page, walking back");
                            let markup = fetcher.fetch(&previous).await?;
                            WalkState::Walking {
                                url: previous,
                                markup,
                            }
                        } else {
                            debug!(url = %url, "No earlier page, checkpoint never seen");
                            WalkState::Done
                        }
                    }
                }
            }
            WalkState::Done => break,
        };
    }

    info!(url = %thread_url, new_posts = found.len(), "Thread check complete");
    Ok(found)
}

/// Append posts newer than `checkpoint` to `found`.
///
/// Scanning stops at the checkpoint itself; older posts are skipped without
/// stopping since page order is not always strictly monotonic. Returns
/// whether the checkpoint was on this page.
fn collect_newer(posts: Vec<Post>, checkpoint: &str, found: &mut Vec<Post>) -> bool {
    for post in posts {
        if post.post_id == checkpoint {
            return true;
        }
        if post.is_newer_than(checkpoint) {
            found.push(post);
        } else {
            trace!(post_id = %post.post_id, checkpoint, "Skipping older post");
        }
    }
    false
}

/// Checkpoint to persist after a check: the id of the most recent post.
#[must_use]
pub fn latest_post_id(posts: &[Post]) -> Option<&str> {
    posts.first().map(|p| p.post_id.as_str())
}
