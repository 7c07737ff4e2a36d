use scraper::Html;

use super::registry::ForumKind;
use crate::post::Post;

/// Which page the navigator should produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationMode {
    /// Position on the most recent page of the thread (first call of a check).
    Locate,
    /// Step one page back in time.
    Previous,
}

/// Scraping contract implemented once per forum family.
///
/// Adapters work on an already-parsed document so they stay synchronous; the
/// engine owns all network access.
pub trait ForumAdapter: Send + Sync {
    /// Forum family this adapter understands.
    fn forum_kind(&self) -> ForumKind;

    /// Extract every post on the page, most recent first.
    ///
    /// `thread_url` is used to resolve relative links. A page without any
    /// recognizable post yields an empty list.
    fn extract_posts(&self, page: &Html, thread_url: &str) -> Vec<Post>;

    /// URL of the next page to inspect, if any.
    fn next_page_url(&self, page: &Html, url: &str, mode: NavigationMode) -> Option<String>;
}
