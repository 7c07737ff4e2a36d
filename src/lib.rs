//! Forum thread watcher library.
//!
//! Re-visits forum threads, returns the posts that appeared since a
//! checkpoint, and turns each post's free-form text into download links
//! grouped by video quality and hosting provider.

pub mod config;
pub mod constants;
pub mod content;
pub mod engine;
pub mod fetch;
pub mod forums;
pub mod post;

pub use engine::{check_thread, latest_post_id, ScrapeError, ThreadChecker};
pub use forums::ForumKind;
pub use post::{Post, ProviderLinks, QualityTier, VideoQuality};
