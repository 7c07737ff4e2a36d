//! Turning free-form post text into provider-grouped download options.

mod providers;
mod quality;
mod segment;

pub use providers::ProviderMatcher;
pub use quality::{classify_segment, extract_video_qualities};
pub use segment::{clean_content, segment_content, Segment};
