//! Extracted post records.

use std::cmp::Ordering;
use std::fmt;

use chrono::NaiveDateTime;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::constants::UNKNOWN_AUTHOR;

/// One forum message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Post {
    /// Forum-native id, unique within the thread.
    pub post_id: String,
    /// Per-thread post counter, when the forum renders one.
    pub sequence_number: Option<u64>,
    /// Forum-local posting time, absent when unparseable.
    pub timestamp: Option<NaiveDateTime>,
    pub author: String,
    /// Plain text with download hyperlinks inlined as their URL.
    pub content: String,
    pub download_links: Vec<String>,
    pub image_links: Vec<String>,
    pub video_qualities: Vec<VideoQuality>,
}

impl Post {
    /// Create a post with only an id; every other field takes its default.
    #[must_use]
    pub fn new(post_id: impl Into<String>) -> Self {
        Self {
            post_id: post_id.into(),
            sequence_number: None,
            timestamp: None,
            author: UNKNOWN_AUTHOR.to_string(),
            content: String::new(),
            download_links: Vec::new(),
            image_links: Vec::new(),
            video_qualities: Vec::new(),
        }
    }

    /// Compare two posts by `(sequence_number or 0, post_id)`.
    #[must_use]
    pub fn recency_cmp(&self, other: &Self) -> Ordering {
        self.sequence_number
            .unwrap_or(0)
            .cmp(&other.sequence_number.unwrap_or(0))
            .then_with(|| compare_post_ids(&self.post_id, &other.post_id))
    }

    /// Whether this post is strictly newer than the post with `post_id`.
    #[must_use]
    pub fn is_newer_than(&self, post_id: &str) -> bool {
        compare_post_ids(&self.post_id, post_id) == Ordering::Greater
    }
}

impl fmt::Display for Post {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Post(id={}, author={}, links={})",
            self.post_id,
            self.author,
            self.download_links.len()
        )
    }
}

/// Compare two post ids in forum order.
///
/// Ids made only of ASCII digits compare numerically (without overflow, so
/// arbitrarily long ids work); anything else falls back to lexical order.
#[must_use]
pub fn compare_post_ids(a: &str, b: &str) -> Ordering {
    fn is_numeric(s: &str) -> bool {
        !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
    }

    if is_numeric(a) && is_numeric(b) {
        let a = a.trim_start_matches('0');
        let b = b.trim_start_matches('0');
        a.len().cmp(&b.len()).then_with(|| a.cmp(b))
    } else {
        a.cmp(b)
    }
}

/// Sort posts most recent first.
pub fn sort_newest_first(posts: &mut [Post]) {
    posts.sort_by(|a, b| b.recency_cmp(a));
}

/// Coarse video quality tier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QualityTier {
    UltraHd,
    FullHd,
    Hd,
    Sd,
    Unknown,
    /// Free-form term taken from the post text.
    Other(String),
}

impl QualityTier {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::UltraHd => "4K",
            Self::FullHd => "FullHD",
            Self::Hd => "HD",
            Self::Sd => "SD",
            Self::Unknown => "Unknown",
            Self::Other(term) => term,
        }
    }
}

impl fmt::Display for QualityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for QualityTier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Download links grouped by provider, in first-seen provider order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderLinks {
    entries: Vec<(String, Vec<String>)>,
}

impl ProviderLinks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `link` under `provider`, inserting the provider if absent.
    pub fn add_link(&mut self, provider: &str, link: impl Into<String>) {
        let link = link.into();
        if let Some((_, links)) = self.entries.iter_mut().find(|(p, _)| p == provider) {
            links.push(link);
        } else {
            self.entries.push((provider.to_string(), vec![link]));
        }
    }

    #[must_use]
    pub fn get(&self, provider: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(p, _)| p == provider)
            .map(|(_, links)| links.as_slice())
    }

    /// Providers in insertion order.
    pub fn providers(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(p, _)| p.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(p, links)| (p.as_str(), links.as_slice()))
    }

    /// Every link across all providers.
    pub fn links(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .flat_map(|(_, links)| links.iter().map(String::as_str))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for ProviderLinks {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (provider, links) in &self.entries {
            map.serialize_entry(provider, links)?;
        }
        map.end()
    }
}

/// One inferred quality tier within a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoQuality {
    pub quality_name: QualityTier,
    /// Resolution, container, size or duration details.
    pub description: String,
    pub provider_links: ProviderLinks,
}

impl VideoQuality {
    #[must_use]
    pub fn new(quality_name: QualityTier, description: impl Into<String>) -> Self {
        Self {
            quality_name,
            description: description.into(),
            provider_links: ProviderLinks::new(),
        }
    }
}

impl fmt::Display for VideoQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "VideoQuality({}, providers: {})",
            self.quality_name,
            self.provider_links.len()
        )
    }
}
