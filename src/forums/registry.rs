use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

use super::planetsuzy::PlanetSuzyAdapter;
use super::traits::ForumAdapter;
use crate::content::ProviderMatcher;

/// Lookup or detection failed for a forum.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unsupported forum kind: {0}")]
pub struct UnsupportedForumKind(pub String);

/// Supported forum families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ForumKind {
    PlanetSuzy,
}

impl ForumKind {
    pub const ALL: [Self; 1] = [Self::PlanetSuzy];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PlanetSuzy => "planetsuzy",
        }
    }

    /// Domain fragments identifying this forum in a thread URL.
    fn url_fragments(self) -> &'static [&'static str] {
        match self {
            Self::PlanetSuzy => &["planetsuzy"],
        }
    }

    /// Detect the forum family from a thread URL.
    ///
    /// # Errors
    ///
    /// Returns an error if no known forum matches the URL.
    pub fn detect(url: &str) -> Result<Self, UnsupportedForumKind> {
        let lower = url.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.url_fragments().iter().any(|f| lower.contains(f)))
            .ok_or_else(|| UnsupportedForumKind(url.to_string()))
    }
}

impl fmt::Display for ForumKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ForumKind {
    type Err = UnsupportedForumKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| UnsupportedForumKind(s.to_string()))
    }
}

/// Registry mapping forum kinds to their adapters.
pub struct ForumRegistry {
    adapters: Vec<Box<dyn ForumAdapter>>,
}

impl ForumRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            adapters: Vec::new(),
        }
    }

    /// Registry with every built-in adapter.
    #[must_use]
    pub fn with_defaults(providers: &ProviderMatcher) -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(PlanetSuzyAdapter::new(providers.clone())));
        registry
    }

    /// Register an adapter, replacing any earlier one for the same kind.
    pub fn register(&mut self, adapter: Box<dyn ForumAdapter>) {
        let kind = adapter.forum_kind();
        self.adapters.retain(|a| a.forum_kind() != kind);
        self.adapters.push(adapter);
    }

    /// Adapter for `kind`.
    ///
    /// # Errors
    ///
    /// Returns an error if no adapter is registered for `kind`.
    pub fn adapter(&self, kind: ForumKind) -> Result<&dyn ForumAdapter, UnsupportedForumKind> {
        self.adapters
            .iter()
            .find(|a| a.forum_kind() == kind)
            .map(AsRef::as_ref)
            .ok_or_else(|| UnsupportedForumKind(kind.to_string()))
    }
}

impl Default for ForumRegistry {
    fn default() -> Self {
        Self::new()
    }
}
