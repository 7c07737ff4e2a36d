use crate::constants::UNKNOWN_PROVIDER;

/// Recognizes download links by provider substring.
#[derive(Debug, Clone)]
pub struct ProviderMatcher {
    /// Configured spelling, paired with its lowercased form for matching.
    providers: Vec<(String, String)>,
}

impl ProviderMatcher {
    #[must_use]
    pub fn new<I, S>(providers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            providers: providers
                .into_iter()
                .map(Into::into)
                .map(|p| {
                    let lower = p.to_lowercase();
                    (p, lower)
                })
                .collect(),
        }
    }

    /// Whether `url` belongs to any configured provider (case-insensitive).
    #[must_use]
    pub fn is_download_link(&self, url: &str) -> bool {
        self.provider_of(url).is_some()
    }

    /// Provider for `url`, first configured match wins.
    #[must_use]
    pub fn provider_of(&self, url: &str) -> Option<&str> {
        let url = url.to_lowercase();
        self.providers
            .iter()
            .find(|(_, lower)| url.contains(lower.as_str()))
            .map(|(configured, _)| configured.as_str())
    }

    /// Provider for `url`, or `"unknown"`.
    #[must_use]
    pub fn provider_or_unknown(&self, url: &str) -> &str {
        self.provider_of(url).unwrap_or(UNKNOWN_PROVIDER)
    }
}
