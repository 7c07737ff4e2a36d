//! Shared constants used across the application.

/// User agent string sent with every forum page request.
///
/// Forums in this family serve reduced markup to unknown clients, so requests
/// identify as a regular desktop browser.
pub const SCRAPER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Default request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Provider name used for download links that match no configured provider.
pub const UNKNOWN_PROVIDER: &str = "unknown";

/// Author name used when a post carries no recognizable author element.
pub const UNKNOWN_AUTHOR: &str = "Unknown";

/// Description used when no quality detail could be inferred.
pub const UNKNOWN_QUALITY_DESCRIPTION: &str = "Unknown Quality";

/// File hosting providers recognized out of the box, in matching order.
pub const DEFAULT_DOWNLOAD_PROVIDERS: &[&str] = &[
    "filejoker.net",
    "k2s.cc",
    "filespace.com",
    "rg.to",
    "fboom.me",
    "fileboom.me",
    "filespace",
    "depositfiles",
    "filefox.cc",
    "rapidgator",
];
