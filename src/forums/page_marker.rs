//! Page markers embedded in thread URLs.
//!
//! Thread URLs look like `/t123456-some-title.html`; page N of the thread is
//! `/t123456-pN-some-title.html`. Only the URL path is inspected, so hosts or
//! query strings containing dashes never confuse the rewrite.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

static MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-p([0-9]+)-").expect("valid page marker pattern"));

/// Page number encoded in the URL path, if any.
#[must_use]
pub fn page_number(url: &str) -> Option<u64> {
    let parsed = Url::parse(url).ok()?;
    let caps = MARKER.captures(parsed.path())?;
    caps.get(1)?.as_str().parse().ok()
}

/// URL of the page before the one encoded in `url`.
///
/// Returns `None` when the path carries no marker, or when the marker already
/// points at page 1 (there is nothing before the first page).
#[must_use]
pub fn previous_page_url(url: &str) -> Option<String> {
    let mut parsed = Url::parse(url).ok()?;
    let path = parsed.path().to_string();
    let digits = MARKER.captures(&path)?.get(1)?;
    let page: u64 = digits.as_str().parse().ok()?;
    if page <= 1 {
        return None;
    }

    let rewritten = format!(
        "{}{}{}",
        &path[..digits.start()],
        page - 1,
        &path[digits.end()..]
    );
    parsed.set_path(&rewritten);
    Some(parsed.into())
}

/// Insert a `-p<page>` marker after the first dash-separated field of the
/// final path segment.
///
/// Returns `None` when the final segment has no dash to anchor the marker.
#[must_use]
pub fn with_page_number(url: &str, page: u64) -> Option<String> {
    let mut parsed = Url::parse(url).ok()?;
    let path = parsed.path().to_string();
    let segment_start = path.rfind('/').map_or(0, |i| i + 1);
    let dash = segment_start + path[segment_start..].find('-')?;

    let rewritten = format!("{}-p{page}{}", &path[..dash], &path[dash..]);
    parsed.set_path(&rewritten);
    Some(parsed.into())
}
