//! Inferring video quality tiers from segment text.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

use super::providers::ProviderMatcher;
use super::segment::{clean_content, segment_content};
use crate::constants::UNKNOWN_QUALITY_DESCRIPTION;
use crate::post::{QualityTier, VideoQuality};

static RESOLUTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]+)\s*[xX]\s*([0-9]+)").expect("valid resolution pattern"));

static CONTAINER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(mp4|mkv|avi|wmv|mov)\b").expect("valid container pattern")
});

static SIZE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)([0-9]+(?:\.[0-9]+)?)\s*([MGT]i?B)").expect("valid size pattern")
});

static DURATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)([0-9]+:[0-9]+(?::[0-9]+)?|[0-9]+\s*min(?:utes?)?(?:\s*[0-9]+\s*s(?:ec(?:onds?)?)?)?)",
    )
    .expect("valid duration pattern")
});

static KEYWORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(4K|UHD|HD|FullHD|SD|1080|720|2160)\b").expect("valid keyword pattern")
});

/// A size token such as `1.5 GB`.
#[derive(Debug, Clone, Copy)]
struct SizeToken<'a> {
    number: &'a str,
    unit: &'a str,
}

impl SizeToken<'_> {
    fn find(text: &str) -> Option<SizeToken<'_>> {
        let caps = SIZE.captures(text)?;
        Some(SizeToken {
            number: caps.get(1)?.as_str(),
            unit: caps.get(2)?.as_str(),
        })
    }

    fn label(&self) -> String {
        format!("{} {}", self.number, self.unit)
    }

    /// Label with the unit uppercased, as `2.4 GB`.
    fn normalized_label(&self) -> String {
        format!("{} {}", self.number, self.unit.to_ascii_uppercase())
    }

    /// Estimate a tier from file size alone. Only GB and MB sizes have buckets.
    fn tier(&self) -> Option<QualityTier> {
        let value: f64 = self.number.parse().ok()?;
        let tier = match self.unit.to_ascii_uppercase().as_str() {
            "GB" | "GIB" => {
                if value < 1.5 {
                    QualityTier::Sd
                } else if value < 3.0 {
                    QualityTier::Hd
                } else if value < 6.0 {
                    QualityTier::FullHd
                } else {
                    QualityTier::UltraHd
                }
            }
            "MB" | "MIB" => {
                if value < 1500.0 {
                    QualityTier::Sd
                } else if value < 3000.0 {
                    QualityTier::Hd
                } else {
                    QualityTier::FullHd
                }
            }
            _ => return None,
        };
        Some(tier)
    }
}

fn tier_for_resolution(width: u64, height: u64) -> QualityTier {
    if width >= 3840 || height >= 2160 {
        QualityTier::UltraHd
    } else if width >= 1920 || height >= 1080 {
        QualityTier::FullHd
    } else if width >= 1280 || height >= 720 {
        QualityTier::Hd
    } else {
        QualityTier::Sd
    }
}

fn tier_for_keyword(keyword: &str) -> QualityTier {
    match keyword.to_lowercase().as_str() {
        "4k" | "uhd" | "2160" => QualityTier::UltraHd,
        "fullhd" | "1080" => QualityTier::FullHd,
        "hd" | "720" => QualityTier::Hd,
        "sd" => QualityTier::Sd,
        other => QualityTier::Other(other.to_uppercase()),
    }
}

/// Digits of a resolution dimension without leading zeros.
fn trim_dimension(digits: &str) -> &str {
    match digits.trim_start_matches('0') {
        "" => "0",
        trimmed => trimmed,
    }
}

/// Value of a resolution dimension; overlong values saturate.
fn parse_dimension(digits: &str) -> u64 {
    digits.parse().unwrap_or(u64::MAX)
}

fn classify_by_resolution(text: &str) -> Option<VideoQuality> {
    let caps = RESOLUTION.captures(text)?;
    let width = trim_dimension(caps.get(1)?.as_str());
    let height = trim_dimension(caps.get(2)?.as_str());

    let mut description = format!("{width}x{height}");
    if let Some(container) = CONTAINER.find(text) {
        description.push_str(" - ");
        description.push_str(container.as_str());
    }
    if let Some(size) = SizeToken::find(text) {
        description.push_str(" - ");
        description.push_str(&size.label());
    }
    if let Some(duration) = DURATION.find(text) {
        description.push_str(" - ");
        description.push_str(duration.as_str());
    }

    Some(VideoQuality::new(
        tier_for_resolution(parse_dimension(width), parse_dimension(height)),
        description,
    ))
}

fn classify_by_keyword(text: &str) -> Option<VideoQuality> {
    let keyword = KEYWORD.find(text)?.as_str();
    Some(VideoQuality::new(tier_for_keyword(keyword), keyword))
}

fn classify_by_size(text: &str) -> Option<VideoQuality> {
    let size = SizeToken::find(text)?;
    let tier = size
        .tier()
        .unwrap_or_else(|| QualityTier::Other(text.to_string()));
    Some(VideoQuality::new(tier, size.normalized_label()))
}

/// Classify one segment's text into a quality with no links attached yet.
///
/// Tries an explicit `WxH` resolution, then a quality keyword, then the file
/// size. When nothing matches, the text itself names the quality.
#[must_use]
pub fn classify_segment(text: &str) -> VideoQuality {
    classify_by_resolution(text)
        .or_else(|| classify_by_keyword(text))
        .or_else(|| classify_by_size(text))
        .unwrap_or_else(|| {
            VideoQuality::new(
                QualityTier::Other(text.to_string()),
                UNKNOWN_QUALITY_DESCRIPTION,
            )
        })
}

/// Group a post's download links into quality tiers.
///
/// Links found in the text that are not among `download_links` are ignored.
/// If no segment yields a quality, every download link lands in a single
/// `Unknown` entry.
#[must_use]
pub fn extract_video_qualities(
    content: &str,
    download_links: &[String],
    providers: &ProviderMatcher,
) -> Vec<VideoQuality> {
    if download_links.is_empty() {
        return Vec::new();
    }

    let known: HashSet<&str> = download_links.iter().map(String::as_str).collect();
    let mut qualities = Vec::new();

    for segment in segment_content(&clean_content(content)) {
        let links: Vec<String> = segment
            .links
            .into_iter()
            .filter(|link| known.contains(link.as_str()))
            .collect();
        if links.is_empty() {
            continue;
        }

        let mut quality = classify_segment(&segment.text);
        for link in links {
            quality
                .provider_links
                .add_link(providers.provider_or_unknown(&link), link);
        }
        trace!(quality = %quality.quality_name, description = %quality.description, "Classified segment");
        qualities.push(quality);
    }

    if qualities.is_empty() {
        let mut quality = VideoQuality::new(QualityTier::Unknown, UNKNOWN_QUALITY_DESCRIPTION);
        for link in download_links {
            quality
                .provider_links
                .add_link(providers.provider_or_unknown(link), link.clone());
        }
        qualities.push(quality);
    }

    qualities
}
