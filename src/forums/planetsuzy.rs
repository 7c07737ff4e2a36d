//! Adapter for PlanetSuzy, a vBulletin 3 forum.
//!
//! Each post is a `table#post<ID>`; the header cell holds the date, the
//! `postcount` anchor holds the per-thread counter and the body lives in
//! `div#post_message_<ID>`.

use std::sync::LazyLock;

use chrono::{Local, NaiveDateTime};
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, trace, warn};
use url::Url;

use super::dates::parse_post_date;
use super::page_marker;
use super::registry::ForumKind;
use super::traits::{ForumAdapter, NavigationMode};
use crate::constants::UNKNOWN_AUTHOR;
use crate::content::{extract_video_qualities, ProviderMatcher};
use crate::post::{sort_newest_first, Post};

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("Invalid selector")
}

static POST_BLOCK: LazyLock<Selector> = LazyLock::new(|| selector(r#"table[id^="post"]"#));
static POST_COUNT: LazyLock<Selector> = LazyLock::new(|| selector(r#"a[id^="postcount"]"#));
static HEADER: LazyLock<Selector> = LazyLock::new(|| selector("td.thead"));
static AUTHOR: LazyLock<Selector> = LazyLock::new(|| selector("a.bigusername"));
static BODY: LazyLock<Selector> = LazyLock::new(|| selector(r#"div[id^="post_message_"]"#));
static LINK: LazyLock<Selector> = LazyLock::new(|| selector("a[href]"));
static TITLED_LINK: LazyLock<Selector> = LazyLock::new(|| selector("a[title]"));
static IMAGE: LazyLock<Selector> = LazyLock::new(|| selector("img[src]"));

/// Class vBulletin puts on smilies and other inline icons.
const INLINE_ICON_CLASS: &str = "inlineimg";

pub struct PlanetSuzyAdapter {
    providers: ProviderMatcher,
    clock: fn() -> NaiveDateTime,
}

impl PlanetSuzyAdapter {
    #[must_use]
    pub fn new(providers: ProviderMatcher) -> Self {
        Self {
            providers,
            clock: || Local::now().naive_local(),
        }
    }

    /// Use a fixed clock for resolving `Today` / `Yesterday` dates.
    #[must_use]
    pub fn with_clock(mut self, clock: fn() -> NaiveDateTime) -> Self {
        self.clock = clock;
        self
    }

    fn extract_post(
        &self,
        block: ElementRef<'_>,
        origin: Option<&Url>,
        now: NaiveDateTime,
    ) -> Option<Post> {
        let post_id = block
            .value()
            .id()
            .and_then(|id| id.strip_prefix("post"))
            .filter(|id| !id.is_empty())?
            .to_string();

        let sequence_number = block
            .select(&POST_COUNT)
            .next()
            .and_then(|a| a.value().attr("name"))
            .and_then(|name| name.trim().parse().ok());

        let timestamp = block.select(&HEADER).next().and_then(|header| {
            let text: String = header.text().collect();
            parse_post_date(text.trim(), now)
        });

        let author = block
            .select(&AUTHOR)
            .next()
            .map(|a| a.text().collect::<String>().trim().to_string())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string());

        let mut post = Post {
            sequence_number,
            timestamp,
            author,
            ..Post::new(post_id)
        };

        let Some(body) = block.select(&BODY).next() else {
            debug!(post_id = %post.post_id, "Post has no message body");
            return Some(post);
        };

        post.content = self.flatten_body(body);
        post.download_links = body
            .select(&LINK)
            .filter_map(|a| a.value().attr("href"))
            .filter(|href| self.providers.is_download_link(href))
            .map(ToString::to_string)
            .collect();
        post.image_links = extract_images(body, origin);

        if !post.download_links.is_empty() {
            post.video_qualities =
                extract_video_qualities(&post.content, &post.download_links, &self.providers);
        }

        Some(post)
    }

    /// Flatten the message body to text, inlining download anchors as their URL.
    fn flatten_body(&self, body: ElementRef<'_>) -> String {
        let mut pieces = Vec::new();
        self.collect_text(body, &mut pieces);
        pieces.join(" ")
    }

    fn collect_text(&self, element: ElementRef<'_>, pieces: &mut Vec<String>) {
        for child in element.children() {
            if let Some(text) = child.value().as_text() {
                let text = text.trim();
                if !text.is_empty() {
                    pieces.push(text.to_string());
                }
                continue;
            }

            let Some(child) = ElementRef::wrap(child) else {
                continue;
            };
            match child.value().name() {
                "script" | "style" => {}
                "a" => match child.value().attr("href") {
                    Some(href) if self.providers.is_download_link(href) => {
                        pieces.push(href.to_string());
                    }
                    _ => self.collect_text(child, pieces),
                },
                _ => self.collect_text(child, pieces),
            }
        }
    }
}

/// Absolute image sources in the body, skipping inline icons.
fn extract_images(body: ElementRef<'_>, origin: Option<&Url>) -> Vec<String> {
    body.select(&IMAGE)
        .filter(|img| !img.value().classes().any(|c| c == INLINE_ICON_CLASS))
        .filter_map(|img| img.value().attr("src"))
        .map(str::trim)
        .filter(|src| !src.is_empty())
        .filter_map(|src| {
            if src.starts_with("http") {
                return Some(src.to_string());
            }
            let resolved = origin.and_then(|o| o.join(src).ok()).map(String::from);
            if resolved.is_none() {
                trace!(src = %src, "Dropping unresolvable image source");
            }
            resolved
        })
        .collect()
}

/// Scheme and host of the thread, used as the base for relative sources.
fn thread_origin(thread_url: &str) -> Option<Url> {
    let mut origin = Url::parse(thread_url).ok()?;
    origin.set_path("/");
    origin.set_query(None);
    origin.set_fragment(None);
    Some(origin)
}

/// `page` query parameter of `href`, resolved against `base`.
fn page_param(href: &str, base: &Url) -> Option<u64> {
    let target = base.join(href).ok()?;
    let (_, value) = target.query_pairs().find(|(key, _)| key == "page")?;
    value.parse().ok()
}

/// Highest page number advertised by the pagination links on `page`.
///
/// Prefers the "Last Page" link; short threads list every page instead, so
/// fall back to the largest `page=` value linked. Defaults to page 1.
fn last_page_number(page: &Html, url: &str) -> u64 {
    let Ok(base) = Url::parse(url) else {
        return 1;
    };

    let last_page_link = page.select(&TITLED_LINK).find(|a| {
        a.value()
            .attr("title")
            .is_some_and(|title| title.contains("Last Page"))
    });
    if let Some(link) = last_page_link {
        return link
            .value()
            .attr("href")
            .and_then(|href| page_param(href, &base))
            .unwrap_or(1);
    }

    page.select(&LINK)
        .filter_map(|a| a.value().attr("href"))
        .filter(|href| href.contains("page"))
        .filter_map(|href| page_param(href, &base))
        .max()
        .unwrap_or(1)
        .max(1)
}

impl ForumAdapter for PlanetSuzyAdapter {
    fn forum_kind(&self) -> ForumKind {
        ForumKind::PlanetSuzy
    }

    fn extract_posts(&self, page: &Html, thread_url: &str) -> Vec<Post> {
        let origin = thread_origin(thread_url);
        let now = (self.clock)();

        let blocks: Vec<_> = page.select(&POST_BLOCK).collect();
        if blocks.is_empty() {
            warn!(url = %thread_url, "Page has no post blocks, treating as empty");
            return Vec::new();
        }

        let mut posts: Vec<Post> = blocks
            .into_iter()
            .filter_map(|block| self.extract_post(block, origin.as_ref(), now))
            .collect();
        sort_newest_first(&mut posts);

        debug!(url = %thread_url, count = posts.len(), "Extracted posts");
        posts
    }

    fn next_page_url(&self, page: &Html, url: &str, mode: NavigationMode) -> Option<String> {
        match mode {
            NavigationMode::Previous => page_marker::previous_page_url(url),
            NavigationMode::Locate if page_marker::page_number(url).is_some() => {
                page_marker::previous_page_url(url)
            }
            NavigationMode::Locate => {
                let last = last_page_number(page, url);
                debug!(url = %url, last_page = last, "Located last page");
                page_marker::with_page_number(url, last)
            }
        }
    }
}
