//! Integration tests for incremental thread checks against a mock forum.

use std::sync::Arc;

use forum_thread_watcher::config::Config;
use forum_thread_watcher::content::ProviderMatcher;
use forum_thread_watcher::fetch::{FetchError, HttpFetcher};
use forum_thread_watcher::forums::ForumRegistry;
use forum_thread_watcher::{ForumKind, Post, QualityTier, ScrapeError, ThreadChecker};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const THREAD_PATH: &str = "/t777-jane-doe.html";

fn page_path(page: u64) -> String {
    format!("/t777-p{page}-jane-doe.html")
}

/// Render one vBulletin post table.
fn post_html(id: u64, count: u64, body: &str) -> String {
    format!(
        r#"<table id="post{id}" class="tborder">
          <tr>
            <td class="thead">23rd March 2023, 09:{minute:02}</td>
            <td class="thead" align="right"><a href="showpost.php?p={id}&amp;postcount={count}" id="postcount{id}" name="{count}">#{count}</a></td>
          </tr>
          <tr>
            <td class="alt2"><a class="bigusername" href="member.php?u=42">uploader</a></td>
            <td class="alt1"><div id="post_message_{id}">{body}</div></td>
          </tr>
        </table>"#,
        minute = count % 60
    )
}

/// Render a thread page; `last_page` adds a "Last Page" pagination link.
fn thread_page(posts: &[(u64, u64)], last_page: Option<u64>) -> String {
    let pagination = last_page.map_or_else(String::new, |last| {
        format!(
            r#"<div class="pagenav">
              <a href="showthread.php?t=777&amp;page=2">2</a>
              <a title="Last Page - Results 1 to 3 of 8" href="showthread.php?t=777&amp;page={last}">Last &raquo;</a>
            </div>"#
        )
    });
    let body: String = posts
        .iter()
        .map(|(id, count)| post_html(*id, *count, &format!("post number {count}")))
        .collect();
    format!("<html><body>{pagination}{body}</body></html>")
}

/// Three pages: posts 101-103, 104-106 and 107-108.
async fn mount_three_page_thread(server: &MockServer) {
    let page1 = thread_page(&[(101, 1), (102, 2), (103, 3)], Some(3));
    let page2 = thread_page(&[(104, 4), (105, 5), (106, 6)], Some(3));
    let page3 = thread_page(&[(107, 7), (108, 8)], Some(3));

    for (route, html) in [
        (THREAD_PATH.to_string(), page1.clone()),
        (page_path(1), page1),
        (page_path(2), page2),
        (page_path(3), page3),
    ] {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_string(html))
            .mount(server)
            .await;
    }
}

fn checker() -> ThreadChecker {
    let config = Config::default();
    let providers = ProviderMatcher::new(config.download_providers.iter().cloned());
    ThreadChecker::new(
        Arc::new(HttpFetcher::new(&config).expect("Failed to build fetcher")),
        ForumRegistry::with_defaults(&providers),
    )
}

fn ids(posts: &[Post]) -> Vec<&str> {
    posts.iter().map(|p| p.post_id.as_str()).collect()
}

#[tokio::test]
async fn test_bootstrap_returns_only_latest_post() {
    let server = MockServer::start().await;
    mount_three_page_thread(&server).await;
    let url = format!("{}{THREAD_PATH}", server.uri());
    let checker = checker();

    let first = checker
        .check_for_new_posts(&url, None, ForumKind::PlanetSuzy)
        .await
        .expect("check failed");
    let second = checker
        .check_for_new_posts(&url, None, ForumKind::PlanetSuzy)
        .await
        .expect("check failed");

    assert_eq!(ids(&first), vec!["108"]);
    assert_eq!(first, second);
    assert_eq!(first[0].sequence_number, Some(8));
    assert_eq!(first[0].author, "uploader");
}

#[tokio::test]
async fn test_checkpoint_on_last_page() {
    let server = MockServer::start().await;
    mount_three_page_thread(&server).await;
    let url = format!("{}{THREAD_PATH}", server.uri());

    let posts = checker()
        .check_for_new_posts(&url, Some("107"), ForumKind::PlanetSuzy)
        .await
        .expect("check failed");

    assert_eq!(ids(&posts), vec!["108"]);

    let requested: Vec<String> = server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|r| r.url.path().to_string())
        .collect();
    assert_eq!(requested, vec![THREAD_PATH.to_string(), page_path(3)]);
}

#[tokio::test]
async fn test_checkpoint_on_earlier_page_walks_back() {
    let server = MockServer::start().await;
    mount_three_page_thread(&server).await;
    let url = format!("{}{THREAD_PATH}", server.uri());

    let posts = checker()
        .check_for_new_posts(&url, Some("104"), ForumKind::PlanetSuzy)
        .await
        .expect("check failed");

    assert_eq!(ids(&posts), vec!["108", "107", "106", "105"]);
}

#[tokio::test]
async fn test_checkpoint_of_latest_post_returns_nothing() {
    let server = MockServer::start().await;
    mount_three_page_thread(&server).await;
    let url = format!("{}{THREAD_PATH}", server.uri());

    let posts = checker()
        .check_for_new_posts(&url, Some("108"), ForumKind::PlanetSuzy)
        .await
        .expect("check failed");

    assert!(posts.is_empty());
}

#[tokio::test]
async fn test_missing_checkpoint_exhausts_thread() {
    let server = MockServer::start().await;
    mount_three_page_thread(&server).await;
    let url = format!("{}{THREAD_PATH}", server.uri());

    // Post 100 was deleted; every remaining post is newer.
    let posts = checker()
        .check_for_new_posts(&url, Some("100"), ForumKind::PlanetSuzy)
        .await
        .expect("check failed");

    assert_eq!(
        ids(&posts),
        vec!["108", "107", "106", "105", "104", "103", "102", "101"]
    );
}

#[tokio::test]
async fn test_fetch_failure_mid_walk_returns_error() {
    let server = MockServer::start().await;
    let page3 = thread_page(&[(107, 7), (108, 8)], Some(3));
    Mock::given(method("GET"))
        .and(path(THREAD_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(page3.clone()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(page_path(3)))
        .respond_with(ResponseTemplate::new(200).set_body_string(page3))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(page_path(2)))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let url = format!("{}{THREAD_PATH}", server.uri());

    let result = checker()
        .check_for_new_posts(&url, Some("104"), ForumKind::PlanetSuzy)
        .await;

    assert!(matches!(
        result,
        Err(ScrapeError::Fetch(FetchError::Status { status: 500, .. }))
    ));
}

#[tokio::test]
async fn test_single_page_thread_without_pagination() {
    let server = MockServer::start().await;
    let page = thread_page(&[(11, 1), (12, 2), (13, 3)], None);
    for route in [THREAD_PATH.to_string(), page_path(1)] {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_string(page.clone()))
            .mount(&server)
            .await;
    }
    let url = format!("{}{THREAD_PATH}", server.uri());

    let posts = checker()
        .check_for_new_posts(&url, Some("11"), ForumKind::PlanetSuzy)
        .await
        .expect("check failed");

    assert_eq!(ids(&posts), vec!["13", "12"]);
}

#[tokio::test]
async fn test_download_links_are_grouped_by_quality() {
    let server = MockServer::start().await;
    let body = r#"<b>Jane Doe - Beach Day</b><br>
        3840x2160 mp4 5.2 GB 00:31:08<br>
        <a href="https://k2s.cc/file/abc/beach_4k.mp4" target="_blank">https://k2s.cc/file/abc/beach_4k.mp4</a><br>
        <a href="https://filejoker.net/xyz" target="_blank">FileJoker</a><br><br>
        1280x720 mp4 900 MB<br>
        <a href="https://k2s.cc/file/def/beach_720.mp4" target="_blank">Keep2Share</a><br>
        <img src="/images/thumbs/beach.jpg" border="0" alt="">
        <img src="/images/smilies/wink.gif" class="inlineimg" alt="">"#;
    let html = format!("<html><body>{}</body></html>", post_html(500, 1, body));
    for route in [THREAD_PATH.to_string(), page_path(1)] {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_string(html.clone()))
            .mount(&server)
            .await;
    }
    let url = format!("{}{THREAD_PATH}", server.uri());

    let posts = checker()
        .check_for_new_posts(&url, None, ForumKind::PlanetSuzy)
        .await
        .expect("check failed");

    assert_eq!(posts.len(), 1);
    let post = &posts[0];
    assert_eq!(post.download_links.len(), 3);
    assert_eq!(
        post.image_links,
        vec![format!("{}/images/thumbs/beach.jpg", server.uri())]
    );

    assert_eq!(post.video_qualities.len(), 2);
    let uhd = &post.video_qualities[0];
    assert_eq!(uhd.quality_name, QualityTier::UltraHd);
    assert_eq!(uhd.description, "3840x2160 - mp4 - 5.2 GB - 00:31:08");
    let providers: Vec<_> = uhd.provider_links.providers().collect();
    assert_eq!(providers, vec!["k2s.cc", "filejoker.net"]);

    let hd = &post.video_qualities[1];
    assert_eq!(hd.quality_name, QualityTier::Hd);
    assert_eq!(hd.description, "1280x720 - mp4 - 900 MB");
    assert_eq!(
        hd.provider_links.get("k2s.cc"),
        Some(&["https://k2s.cc/file/def/beach_720.mp4".to_string()][..])
    );

    for quality in &post.video_qualities {
        for link in quality.provider_links.links() {
            assert!(post.download_links.iter().any(|d| d == link));
        }
    }
}

#[tokio::test]
async fn test_placeholder_page_yields_no_posts() {
    let server = MockServer::start().await;
    let html = "<html><body><p>The server is too busy at the moment.</p></body></html>";
    for route in [THREAD_PATH.to_string(), page_path(1)] {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_string(html))
            .mount(&server)
            .await;
    }
    let url = format!("{}{THREAD_PATH}", server.uri());

    let posts = checker()
        .check_for_new_posts(&url, Some("5"), ForumKind::PlanetSuzy)
        .await
        .expect("check failed");

    assert!(posts.is_empty());
}
