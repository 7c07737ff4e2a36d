use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use forum_thread_watcher::config::Config;
use forum_thread_watcher::forums::UnsupportedForumKind;
use forum_thread_watcher::{latest_post_id, ForumKind, Post, ThreadChecker};

/// Check forum threads for new posts and their download links
#[derive(Parser, Debug)]
#[command(name = "forum-thread-watcher", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch posts newer than a checkpoint and print them as JSON
    Check {
        /// Thread URL
        url: String,

        /// Id of the last post already seen; omit to fetch only the latest post
        #[arg(long)]
        last_post_id: Option<String>,

        /// Forum kind (detected from the URL when omitted)
        #[arg(long)]
        forum: Option<ForumKind>,
    },

    /// Print the forum kind detected for a thread URL
    Detect {
        /// Thread URL
        url: String,
    },
}

#[derive(Serialize)]
struct CheckReport<'a> {
    thread_url: &'a str,
    forum: ForumKind,
    /// Checkpoint to pass on the next run.
    next_checkpoint: Option<&'a str>,
    posts: &'a [Post],
}

impl<'a> CheckReport<'a> {
    /// Without new posts the previous checkpoint carries over.
    fn new(
        thread_url: &'a str,
        forum: ForumKind,
        posts: &'a [Post],
        previous_checkpoint: Option<&'a str>,
    ) -> Self {
        Self {
            thread_url,
            forum,
            next_checkpoint: latest_post_id(posts).or(previous_checkpoint),
            posts,
        }
    }
}

/// Explicit `--forum` wins over detection from the URL.
fn resolve_forum(forum: Option<ForumKind>, url: &str) -> Result<ForumKind, UnsupportedForumKind> {
    forum.map_or_else(|| ForumKind::detect(url), Ok)
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    init_tracing()?;

    let cli = Cli::parse();

    match cli.command {
        Command::Detect { url } => {
            let kind = resolve_forum(None, &url)?;
            println!("{kind}");
        }
        Command::Check {
            url,
            last_post_id,
            forum,
        } => {
            let config = Config::from_env().context("Failed to load configuration")?;
            config.validate().context("Invalid configuration")?;

            let kind = resolve_forum(forum, &url)?;
            info!(url = %url, forum = %kind, providers = config.download_providers.len(), "Configuration loaded");

            let checker =
                ThreadChecker::from_config(&config).context("Failed to build thread checker")?;
            let posts = checker
                .check_for_new_posts(&url, last_post_id.as_deref(), kind)
                .await
                .with_context(|| format!("Failed to check thread {url}"))?;

            for post in posts.iter().filter(|p| !p.download_links.is_empty()) {
                info!(post_id = %post.post_id, links = post.download_links.len(), "Post has download links");
                for quality in &post.video_qualities {
                    info!(post_id = %post.post_id, quality = %quality, description = %quality.description);
                }
            }

            let report = CheckReport::new(&url, kind, &posts, last_post_id.as_deref());
            let json =
                serde_json::to_string_pretty(&report).context("Failed to serialize posts")?;
            println!("{json}");
        }
    }

    Ok(())
}

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,forum_thread_watcher=debug"));

    // Check if JSON logging is requested
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| matches!(v.to_lowercase().as_str(), "json" | "structured"))
        .unwrap_or(false);

    // Logs go to stderr so stdout stays pure JSON
    if use_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;
    }

    Ok(())
}
