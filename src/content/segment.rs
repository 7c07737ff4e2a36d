//! Splitting post text into text/link segments.

use std::sync::LazyLock;

use regex::Regex;

static URL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://\S+").expect("valid URL pattern"));

/// Filler words and markup that separate quality blocks but carry no meaning.
const SEPARATORS: &[&str] = &[
    "<br>", "<br/>", "<br />", " or ", " ou ", " and ", " et ", " oder ", " - ",
];

/// A run of descriptive text and the links that follow it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub links: Vec<String>,
}

impl Segment {
    fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            links: Vec::new(),
        }
    }

    fn append_text(&mut self, text: &str) {
        self.text.push(' ');
        self.text.push_str(text);
    }
}

/// Flatten line breaks, drop separator words and collapse whitespace.
#[must_use]
pub fn clean_content(content: &str) -> String {
    let mut cleaned = content.replace(['\r', '\n'], " ");
    for separator in SEPARATORS {
        cleaned = cleaned.replace(separator, " ");
    }
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split text into segments, each holding at least one link.
///
/// Every non-empty text run opens a segment and the URLs after it join that
/// segment. Linkless segments are folded into their predecessor; a trailing
/// linkless segment is folded into the last segment that has links. Text
/// with no URLs at all yields no segments.
#[must_use]
pub fn segment_content(text: &str) -> Vec<Segment> {
    let mut segments: Vec<Segment> = Vec::new();
    let mut cursor = 0;

    for url in URL_PATTERN.find_iter(text) {
        open_segment(&mut segments, &text[cursor..url.start()]);
        // URLs ahead of any text have no segment to join and are dropped.
        if let Some(current) = segments.last_mut() {
            current.links.push(url.as_str().to_string());
        }
        cursor = url.end();
    }
    open_segment(&mut segments, &text[cursor..]);

    merge_linkless(&mut segments);
    fold_trailing_orphan(&mut segments);
    segments
}

fn open_segment(segments: &mut Vec<Segment>, run: &str) {
    let run = run.trim();
    if !run.is_empty() {
        segments.push(Segment::new(run));
    }
}

fn merge_linkless(segments: &mut Vec<Segment>) {
    let mut i = 1;
    while i < segments.len() {
        if segments[i].links.is_empty() {
            let orphan = segments.remove(i);
            segments[i - 1].append_text(&orphan.text);
        } else {
            i += 1;
        }
    }
}

fn fold_trailing_orphan(segments: &mut Vec<Segment>) {
    if segments.last().is_some_and(|s| s.links.is_empty()) {
        if let Some(orphan) = segments.pop() {
            if let Some(target) = segments.iter_mut().rev().find(|s| !s.links.is_empty()) {
                target.append_text(&orphan.text);
            }
        }
    }
}
