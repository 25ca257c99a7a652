use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::serialize::{enforce_bound, subtree_markdown, tidy};

/// Everything the orchestrator needs from the page, captured once per trigger
/// and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCapture {
    pub title: String,
    pub url: String,
    pub body: String,
    pub truncated: bool,
}

/// Content-root preference order, best candidates first.
const CONTENT_ROOT_SELECTORS: [&str; 6] =
    ["article", "main", "#content", "#main", ".content", ".main"];

/// Captures the readable content of a page as a titled, URL-annotated
/// Markdown document, bounded to the capture limit.
///
/// One-shot and stateless; runs in the page context since it needs the DOM.
pub fn capture_page(html: &str, url: &str) -> PageCapture {
    let document = Html::parse_document(html);

    let title = select_first(&document, "title")
        .map(|t| t.text().collect::<String>().trim().to_string())
        .unwrap_or_default();

    let root = content_root(&document);
    let base = Url::parse(url).ok();

    let mut raw = format!("# {title}\n\nURL: {url}\n\n---\n\n");
    raw.push_str(&subtree_markdown(root, base.as_ref()));

    let bounded = enforce_bound(tidy(&raw));
    PageCapture {
        title,
        url: url.to_string(),
        body: bounded.text,
        truncated: bounded.truncated,
    }
}

fn content_root(document: &Html) -> ElementRef<'_> {
    for selector in CONTENT_ROOT_SELECTORS {
        if let Some(element) = select_first(document, selector) {
            return element;
        }
    }
    select_first(document, "body").unwrap_or_else(|| document.root_element())
}

fn select_first<'a>(document: &'a Html, selector: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(selector).ok()?;
    document.select(&selector).next()
}
