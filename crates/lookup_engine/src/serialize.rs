use ego_tree::NodeRef;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::node::Node;
use scraper::ElementRef;
use url::Url;

/// Upper bound on captured page text, in characters.
pub const MAX_CAPTURE_CHARS: usize = 10_000;
/// Marker appended when the capture exceeded the bound.
pub const TRUNCATION_MARKER: &str = "\n\n...(content truncated)...";

static NEWLINE_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").expect("newline pattern"));
static SPACE_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r" {2,}").expect("space pattern"));

/// Text that has passed through [`enforce_bound`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundedText {
    pub text: String,
    pub truncated: bool,
}

/// Serializes a DOM subtree into Markdown-like text.
///
/// Depth-first, pre-order, eager: the whole subtree is consumed in one call.
/// Each element's text is composed bottom-up from its children's owned
/// strings, so every tag handler is a pure function and testable alone.
/// Anchor targets are resolved against `base` when given.
pub fn subtree_markdown(root: ElementRef<'_>, base: Option<&Url>) -> String {
    children_markdown(root, base)
}

/// Top-level post-processing: collapse runs of 3+ newlines to exactly two and
/// runs of 2+ spaces to one. Applied once, never per recursion step.
pub fn tidy(text: &str) -> String {
    let collapsed = NEWLINE_RUNS.replace_all(text, "\n\n");
    SPACE_RUNS.replace_all(&collapsed, " ").into_owned()
}

/// Cuts text over [`MAX_CAPTURE_CHARS`] characters at exactly that many
/// characters and appends the truncation marker. Text at or under the bound
/// passes through unmodified.
pub fn enforce_bound(text: String) -> BoundedText {
    match text.char_indices().nth(MAX_CAPTURE_CHARS) {
        Some((byte_end, _)) => {
            let mut text = text;
            text.truncate(byte_end);
            text.push_str(TRUNCATION_MARKER);
            BoundedText {
                text,
                truncated: true,
            }
        }
        None => BoundedText {
            text,
            truncated: false,
        },
    }
}

fn children_markdown(element: ElementRef<'_>, base: Option<&Url>) -> String {
    element
        .children()
        .map(|child| node_markdown(child, base))
        .collect()
}

fn node_markdown(node: NodeRef<'_, Node>, base: Option<&Url>) -> String {
    match node.value() {
        Node::Text(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                String::new()
            } else {
                format!("{trimmed} ")
            }
        }
        Node::Element(_) => ElementRef::wrap(node)
            .map(|element| element_markdown(element, base))
            .unwrap_or_default(),
        // Comments, doctypes and processing instructions contribute nothing.
        _ => String::new(),
    }
}

fn element_markdown(element: ElementRef<'_>, base: Option<&Url>) -> String {
    let tag = element.value().name().to_ascii_lowercase();
    if matches!(tag.as_str(), "script" | "style" | "svg" | "noscript") || is_hidden(element) {
        return String::new();
    }

    // Images are leaves: children are never recursed into.
    if tag == "img" {
        return image_markdown(element);
    }

    let children = children_markdown(element, base);

    let (prefix, suffix): (&str, &str) = match tag.as_str() {
        "h1" => ("\n# ", "\n"),
        "h2" => ("\n## ", "\n"),
        "h3" => ("\n### ", "\n"),
        "h4" | "h5" | "h6" => ("\n#### ", "\n"),
        "p" => ("\n", "\n"),
        "br" => ("\n", ""),
        "hr" => ("\n---\n", ""),
        "ul" | "ol" => ("\n", "\n"),
        "li" => ("* ", "\n"),
        "a" => {
            return match anchor_target(element, base) {
                Some(target) => format!("[{children}]({target})"),
                None => children,
            };
        }
        "strong" | "b" => ("**", "**"),
        "em" | "i" => ("*", "*"),
        "code" => ("`", "`"),
        "pre" => ("\n```\n", "\n```\n"),
        "blockquote" => ("\n> ", "\n"),
        "table" => ("\n", "\n"),
        "tr" => ("", "\n"),
        "th" | "td" => ("| ", " "),
        // Divs wrap in newlines only when they render as blocks.
        "div" => {
            if is_block_display(element) {
                ("\n", "\n")
            } else {
                ("", "")
            }
        }
        // Unrecognized tags are transparent: children pass through unwrapped.
        _ => ("", ""),
    };

    format!("{prefix}{children}{suffix}")
}

fn image_markdown(element: ElementRef<'_>) -> String {
    let alt = element
        .value()
        .attr("alt")
        .map(str::trim)
        .filter(|alt| !alt.is_empty());
    let src = element
        .value()
        .attr("src")
        .map(str::trim)
        .filter(|src| !src.is_empty());
    match (alt, src) {
        (Some(alt), Some(src)) => format!("![{alt}]({src})"),
        _ => String::new(),
    }
}

fn anchor_target(element: ElementRef<'_>, base: Option<&Url>) -> Option<Url> {
    let raw = element.value().attr("href").map(str::trim)?;
    if raw.is_empty() || raw.to_ascii_lowercase().starts_with("javascript:") {
        return None;
    }
    if let Ok(url) = Url::parse(raw) {
        return Some(url);
    }
    // Fragment and query targets resolve against the page URL like any other
    // relative reference.
    base.and_then(|base| base.join(raw).ok())
}

fn is_hidden(element: ElementRef<'_>) -> bool {
    let Some(style) = element.value().attr("style") else {
        return false;
    };
    declared_value(style, "display").is_some_and(|v| v.eq_ignore_ascii_case("none"))
        || declared_value(style, "visibility").is_some_and(|v| v.eq_ignore_ascii_case("hidden"))
}

fn is_block_display(element: ElementRef<'_>) -> bool {
    match element
        .value()
        .attr("style")
        .and_then(|style| declared_value(style, "display"))
    {
        Some(display) => display.eq_ignore_ascii_case("block"),
        // Without an inline override a div renders as a block.
        None => true,
    }
}

fn declared_value(style: &str, property: &str) -> Option<String> {
    style.split(';').find_map(|declaration| {
        let (name, value) = declaration.split_once(':')?;
        if name.trim().eq_ignore_ascii_case(property) {
            Some(value.trim().to_string())
        } else {
            None
        }
    })
}
