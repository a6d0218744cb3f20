//! Lyrics extraction from a Genius song page

use once_cell::sync::Lazy;
use regex::Regex;
use select::document::Document;
use select::node::Node;
use select::predicate::Attr;

const CONTAINER_ATTR: &str = "data-lyrics-container";
const EXCLUDED_ATTR: &str = "data-exclude-from-selection";

static LINE_BREAK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<br\s*/?>").expect("line break regex"));
static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("html tag regex"));

/// Collect every lyrics container on the page, minus excluded regions, and
/// normalize the result to plain text. `None` when nothing usable is found.
pub fn extract_lyrics(html: &str) -> Option<String> {
    let doc = Document::from(html);
    let mut markup = String::new();

    for container in doc.find(Attr(CONTAINER_ATTR, "true")) {
        let mut inner = String::new();
        collect_markup(container, &mut inner);
        let inner = inner.trim();
        if inner.is_empty() {
            continue;
        }
        // Containers are split at annotation boundaries; keep them on separate lines.
        if !markup.is_empty() {
            markup.push_str("<br/>");
        }
        markup.push_str(inner);
    }

    if markup.is_empty() {
        return None;
    }

    let text = normalize_markup(&markup);
    (!text.is_empty()).then_some(text)
}

/// Serialize the children of `node`, dropping subtrees marked as excluded.
fn collect_markup(node: Node<'_>, out: &mut String) {
    for child in node.children() {
        if child.attr(EXCLUDED_ATTR) == Some("true") {
            continue;
        }
        if child.find(Attr(EXCLUDED_ATTR, "true")).next().is_some() {
            collect_markup(child, out);
        } else {
            out.push_str(&child.html());
        }
    }
}

/// Line breaks become newlines first; stripping tags alone would fold them into the text.
pub fn normalize_markup(markup: &str) -> String {
    let with_newlines = LINE_BREAK_RE.replace_all(markup, "\n");
    let stripped = TAG_RE.replace_all(&with_newlines, "");
    html_escape::decode_html_entities(&stripped).trim().to_string()
}
