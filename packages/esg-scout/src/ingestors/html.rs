//! HTML normalization and link extraction.
//!
//! Only static HTML is handled; nothing here executes scripts.

use scraper::{Html, Node, Selector};
use url::Url;

/// Elements whose text never counts as visible content.
const HIDDEN_ELEMENTS: [&str; 3] = ["script", "style", "noscript"];

/// A hyperlink found on a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    /// Absolute target, fragment removed
    pub url: Url,

    /// Visible anchor text
    pub text: String,
}

/// Reduce an HTML document to its visible text.
///
/// Every text node outside `script`/`style`/`noscript` becomes its own line;
/// lines are trimmed and blank ones dropped. Malformed markup degrades to
/// whatever text the parser recovers, possibly none.
pub fn html_to_text(html: &str) -> String {
    let document = Html::parse_document(html);

    document
        .tree
        .root()
        .descendants()
        .filter_map(|node| match node.value() {
            Node::Text(text) => {
                let hidden = node.ancestors().any(|ancestor| {
                    ancestor
                        .value()
                        .as_element()
                        .is_some_and(|el| HIDDEN_ELEMENTS.contains(&el.name()))
                });
                (!hidden).then_some(&**text)
            }
            _ => None,
        })
        .flat_map(str::lines)
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Extract every `http(s)` hyperlink on a page, resolved against `base_url`.
///
/// Order follows the document. Fragments are stripped so `/esg#scope-3` and
/// `/esg` are the same target.
pub fn extract_anchors(html: &str, base_url: &Url) -> Vec<Anchor> {
    let link_selector = match Selector::parse("a[href]") {
        Ok(s) => s,
        Err(_) => return vec![],
    };

    let document = Html::parse_document(html);

    document
        .select(&link_selector)
        .filter_map(|el| {
            let href = el.value().attr("href")?.trim();
            let mut url = base_url.join(href).ok()?;
            if url.scheme() != "http" && url.scheme() != "https" {
                return None;
            }
            url.set_fragment(None);
            Some(Anchor {
                url,
                text: el.text().collect::<String>().trim().to_string(),
            })
        })
        .collect()
}
