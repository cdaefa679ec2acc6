//! HTML link extraction.

use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use std::sync::LazyLock;

static LINK_BEARING: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("img, script, iframe, video, audio, source, link, a")
        .expect("valid link selector")
});

/// `rel` values that only hint the browser and carry nothing worth archiving.
const RESOURCE_HINTS: [&str; 2] = ["dns-prefetch", "preconnect"];

/// Extract candidate links from an HTML document.
///
/// Media elements contribute `src` and every `srcset` candidate, `<link>`
/// contributes `href` unless it is a resource hint, and `<a>` always
/// contributes its `href` (empty when missing). Duplicates are dropped,
/// document order is kept.
pub fn extract_html_links(body: &str) -> Vec<String> {
    let document = Html::parse_document(body);
    let mut links = LinkSet::default();

    for element in document.select(&LINK_BEARING) {
        match element.value().name() {
            "img" | "script" | "iframe" | "video" | "audio" | "source" => {
                if let Some(src) = trimmed_attr(&element, "src")
                    && !src.is_empty()
                {
                    links.insert(src);
                }
                if let Some(srcset) = trimmed_attr(&element, "srcset") {
                    for candidate in parse_srcset(srcset) {
                        links.insert(candidate);
                    }
                }
            }
            "link" => {
                if is_resource_hint(element.value().attr("rel")) {
                    continue;
                }
                if let Some(href) = trimmed_attr(&element, "href")
                    && !href.is_empty()
                {
                    links.insert(href);
                }
            }
            "a" => {
                links.insert(trimmed_attr(&element, "href").unwrap_or_default());
            }
            _ => {}
        }
    }

    links.into_vec()
}

/// Split a `srcset` value into its URLs, dropping width/density descriptors.
pub fn parse_srcset(srcset: &str) -> Vec<&str> {
    srcset
        .split(',')
        .filter_map(|entry| entry.split_whitespace().next())
        .collect()
}

fn trimmed_attr<'a>(element: &ElementRef<'a>, name: &str) -> Option<&'a str> {
    element.value().attr(name).map(str::trim)
}

fn is_resource_hint(rel: Option<&str>) -> bool {
    let Some(rel) = rel else {
        return false;
    };
    let rel = rel.to_lowercase();
    let mut tokens = rel.split_whitespace().peekable();
    tokens.peek().is_some() && tokens.all(|token| RESOURCE_HINTS.contains(&token))
}

#[derive(Default)]
struct LinkSet {
    seen: HashSet<String>,
    ordered: Vec<String>,
}

impl LinkSet {
    fn insert(&mut self, link: &str) {
        if self.seen.insert(link.to_string()) {
            self.ordered.push(link.to_string());
        }
    }

    fn into_vec(self) -> Vec<String> {
        self.ordered
    }
}
