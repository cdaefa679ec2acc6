//! Stylesheet link extraction.
//!
//! Scans raw CSS text for `url(...)` references and `@import` statements and
//! returns the literal arguments. Nothing is resolved or validated here.

use regex::{Captures, Regex};
use std::collections::HashSet;
use std::sync::LazyLock;

static URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"url\(\s*(?:'([^']*)'|"([^"]*)"|([^)\s]+))\s*\)"#).expect("valid url() regex")
});

static IMPORT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"@import\s+(?:url\(\s*(?:'([^']*)'|"([^"]*)"|([^)\s]+))\s*\)|'([^']*)'|"([^"]*)")"#,
    )
    .expect("valid @import regex")
});

/// Extract every `url(...)` and `@import` target from a stylesheet.
///
/// The result is deduplicated and keeps first-occurrence order.
pub fn extract_css_links(body: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    let matches = URL_RE
        .captures_iter(body)
        .chain(IMPORT_RE.captures_iter(body));

    for caps in matches {
        if let Some(link) = first_group(&caps)
            && seen.insert(link.clone())
        {
            links.push(link);
        }
    }

    links
}

// Only one alternative of each pattern can participate in a match.
fn first_group(caps: &Captures<'_>) -> Option<String> {
    caps.iter()
        .skip(1)
        .flatten()
        .next()
        .map(|m| m.as_str().trim().to_string())
}
