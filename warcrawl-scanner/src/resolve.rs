//! Link resolution and whitelist filtering.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use tracing::debug;
use url::{ParseError, Url};

/// Hosts eligible for crawling. Matching is exact on the host string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Whitelist {
    hosts: HashSet<String>,
}

impl Whitelist {
    pub fn from_hosts<I, S>(hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            hosts: hosts.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse a comma separated host list, ignoring blank entries.
    pub fn parse(csv: &str) -> Self {
        Self::from_hosts(
            csv.split(',')
                .map(str::trim)
                .filter(|host| !host.is_empty()),
        )
    }

    pub fn contains(&self, host: &str) -> bool {
        self.hosts.contains(host)
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    /// Hosts in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        let mut hosts: Vec<&str> = self.hosts.iter().map(String::as_str).collect();
        hosts.sort_unstable();
        hosts.into_iter()
    }
}

/// URLs refused because their host is not whitelisted, grouped by host.
///
/// Every refusal is recorded, repeats included, in the order encountered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RefusalLog {
    by_host: BTreeMap<String, Vec<String>>,
}

impl RefusalLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, host: &str, url: String) {
        self.by_host.entry(host.to_string()).or_default().push(url);
    }

    pub fn get(&self, host: &str) -> Option<&[String]> {
        self.by_host.get(host).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.by_host
            .iter()
            .map(|(host, urls)| (host.as_str(), urls.as_slice()))
    }

    /// Number of distinct refused hosts.
    pub fn len(&self) -> usize {
        self.by_host.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_host.is_empty()
    }

    /// Number of refusals across all hosts.
    pub fn total(&self) -> usize {
        self.by_host.values().map(Vec::len).sum()
    }
}

/// Turns raw links into absolute, fragment-free, whitelisted URLs.
pub struct Resolver<'a> {
    whitelist: &'a Whitelist,
}

impl<'a> Resolver<'a> {
    pub fn new(whitelist: &'a Whitelist) -> Self {
        Self { whitelist }
    }

    /// Resolve `raw` against `base`.
    ///
    /// Returns `None` for anything that is not a fetchable in-scope URL.
    /// Off-whitelist hosts are additionally recorded in `refusals`.
    pub fn resolve(&self, base: &str, raw: &str, refusals: &mut RefusalLog) -> Option<String> {
        let raw = raw.trim();
        if raw.is_empty() || is_pseudo_link(raw) {
            return None;
        }

        let mut candidate = if raw.starts_with("//") {
            let scheme = Url::parse(base).ok()?.scheme().to_string();
            Url::parse(&format!("{}:{}", scheme, raw)).ok()?
        } else {
            match Url::parse(raw) {
                Ok(absolute) => absolute,
                Err(ParseError::RelativeUrlWithoutBase) => Url::parse(base).ok()?.join(raw).ok()?,
                Err(e) => {
                    debug!("Dropping unparseable link {:?}: {}", raw, e);
                    return None;
                }
            }
        };
        candidate.set_fragment(None);

        let host = candidate.host_str()?.to_string();
        if !self.whitelist.contains(&host) {
            debug!("Refusing {} (host {} not whitelisted)", candidate, host);
            refusals.record(&host, candidate.to_string());
            return None;
        }

        Some(candidate.to_string())
    }
}

fn is_pseudo_link(raw: &str) -> bool {
    raw.starts_with("data:") || raw.starts_with("javascript:") || raw.starts_with('#')
}
