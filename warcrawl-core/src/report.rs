// Run reports built from a finished crawl

use crate::crawl::extract_url_path;
use colored::Colorize;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use url::Url;
use warcrawl_scanner::{CrawlReport, CrawlResult, RefusalLog};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Json,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    pages_archived: usize,
    fetch_failures: usize,
    links_discovered: usize,
    refused_urls: usize,
    pages: &'a [CrawlResult],
    refusals: &'a RefusalLog,
}

/// Hosts refused by the whitelist, each followed by every refused URL in
/// the order it was encountered.
pub fn generate_refusal_report(refusals: &RefusalLog) -> String {
    let mut report = String::new();
    if refusals.is_empty() {
        return report;
    }

    report.push_str("Refused domains from whitelist:\n");
    for (host, urls) in refusals.iter() {
        report.push_str(&format!("- {} ({} times)\n", host, urls.len()));
        for url in urls {
            report.push_str(&format!("    - {}\n", url));
        }
    }
    report
}

/// Generate a crawl report from results.
///
/// `color` adds terminal colors to status codes and content types; leave it
/// off for reports written to files.
pub fn generate_crawl_report(report: &CrawlReport, color: bool) -> String {
    let archived: Vec<&CrawlResult> = report.archived().collect();
    let failures: Vec<&CrawlResult> = report.failures().collect();

    let mut out = String::new();
    out.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");
    out.push_str("# Summary:\n");
    out.push_str(&format!("  Pages archived: {}\n", archived.len()));
    out.push_str(&format!("  Fetch failures: {}\n", failures.len()));
    out.push_str(&format!("  Links discovered: {}\n", report.total_links()));
    out.push_str(&format!(
        "  Refused URLs: {} across {} host(s)\n",
        report.refusals.total(),
        report.refusals.len()
    ));
    out.push_str("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");

    // Group results by host
    let mut by_host: BTreeMap<String, Vec<&CrawlResult>> = BTreeMap::new();
    for result in &archived {
        if let Ok(url) = Url::parse(&result.url)
            && let Some(host) = url.host_str()
        {
            by_host.entry(host.to_string()).or_default().push(result);
        }
    }

    for (host, host_results) in by_host.iter() {
        out.push_str(&format!("## {}\n", host));
        out.push_str(&format!("  {} pages archived\n\n", host_results.len()));

        for result in host_results {
            let path = extract_url_path(&result.url);
            let mut line = format!("  {} {}", status_label(result.status_code, color), path);

            // Only show MIME type if it's not html
            if let Some(ref content_type) = result.content_type
                && !content_type.starts_with("text/html")
            {
                if color {
                    line.push_str(&format!(" {}", content_type.bright_black()));
                } else {
                    line.push_str(&format!(" {}", content_type));
                }
            }

            out.push_str(&line);
            out.push('\n');
        }
        out.push('\n');
    }

    if !failures.is_empty() {
        out.push_str("## Failed\n");
        for result in &failures {
            out.push_str(&format!(
                "  ✗ {} {}\n",
                result.url,
                result.error.as_deref().unwrap_or("unknown error")
            ));
        }
        out.push('\n');
    }

    out
}

fn status_label(status_code: u16, color: bool) -> String {
    let code = status_code.to_string();
    if !color {
        return code;
    }
    match status_code {
        100..=199 => code.white().to_string(),
        200..=299 => code.green().to_string(),
        300..=399 => code.cyan().to_string(),
        400..=499 => code.yellow().to_string(),
        500..=599 => code.red().to_string(),
        _ => code,
    }
}

pub fn generate_json_report(report: &CrawlReport) -> Result<String, serde_json::Error> {
    let json = JsonReport {
        pages_archived: report.archived().count(),
        fetch_failures: report.failures().count(),
        links_discovered: report.total_links(),
        refused_urls: report.refusals.total(),
        pages: &report.pages,
        refusals: &report.refusals,
    };
    serde_json::to_string_pretty(&json)
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}
