use anyhow::{Context, bail};
use clap::ArgMatches;
use colored::Colorize;
use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};
use url::Url;
use warcrawl_core::archive::Archive;
use warcrawl_core::report::{
    ReportFormat, generate_crawl_report, generate_json_report, generate_refusal_report,
    save_report,
};
use warcrawl_scanner::Whitelist;

// Re-export crawl types and functions from warcrawl-core
pub use warcrawl_core::crawl::{CrawlOptions, execute_crawl};

/// Parse the comma-separated starting points.
pub fn parse_seed_list(csv: &str) -> Result<Vec<String>, String> {
    let mut seeds = Vec::new();
    for entry in csv.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        match Url::parse(entry) {
            Ok(url) => seeds.push(url.to_string()),
            Err(e) => return Err(format!("Invalid starting URL '{}': {}", entry, e)),
        }
    }

    if seeds.is_empty() {
        return Err("No starting points found".to_string());
    }
    Ok(seeds)
}

/// Parse the comma-separated host whitelist.
pub fn parse_whitelist(csv: &str) -> Result<Whitelist, String> {
    let whitelist = Whitelist::parse(csv);
    if whitelist.is_empty() {
        return Err("No domain whitelisted".to_string());
    }
    Ok(whitelist)
}

/// Expand `~` and make sure the archive directory exists.
pub fn prepare_archive_path(path: &Path) -> Result<PathBuf, String> {
    let expanded = shellexpand::tilde(&path.to_string_lossy()).into_owned();
    let path = PathBuf::from(expanded);
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| {
            format!("Failed to create archive directory {}: {}", parent.display(), e)
        })?;
    }
    Ok(path)
}

pub async fn handle_crawl(sub_matches: &ArgMatches, quiet: bool) {
    // Initialize tracing for logging
    tracing_subscriber::fmt().with_writer(io::stderr).init();

    let start = sub_matches.get_one::<String>("start").map(String::as_str).unwrap_or("");
    let whitelist = sub_matches.get_one::<String>("whitelist").map(String::as_str).unwrap_or("");
    let show_refusals = sub_matches.get_flag("report");
    let timeout_secs = *sub_matches.get_one::<u64>("timeout").unwrap_or(&30);
    let output = sub_matches.get_one::<PathBuf>("output");
    let format = sub_matches
        .get_one::<String>("format")
        .and_then(|f| ReportFormat::from_str(f))
        .unwrap_or(ReportFormat::Text);

    let seeds = parse_seed_list(start).unwrap_or_else(|e| exit_with(&e));
    let whitelist = parse_whitelist(whitelist).unwrap_or_else(|e| exit_with(&e));
    let archive_path = match sub_matches.get_one::<PathBuf>("archive") {
        Some(path) => Some(prepare_archive_path(path).unwrap_or_else(|e| exit_with(&e))),
        None => None,
    };

    if !quiet {
        println!("\n{} Archiving {} starting point(s)", "→".blue(), seeds.len());
        println!(
            "Whitelist: {}",
            whitelist.iter().collect::<Vec<_>>().join(", ").bright_white()
        );
        if let Some(ref path) = archive_path {
            println!("Archive: {}\n", path.display().to_string().bright_white());
        }
    }

    let options = CrawlOptions {
        seeds,
        whitelist,
        archive_path,
        timeout_secs,
        show_progress_bars: !quiet,
    };

    // The spinner prints per-URL progress itself
    let report = match execute_crawl(options, None).await {
        Ok(report) => report,
        Err(e) => exit_with(&format!("Crawl failed: {}", e)),
    };

    println!("\n{} Crawl complete!\n", "✓".green().bold());

    let summary = match format {
        ReportFormat::Text => {
            generate_crawl_report(&report, output.is_none() && io::stdout().is_terminal())
        }
        ReportFormat::Json => generate_json_report(&report)
            .unwrap_or_else(|e| exit_with(&format!("Failed to render report: {}", e))),
    };

    match output {
        Some(path) => match save_report(&summary, path) {
            Ok(()) => println!("{} Report saved to {}", "✓".green().bold(), path.display()),
            Err(e) => eprintln!("✗ Failed to save report to {}: {}", path.display(), e),
        },
        None => print!("{}", summary),
    }

    if show_refusals && !report.refusals.is_empty() {
        println!();
        print!("{}", generate_refusal_report(&report.refusals));
    }
}

pub fn handle_replay(sub_matches: &ArgMatches) -> anyhow::Result<()> {
    let url = sub_matches
        .get_one::<String>("URL")
        .context("missing URL argument")?;
    let path = sub_matches
        .get_one::<PathBuf>("archive")
        .context("missing archive path")?;
    let show_headers = sub_matches.get_flag("headers");

    let path = PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned());
    let mut stdout = io::stdout().lock();
    replay_capture(&path, url, show_headers, &mut stdout)?;
    stdout.flush()?;
    Ok(())
}

/// Write the archived response for `url` to `out`, optionally preceded by
/// its stored status and headers.
pub fn replay_capture(
    archive_path: &Path,
    url: &str,
    show_headers: bool,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    if !Archive::exists(archive_path) {
        bail!("No archive found at {}", archive_path.display());
    }

    let archive = Archive::new(archive_path)
        .with_context(|| format!("Failed to open archive {}", archive_path.display()))?;
    let Some(stored) = archive.lookup(url)? else {
        bail!("{} is not in the archive", url);
    };

    if show_headers {
        writeln!(out, "HTTP {} ({})", stored.status_code, stored.captured_at)?;
        for (name, value) in &stored.headers {
            writeln!(out, "{}: {}", name, value)?;
        }
        writeln!(out, "X-Replayed-From-Archive: true")?;
        writeln!(out)?;
    }
    out.write_all(&stored.body)?;
    Ok(())
}

fn exit_with(message: &str) -> ! {
    eprintln!("{} {}", "✗".red().bold(), message);
    std::process::exit(1);
}
