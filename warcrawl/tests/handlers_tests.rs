use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;
use warcrawl::handlers::*;
use warcrawl_core::archive::Archive;
use warcrawl_scanner::FetchedResponse;

#[test]
fn test_parse_seed_list_single() {
    let seeds = parse_seed_list("https://example.com/").unwrap();
    assert_eq!(seeds, vec!["https://example.com/".to_string()]);
}

#[test]
fn test_parse_seed_list_keeps_order_and_trims() {
    let seeds = parse_seed_list(" https://example.com/ ,https://example.com/blog,,").unwrap();
    assert_eq!(
        seeds,
        vec![
            "https://example.com/".to_string(),
            "https://example.com/blog".to_string()
        ]
    );
}

#[test]
fn test_parse_seed_list_normalizes() {
    let seeds = parse_seed_list("https://example.com,https://EXAMPLE.com/blog").unwrap();
    assert_eq!(
        seeds,
        vec![
            "https://example.com/".to_string(),
            "https://example.com/blog".to_string()
        ]
    );
}

#[test]
fn test_parse_seed_list_empty() {
    let result = parse_seed_list("");
    assert_eq!(result.unwrap_err(), "No starting points found");

    let result = parse_seed_list(" , ");
    assert!(result.is_err());
}

#[test]
fn test_parse_seed_list_invalid() {
    let result = parse_seed_list("https://example.com/,example.com");
    assert!(result.unwrap_err().contains("Invalid starting URL 'example.com'"));
}

#[test]
fn test_parse_whitelist() {
    let whitelist = parse_whitelist("fonts.googleapis.com,fonts.gstatic.com").unwrap();
    assert_eq!(whitelist.len(), 2);
    assert!(whitelist.contains("fonts.gstatic.com"));
}

#[test]
fn test_parse_whitelist_empty() {
    let result = parse_whitelist(",,");
    assert_eq!(result.unwrap_err(), "No domain whitelisted");
}

#[test]
fn test_prepare_archive_path_creates_parent() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = TempDir::new()?;
    let target = temp_dir.path().join("nested").join("dir").join("archive.db");

    let prepared = prepare_archive_path(&target)?;

    assert_eq!(prepared, target);
    assert!(target.parent().unwrap().is_dir());
    assert!(!target.exists());
    Ok(())
}

#[test]
fn test_prepare_archive_path_bare_file_name() {
    let prepared = prepare_archive_path(Path::new("archive.db")).unwrap();
    assert_eq!(prepared, Path::new("archive.db"));
}

fn archive_with_capture(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("archive.db");
    let archive = Archive::new(&path).unwrap();
    let session = archive
        .create_session(&["https://example.com/".to_string()], &["example.com".to_string()])
        .unwrap();
    archive
        .store_capture(
            &session,
            &FetchedResponse {
                url: "https://example.com/".to_string(),
                status_code: 200,
                content_type: Some("text/html".to_string()),
                headers: vec![("content-type".to_string(), "text/html".to_string())],
                body: b"<h1>archived</h1>".to_vec(),
                response_time: Duration::from_millis(5),
            },
        )
        .unwrap();
    path
}

#[test]
fn test_replay_capture_body_only() {
    let temp_dir = TempDir::new().unwrap();
    let path = archive_with_capture(&temp_dir);

    let mut out = Vec::new();
    replay_capture(&path, "https://example.com/", false, &mut out).unwrap();
    assert_eq!(out, b"<h1>archived</h1>");
}

#[test]
fn test_replay_capture_with_headers() {
    let temp_dir = TempDir::new().unwrap();
    let path = archive_with_capture(&temp_dir);

    let mut out = Vec::new();
    replay_capture(&path, "https://example.com/", true, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.starts_with("HTTP 200 ("));
    assert!(text.contains("content-type: text/html\n"));
    assert!(text.contains("X-Replayed-From-Archive: true\n\n<h1>archived</h1>"));
}

#[test]
fn test_replay_capture_unknown_url() {
    let temp_dir = TempDir::new().unwrap();
    let path = archive_with_capture(&temp_dir);

    let mut out = Vec::new();
    let err = replay_capture(&path, "https://example.com/missing", false, &mut out).unwrap_err();
    assert!(err.to_string().contains("is not in the archive"));
}

#[test]
fn test_replay_capture_missing_archive() {
    let temp_dir = TempDir::new().unwrap();
    let mut out = Vec::new();
    let err = replay_capture(&temp_dir.path().join("none.db"), "https://example.com/", false, &mut out)
        .unwrap_err();
    assert!(err.to_string().contains("No archive found"));
}
