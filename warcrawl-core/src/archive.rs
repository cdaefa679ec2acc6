use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, Result, params};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;
use warcrawl_scanner::FetchedResponse;

/// Payloads at or below this size are always stored in full.
pub const DEDUPE_SIZE_THRESHOLD: usize = 2048;

/// Response headers that describe the transfer, not the payload.
const HOP_BY_HOP_HEADERS: [&str; 3] = ["transfer-encoding", "content-length", "connection"];

pub struct Archive {
    conn: Connection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordType {
    Response,
    Revisit,
}

impl RecordType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::Response => "response",
            RecordType::Revisit => "revisit",
        }
    }

    fn from_db(value: &str) -> Self {
        match value {
            "revisit" => RecordType::Revisit,
            _ => RecordType::Response,
        }
    }
}

/// What `store_capture` wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureRecord {
    pub id: i64,
    pub record_type: RecordType,
    pub payload_digest: String,
    /// The original capture a revisit points at.
    pub refers_to: Option<i64>,
}

/// A capture ready to be replayed, revisits already resolved to their payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredResponse {
    pub url: String,
    pub captured_at: String,
    pub status_code: u16,
    pub content_type: Option<String>,
    pub headers: Vec<(String, String)>,
    pub payload_digest: String,
    pub record_type: RecordType,
    pub body: Vec<u8>,
}

pub fn payload_digest(body: &[u8]) -> String {
    format!("sha256:{:x}", Sha256::digest(body))
}

fn current_timestamp() -> i64 {
    Utc::now().timestamp()
}

impl Archive {
    pub fn drop(path: &Path) -> std::io::Result<()> {
        fs::remove_file(path)
    }

    pub fn exists(path: &Path) -> bool {
        path.exists()
    }

    pub fn new(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            ",
        )?;

        let archive = Archive { conn };
        archive.init_schema()?;
        Ok(archive)
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        let archive = Archive { conn };
        archive.init_schema()?;
        Ok(archive)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS crawl_sessions (
                id TEXT PRIMARY KEY,
                start_time INTEGER NOT NULL,
                end_time INTEGER,
                status TEXT NOT NULL CHECK(status IN ('running', 'completed', 'failed')),
                seed_urls TEXT NOT NULL,  -- JSON array
                whitelist TEXT NOT NULL   -- JSON array
            );

            CREATE TABLE IF NOT EXISTS captures (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                session_id TEXT NOT NULL,
                url TEXT NOT NULL,
                captured_at TEXT NOT NULL,
                status_code INTEGER NOT NULL,
                content_type TEXT,
                headers TEXT NOT NULL,    -- JSON array of [name, value]
                payload_digest TEXT NOT NULL,
                payload_length INTEGER NOT NULL,
                body BLOB,
                record_type TEXT NOT NULL CHECK(record_type IN ('response', 'revisit')),
                refers_to INTEGER,
                FOREIGN KEY(session_id) REFERENCES crawl_sessions(id) ON DELETE CASCADE,
                FOREIGN KEY(refers_to) REFERENCES captures(id)
            );

            CREATE INDEX IF NOT EXISTS idx_captures_url ON captures(url);
            CREATE INDEX IF NOT EXISTS idx_captures_digest ON captures(payload_digest);
            CREATE INDEX IF NOT EXISTS idx_captures_session ON captures(session_id);
            ",
        )
    }

    pub fn create_session(&self, seed_urls: &[String], whitelist: &[String]) -> Result<String> {
        let session_id = uuid::Uuid::new_v4().to_string();
        let seeds_json = serde_json::to_string(seed_urls).unwrap_or_else(|_| "[]".to_string());
        let whitelist_json = serde_json::to_string(whitelist).unwrap_or_else(|_| "[]".to_string());

        self.conn.execute(
            "INSERT INTO crawl_sessions (id, start_time, status, seed_urls, whitelist)
             VALUES (?1, ?2, 'running', ?3, ?4)",
            params![session_id, current_timestamp(), seeds_json, whitelist_json],
        )?;

        Ok(session_id)
    }

    pub fn complete_session(&self, session_id: &str) -> Result<()> {
        self.finish_session(session_id, "completed")
    }

    pub fn fail_session(&self, session_id: &str) -> Result<()> {
        self.finish_session(session_id, "failed")
    }

    fn finish_session(&self, session_id: &str, status: &str) -> Result<()> {
        self.conn.execute(
            "UPDATE crawl_sessions SET end_time = ?1, status = ?2 WHERE id = ?3",
            params![current_timestamp(), status, session_id],
        )?;
        Ok(())
    }

    pub fn session_status(&self, session_id: &str) -> Result<Option<String>> {
        self.conn
            .query_row(
                "SELECT status FROM crawl_sessions WHERE id = ?1",
                [session_id],
                |row| row.get(0),
            )
            .optional()
    }

    /// Store a response. Large payloads already held by the archive become
    /// revisit records pointing at the first capture of that payload.
    pub fn store_capture(
        &self,
        session_id: &str,
        response: &FetchedResponse,
    ) -> Result<CaptureRecord> {
        let digest = payload_digest(&response.body);

        let original = if response.body.len() > DEDUPE_SIZE_THRESHOLD {
            self.find_payload(&digest)?
        } else {
            None
        };

        let (record_type, body) = match original {
            Some(_) => (RecordType::Revisit, None),
            None => (RecordType::Response, Some(response.body.as_slice())),
        };

        let headers: Vec<(&str, &str)> = response
            .headers
            .iter()
            .filter(|(name, _)| !HOP_BY_HOP_HEADERS.contains(&name.to_lowercase().as_str()))
            .map(|(name, value)| (name.as_str(), value.as_str()))
            .collect();
        let headers_json = serde_json::to_string(&headers).unwrap_or_else(|_| "[]".to_string());

        self.conn.execute(
            "INSERT INTO captures (
                session_id, url, captured_at, status_code, content_type, headers,
                payload_digest, payload_length, body, record_type, refers_to
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                session_id,
                response.url,
                Utc::now().to_rfc3339(),
                response.status_code,
                response.content_type,
                headers_json,
                digest,
                response.body.len() as i64,
                body,
                record_type.as_str(),
                original,
            ],
        )?;

        Ok(CaptureRecord {
            id: self.conn.last_insert_rowid(),
            record_type,
            payload_digest: digest,
            refers_to: original,
        })
    }

    fn find_payload(&self, digest: &str) -> Result<Option<i64>> {
        self.conn
            .query_row(
                "SELECT id FROM captures
                 WHERE payload_digest = ?1 AND record_type = 'response'
                 ORDER BY id LIMIT 1",
                [digest],
                |row| row.get(0),
            )
            .optional()
    }

    /// Most recent capture of `url`, ready for replay.
    pub fn lookup(&self, url: &str) -> Result<Option<StoredResponse>> {
        self.conn
            .query_row(
                "SELECT c.url, c.captured_at, c.status_code, c.content_type, c.headers,
                        c.payload_digest, c.record_type, COALESCE(c.body, o.body)
                 FROM captures c
                 LEFT JOIN captures o ON o.id = c.refers_to
                 WHERE c.url = ?1
                 ORDER BY c.id DESC LIMIT 1",
                [url],
                |row| {
                    let headers_json: String = row.get(4)?;
                    let record_type: String = row.get(6)?;
                    Ok(StoredResponse {
                        url: row.get(0)?,
                        captured_at: row.get(1)?,
                        status_code: row.get(2)?,
                        content_type: row.get(3)?,
                        headers: serde_json::from_str(&headers_json).unwrap_or_default(),
                        payload_digest: row.get(5)?,
                        record_type: RecordType::from_db(&record_type),
                        body: row.get::<_, Option<Vec<u8>>>(7)?.unwrap_or_default(),
                    })
                },
            )
            .optional()
    }

    pub fn capture_count(&self, session_id: &str) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM captures WHERE session_id = ?1",
            [session_id],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// Captured URLs of a session, in capture order.
    pub fn list_urls(&self, session_id: &str) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT url FROM captures WHERE session_id = ?1 ORDER BY id")?;
        let urls = stmt
            .query_map([session_id], |row| row.get(0))?
            .collect::<Result<Vec<String>>>()?;
        Ok(urls)
    }
}
