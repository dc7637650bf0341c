//! SQLite-backed store for downloaded documents and their validators

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

#[cfg(test)]
use mockall::automock;
use rusqlite::{Connection, OptionalExtension};
use tracing::{debug, info};

use crate::database::error::CacheError;

/// A stored HTTP response body and what is needed to revalidate it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedResponse {
    pub url: String,
    pub body: String,
    pub etag: Option<String>,
    pub last_modified: Option<String>,
    /// Milliseconds since the UNIX epoch
    pub fetched_at: i64,
    /// Milliseconds since the UNIX epoch
    pub expires_at: i64,
}

impl CachedResponse {
    pub fn is_fresh(&self, now_ms: i64) -> bool {
        now_ms < self.expires_at
    }
}

#[cfg_attr(test, automock)]
pub trait ResponseStore: Send + Sync {
    fn get(&self, url: &str) -> Result<Option<CachedResponse>, CacheError>;

    /// Insert or replace the entry for `response.url`
    fn put(&self, response: &CachedResponse) -> Result<(), CacheError>;

    /// Extend the lifetime of an entry after a successful revalidation
    fn touch(&self, url: &str, expires_at: i64) -> Result<(), CacheError>;
}

pub struct HttpCache {
    conn: Mutex<Connection>,
}

impl HttpCache {
    pub fn new(db_path: &Path) -> Result<Self, CacheError> {
        info!("Opening HTTP cache at {:?}", db_path);

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(db_path)?;

        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;

        let cache = Self {
            conn: Mutex::new(conn),
        };
        cache.create_schema()?;
        Ok(cache)
    }

    fn lock_conn(&self) -> Result<MutexGuard<'_, Connection>, CacheError> {
        self.conn.lock().map_err(|_| CacheError::LockPoisoned)
    }

    fn create_schema(&self) -> Result<(), CacheError> {
        debug!("Creating HTTP cache schema");

        let conn = self.lock_conn()?;
        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS responses (
                url TEXT PRIMARY KEY,
                body TEXT NOT NULL,
                etag TEXT,
                last_modified TEXT,
                fetched_at INTEGER NOT NULL,
                expires_at INTEGER NOT NULL
            )
            "#,
            [],
        )?;
        Ok(())
    }
}

impl ResponseStore for HttpCache {
    fn get(&self, url: &str) -> Result<Option<CachedResponse>, CacheError> {
        let conn = self.lock_conn()?;
        let entry = conn
            .query_row(
                r#"
                SELECT url, body, etag, last_modified, fetched_at, expires_at
                FROM responses WHERE url = ?1
                "#,
                [url],
                |row| {
                    Ok(CachedResponse {
                        url: row.get(0)?,
                        body: row.get(1)?,
                        etag: row.get(2)?,
                        last_modified: row.get(3)?,
                        fetched_at: row.get(4)?,
                        expires_at: row.get(5)?,
                    })
                },
            )
            .optional()?;
        Ok(entry)
    }

    fn put(&self, response: &CachedResponse) -> Result<(), CacheError> {
        let conn = self.lock_conn()?;
        conn.execute(
            r#"
            INSERT INTO responses (url, body, etag, last_modified, fetched_at, expires_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(url) DO UPDATE SET
                body = excluded.body,
                etag = excluded.etag,
                last_modified = excluded.last_modified,
                fetched_at = excluded.fetched_at,
                expires_at = excluded.expires_at
            "#,
            (
                &response.url,
                &response.body,
                &response.etag,
                &response.last_modified,
                response.fetched_at,
                response.expires_at,
            ),
        )?;
        info!("Cached {} ({} bytes)", response.url, response.body.len());
        Ok(())
    }

    fn touch(&self, url: &str, expires_at: i64) -> Result<(), CacheError> {
        let conn = self.lock_conn()?;
        let updated = conn.execute(
            "UPDATE responses SET expires_at = ?2 WHERE url = ?1",
            (url, expires_at),
        )?;
        debug!("Refreshed {} cache entry for {}", updated, url);
        Ok(())
    }
}

/// Current time in milliseconds since the UNIX epoch
pub fn current_timestamp_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const URL: &str = "https://example.com/pyversion-info-data.v1.json";

    fn entry(body: &str, expires_at: i64) -> CachedResponse {
        CachedResponse {
            url: URL.to_string(),
            body: body.to_string(),
            etag: Some("\"abc\"".to_string()),
            last_modified: Some("Thu, 04 Nov 2021 14:09:27 GMT".to_string()),
            fetched_at: 1_000,
            expires_at,
        }
    }

    #[test]
    fn get_returns_none_for_unknown_url() {
        let temp_dir = TempDir::new().unwrap();
        let cache = HttpCache::new(&temp_dir.path().join("http-cache.db")).unwrap();

        assert_eq!(cache.get(URL).unwrap(), None);
    }

    #[test]
    fn put_then_get_returns_stored_entry() {
        let temp_dir = TempDir::new().unwrap();
        let cache = HttpCache::new(&temp_dir.path().join("http-cache.db")).unwrap();

        cache.put(&entry("{}", 2_000)).unwrap();

        assert_eq!(cache.get(URL).unwrap(), Some(entry("{}", 2_000)));
    }

    #[test]
    fn put_replaces_existing_entry() {
        let temp_dir = TempDir::new().unwrap();
        let cache = HttpCache::new(&temp_dir.path().join("http-cache.db")).unwrap();

        cache.put(&entry("old", 2_000)).unwrap();
        let mut newer = entry("new", 5_000);
        newer.etag = None;
        cache.put(&newer).unwrap();

        assert_eq!(cache.get(URL).unwrap(), Some(newer));
    }

    #[test]
    fn touch_only_moves_expiry() {
        let temp_dir = TempDir::new().unwrap();
        let cache = HttpCache::new(&temp_dir.path().join("http-cache.db")).unwrap();

        cache.put(&entry("{}", 2_000)).unwrap();
        cache.touch(URL, 9_000).unwrap();

        assert_eq!(cache.get(URL).unwrap(), Some(entry("{}", 9_000)));
    }

    #[test]
    fn entries_survive_reopening() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("nested/dir/http-cache.db");

        HttpCache::new(&db_path).unwrap().put(&entry("{}", 2_000)).unwrap();
        let reopened = HttpCache::new(&db_path).unwrap();

        assert_eq!(reopened.get(URL).unwrap(), Some(entry("{}", 2_000)));
    }

    #[test]
    fn is_fresh_until_expiry() {
        let e = entry("{}", 2_000);
        assert!(e.is_fresh(1_999));
        assert!(!e.is_fresh(2_000));
    }
}
