use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::path::Path;

use crate::error::Result;
use crate::models::JobPosting;

const POSTING_COLUMNS: &str =
    "id, source, title, company, location, url, description, skills_json, created_at";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SaveSummary {
    pub inserted: usize,
    pub duplicates: usize,
}

pub struct Storage {
    conn: Connection,
}

impl Storage {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let storage = Self { conn };
        storage.init_db()?;
        Ok(storage)
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let storage = Self { conn };
        storage.init_db()?;
        Ok(storage)
    }

    fn init_db(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS postings (
                id TEXT PRIMARY KEY,
                source TEXT NOT NULL,
                title TEXT NOT NULL,
                company TEXT NOT NULL,
                location TEXT,
                url TEXT,
                description TEXT NOT NULL,
                skills_json TEXT,
                dedup_key TEXT NOT NULL UNIQUE,
                created_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_postings_created_at ON postings(created_at);
            CREATE INDEX IF NOT EXISTS idx_postings_source ON postings(source);
            "#,
        )?;

        Ok(())
    }

    /// Returns `false` when the posting (same id or same dedup key) is already stored.
    pub fn save_posting(&self, posting: &JobPosting) -> Result<bool> {
        let skills_json = posting
            .skills
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        let changed = self.conn.execute(
            r#"
            INSERT OR IGNORE INTO postings
                (id, source, title, company, location, url, description, skills_json, dedup_key, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
            params![
                posting.id,
                posting.source,
                posting.title,
                posting.company,
                posting.location,
                posting.url,
                posting.description,
                skills_json,
                posting.dedup_key(),
                format_timestamp(&posting.created_at),
            ],
        )?;

        Ok(changed == 1)
    }

    pub fn save_postings(&self, postings: &[JobPosting]) -> Result<SaveSummary> {
        let tx = self.conn.unchecked_transaction()?;
        let mut summary = SaveSummary::default();

        for posting in postings {
            if self.save_posting(posting)? {
                summary.inserted += 1;
            } else {
                tracing::debug!("Skipping duplicate posting {}", posting.id);
                summary.duplicates += 1;
            }
        }

        tx.commit()?;
        Ok(summary)
    }

    pub fn get_posting(&self, id: &str) -> Result<Option<JobPosting>> {
        let sql = format!("SELECT {} FROM postings WHERE id = ?1", POSTING_COLUMNS);
        let result = self.conn.query_row(&sql, params![id], posting_from_row);

        match result {
            Ok(posting) => Ok(Some(posting)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Newest first. `keyword` matches title or description, case-insensitively.
    pub fn recent_postings(
        &self,
        since: Option<DateTime<Utc>>,
        keyword: Option<&str>,
    ) -> Result<Vec<JobPosting>> {
        let mut conditions = Vec::new();
        let mut values = Vec::new();

        if let Some(since) = since {
            values.push(format_timestamp(&since));
            conditions.push(format!("created_at >= ?{}", values.len()));
        }

        let mut sql = format!("SELECT {} FROM postings", POSTING_COLUMNS);
        if !conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }
        sql.push_str(" ORDER BY created_at DESC, id");

        let mut stmt = self.conn.prepare(&sql)?;
        let postings = stmt
            .query_map(params_from_iter(values.iter()), posting_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        // SQLite's LOWER() only folds ASCII, so the keyword is matched here
        match keyword.map(str::trim).filter(|k| !k.is_empty()) {
            Some(keyword) => {
                let keyword = keyword.to_lowercase();
                Ok(postings
                    .into_iter()
                    .filter(|p| mentions(p, &keyword))
                    .collect())
            }
            None => Ok(postings),
        }
    }

    pub fn postings_by_ids(&self, ids: &[String]) -> Result<Vec<JobPosting>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders: Vec<String> = (1..=ids.len()).map(|i| format!("?{}", i)).collect();
        let sql = format!(
            "SELECT {} FROM postings WHERE id IN ({}) ORDER BY created_at DESC, id",
            POSTING_COLUMNS,
            placeholders.join(", ")
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let postings = stmt
            .query_map(params_from_iter(ids.iter()), posting_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        if postings.len() < ids.len() {
            tracing::debug!(
                "{} of {} requested postings not found",
                ids.len() - postings.len(),
                ids.len()
            );
        }

        Ok(postings)
    }

    pub fn count_postings(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM postings", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    pub fn prune_older_than(&self, cutoff: DateTime<Utc>) -> Result<usize> {
        let removed = self.conn.execute(
            "DELETE FROM postings WHERE created_at < ?1",
            params![format_timestamp(&cutoff)],
        )?;
        Ok(removed)
    }
}

fn format_timestamp(ts: &DateTime<Utc>) -> String {
    // Fixed width so lexical order is chronological order
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn mentions(posting: &JobPosting, lowered_keyword: &str) -> bool {
    posting.title.to_lowercase().contains(lowered_keyword)
        || posting.description.to_lowercase().contains(lowered_keyword)
}

fn posting_from_row(row: &Row<'_>) -> rusqlite::Result<JobPosting> {
    let skills_json: Option<String> = row.get(7)?;
    let skills = skills_json
        .map(|json| serde_json::from_str::<Vec<String>>(&json))
        .transpose()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(7, Type::Text, Box::new(e)))?;

    let created_at: String = row.get(8)?;
    let created_at = DateTime::parse_from_rfc3339(&created_at)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(8, Type::Text, Box::new(e)))?;

    Ok(JobPosting {
        id: row.get(0)?,
        source: row.get(1)?,
        title: row.get(2)?,
        company: row.get(3)?,
        location: row.get(4)?,
        url: row.get(5)?,
        description: row.get(6)?,
        skills,
        created_at,
    })
}
