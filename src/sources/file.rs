use async_trait::async_trait;
use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::models::JobPosting;
use crate::sources::provider::{PostingSource, SourceQuery};

/// Postings from a local JSON array, e.g. an export from another tool.
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl PostingSource for JsonFileSource {
    async fn fetch(&self, query: &SourceQuery) -> Result<Vec<JobPosting>> {
        let contents = tokio::fs::read_to_string(&self.path).await?;
        let postings: Vec<JobPosting> = serde_json::from_str(&contents).map_err(|e| {
            Error::ParseError(format!("{}: {}", self.path.display(), e))
        })?;

        let postings: Vec<_> = postings
            .into_iter()
            .map(|mut posting| {
                if posting.source.is_empty() {
                    posting.source = "file".to_string();
                }
                posting
            })
            .filter(|p| query.matches(p))
            .collect();

        tracing::info!("Read {} postings from {}", postings.len(), self.path.display());
        Ok(query.apply_limit(postings))
    }

    fn name(&self) -> &str {
        "file"
    }
}
