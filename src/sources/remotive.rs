use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use reqwest::{Client, Url};
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::models::JobPosting;
use crate::sources::html::strip_html;
use crate::sources::http::{build_client, get_json};
use crate::sources::provider::{PostingSource, SourceQuery};
use crate::sources::rate_limiter::RateLimiter;

const DEFAULT_BASE_URL: &str = "https://remotive.com/api/remote-jobs";

/// Remotive public API. Search happens server side; tags become the posting's skill list.
pub struct RemotiveSource {
    client: Client,
    rate_limiter: RateLimiter,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct RemotiveResponse {
    #[serde(default)]
    jobs: Vec<RemotiveJob>,
}

#[derive(Debug, Deserialize)]
struct RemotiveJob {
    id: u64,
    url: Option<String>,
    title: String,
    company_name: String,
    #[serde(default)]
    tags: Vec<String>,
    publication_date: Option<String>,
    candidate_required_location: Option<String>,
    #[serde(default)]
    description: String,
}

impl RemotiveJob {
    fn into_posting(self) -> JobPosting {
        let created_at = self
            .publication_date
            .as_deref()
            .and_then(parse_publication_date)
            .unwrap_or_else(Utc::now);

        JobPosting {
            id: format!("remotive:{}", self.id),
            source: "remotive".to_string(),
            title: self.title,
            company: self.company_name,
            location: self.candidate_required_location.filter(|l| !l.is_empty()),
            url: self.url,
            description: strip_html(&self.description),
            skills: (!self.tags.is_empty()).then_some(self.tags),
            created_at,
        }
    }
}

// Remotive omits the offset, e.g. "2024-05-01T10:00:00"
fn parse_publication_date(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}

impl RemotiveSource {
    pub fn new(rate_limiter: RateLimiter) -> Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL, rate_limiter)
    }

    pub fn with_base_url(base_url: &str, rate_limiter: RateLimiter) -> Result<Self> {
        Ok(Self {
            client: build_client()?,
            rate_limiter,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn request_url(&self, query: &SourceQuery) -> Result<Url> {
        let mut params: Vec<(&str, String)> = Vec::new();
        if let Some(keyword) = query.keyword.as_deref().filter(|k| !k.trim().is_empty()) {
            params.push(("search", keyword.trim().to_string()));
        }
        if let Some(limit) = query.limit {
            params.push(("limit", limit.to_string()));
        }

        let url = if params.is_empty() {
            Url::parse(&self.base_url)
        } else {
            Url::parse_with_params(&self.base_url, &params)
        };
        url.map_err(|e| Error::Config(format!("invalid Remotive URL '{}': {}", self.base_url, e)))
    }
}

#[async_trait]
impl PostingSource for RemotiveSource {
    async fn fetch(&self, query: &SourceQuery) -> Result<Vec<JobPosting>> {
        let url = self.request_url(query)?;
        tracing::info!("Fetching Remotive postings");

        let response: RemotiveResponse =
            get_json(&self.client, &self.rate_limiter, url.as_str()).await?;
        let postings = response
            .jobs
            .into_iter()
            .map(RemotiveJob::into_posting)
            .collect();

        Ok(query.apply_limit(postings))
    }

    fn name(&self) -> &str {
        "remotive"
    }
}
