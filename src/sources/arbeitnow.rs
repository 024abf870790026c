use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;

use crate::error::Result;
use crate::models::JobPosting;
use crate::sources::html::strip_html;
use crate::sources::http::{build_client, get_json};
use crate::sources::provider::{PostingSource, SourceQuery};
use crate::sources::rate_limiter::RateLimiter;

const DEFAULT_BASE_URL: &str = "https://www.arbeitnow.com/api/job-board-api";

/// Arbeitnow job board. No server-side search, so pages are filtered locally.
pub struct ArbeitnowSource {
    client: Client,
    rate_limiter: RateLimiter,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct ArbeitnowPage {
    #[serde(default)]
    data: Vec<ArbeitnowJob>,
    #[serde(default)]
    links: ArbeitnowLinks,
}

#[derive(Debug, Default, Deserialize)]
struct ArbeitnowLinks {
    next: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ArbeitnowJob {
    slug: String,
    company_name: String,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    remote: bool,
    url: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
    location: Option<String>,
    created_at: Option<i64>,
}

impl ArbeitnowJob {
    fn into_posting(self) -> JobPosting {
        let created_at = self
            .created_at
            .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0))
            .unwrap_or_else(Utc::now);

        let location = match self.location.filter(|l| !l.is_empty()) {
            Some(location) if self.remote => Some(format!("{} (remote)", location)),
            Some(location) => Some(location),
            None if self.remote => Some("Remote".to_string()),
            None => None,
        };

        JobPosting {
            id: format!("arbeitnow:{}", self.slug),
            source: "arbeitnow".to_string(),
            title: self.title,
            company: self.company_name,
            location,
            url: self.url,
            description: strip_html(&self.description),
            skills: (!self.tags.is_empty()).then_some(self.tags),
            created_at,
        }
    }
}

impl ArbeitnowSource {
    pub fn new(rate_limiter: RateLimiter) -> Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL, rate_limiter)
    }

    pub fn with_base_url(base_url: &str, rate_limiter: RateLimiter) -> Result<Self> {
        Ok(Self {
            client: build_client()?,
            rate_limiter,
            base_url: base_url.to_string(),
        })
    }
}

#[async_trait]
impl PostingSource for ArbeitnowSource {
    async fn fetch(&self, query: &SourceQuery) -> Result<Vec<JobPosting>> {
        let mut postings = Vec::new();
        let mut next_url = Some(self.base_url.clone());
        let mut pages = 0;

        while let Some(url) = next_url.take() {
            if pages >= query.max_pages {
                break;
            }

            let page: ArbeitnowPage = get_json(&self.client, &self.rate_limiter, &url).await?;
            pages += 1;

            let page_len = page.data.len();
            postings.extend(
                page.data
                    .into_iter()
                    .map(ArbeitnowJob::into_posting)
                    .filter(|p| query.matches(p)),
            );
            tracing::debug!("Arbeitnow page {}: {} jobs", pages, page_len);

            if page_len == 0 || query.limit.is_some_and(|limit| postings.len() >= limit) {
                break;
            }
            next_url = page.links.next;
        }

        tracing::info!("Fetched {} Arbeitnow postings from {} pages", postings.len(), pages);
        Ok(query.apply_limit(postings))
    }

    fn name(&self) -> &str {
        "arbeitnow"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"{
        "data": [
            {
                "slug": "rust-developer-berlin-123",
                "company_name": "Acme GmbH",
                "title": "Rust Developer",
                "description": "<p>Rust, Kubernetes and <em>PostgreSQL</em></p>",
                "remote": true,
                "url": "https://www.arbeitnow.com/jobs/companies/acme/rust-developer-berlin-123",
                "tags": ["Software Development"],
                "job_types": ["full time"],
                "location": "Berlin",
                "created_at": 1714557600
            },
            {
                "slug": "office-manager-456",
                "company_name": "Beta AG",
                "title": "Office Manager",
                "description": "Organise things",
                "remote": false,
                "tags": [],
                "location": "Munich",
                "created_at": 1714557600
            }
        ],
        "links": {"first": "https://www.arbeitnow.com/api/job-board-api?page=1", "next": "https://www.arbeitnow.com/api/job-board-api?page=2"},
        "meta": {"current_page": 1}
    }"#;

    #[test]
    fn test_parse_page() {
        let page: ArbeitnowPage = serde_json::from_str(FIXTURE).unwrap();
        assert_eq!(
            page.links.next.as_deref(),
            Some("https://www.arbeitnow.com/api/job-board-api?page=2")
        );

        let postings: Vec<_> = page.data.into_iter().map(ArbeitnowJob::into_posting).collect();
        let rust = &postings[0];
        assert_eq!(rust.id, "arbeitnow:rust-developer-berlin-123");
        assert_eq!(rust.location.as_deref(), Some("Berlin (remote)"));
        assert_eq!(rust.description, "Rust, Kubernetes and PostgreSQL");
        assert_eq!(rust.created_at.timestamp(), 1714557600);

        let office = &postings[1];
        assert_eq!(office.location.as_deref(), Some("Munich"));
        assert!(office.skills.is_none());
    }

    #[test]
    fn test_last_page_without_links() {
        let page: ArbeitnowPage = serde_json::from_str(r#"{"data": []}"#).unwrap();
        assert!(page.data.is_empty());
        assert!(page.links.next.is_none());
    }
}
