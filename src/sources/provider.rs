use async_trait::async_trait;

use crate::error::Result;
use crate::models::JobPosting;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceQuery {
    pub keyword: Option<String>,
    pub limit: Option<usize>,
    /// Upper bound for paginated sources.
    pub max_pages: u32,
}

impl Default for SourceQuery {
    fn default() -> Self {
        Self {
            keyword: None,
            limit: None,
            max_pages: 3,
        }
    }
}

impl SourceQuery {
    pub fn with_keyword(keyword: impl Into<String>) -> Self {
        Self {
            keyword: Some(keyword.into()),
            ..Self::default()
        }
    }

    /// Local keyword filter for sources without server-side search.
    pub fn matches(&self, posting: &JobPosting) -> bool {
        let Some(keyword) = self.keyword.as_deref().map(str::trim).filter(|k| !k.is_empty())
        else {
            return true;
        };
        let keyword = keyword.to_lowercase();

        posting.title.to_lowercase().contains(&keyword)
            || posting.description.to_lowercase().contains(&keyword)
            || posting
                .skills
                .iter()
                .flatten()
                .any(|s| s.to_lowercase() == keyword)
    }

    pub fn apply_limit(&self, mut postings: Vec<JobPosting>) -> Vec<JobPosting> {
        if let Some(limit) = self.limit {
            postings.truncate(limit);
        }
        postings
    }
}

#[async_trait]
pub trait PostingSource: Send + Sync {
    async fn fetch(&self, query: &SourceQuery) -> Result<Vec<JobPosting>>;
    fn name(&self) -> &str;
}
