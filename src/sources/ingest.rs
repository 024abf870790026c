use futures::future::join_all;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Semaphore;

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::models::JobPosting;
use crate::sources::provider::{PostingSource, SourceQuery};
use crate::storage::Storage;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub fetched: usize,
    pub inserted: usize,
    pub duplicates: usize,
    pub failed_sources: Vec<String>,
}

/// Pulls postings from every configured source and stores the new ones.
pub struct IngestPipeline {
    sources: Vec<Arc<dyn PostingSource>>,
    storage: Storage,
    config: PipelineConfig,
}

impl IngestPipeline {
    pub fn new(storage: Storage, config: PipelineConfig) -> Self {
        Self {
            sources: Vec::new(),
            storage,
            config,
        }
    }

    pub fn with_source(mut self, source: impl PostingSource + 'static) -> Self {
        self.sources.push(Arc::new(source));
        self
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    pub async fn run(&self, query: &SourceQuery) -> Result<IngestReport> {
        let semaphore = Arc::new(Semaphore::new(self.config.concurrency_limit));

        let pb = ProgressBar::new(self.sources.len() as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} sources")
        {
            pb.set_style(style.progress_chars("#>-"));
        }

        let fetches = self.sources.iter().map(|source| {
            let sem = semaphore.clone();
            let pb = pb.clone();
            async move {
                let _permit = sem.acquire().await.ok();
                let result = source.fetch(query).await;
                pb.inc(1);
                (source.name().to_string(), result)
            }
        });

        let results = join_all(fetches).await;
        pb.finish_with_message("Fetched all sources");

        let mut report = IngestReport::default();
        let mut batch = Vec::new();

        for (name, result) in results {
            match result {
                Ok(postings) => {
                    tracing::info!("{}: {} postings", name, postings.len());
                    report.fetched += postings.len();
                    batch.extend(postings);
                }
                Err(e) => {
                    tracing::warn!("Source {} failed: {}", name, e);
                    report.failed_sources.push(name);
                }
            }
        }

        let (unique, in_batch_duplicates) = dedup_batch(batch);
        let summary = self.storage.save_postings(&unique)?;

        report.inserted = summary.inserted;
        report.duplicates = summary.duplicates + in_batch_duplicates;

        tracing::info!(
            "Ingest complete: {} fetched, {} new, {} duplicates",
            report.fetched,
            report.inserted,
            report.duplicates
        );

        Ok(report)
    }
}

/// Drops repeats within one batch, keeping the first occurrence.
fn dedup_batch(postings: Vec<JobPosting>) -> (Vec<JobPosting>, usize) {
    let mut seen_ids = HashSet::new();
    let mut seen_keys = HashSet::new();
    let mut duplicates = 0;

    let unique = postings
        .into_iter()
        .filter(|posting| {
            let fresh = !seen_ids.contains(&posting.id) && !seen_keys.contains(&posting.dedup_key());
            if fresh {
                seen_ids.insert(posting.id.clone());
                seen_keys.insert(posting.dedup_key());
            } else {
                duplicates += 1;
            }
            fresh
        })
        .collect();

    (unique, duplicates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use async_trait::async_trait;

    struct FakeSource {
        name: &'static str,
        postings: Vec<JobPosting>,
    }

    #[async_trait]
    impl PostingSource for FakeSource {
        async fn fetch(&self, query: &SourceQuery) -> Result<Vec<JobPosting>> {
            Ok(self
                .postings
                .iter()
                .filter(|p| query.matches(p))
                .cloned()
                .collect())
        }

        fn name(&self) -> &str {
            self.name
        }
    }

    struct FailingSource;

    #[async_trait]
    impl PostingSource for FailingSource {
        async fn fetch(&self, _query: &SourceQuery) -> Result<Vec<JobPosting>> {
            Err(Error::SourceApi("boom".to_string()))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    fn posting(id: &str, title: &str, company: &str) -> JobPosting {
        let mut posting = JobPosting::new(id, format!("{} role", title));
        posting.title = title.to_string();
        posting.company = company.to_string();
        posting
    }

    #[tokio::test]
    async fn test_ingest_dedupes_across_sources_and_runs() {
        let pipeline = IngestPipeline::new(Storage::in_memory().unwrap(), PipelineConfig::default())
            .with_source(FakeSource {
                name: "one",
                postings: vec![
                    posting("one:1", "Rust Engineer", "Acme"),
                    posting("one:2", "Python Engineer", "Acme"),
                ],
            })
            .with_source(FakeSource {
                name: "two",
                postings: vec![
                    posting("two:9", "rust engineer", "ACME"),
                    posting("two:10", "Data Engineer", "Beta"),
                ],
            });

        let report = pipeline.run(&SourceQuery::default()).await.unwrap();
        assert_eq!(report.fetched, 4);
        assert_eq!(report.inserted, 3);
        assert_eq!(report.duplicates, 1);
        assert!(report.failed_sources.is_empty());

        let again = pipeline.run(&SourceQuery::default()).await.unwrap();
        assert_eq!(again.inserted, 0);
        assert_eq!(again.duplicates, 4);
        assert_eq!(pipeline.storage().count_postings().unwrap(), 3);
    }

    #[tokio::test]
    async fn test_failing_source_is_reported_not_fatal() {
        let pipeline = IngestPipeline::new(Storage::in_memory().unwrap(), PipelineConfig::default())
            .with_source(FailingSource)
            .with_source(FakeSource {
                name: "ok",
                postings: vec![posting("ok:1", "Rust Engineer", "Acme")],
            });

        let report = pipeline.run(&SourceQuery::with_keyword("rust")).await.unwrap();
        assert_eq!(report.failed_sources, vec!["failing".to_string()]);
        assert_eq!(report.inserted, 1);
    }

    #[test]
    fn test_dedup_batch_keeps_first() {
        let (unique, duplicates) = dedup_batch(vec![
            posting("a", "Rust", "Acme"),
            posting("a", "Other", "Other"),
            posting("b", "rust", "acme"),
            posting("c", "Go", "Acme"),
        ]);
        let ids: Vec<_> = unique.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
        assert_eq!(duplicates, 2);
    }
}
