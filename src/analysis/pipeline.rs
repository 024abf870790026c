use chrono::{Duration, Utc};

use crate::analysis::aggregator::{CoOccurrenceAggregator, SkillStats};
use crate::analysis::matcher::SkillMatcher;
use crate::analysis::projector::{GraphProjector, Thresholds};
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::models::network::{GraphProjection, NetworkEdge, NetworkNode, NetworkStatus, SkillsNetwork};
use crate::models::posting::JobPosting;
use crate::storage::Storage;
use crate::taxonomy::SkillCatalogue;

const MIN_NODE_SIZE: f32 = 10.0;
const MAX_NODE_SIZE: f32 = 50.0;
const MIN_EDGE_WIDTH: f32 = 1.0;
const MAX_EDGE_WIDTH: f32 = 8.0;

/// Which postings feed the network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkScope {
    /// Everything stored, optionally narrowed by age and keyword.
    Corpus {
        since_days: Option<u32>,
        keyword: Option<String>,
    },
    /// An explicit selection, e.g. the results of the search the user is looking at.
    Postings(Vec<String>),
}

impl Default for NetworkScope {
    fn default() -> Self {
        NetworkScope::Corpus {
            since_days: None,
            keyword: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkRequest {
    pub scope: NetworkScope,
    pub thresholds: Thresholds,
}

impl NetworkRequest {
    pub fn new(scope: NetworkScope, min_frequency: u32, min_co_occurrence: u32) -> Result<Self> {
        Ok(Self {
            scope,
            thresholds: Thresholds::new(min_frequency, min_co_occurrence)?,
        })
    }
}

pub struct NetworkPipeline {
    matcher: SkillMatcher,
    storage: Storage,
    config: PipelineConfig,
}

impl NetworkPipeline {
    pub fn new(matcher: SkillMatcher, storage: Storage, config: PipelineConfig) -> Self {
        Self {
            matcher,
            storage,
            config,
        }
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    pub fn build(&self, request: &NetworkRequest) -> Result<SkillsNetwork> {
        let postings = self.load_postings(&request.scope)?;
        tracing::info!("Building skills network from {} postings", postings.len());
        Ok(self.build_from_postings(&postings, request.thresholds))
    }

    pub fn build_from_postings(
        &self,
        postings: &[JobPosting],
        thresholds: Thresholds,
    ) -> SkillsNetwork {
        let aggregator = CoOccurrenceAggregator::new(&self.matcher);
        let stats = aggregator.aggregate_sharded(postings, self.config.shard_size);
        tracing::info!(
            "Aggregated {} skills and {} skill pairs",
            stats.frequency.len(),
            stats.co_occurrence.len()
        );

        let projection = GraphProjector::project(&stats.frequency, &stats.co_occurrence, thresholds);
        if projection.is_empty() && !stats.is_empty() {
            tracing::warn!(
                "No skill reached min_frequency={}; network is empty",
                thresholds.min_frequency()
            );
        }

        assemble_network(&stats, &projection, thresholds, self.matcher.catalogue())
    }

    fn load_postings(&self, scope: &NetworkScope) -> Result<Vec<JobPosting>> {
        match scope {
            NetworkScope::Corpus {
                since_days,
                keyword,
            } => {
                let since = since_days.map(|days| Utc::now() - Duration::days(i64::from(days)));
                self.storage.recent_postings(since, keyword.as_deref())
            }
            NetworkScope::Postings(ids) => self.storage.postings_by_ids(ids),
        }
    }
}

/// Turns aggregation output into the renderer payload.
pub fn assemble_network(
    stats: &SkillStats,
    projection: &GraphProjection,
    thresholds: Thresholds,
    catalogue: &SkillCatalogue,
) -> SkillsNetwork {
    let status = if stats.is_empty() {
        NetworkStatus::NoData
    } else if projection.is_empty() {
        NetworkStatus::BelowThreshold
    } else {
        NetworkStatus::Ok
    };

    let max_frequency = projection.max_frequency();
    let nodes = projection
        .nodes
        .iter()
        .map(|node| NetworkNode {
            id: node.skill.clone(),
            label: node.skill.clone(),
            category: catalogue.category_of(&node.skill).map(str::to_string),
            frequency: node.frequency,
            size: scale(node.frequency, max_frequency, MIN_NODE_SIZE, MAX_NODE_SIZE),
        })
        .collect();

    let max_weight = projection.max_weight();
    let edges = projection
        .edges
        .iter()
        .map(|edge| NetworkEdge {
            source: edge.pair.first().to_string(),
            target: edge.pair.second().to_string(),
            weight: edge.weight,
            width: scale(edge.weight, max_weight, MIN_EDGE_WIDTH, MAX_EDGE_WIDTH),
        })
        .collect();

    SkillsNetwork {
        status,
        total_postings: stats.posting_count,
        min_frequency: thresholds.min_frequency(),
        min_co_occurrence: thresholds.min_co_occurrence(),
        skills: stats.frequency.to_map(),
        co_occurrences: stats.co_occurrence.to_keyed_map(),
        nodes,
        edges,
    }
}

fn scale(value: u32, max: u32, low: f32, high: f32) -> f32 {
    if max == 0 {
        return low;
    }
    low + (high - low) * (value as f32 / max as f32)
}
