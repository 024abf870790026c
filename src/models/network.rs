use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::skill::SkillPair;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectedNode {
    pub skill: String,
    pub frequency: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectedEdge {
    pub pair: SkillPair,
    pub weight: u32,
}

/// Thresholded view of an aggregation. Every edge endpoint is present in `nodes`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphProjection {
    pub nodes: Vec<ProjectedNode>,
    pub edges: Vec<ProjectedEdge>,
}

impl GraphProjection {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    pub fn contains_node(&self, skill: &str) -> bool {
        self.nodes.iter().any(|n| n.skill == skill)
    }

    pub fn max_frequency(&self) -> u32 {
        self.nodes.iter().map(|n| n.frequency).max().unwrap_or(0)
    }

    pub fn max_weight(&self) -> u32 {
        self.edges.iter().map(|e| e.weight).max().unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NetworkStatus {
    Ok,
    /// The corpus was empty.
    NoData,
    /// Postings existed but no skill met the thresholds.
    BelowThreshold,
}

impl std::fmt::Display for NetworkStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NetworkStatus::Ok => write!(f, "ok"),
            NetworkStatus::NoData => write!(f, "no data"),
            NetworkStatus::BelowThreshold => write!(f, "below threshold"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkNode {
    pub id: String,
    pub label: String,
    pub category: Option<String>,
    pub frequency: u32,
    pub size: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkEdge {
    pub source: String,
    pub target: String,
    pub weight: u32,
    pub width: f32,
}

/// Payload handed to the graph renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillsNetwork {
    pub status: NetworkStatus,
    pub total_postings: usize,
    pub min_frequency: u32,
    pub min_co_occurrence: u32,
    pub skills: BTreeMap<String, u32>,
    pub co_occurrences: BTreeMap<String, u32>,
    pub nodes: Vec<NetworkNode>,
    pub edges: Vec<NetworkEdge>,
}

impl SkillsNetwork {
    pub fn has_data(&self) -> bool {
        self.status != NetworkStatus::NoData
    }
}
