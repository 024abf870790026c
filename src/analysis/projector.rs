use crate::error::{Error, Result};
use crate::models::network::{GraphProjection, ProjectedEdge, ProjectedNode};
use crate::models::skill::{CoOccurrenceTable, FrequencyTable};

/// Minimum counts a skill or pair needs to appear in a projection. Both are at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    min_frequency: u32,
    min_co_occurrence: u32,
}

impl Thresholds {
    pub fn new(min_frequency: u32, min_co_occurrence: u32) -> Result<Self> {
        if min_frequency < 1 {
            return Err(Error::ThresholdOutOfRange {
                name: "min_frequency",
                value: min_frequency,
            });
        }
        if min_co_occurrence < 1 {
            return Err(Error::ThresholdOutOfRange {
                name: "min_co_occurrence",
                value: min_co_occurrence,
            });
        }
        Ok(Self {
            min_frequency,
            min_co_occurrence,
        })
    }

    pub fn min_frequency(&self) -> u32 {
        self.min_frequency
    }

    pub fn min_co_occurrence(&self) -> u32 {
        self.min_co_occurrence
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            min_frequency: 2,
            min_co_occurrence: 1,
        }
    }
}

pub struct GraphProjector;

impl GraphProjector {
    pub fn project(
        frequency: &FrequencyTable,
        co_occurrence: &CoOccurrenceTable,
        thresholds: Thresholds,
    ) -> GraphProjection {
        let mut nodes: Vec<ProjectedNode> = frequency
            .iter()
            .filter(|(_, count)| *count >= thresholds.min_frequency)
            .map(|(skill, count)| ProjectedNode {
                skill: skill.to_string(),
                frequency: count,
            })
            .collect();

        if nodes.is_empty() {
            return GraphProjection::empty();
        }

        // An edge survives only if both of its skills did
        let mut edges: Vec<ProjectedEdge> = co_occurrence
            .iter()
            .filter(|(pair, count)| {
                *count >= thresholds.min_co_occurrence
                    && frequency.get(pair.first()) >= thresholds.min_frequency
                    && frequency.get(pair.second()) >= thresholds.min_frequency
            })
            .map(|(pair, count)| ProjectedEdge {
                pair: pair.clone(),
                weight: count,
            })
            .collect();

        nodes.sort_by(|a, b| b.frequency.cmp(&a.frequency).then_with(|| a.skill.cmp(&b.skill)));
        edges.sort_by(|a, b| b.weight.cmp(&a.weight).then_with(|| a.pair.cmp(&b.pair)));

        GraphProjection { nodes, edges }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::skill::SkillSet;

    fn tables(postings: &[&[&str]]) -> (FrequencyTable, CoOccurrenceTable) {
        let mut frequency = FrequencyTable::new();
        let mut co_occurrence = CoOccurrenceTable::new();
        for skills in postings {
            let set: SkillSet = skills.iter().copied().collect();
            frequency.record(&set);
            co_occurrence.record(&set);
        }
        (frequency, co_occurrence)
    }

    #[test]
    fn test_zero_thresholds_rejected() {
        assert!(matches!(
            Thresholds::new(0, 1),
            Err(Error::ThresholdOutOfRange { name: "min_frequency", value: 0 })
        ));
        assert!(matches!(
            Thresholds::new(1, 0),
            Err(Error::ThresholdOutOfRange { name: "min_co_occurrence", value: 0 })
        ));
        assert!(Thresholds::new(1, 1).is_ok());
    }

    #[test]
    fn test_example_projection() {
        let (frequency, co_occurrence) =
            tables(&[&["Python", "AWS"], &["Python", "React"], &["React"]]);
        let projection =
            GraphProjector::project(&frequency, &co_occurrence, Thresholds::new(2, 1).unwrap());

        let nodes: Vec<_> = projection.nodes.iter().map(|n| n.skill.as_str()).collect();
        assert_eq!(nodes, vec!["Python", "React"]);
        assert_eq!(projection.edges.len(), 1);
        assert_eq!(projection.edges[0].pair.key(), "Python|React");
        assert_eq!(projection.edges[0].weight, 1);
    }

    #[test]
    fn test_edges_to_dropped_nodes_are_removed() {
        let (frequency, co_occurrence) =
            tables(&[&["A", "B"], &["A", "B"], &["A", "B"], &["A", "C"], &["A", "C"]]);
        // C has frequency 2, A-C co-occurs twice
        let projection =
            GraphProjector::project(&frequency, &co_occurrence, Thresholds::new(3, 1).unwrap());
        assert!(!projection.contains_node("C"));
        assert!(projection
            .edges
            .iter()
            .all(|e| projection.contains_node(e.pair.first())
                && projection.contains_node(e.pair.second())));
        assert_eq!(projection.edges.len(), 1);
    }

    #[test]
    fn test_high_threshold_gives_empty_projection() {
        let (frequency, co_occurrence) = tables(&[&["A", "B"]]);
        let projection =
            GraphProjector::project(&frequency, &co_occurrence, Thresholds::new(5, 1).unwrap());
        assert!(projection.is_empty());
        assert_eq!(projection, GraphProjection::empty());
    }

    #[test]
    fn test_projection_leaves_inputs_untouched() {
        let (frequency, co_occurrence) = tables(&[&["A", "B"], &["A"]]);
        let before = (frequency.clone(), co_occurrence.clone());
        let strict =
            GraphProjector::project(&frequency, &co_occurrence, Thresholds::new(2, 1).unwrap());
        let loose =
            GraphProjector::project(&frequency, &co_occurrence, Thresholds::new(1, 1).unwrap());
        assert_eq!((frequency, co_occurrence), before);
        assert_eq!(strict.nodes.len(), 1);
        assert_eq!(loose.nodes.len(), 2);
        assert_eq!(loose.edges.len(), 1);
    }

    #[test]
    fn test_min_co_occurrence_filters_edges() {
        let (frequency, co_occurrence) = tables(&[&["A", "B", "C"], &["A", "B"]]);
        let projection =
            GraphProjector::project(&frequency, &co_occurrence, Thresholds::new(1, 2).unwrap());
        assert_eq!(projection.nodes.len(), 3);
        assert_eq!(projection.edges.len(), 1);
        assert_eq!(projection.edges[0].pair.key(), "A|B");
    }
}
