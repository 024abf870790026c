use rayon::prelude::*;

use crate::analysis::matcher::SkillMatcher;
use crate::models::posting::JobPosting;
use crate::models::skill::{CoOccurrenceTable, FrequencyTable, SkillSet};

/// Frequency and co-occurrence counts for one corpus.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkillStats {
    pub frequency: FrequencyTable,
    pub co_occurrence: CoOccurrenceTable,
    pub posting_count: usize,
}

impl SkillStats {
    pub fn record(&mut self, skills: &SkillSet) {
        self.frequency.record(skills);
        self.co_occurrence.record(skills);
        self.posting_count += 1;
    }

    /// Pointwise sum. Shards of a corpus can be merged in any order.
    pub fn merge(&mut self, other: &SkillStats) {
        self.frequency.merge(&other.frequency);
        self.co_occurrence.merge(&other.co_occurrence);
        self.posting_count += other.posting_count;
    }

    pub fn is_empty(&self) -> bool {
        self.posting_count == 0
    }

    pub fn top_skills(&self, limit: usize) -> Vec<(&str, u32)> {
        let mut skills: Vec<_> = self.frequency.iter().collect();
        skills.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        skills.truncate(limit);
        skills
    }
}

pub struct CoOccurrenceAggregator<'a> {
    matcher: &'a SkillMatcher,
}

impl<'a> CoOccurrenceAggregator<'a> {
    pub fn new(matcher: &'a SkillMatcher) -> Self {
        Self { matcher }
    }

    pub fn aggregate(&self, postings: &[JobPosting]) -> SkillStats {
        let mut stats = SkillStats::default();
        for posting in postings {
            let skills = self.matcher.match_posting(posting);
            stats.record(&skills);
        }
        stats
    }

    /// Aggregates `shard_size`-posting chunks in parallel and sums the partial tables.
    pub fn aggregate_sharded(&self, postings: &[JobPosting], shard_size: usize) -> SkillStats {
        let shard_size = shard_size.max(1);
        if postings.len() <= shard_size {
            return self.aggregate(postings);
        }

        tracing::debug!(
            "Aggregating {} postings in {} shards",
            postings.len(),
            postings.len().div_ceil(shard_size)
        );

        postings
            .par_chunks(shard_size)
            .map(|shard| self.aggregate(shard))
            .reduce(SkillStats::default, |mut acc, partial| {
                acc.merge(&partial);
                acc
            })
    }

    pub fn aggregate_sets<'s, I>(sets: I) -> SkillStats
    where
        I: IntoIterator<Item = &'s SkillSet>,
    {
        let mut stats = SkillStats::default();
        for set in sets {
            stats.record(set);
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::{CatalogueCategory, SkillCatalogue, SkillDefinition};

    fn matcher() -> SkillMatcher {
        let catalogue = SkillCatalogue::new(vec![CatalogueCategory {
            name: "Core".to_string(),
            skills: vec![
                SkillDefinition::new("Python", &[]),
                SkillDefinition::new("React", &[]),
                SkillDefinition::new("AWS", &[]),
            ],
        }])
        .unwrap();
        SkillMatcher::new(catalogue).unwrap()
    }

    fn corpus() -> Vec<JobPosting> {
        vec![
            JobPosting::new("p1", "Python and AWS"),
            JobPosting::new("p2", "Python, React"),
            JobPosting::new("p3", "React only"),
        ]
    }

    #[test]
    fn test_example_corpus_counts() {
        let matcher = matcher();
        let stats = CoOccurrenceAggregator::new(&matcher).aggregate(&corpus());

        assert_eq!(stats.posting_count, 3);
        assert_eq!(stats.frequency.get("Python"), 2);
        assert_eq!(stats.frequency.get("React"), 2);
        assert_eq!(stats.frequency.get("AWS"), 1);
        assert_eq!(stats.frequency.len(), 3);

        assert_eq!(stats.co_occurrence.get("AWS", "Python"), 1);
        assert_eq!(stats.co_occurrence.get("Python", "React"), 1);
        assert_eq!(stats.co_occurrence.len(), 2);
    }

    #[test]
    fn test_repeated_mentions_count_once_per_posting() {
        let matcher = matcher();
        let postings = vec![JobPosting::new(
            "p1",
            "Python Python Python with React and more React",
        )];
        let stats = CoOccurrenceAggregator::new(&matcher).aggregate(&postings);
        assert_eq!(stats.frequency.get("Python"), 1);
        assert_eq!(stats.co_occurrence.get("Python", "React"), 1);
    }

    #[test]
    fn test_empty_corpus_gives_empty_tables() {
        let matcher = matcher();
        let stats = CoOccurrenceAggregator::new(&matcher).aggregate(&[]);
        assert!(stats.is_empty());
        assert!(stats.frequency.is_empty());
        assert!(stats.co_occurrence.is_empty());
    }

    #[test]
    fn test_aggregation_is_idempotent() {
        let matcher = matcher();
        let aggregator = CoOccurrenceAggregator::new(&matcher);
        let postings = corpus();
        assert_eq!(aggregator.aggregate(&postings), aggregator.aggregate(&postings));
    }

    #[test]
    fn test_sharded_matches_single_pass() {
        let matcher = matcher();
        let aggregator = CoOccurrenceAggregator::new(&matcher);
        let postings: Vec<_> = corpus().into_iter().cycle().take(25).collect();

        let single = aggregator.aggregate(&postings);
        for shard_size in [1, 2, 7, 25, 100] {
            assert_eq!(aggregator.aggregate_sharded(&postings, shard_size), single);
        }
    }

    #[test]
    fn test_top_skills_sorted_by_count_then_name() {
        let matcher = matcher();
        let stats = CoOccurrenceAggregator::new(&matcher).aggregate(&corpus());
        assert_eq!(stats.top_skills(2), vec![("Python", 2), ("React", 2)]);
    }

    #[test]
    fn test_aggregate_sets() {
        let sets: Vec<SkillSet> = vec![
            ["A", "B"].into_iter().collect(),
            ["B"].into_iter().collect(),
        ];
        let stats = CoOccurrenceAggregator::aggregate_sets(&sets);
        assert_eq!(stats.frequency.get("B"), 2);
        assert_eq!(stats.co_occurrence.get("A", "B"), 1);
        assert_eq!(stats.posting_count, 2);
    }
}
