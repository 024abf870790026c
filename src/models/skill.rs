use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Separator used in the string form of a [`SkillPair`]. Catalogue skill names may not contain it.
pub const PAIR_SEPARATOR: char = '|';

/// Canonical skill names found in one posting. Built once, never mutated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillSet(BTreeSet<String>);

impl SkillSet {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, skill: &str) -> bool {
        self.0.contains(skill)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Every unordered pair of distinct skills, each exactly once.
    pub fn pairs(&self) -> impl Iterator<Item = SkillPair> + '_ {
        self.0.iter().enumerate().flat_map(move |(i, a)| {
            self.0
                .iter()
                .skip(i + 1)
                .map(move |b| SkillPair::new(a.as_str(), b.as_str()))
        })
    }

    pub fn union(&self, other: &SkillSet) -> SkillSet {
        SkillSet(self.0.union(&other.0).cloned().collect())
    }
}

impl FromIterator<String> for SkillSet {
    fn from_iter<T: IntoIterator<Item = String>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> FromIterator<&'a str> for SkillSet {
    fn from_iter<T: IntoIterator<Item = &'a str>>(iter: T) -> Self {
        Self(iter.into_iter().map(str::to_string).collect())
    }
}

/// Unordered pair of skills, stored lexicographically so `{A,B}` and `{B,A}` are equal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SkillPair {
    first: String,
    second: String,
}

impl SkillPair {
    pub fn new(a: &str, b: &str) -> Self {
        let (first, second) = if a <= b { (a, b) } else { (b, a) };
        Self {
            first: first.to_string(),
            second: second.to_string(),
        }
    }

    pub fn first(&self) -> &str {
        &self.first
    }

    pub fn second(&self) -> &str {
        &self.second
    }

    pub fn key(&self) -> String {
        format!("{}{}{}", self.first, PAIR_SEPARATOR, self.second)
    }

    pub fn from_key(key: &str) -> Option<Self> {
        let (a, b) = key.split_once(PAIR_SEPARATOR)?;
        if a.is_empty() || b.is_empty() {
            return None;
        }
        Some(Self::new(a, b))
    }
}

impl fmt::Display for SkillPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Number of postings each skill appears in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable(BTreeMap<String, u32>);

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, skills: &SkillSet) {
        for skill in skills.iter() {
            *self.0.entry(skill.to_string()).or_insert(0) += 1;
        }
    }

    pub fn get(&self, skill: &str) -> u32 {
        self.0.get(skill).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn merge(&mut self, other: &FrequencyTable) {
        for (skill, count) in &other.0 {
            *self.0.entry(skill.clone()).or_insert(0) += count;
        }
    }

    pub fn to_map(&self) -> BTreeMap<String, u32> {
        self.0.clone()
    }
}

/// Number of postings each pair of skills appears in together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoOccurrenceTable(BTreeMap<SkillPair, u32>);

impl CoOccurrenceTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, skills: &SkillSet) {
        for pair in skills.pairs() {
            *self.0.entry(pair).or_insert(0) += 1;
        }
    }

    pub fn get(&self, a: &str, b: &str) -> u32 {
        self.0.get(&SkillPair::new(a, b)).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SkillPair, u32)> {
        self.0.iter().map(|(k, v)| (k, *v))
    }

    pub fn merge(&mut self, other: &CoOccurrenceTable) {
        for (pair, count) in &other.0 {
            *self.0.entry(pair.clone()).or_insert(0) += count;
        }
    }

    /// String-keyed form for serialization.
    pub fn to_keyed_map(&self) -> BTreeMap<String, u32> {
        self.0.iter().map(|(pair, count)| (pair.key(), *count)).collect()
    }
}
