use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JobPosting {
    pub id: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub description: String,
    /// Skills assigned by the source itself (e.g. board tags).
    #[serde(default)]
    pub skills: Option<Vec<String>>,
    pub created_at: DateTime<Utc>,
}

impl JobPosting {
    pub fn new(id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: String::new(),
            title: String::new(),
            company: String::new(),
            location: None,
            url: None,
            description: description.into(),
            skills: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_skills<I, S>(mut self, skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skills = Some(skills.into_iter().map(Into::into).collect());
        self
    }

    /// Key used to recognise the same job listed twice, possibly by different boards.
    pub fn dedup_key(&self) -> String {
        if self.title.trim().is_empty() && self.company.trim().is_empty() {
            return format!("id:{}", self.id);
        }
        format!(
            "{}|{}|{}",
            normalize_field(&self.title),
            normalize_field(&self.company),
            normalize_field(self.location.as_deref().unwrap_or("")),
        )
    }
}

fn normalize_field(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
