mod builtin;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::error::{Error, Result};
use crate::models::skill::PAIR_SEPARATOR;

/// Ordered set of skill categories. Loaded once and treated as read-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillCatalogue {
    pub categories: Vec<CatalogueCategory>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogueCategory {
    pub name: String,
    pub skills: Vec<SkillDefinition>,
}

/// A skill and the patterns that recognise it. With no patterns, the name itself is the token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillDefinition {
    pub name: String,
    #[serde(default)]
    pub patterns: Vec<SkillPattern>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillPattern {
    /// Literal token or phrase, matched as a whole token.
    Token(String),
    /// Regular expression, matched as a whole token.
    Regex(String),
}

impl SkillDefinition {
    pub fn new(name: &str, aliases: &[&str]) -> Self {
        let patterns = std::iter::once(name)
            .chain(aliases.iter().copied())
            .map(|p| SkillPattern::Token(p.to_string()))
            .collect();
        Self {
            name: name.to_string(),
            patterns,
        }
    }

    pub fn with_patterns(name: &str, patterns: Vec<SkillPattern>) -> Self {
        Self {
            name: name.to_string(),
            patterns,
        }
    }

    /// Patterns with the name fallback applied.
    pub fn effective_patterns(&self) -> Vec<SkillPattern> {
        if self.patterns.is_empty() {
            vec![SkillPattern::Token(self.name.clone())]
        } else {
            self.patterns.clone()
        }
    }
}

impl SkillCatalogue {
    pub fn new(categories: Vec<CatalogueCategory>) -> Result<Self> {
        let catalogue = Self { categories };
        catalogue.validate()?;
        Ok(catalogue)
    }

    pub fn builtin() -> Self {
        builtin::catalogue()
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let catalogue: SkillCatalogue = serde_json::from_str(json)
            .map_err(|e| Error::InvalidCatalogue(format!("malformed catalogue JSON: {}", e)))?;
        catalogue.validate()?;
        Ok(catalogue)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::InvalidCatalogue(format!("cannot read {}: {}", path.display(), e))
        })?;
        let catalogue = Self::from_json_str(&contents)?;
        tracing::info!(
            "Loaded skill catalogue from {} ({} skills)",
            path.display(),
            catalogue.skill_count()
        );
        Ok(catalogue)
    }

    /// Structural checks. Pattern compilation is checked by the matcher.
    pub fn validate(&self) -> Result<()> {
        if self.categories.is_empty() {
            return Err(Error::InvalidCatalogue("catalogue has no categories".to_string()));
        }

        let mut seen = HashSet::new();
        for category in &self.categories {
            if category.name.trim().is_empty() {
                return Err(Error::InvalidCatalogue("category with empty name".to_string()));
            }
            if category.skills.is_empty() {
                return Err(Error::InvalidCatalogue(format!(
                    "category '{}' has no skills",
                    category.name
                )));
            }

            for skill in &category.skills {
                if skill.name.trim().is_empty() {
                    return Err(Error::InvalidCatalogue(format!(
                        "skill with empty name in category '{}'",
                        category.name
                    )));
                }
                if skill.name.contains(PAIR_SEPARATOR) {
                    return Err(Error::InvalidCatalogue(format!(
                        "skill name '{}' contains reserved character '{}'",
                        skill.name, PAIR_SEPARATOR
                    )));
                }
                if !seen.insert(skill.name.to_lowercase()) {
                    return Err(Error::InvalidCatalogue(format!(
                        "duplicate skill '{}'",
                        skill.name
                    )));
                }
                for pattern in &skill.patterns {
                    let text = match pattern {
                        SkillPattern::Token(t) | SkillPattern::Regex(t) => t,
                    };
                    if text.trim().is_empty() {
                        return Err(Error::InvalidCatalogue(format!(
                            "skill '{}' has an empty pattern",
                            skill.name
                        )));
                    }
                }
            }
        }

        Ok(())
    }

    pub fn skills(&self) -> impl Iterator<Item = (&str, &SkillDefinition)> {
        self.categories
            .iter()
            .flat_map(|c| c.skills.iter().map(move |s| (c.name.as_str(), s)))
    }

    pub fn skill_names(&self) -> impl Iterator<Item = &str> {
        self.skills().map(|(_, s)| s.name.as_str())
    }

    pub fn skill_count(&self) -> usize {
        self.categories.iter().map(|c| c.skills.len()).sum()
    }

    pub fn category_of(&self, skill: &str) -> Option<&str> {
        self.skills()
            .find(|(_, s)| s.name == skill)
            .map(|(category, _)| category)
    }
}

impl Default for SkillCatalogue {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(name: &str, skills: Vec<SkillDefinition>) -> CatalogueCategory {
        CatalogueCategory {
            name: name.to_string(),
            skills,
        }
    }

    #[test]
    fn test_builtin_catalogue_is_valid() {
        let catalogue = SkillCatalogue::builtin();
        catalogue.validate().unwrap();
        assert!(catalogue.skill_count() > 40);
        assert_eq!(catalogue.category_of("Python"), Some("Programming Languages"));
        assert_eq!(catalogue.category_of("Cobol on Wheels"), None);
    }

    #[test]
    fn test_empty_catalogue_rejected() {
        let err = SkillCatalogue::new(Vec::new()).unwrap_err();
        assert!(matches!(err, Error::InvalidCatalogue(_)));
    }

    #[test]
    fn test_duplicate_skill_rejected_case_insensitively() {
        let err = SkillCatalogue::new(vec![
            category("A", vec![SkillDefinition::new("Python", &[])]),
            category("B", vec![SkillDefinition::new("python", &[])]),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("duplicate skill"));
    }

    #[test]
    fn test_separator_in_name_rejected() {
        let err = SkillCatalogue::new(vec![category(
            "A",
            vec![SkillDefinition::new("CI|CD", &[])],
        )])
        .unwrap_err();
        assert!(matches!(err, Error::InvalidCatalogue(_)));
    }

    #[test]
    fn test_from_json_str() {
        let json = r#"{
            "categories": [
                {"name": "Languages", "skills": [
                    {"name": "Python", "patterns": [{"token": "python"}, {"regex": "py(thon)?3"}]},
                    {"name": "Rust"}
                ]}
            ]
        }"#;
        let catalogue = SkillCatalogue::from_json_str(json).unwrap();
        assert_eq!(catalogue.skill_count(), 2);
        let (_, rust) = catalogue.skills().nth(1).unwrap();
        assert_eq!(
            rust.effective_patterns(),
            vec![SkillPattern::Token("Rust".to_string())]
        );
    }

    #[test]
    fn test_malformed_json_is_invalid_catalogue() {
        let err = SkillCatalogue::from_json_str("{\"categories\": 3}").unwrap_err();
        assert!(matches!(err, Error::InvalidCatalogue(_)));
    }

    #[test]
    fn test_missing_file_is_invalid_catalogue() {
        let err = SkillCatalogue::from_json_file("/nonexistent/catalogue.json").unwrap_err();
        assert!(matches!(err, Error::InvalidCatalogue(_)));
    }
}
