use regex::{Regex, RegexBuilder};
use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::models::posting::JobPosting;
use crate::models::skill::SkillSet;
use crate::taxonomy::{SkillCatalogue, SkillPattern};

// Characters that continue a token. `+` and `#` keep "C" from matching inside "C++" or "C#".
// A `.` only opens a token after a boundary, so "js" never matches inside "Node.js" while ".NET" still does.
const TOKEN_START: &str = r"(?:^|[^\w+#.])\.*";
const TOKEN_END: &str = r"(?:$|[^\w+#])";

struct CompiledSkill {
    name: String,
    regex: Regex,
}

/// Finds catalogue skills in free text using case-insensitive whole-token matching.
pub struct SkillMatcher {
    catalogue: SkillCatalogue,
    skills: Vec<CompiledSkill>,
    aliases: HashMap<String, String>,
}

impl SkillMatcher {
    pub fn new(catalogue: SkillCatalogue) -> Result<Self> {
        catalogue.validate()?;

        let mut skills = Vec::with_capacity(catalogue.skill_count());
        let mut aliases = HashMap::new();

        for (_, definition) in catalogue.skills() {
            let patterns = definition.effective_patterns();
            let alternatives: Vec<String> = patterns.iter().map(pattern_source).collect();
            let source = format!("{}(?:{}){}", TOKEN_START, alternatives.join("|"), TOKEN_END);

            let regex = RegexBuilder::new(&source)
                .case_insensitive(true)
                .build()
                .map_err(|e| {
                    Error::InvalidCatalogue(format!(
                        "pattern for skill '{}' does not compile: {}",
                        definition.name, e
                    ))
                })?;

            aliases
                .entry(normalize_alias(&definition.name))
                .or_insert_with(|| definition.name.clone());
            for pattern in &patterns {
                if let SkillPattern::Token(token) = pattern {
                    aliases
                        .entry(normalize_alias(token))
                        .or_insert_with(|| definition.name.clone());
                }
            }

            skills.push(CompiledSkill {
                name: definition.name.clone(),
                regex,
            });
        }

        tracing::debug!("Compiled {} skill matchers", skills.len());

        Ok(Self {
            catalogue,
            skills,
            aliases,
        })
    }

    pub fn catalogue(&self) -> &SkillCatalogue {
        &self.catalogue
    }

    pub fn match_description(&self, description: &str) -> SkillSet {
        if description.trim().is_empty() {
            return SkillSet::default();
        }

        self.skills
            .iter()
            .filter(|skill| skill.regex.is_match(description))
            .map(|skill| skill.name.as_str())
            .collect()
    }

    /// Description matches unioned with the posting's own skill list.
    pub fn match_posting(&self, posting: &JobPosting) -> SkillSet {
        let matched = self.match_description(&posting.description);

        match &posting.skills {
            Some(assigned) if !assigned.is_empty() => {
                let resolved = self.resolve_assigned(&posting.id, assigned);
                matched.union(&resolved)
            }
            _ => matched,
        }
    }

    /// Canonical catalogue name for a skill name or token alias.
    pub fn resolve(&self, name: &str) -> Option<&str> {
        self.aliases.get(&normalize_alias(name)).map(String::as_str)
    }

    fn resolve_assigned(&self, posting_id: &str, assigned: &[String]) -> SkillSet {
        let mut names = Vec::new();

        for tag in assigned {
            if let Some(name) = self.resolve(tag) {
                names.push(name.to_string());
                continue;
            }

            let found = self.match_description(tag);
            if found.is_empty() {
                tracing::debug!(
                    "Posting {}: dropping skill '{}' not in catalogue",
                    posting_id,
                    tag
                );
            }
            names.extend(found.iter().map(str::to_string));
        }

        names.into_iter().collect()
    }
}

fn pattern_source(pattern: &SkillPattern) -> String {
    match pattern {
        SkillPattern::Token(token) => token
            .split_whitespace()
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join(r"\s+"),
        SkillPattern::Regex(source) => format!("(?:{})", source),
    }
}

fn normalize_alias(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
