//! Skill extraction: whole-token catalog search over the full text, plus fuzzy
//! matching restricted to the skills section.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Serialize, Serializer};

use crate::catalog::SkillCatalog;
use crate::parsing::fuzzy::best_match;
use crate::parsing::sections::SectionMap;

/// Word-like chunks of a skills list: `c++`, `node.js`, `c#`, `scikit-learn`.
static SKILL_TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[a-z+.#]{2,}[\w+.#-]*").expect("valid skill token regex"));

/// Skills found in a résumé, flat and grouped by catalog category.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExtractedSkills {
    pub by_category: CategoryHits,
    /// Every skill found, sorted.
    pub all: Vec<String>,
}

/// Hits per category, in catalog declaration order. Only categories with at
/// least one hit are present; skills keep catalog order. Serializes as a map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryHits(Vec<(String, Vec<String>)>);

impl CategoryHits {
    /// Number of categories with at least one hit.
    pub fn populated(&self) -> usize {
        self.0.len()
    }
}

#[cfg(test)]
impl CategoryHits {
    pub fn get(&self, category: &str) -> Option<&[String]> {
        self.0
            .iter()
            .find(|(name, _)| name == category)
            .map(|(_, skills)| skills.as_slice())
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(name, _)| name.as_str())
    }
}

impl Serialize for CategoryHits {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(name, skills)| (name, skills)))
    }
}

/// Runs both detection passes and groups the union by category.
pub fn extract_skills(
    text: &str,
    sections: &SectionMap,
    catalog: &SkillCatalog,
    fuzzy_threshold: f64,
) -> ExtractedSkills {
    let mut found = exact_matches(text, catalog);
    let fuzzy = fuzzy_matches(&sections.skills, catalog, fuzzy_threshold);
    tracing::debug!(
        exact = found.len(),
        fuzzy = fuzzy.len(),
        "skill detection passes complete"
    );
    found.extend(fuzzy);
    group_by_category(found, catalog)
}

/// Catalog skills appearing as whole tokens anywhere in `text`, case-insensitively.
pub fn exact_matches<'a>(text: &str, catalog: &'a SkillCatalog) -> BTreeSet<&'a str> {
    let lower = text.to_lowercase();
    catalog
        .all_skills()
        .iter()
        .map(String::as_str)
        .filter(|skill| contains_whole_token(&lower, skill))
        .collect()
}

/// Catalog skills approximately matching a token of the skills section.
pub fn fuzzy_matches<'a>(
    skills_section: &str,
    catalog: &'a SkillCatalog,
    threshold: f64,
) -> BTreeSet<&'a str> {
    let lower = skills_section.to_lowercase();
    let mut found = BTreeSet::new();
    for token in SKILL_TOKEN_RE.find_iter(&lower).map(|m| m.as_str()) {
        if let Some((skill, score)) = best_match(token, catalog.all_skills()) {
            if score >= threshold {
                tracing::trace!(token, skill, score, "fuzzy skill hit");
                found.insert(skill);
            }
        }
    }
    found
}

fn group_by_category(found: BTreeSet<&str>, catalog: &SkillCatalog) -> ExtractedSkills {
    let by_category = catalog
        .categories()
        .iter()
        .filter_map(|category| {
            let hits: Vec<String> = category
                .skills
                .iter()
                .filter(|s| found.contains(s.as_str()))
                .cloned()
                .collect();
            (!hits.is_empty()).then(|| (category.name.clone(), hits))
        })
        .collect();

    ExtractedSkills {
        by_category: CategoryHits(by_category),
        all: found.into_iter().map(String::from).collect(),
    }
}

/// True when `needle` occurs in `haystack` without a word character on either side.
fn contains_whole_token(haystack: &str, needle: &str) -> bool {
    haystack.match_indices(needle).any(|(start, _)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + needle.len()..].chars().next();
        !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
    })
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
