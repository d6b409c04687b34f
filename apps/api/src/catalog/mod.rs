//! Skill catalog and role template table.
//!
//! Both are loaded once at startup, validated, and then shared read-only by
//! every request. A malformed catalog is a startup error: nothing downstream can
//! produce meaningful results without it.

pub mod builtin;
pub mod schema;

use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};

use thiserror::Error;

use schema::{CatalogDef, RoleTemplateDef};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to load catalog from {path}: {reason}")]
    Load { path: PathBuf, reason: String },

    #[error("invalid catalog: {0}")]
    Invalid(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A named group of canonical skills, in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct SkillCategory {
    pub name: String,
    pub skills: Vec<String>,
}

/// Categorized skill vocabulary plus the flattened, sorted set used for matching.
#[derive(Debug, Clone)]
pub struct SkillCatalog {
    categories: Vec<SkillCategory>,
    all: Vec<String>,
}

impl SkillCatalog {
    /// Builds a catalog from already-validated categories.
    pub fn new(categories: Vec<SkillCategory>) -> Self {
        let all: BTreeSet<String> = categories
            .iter()
            .flat_map(|c| c.skills.iter().cloned())
            .collect();
        Self {
            categories,
            all: all.into_iter().collect(),
        }
    }

    pub fn categories(&self) -> &[SkillCategory] {
        &self.categories
    }

    /// Every canonical skill, deduplicated and sorted.
    pub fn all_skills(&self) -> &[String] {
        &self.all
    }
}

/// A role and the skills that qualify a résumé for it.
#[derive(Debug, Clone, PartialEq)]
pub struct RoleTemplate {
    pub title: String,
    pub must_have: Vec<String>,
    pub nice_to_have: Vec<String>,
}

/// Everything the matcher needs that is fixed for the lifetime of the process.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub skills: SkillCatalog,
    pub roles: Vec<RoleTemplate>,
}

/// Load a catalog from a JSON file.
pub fn load_catalog(path: &Path) -> Result<Catalog, CatalogError> {
    let content = std::fs::read_to_string(path).map_err(|e| CatalogError::Load {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let def: CatalogDef = serde_json::from_str(&content).map_err(|e| CatalogError::Load {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    build_catalog(def)
}

/// Parse a catalog from a JSON string (no file path context).
pub fn parse_catalog_str(json: &str) -> Result<Catalog, CatalogError> {
    let def: CatalogDef = serde_json::from_str(json)?;
    build_catalog(def)
}

fn build_catalog(def: CatalogDef) -> Result<Catalog, CatalogError> {
    validate_catalog(&def)?;

    let skills = SkillCatalog::new(
        def.categories
            .into_iter()
            .map(|c| SkillCategory {
                name: c.name,
                skills: c.skills,
            })
            .collect(),
    );
    let roles = def
        .roles
        .into_iter()
        .map(|r| RoleTemplate {
            title: r.title,
            must_have: r.must_have,
            nice_to_have: r.nice_to_have,
        })
        .collect();

    Ok(Catalog { skills, roles })
}

/// Validate that a catalog definition is well-formed.
pub fn validate_catalog(def: &CatalogDef) -> Result<(), CatalogError> {
    if def.categories.is_empty() {
        return Err(CatalogError::Invalid(
            "categories must not be empty".into(),
        ));
    }

    let mut category_names = HashSet::new();
    let mut seen_skills: HashSet<&str> = HashSet::new();

    for category in &def.categories {
        if category.name.trim().is_empty() {
            return Err(CatalogError::Invalid(
                "category name must not be empty".into(),
            ));
        }
        if !category_names.insert(category.name.as_str()) {
            return Err(CatalogError::Invalid(format!(
                "category '{}' is declared twice",
                category.name
            )));
        }
        if category.skills.is_empty() {
            return Err(CatalogError::Invalid(format!(
                "category '{}' has no skills",
                category.name
            )));
        }

        for skill in &category.skills {
            check_canonical(skill, &category.name)?;
            if !seen_skills.insert(skill.as_str()) {
                return Err(CatalogError::Invalid(format!(
                    "skill '{}' appears more than once (last seen in '{}')",
                    skill, category.name
                )));
            }
        }
    }

    let mut titles = HashSet::new();
    for role in &def.roles {
        validate_role(role, &seen_skills)?;
        if !titles.insert(role.title.as_str()) {
            return Err(CatalogError::Invalid(format!(
                "role '{}' is declared twice",
                role.title
            )));
        }
    }

    Ok(())
}

fn validate_role(role: &RoleTemplateDef, known: &HashSet<&str>) -> Result<(), CatalogError> {
    if role.title.trim().is_empty() {
        return Err(CatalogError::Invalid("role title must not be empty".into()));
    }
    if role.must_have.is_empty() {
        return Err(CatalogError::Invalid(format!(
            "role '{}' has no must-have skills",
            role.title
        )));
    }

    let mut seen = HashSet::new();
    for skill in role.must_have.iter().chain(&role.nice_to_have) {
        if !known.contains(skill.as_str()) {
            return Err(CatalogError::Invalid(format!(
                "role '{}' references unknown skill '{}'",
                role.title, skill
            )));
        }
        if !seen.insert(skill.as_str()) {
            return Err(CatalogError::Invalid(format!(
                "role '{}' lists skill '{}' more than once",
                role.title, skill
            )));
        }
    }

    Ok(())
}

fn check_canonical(skill: &str, category: &str) -> Result<(), CatalogError> {
    if skill.trim().is_empty() {
        return Err(CatalogError::Invalid(format!(
            "category '{category}' contains an empty skill"
        )));
    }
    if skill != skill.trim() || skill != skill.to_lowercase() {
        return Err(CatalogError::Invalid(format!(
            "skill '{skill}' in '{category}' must be lowercase without surrounding whitespace"
        )));
    }
    Ok(())
}
