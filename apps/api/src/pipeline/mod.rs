//! Prediction pipeline: decoded résumé text → sections, personal info, skills,
//! and ranked role matches.
//!
//! Stages run in order on one thread and each returns a new value. A stage that
//! finds nothing yields an empty result; only empty input is an error.

pub mod handlers;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::catalog::Catalog;
use crate::decode::RawDocument;
use crate::matching::{suggest_roles, MatchTuning, RoleMatch};
use crate::parsing::entities::{extract_personal_info, PersonFinder, PersonalInfo};
use crate::parsing::sections::{split_sections, HeadingDetector, SectionMap};
use crate::parsing::skills::{extract_skills, ExtractedSkills};

/// Tag identifying matches produced by the local rule-based matcher.
pub const LOCAL_MATCHER_SOURCE: &str = "local-matcher";

#[derive(Debug, Error, PartialEq)]
pub enum PipelineError {
    #[error("Could not extract text from resume")]
    EmptyText,
}

/// Size limits applied around the core stages.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineLimits {
    /// Characters of raw text echoed back in the response.
    pub preview_chars: usize,
    /// Input beyond this many characters is ignored.
    pub max_text_chars: usize,
}

impl Default for PipelineLimits {
    fn default() -> Self {
        Self {
            preview_chars: 1200,
            max_text_chars: 200_000,
        }
    }
}

/// A ranked role as returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobMatch {
    pub title: String,
    pub score: f64,
    pub description: String,
    pub source: String,
}

impl From<RoleMatch> for JobMatch {
    fn from(m: RoleMatch) -> Self {
        JobMatch {
            title: m.title,
            score: m.score,
            description: m.description,
            source: LOCAL_MATCHER_SOURCE.to_string(),
        }
    }
}

/// Full structured result for one résumé.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub extracted_text_preview: String,
    pub sections: SectionMap,
    pub personal_info: PersonalInfo,
    pub skills: ExtractedSkills,
    pub matches: Vec<JobMatch>,
}

/// Read-only matching configuration, built once at startup and shared by all
/// requests.
pub struct Pipeline {
    catalog: Catalog,
    tuning: MatchTuning,
    limits: PipelineLimits,
    headings: Box<dyn HeadingDetector>,
    people: Box<dyn PersonFinder>,
}

impl Pipeline {
    pub fn new(
        catalog: Catalog,
        tuning: MatchTuning,
        limits: PipelineLimits,
        headings: Box<dyn HeadingDetector>,
        people: Box<dyn PersonFinder>,
    ) -> Self {
        Self {
            catalog,
            tuning,
            limits,
            headings,
            people,
        }
    }

    /// Runs every stage over one decoded document.
    pub fn run(&self, document: &RawDocument) -> Result<Prediction, PipelineError> {
        if document.text.trim().is_empty() {
            return Err(PipelineError::EmptyText);
        }
        debug!(
            filename = %document.filename,
            chars = document.text.chars().count(),
            "running pipeline"
        );
        let text = self.capped(&document.text);

        let sections = split_sections(text, self.headings.as_ref());
        debug!(populated = sections.populated(), "sections segmented");

        let personal_info = extract_personal_info(text, self.people.as_ref());
        debug!(
            name = personal_info.name.is_some(),
            email = personal_info.email.is_some(),
            phone = personal_info.phone.is_some(),
            "personal info extracted"
        );

        let skills = extract_skills(
            text,
            &sections,
            &self.catalog.skills,
            self.tuning.fuzzy_threshold,
        );
        debug!(
            skills = skills.all.len(),
            categories = skills.by_category.populated(),
            "skills extracted"
        );

        let matches: Vec<JobMatch> = suggest_roles(&skills.all, &self.catalog.roles, &self.tuning)
            .into_iter()
            .map(JobMatch::from)
            .collect();
        debug!(matches = matches.len(), "roles ranked");

        Ok(Prediction {
            extracted_text_preview: prefix_chars(text, self.limits.preview_chars).to_string(),
            sections,
            personal_info,
            skills,
            matches,
        })
    }

    fn capped<'a>(&self, text: &'a str) -> &'a str {
        let capped = prefix_chars(text, self.limits.max_text_chars);
        if capped.len() < text.len() {
            warn!(
                limit = self.limits.max_text_chars,
                "document text truncated before parsing"
            );
        }
        capped
    }
}

/// The first `n` characters of `text`.
fn prefix_chars(text: &str, n: usize) -> &str {
    match text.char_indices().nth(n) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
