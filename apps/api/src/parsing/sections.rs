//! Section segmentation: raw résumé text → `SectionMap`.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// Heading phrases recognized regardless of casing.
pub const KNOWN_HEADINGS: &[&str] = &[
    "education",
    "experience",
    "work experience",
    "skills",
    "projects",
    "personal information",
    "contact",
    "achievements",
    "certifications",
    "summary",
    "objective",
];

static ALL_CAPS_HEADING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z][A-Z \-/&]{2,}$").expect("valid heading regex"));

const SUMMARY: &str = "summary";
const PERSONAL_INFORMATION: &str = "personal information";

/// The fixed set of sections every résumé is mapped onto.
///
/// Field order is the serialized key order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SectionMap {
    pub summary: String,
    pub education: String,
    pub experience: String,
    pub skills: String,
    pub projects: String,
    pub personal_info: String,
    pub certifications: String,
}

impl SectionMap {
    /// Number of canonical sections with content.
    pub fn populated(&self) -> usize {
        [
            &self.summary,
            &self.education,
            &self.experience,
            &self.skills,
            &self.projects,
            &self.personal_info,
            &self.certifications,
        ]
        .iter()
        .filter(|s| !s.is_empty())
        .count()
    }
}

/// Decides whether a line opens a new section.
///
/// Returns the normalized bucket key for headings and `None` for content lines.
pub trait HeadingDetector: Send + Sync {
    fn detect(&self, line: &str) -> Option<String>;
}

/// Known phrase list plus the all-caps structural rule.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordHeadings;

impl HeadingDetector for KeywordHeadings {
    fn detect(&self, line: &str) -> Option<String> {
        is_heading_line(line).then(|| normalize_heading(line.to_lowercase()))
    }
}

/// A known heading phrase in any casing, or a short all-caps line.
pub(crate) fn is_heading_line(line: &str) -> bool {
    KNOWN_HEADINGS.contains(&line.to_lowercase().as_str()) || ALL_CAPS_HEADING_RE.is_match(line)
}

/// Non-blank trimmed lines. Breaks on `\r`, vertical tab, form feed, the
/// file/group/record separators, NEL and the Unicode line and paragraph
/// separators as well as `\n`.
pub(crate) fn content_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split(is_line_break)
        .map(str::trim)
        .filter(|l| !l.is_empty())
}

fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\u{0b}' | '\u{0c}' | '\u{1c}' | '\u{1d}' | '\u{1e}' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

fn normalize_heading(lower: String) -> String {
    if lower.contains("work") && lower.contains("experience") {
        "experience".to_string()
    } else if lower.contains("personal") || lower.contains("contact") {
        PERSONAL_INFORMATION.to_string()
    } else {
        lower
    }
}

/// Splits text into sections. Content before the first heading is summary.
pub fn split_sections(text: &str, headings: &dyn HeadingDetector) -> SectionMap {
    let mut buckets: HashMap<String, Vec<&str>> = HashMap::new();
    let mut current = SUMMARY.to_string();

    for line in content_lines(text) {
        match headings.detect(line) {
            Some(key) => {
                buckets.entry(key.clone()).or_default();
                current = key;
            }
            None => buckets.entry(current.clone()).or_default().push(line),
        }
    }

    let mut take = |key: &str| {
        buckets
            .remove(key)
            .map(|lines| lines.join("\n").trim().to_string())
            .unwrap_or_default()
    };

    SectionMap {
        summary: take(SUMMARY),
        education: take("education"),
        experience: take("experience"),
        skills: take("skills"),
        projects: take("projects"),
        personal_info: take(PERSONAL_INFORMATION),
        certifications: take("certifications"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(text: &str) -> SectionMap {
        split_sections(text, &KeywordHeadings)
    }

    #[test]
    fn test_no_headings_goes_to_summary() {
        let text = "Jane Doe\nBuilt things for ten years.\nLikes coffee.";
        let sections = split(text);
        assert_eq!(
            sections.summary,
            "Jane Doe\nBuilt things for ten years.\nLikes coffee."
        );
        assert_eq!(
            sections,
            SectionMap {
                summary: sections.summary.clone(),
                ..SectionMap::default()
            }
        );
        assert_eq!(sections.populated(), 1);
    }

    #[test]
    fn test_all_caps_headings_split_blocks() {
        let text = "EXPERIENCE\nAcme Corp, engineer\nShipped a billing system\nEDUCATION\nBSc Computer Science";
        let sections = split(text);
        assert_eq!(
            sections.experience,
            "Acme Corp, engineer\nShipped a billing system"
        );
        assert_eq!(sections.education, "BSc Computer Science");
        assert!(sections.summary.is_empty());
    }

    #[test]
    fn test_known_headings_are_case_insensitive() {
        let text = "Intro line\nSkills\npython, sql\nProjects\nA compiler";
        let sections = split(text);
        assert_eq!(sections.summary, "Intro line");
        assert_eq!(sections.skills, "python, sql");
        assert_eq!(sections.projects, "A compiler");
    }

    #[test]
    fn test_work_experience_maps_to_experience() {
        let sections = split("Work Experience\nAcme\nPROFESSIONAL WORK EXPERIENCE\nGlobex");
        assert_eq!(sections.experience, "Acme\nGlobex");
    }

    #[test]
    fn test_contact_maps_to_personal_info() {
        let sections = split("CONTACT DETAILS\njane@example.com\nPersonal Information\nBorn 1990");
        assert_eq!(sections.personal_info, "jane@example.com\nBorn 1990");
    }

    #[test]
    fn test_unrecognized_bucket_is_dropped() {
        let text = "Summary line\nHOBBIES\nChess\nSKILLS\nrust";
        let sections = split(text);
        assert_eq!(sections.summary, "Summary line");
        assert_eq!(sections.skills, "rust");
        assert!(!sections.summary.contains("Chess"));
        assert!(!sections.skills.contains("Chess"));
    }

    #[test]
    fn test_blank_lines_and_indentation_ignored() {
        let sections = split("\n\n   SKILLS   \n\n   python   \n\n");
        assert_eq!(sections.skills, "python");
    }

    #[test]
    fn test_heading_detection_rules() {
        let detector = KeywordHeadings;
        assert_eq!(detector.detect("OBJECTIVE").as_deref(), Some("objective"));
        assert_eq!(detector.detect("R&D / TOOLS").as_deref(), Some("r&d / tools"));
        assert_eq!(detector.detect("Education").as_deref(), Some("education"));
        assert!(detector.detect("AB").is_none());
        assert!(detector.detect("Experience at Acme").is_none());
        assert!(detector.detect("C++ DEVELOPER").is_none());
        assert!(detector.detect("Contact: jane@example.com").is_none());
    }

    #[test]
    fn test_carriage_return_only_breaks() {
        let sections = split("Intro\rSKILLS\rpython");
        assert_eq!(sections.summary, "Intro");
        assert_eq!(sections.skills, "python");
    }

    #[test]
    fn test_form_feed_and_unicode_separators_break_lines() {
        let sections = split("Intro\x0cEDUCATION\u{2028}MIT\r\nSKILLS\u{85}rust");
        assert_eq!(sections.summary, "Intro");
        assert_eq!(sections.education, "MIT");
        assert_eq!(sections.skills, "rust");
    }

    #[test]
    fn test_crlf_is_a_single_break() {
        let lines: Vec<&str> = content_lines("a\r\nb\r\n\r\nc").collect();
        assert_eq!(lines, vec!["a", "b", "c"]);
    }

    struct ColonHeadings;

    impl HeadingDetector for ColonHeadings {
        fn detect(&self, line: &str) -> Option<String> {
            line.strip_suffix(':').map(|h| h.trim().to_lowercase())
        }
    }

    #[test]
    fn test_custom_detector_is_used() {
        let text = "Skills:\nrust\nEDUCATION\nMIT";
        let sections = split_sections(text, &ColonHeadings);
        assert_eq!(sections.skills, "rust\nEDUCATION\nMIT");
        assert!(sections.education.is_empty());
    }
}
