//! Role Matching: rule-based scoring of extracted skills against role templates.
//!
//! A role qualifies only when every must-have skill is present. Qualifying roles
//! score `must_weight * must_coverage + nice_weight * nice_coverage`, capped at
//! 1.0, and the best `top_k` are returned, highest first.

use std::collections::HashSet;

use crate::catalog::RoleTemplate;

/// Tunable constants for skill detection and role scoring.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchTuning {
    /// Minimum token-set score (0–100) for a fuzzy skill hit.
    pub fuzzy_threshold: f64,
    pub must_have_weight: f64,
    pub nice_to_have_weight: f64,
    pub top_k: usize,
}

impl Default for MatchTuning {
    fn default() -> Self {
        Self {
            fuzzy_threshold: 90.0,
            must_have_weight: 0.6,
            nice_to_have_weight: 0.4,
            top_k: 8,
        }
    }
}

impl MatchTuning {
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=100.0).contains(&self.fuzzy_threshold) {
            return Err(format!(
                "fuzzy threshold must be within 0..=100, got {}",
                self.fuzzy_threshold
            ));
        }
        for (name, weight) in [
            ("must-have", self.must_have_weight),
            ("nice-to-have", self.nice_to_have_weight),
        ] {
            if !weight.is_finite() || weight < 0.0 {
                return Err(format!(
                    "{name} weight must be a non-negative number, got {weight}"
                ));
            }
        }
        if self.top_k == 0 {
            return Err("top_k must be at least 1".to_string());
        }
        Ok(())
    }
}

/// A qualifying role for the résumé.
#[derive(Debug, Clone, PartialEq)]
pub struct RoleMatch {
    pub title: String,
    /// 0.0 – 1.0, rounded to three decimals.
    pub score: f64,
    pub description: String,
}

/// Scores one template. Zero when any must-have skill is missing.
pub fn score_role(skills: &HashSet<&str>, role: &RoleTemplate, tuning: &MatchTuning) -> f64 {
    let must_hits = count_hits(skills, &role.must_have);
    if must_hits < role.must_have.len() {
        return 0.0;
    }

    let must_coverage = if role.must_have.is_empty() {
        0.0
    } else {
        must_hits as f64 / role.must_have.len() as f64
    };
    let nice_coverage =
        count_hits(skills, &role.nice_to_have) as f64 / role.nice_to_have.len().max(1) as f64;

    (tuning.must_have_weight * must_coverage + tuning.nice_to_have_weight * nice_coverage).min(1.0)
}

/// Ranks every qualifying template, best first, truncated to `tuning.top_k`.
///
/// Equal scores keep template declaration order.
pub fn suggest_roles(
    skills_all: &[String],
    roles: &[RoleTemplate],
    tuning: &MatchTuning,
) -> Vec<RoleMatch> {
    let skills: HashSet<&str> = skills_all.iter().map(String::as_str).collect();

    let mut matches: Vec<RoleMatch> = roles
        .iter()
        .filter_map(|role| {
            let score = score_role(&skills, role, tuning);
            (score > 0.0).then(|| RoleMatch {
                title: role.title.clone(),
                score: round3(score),
                description: describe(role),
            })
        })
        .collect();

    matches.sort_by(|a, b| b.score.total_cmp(&a.score));
    matches.truncate(tuning.top_k);
    matches
}

fn count_hits(skills: &HashSet<&str>, wanted: &[String]) -> usize {
    wanted
        .iter()
        .filter(|s| skills.contains(s.as_str()))
        .count()
}

fn describe(role: &RoleTemplate) -> String {
    format!(
        "Match based on skills: must [{}], plus [{}]",
        role.must_have.join(", "),
        role.nice_to_have.join(", ")
    )
}

fn round3(score: f64) -> f64 {
    (score * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn role(title: &str, must: &[&str], nice: &[&str]) -> RoleTemplate {
        RoleTemplate {
            title: title.to_string(),
            must_have: must.iter().map(|s| s.to_string()).collect(),
            nice_to_have: nice.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn skills(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn data_analyst() -> RoleTemplate {
        role(
            "Data Analyst",
            &["python", "pandas", "numpy", "sql"],
            &["scikit-learn", "excel", "tableau"],
        )
    }

    #[test]
    fn test_missing_must_have_excludes_role() {
        let result = suggest_roles(
            &skills(&["python", "pandas"]),
            &[data_analyst()],
            &MatchTuning::default(),
        );
        assert!(result.is_empty());
    }

    #[test]
    fn test_missing_must_have_scores_zero_even_with_all_nice() {
        let set: HashSet<&str> = ["python", "pandas", "numpy", "scikit-learn", "excel", "tableau"]
            .into_iter()
            .collect();
        assert_eq!(score_role(&set, &data_analyst(), &MatchTuning::default()), 0.0);
    }

    #[test]
    fn test_must_have_only_scores_must_weight() {
        let result = suggest_roles(
            &skills(&["numpy", "pandas", "python", "sql"]),
            &[data_analyst()],
            &MatchTuning::default(),
        );
        assert_eq!(result.len(), 1);
        assert!((result[0].score - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_full_coverage_scores_one() {
        let result = suggest_roles(
            &skills(&[
                "python",
                "pandas",
                "numpy",
                "sql",
                "scikit-learn",
                "excel",
                "tableau",
            ]),
            &[data_analyst()],
            &MatchTuning::default(),
        );
        assert_eq!(result[0].score, 1.0);
    }

    #[test]
    fn test_partial_nice_to_have_rounded() {
        let result = suggest_roles(
            &skills(&["python", "pandas", "numpy", "sql", "excel"]),
            &[data_analyst()],
            &MatchTuning::default(),
        );
        // 0.6 + 0.4 / 3
        assert_eq!(result[0].score, 0.733);
    }

    #[test]
    fn test_no_nice_to_have_does_not_divide_by_zero() {
        let result = suggest_roles(
            &skills(&["rust"]),
            &[role("Rustacean", &["rust"], &[])],
            &MatchTuning::default(),
        );
        assert_eq!(result[0].score, 0.6);
    }

    #[test]
    fn test_score_capped_at_one() {
        let tuning = MatchTuning {
            must_have_weight: 0.9,
            nice_to_have_weight: 0.9,
            ..MatchTuning::default()
        };
        let set: HashSet<&str> = ["rust", "go"].into_iter().collect();
        assert_eq!(score_role(&set, &role("X", &["rust"], &["go"]), &tuning), 1.0);
    }

    #[test]
    fn test_sorted_desc_and_ties_keep_declaration_order() {
        let roles = vec![
            role("First", &["a"], &["x", "y"]),
            role("Second", &["a"], &["x"]),
            role("Third", &["a"], &["z", "w"]),
        ];
        let result = suggest_roles(&skills(&["a", "x"]), &roles, &MatchTuning::default());
        let titles: Vec<&str> = result.iter().map(|m| m.title.as_str()).collect();
        // Second: 0.6 + 0.4 = 1.0; First: 0.6 + 0.2 = 0.8; Third: 0.6
        assert_eq!(titles, vec!["Second", "First", "Third"]);

        let tied = vec![role("A", &["a"], &[]), role("B", &["a"], &[])];
        let result = suggest_roles(&skills(&["a"]), &tied, &MatchTuning::default());
        assert_eq!(result[0].title, "A");
        assert_eq!(result[1].title, "B");
    }

    #[test]
    fn test_truncated_to_top_k() {
        let roles: Vec<RoleTemplate> = (0..12)
            .map(|i| role(&format!("Role {i}"), &["a"], &[]))
            .collect();
        let result = suggest_roles(&skills(&["a"]), &roles, &MatchTuning::default());
        assert_eq!(result.len(), 8);
        assert_eq!(result[7].title, "Role 7");
    }

    #[test]
    fn test_description_names_both_sets() {
        let result = suggest_roles(
            &skills(&["python", "pandas", "numpy", "sql"]),
            &[data_analyst()],
            &MatchTuning::default(),
        );
        assert_eq!(
            result[0].description,
            "Match based on skills: must [python, pandas, numpy, sql], plus [scikit-learn, excel, tableau]"
        );
    }

    #[test]
    fn test_tuning_validation() {
        assert!(MatchTuning::default().validate().is_ok());
        let bad_threshold = MatchTuning {
            fuzzy_threshold: 120.0,
            ..MatchTuning::default()
        };
        assert!(bad_threshold.validate().is_err());
        let bad_weight = MatchTuning {
            nice_to_have_weight: -0.1,
            ..MatchTuning::default()
        };
        assert!(bad_weight.validate().is_err());
        let bad_k = MatchTuning {
            top_k: 0,
            ..MatchTuning::default()
        };
        assert!(bad_k.validate().is_err());
    }
}
