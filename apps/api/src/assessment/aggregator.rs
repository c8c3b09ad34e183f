//! Score Aggregator: Reduces normalized judgments into per-category scores
//! and a single weighted match score.
//!
//! Algorithm:
//! 1. Resolve each judgment to its catalog field (unresolvable ones are skipped)
//! 2. Boolean: possible += field weight; earned += field weight when true
//! 3. Skill:   possible += 1;            earned += 1 when any match signal is set
//! 4. category score = round(100 × earned / possible), 0 when possible = 0
//! 5. overall = round(100 × Σ score/100 × category weight), empty categories count as 0

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::assessment::catalog::{Category, FieldCatalog};
use crate::assessment::judgment::FieldJudgment;

/// Fixed policy weights for the overall match score. Sum to 1.0.
pub const CATEGORY_WEIGHTS: [(Category, f64); 4] = [
    (Category::HardSkills, 0.40),
    (Category::SoftSkills, 0.30),
    (Category::Searchability, 0.15),
    (Category::BestPractices, 0.15),
];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryScore {
    pub score: u32, // 0 – 100
    pub total_points_earned: f64,
    pub total_points_possible: f64,
}

impl CategoryScore {
    pub fn from_points(earned: f64, possible: f64) -> Self {
        Self {
            score: percentage(earned, possible),
            total_points_earned: earned,
            total_points_possible: possible,
        }
    }
}

/// Category scores plus the overall weighted match score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Aggregation {
    pub categories: BTreeMap<Category, CategoryScore>,
    pub overall: u32,
}

/// `round(100 × earned / possible)` clamped to 0–100; 0 when nothing was possible.
pub fn percentage(earned: f64, possible: f64) -> u32 {
    if possible > 0.0 {
        ((earned / possible) * 100.0).round().clamp(0.0, 100.0) as u32
    } else {
        0
    }
}

/// Aggregates judgments into scores. Never fails: every category is present in
/// the result, with score 0 when it received no usable judgments.
pub fn aggregate(judgments: &[FieldJudgment], catalog: &FieldCatalog) -> Aggregation {
    let mut points: BTreeMap<Category, (f64, f64)> =
        Category::ALL.iter().map(|&c| (c, (0.0, 0.0))).collect();

    let mut seen = HashSet::new();

    for judgment in judgments {
        let field = match judgment.resolve(catalog) {
            Ok(field) => field,
            Err(reason) => {
                warn!("Skipping judgment '{}' in aggregation: {reason}", judgment.id());
                continue;
            }
        };
        // First judgment per field (or per skill) counts; repeats would inflate the weight.
        if !seen.insert(judgment.instance_key()) {
            warn!("Skipping duplicate judgment '{}' for field '{}'", judgment.id(), field.id);
            continue;
        }

        let (earned, possible) = points.entry(field.category).or_insert((0.0, 0.0));
        match judgment {
            FieldJudgment::Boolean(j) => {
                let weight = field.weight();
                *possible += weight;
                if j.value {
                    *earned += weight;
                }
            }
            FieldJudgment::Skill(j) => {
                // Skills count uniformly; the field weight is not applied per instance.
                *possible += 1.0;
                if j.is_matched() {
                    *earned += 1.0;
                }
            }
        }
    }

    let categories: BTreeMap<Category, CategoryScore> = points
        .into_iter()
        .map(|(c, (earned, possible))| (c, CategoryScore::from_points(earned, possible)))
        .collect();
    let overall = overall_score(&categories);

    Aggregation {
        categories,
        overall,
    }
}

/// Weighted combination of category scores. Missing categories contribute 0.
pub fn overall_score(categories: &BTreeMap<Category, CategoryScore>) -> u32 {
    let weighted: f64 = CATEGORY_WEIGHTS
        .iter()
        .map(|(category, weight)| {
            let score = categories.get(category).map(|s| s.score).unwrap_or(0);
            (score as f64 / 100.0) * weight
        })
        .sum();

    (weighted * 100.0).round().clamp(0.0, 100.0) as u32
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::catalog::FieldDefinition;
    use crate::assessment::judgment::{BooleanJudgment, SkillJudgment};

    fn boolean(id: &str, value: bool) -> FieldJudgment {
        FieldJudgment::Boolean(BooleanJudgment {
            id: id.to_string(),
            confidence: 0.9,
            explanation: String::new(),
            value,
        })
    }

    fn skill(parent: &str, label: &str, exact: bool, synonym: bool, related: bool) -> FieldJudgment {
        FieldJudgment::Skill(SkillJudgment {
            id: format!("{parent}-{label}"),
            parent_field_id: parent.to_string(),
            label: label.to_string(),
            synonyms: vec![],
            related_terms: vec![],
            exact_match: exact,
            synonym_match: synonym,
            related_term_match: related,
            exact_match_count: if exact { 1.0 } else { 0.0 },
            confidence: 0.8,
            explanation: String::new(),
        })
    }

    /// Searchability fields weighted [5, 5, 5, 10]; one unweighted best-practice field;
    /// skill fields for both skill categories.
    fn catalog() -> FieldCatalog {
        FieldCatalog::new(vec![
            FieldDefinition::one_to_one("a", Category::Searchability, "s", "A", "?").weighted(5.0),
            FieldDefinition::one_to_one("b", Category::Searchability, "s", "B", "?").weighted(5.0),
            FieldDefinition::one_to_one("c", Category::Searchability, "s", "C", "?").weighted(5.0),
            FieldDefinition::one_to_one("d", Category::Searchability, "s", "D", "?").weighted(10.0),
            FieldDefinition::one_to_one("plain", Category::BestPractices, "s", "Plain", "?"),
            FieldDefinition::one_to_one("zero", Category::BestPractices, "s", "Zero", "?").weighted(0.0),
            FieldDefinition::one_to_many("hardSkills", Category::HardSkills, "hs", "Hard", "?").weighted(5.0),
            FieldDefinition::one_to_many("softSkills", Category::SoftSkills, "ss", "Soft", "?"),
        ])
        .unwrap()
    }

    #[test]
    fn test_scenario_a_weighted_booleans() {
        let judgments = vec![
            boolean("a", true),
            boolean("b", true),
            boolean("c", true),
            boolean("d", false),
        ];
        let result = aggregate(&judgments, &catalog());
        let score = &result.categories[&Category::Searchability];
        assert_eq!(score.total_points_earned, 15.0);
        assert_eq!(score.total_points_possible, 25.0);
        assert_eq!(score.score, 60);
    }

    #[test]
    fn test_scenario_b_empty_category_pulls_overall_down() {
        // Every category except hard skills is perfect; hard skills has no judgments.
        let judgments = vec![
            boolean("a", true),
            boolean("plain", true),
            skill("softSkills", "communication", true, false, false),
        ];
        let result = aggregate(&judgments, &catalog());
        assert_eq!(result.categories[&Category::HardSkills].score, 0);
        assert_eq!(result.categories[&Category::HardSkills].total_points_possible, 0.0);
        assert_eq!(result.categories[&Category::Searchability].score, 100);
        assert_eq!(result.categories[&Category::BestPractices].score, 100);
        assert_eq!(result.categories[&Category::SoftSkills].score, 100);
        assert_eq!(result.overall, 60);
    }

    #[test]
    fn test_scenario_d_synonym_match_counts() {
        let judgments = vec![skill("hardSkills", "kubernetes", false, true, false)];
        let result = aggregate(&judgments, &catalog());
        let score = &result.categories[&Category::HardSkills];
        assert_eq!(score.total_points_earned, 1.0);
        assert_eq!(score.total_points_possible, 1.0);
        assert_eq!(score.score, 100);
    }

    #[test]
    fn test_scenario_e_overall_weighting() {
        let categories: BTreeMap<Category, CategoryScore> = [
            (Category::HardSkills, 80),
            (Category::SoftSkills, 60),
            (Category::Searchability, 100),
            (Category::BestPractices, 40),
        ]
        .into_iter()
        .map(|(c, score)| {
            (
                c,
                CategoryScore {
                    score,
                    ..CategoryScore::default()
                },
            )
        })
        .collect();
        // 0.8*0.40 + 0.6*0.30 + 1.0*0.15 + 0.4*0.15 = 0.71
        assert_eq!(overall_score(&categories), 71);
    }

    #[test]
    fn test_repeated_boolean_counts_once() {
        let judgments = vec![boolean("a", true), boolean("a", true), boolean("b", false)];
        let score = &aggregate(&judgments, &catalog()).categories[&Category::Searchability];
        assert_eq!(score.total_points_earned, 5.0);
        assert_eq!(score.total_points_possible, 10.0);
        assert_eq!(score.score, 50);
    }

    #[test]
    fn test_first_judgment_wins_for_repeated_field() {
        let judgments = vec![boolean("a", false), boolean("a", true)];
        let score = &aggregate(&judgments, &catalog()).categories[&Category::Searchability];
        assert_eq!(score.total_points_earned, 0.0);
        assert_eq!(score.total_points_possible, 5.0);
    }

    #[test]
    fn test_repeated_skill_label_counts_once() {
        let judgments = vec![
            skill("hardSkills", "Rust", true, false, false),
            skill("hardSkills", "rust", true, false, false),
            skill("hardSkills", "go", false, false, false),
        ];
        let score = &aggregate(&judgments, &catalog()).categories[&Category::HardSkills];
        assert_eq!(score.total_points_possible, 2.0);
        assert_eq!(score.score, 50);
    }

    #[test]
    fn test_skills_ignore_field_weight() {
        let judgments = vec![
            skill("hardSkills", "rust", true, false, false),
            skill("hardSkills", "go", false, false, false),
            skill("hardSkills", "sql", false, false, true),
        ];
        let score = &aggregate(&judgments, &catalog()).categories[&Category::HardSkills];
        assert_eq!(score.total_points_possible, 3.0);
        assert_eq!(score.total_points_earned, 2.0);
        assert_eq!(score.score, 67);
    }

    #[test]
    fn test_all_true_scores_100_all_false_scores_0() {
        let all_true: Vec<_> = ["a", "b", "c", "d"].iter().map(|id| boolean(id, true)).collect();
        let all_false: Vec<_> = ["a", "b", "c", "d"].iter().map(|id| boolean(id, false)).collect();
        assert_eq!(aggregate(&all_true, &catalog()).categories[&Category::Searchability].score, 100);
        assert_eq!(aggregate(&all_false, &catalog()).categories[&Category::Searchability].score, 0);
    }

    #[test]
    fn test_unweighted_field_defaults_to_one() {
        let score = &aggregate(&[boolean("plain", false)], &catalog()).categories[&Category::BestPractices];
        assert_eq!(score.total_points_possible, 1.0);
    }

    #[test]
    fn test_zero_weight_only_category_scores_zero() {
        let score = &aggregate(&[boolean("zero", true)], &catalog()).categories[&Category::BestPractices];
        assert_eq!(score.total_points_possible, 0.0);
        assert_eq!(score.score, 0);
    }

    #[test]
    fn test_unknown_and_mismatched_judgments_skipped() {
        let judgments = vec![
            boolean("unknown", true),
            boolean("hardSkills", true),
            skill("a", "rust", true, false, false),
        ];
        let result = aggregate(&judgments, &catalog());
        assert!(result
            .categories
            .values()
            .all(|s| s.total_points_possible == 0.0));
        assert_eq!(result.overall, 0);
    }

    #[test]
    fn test_every_category_always_present() {
        let result = aggregate(&[], &catalog());
        assert_eq!(result.categories.len(), Category::ALL.len());
        assert_eq!(result.overall, 0);
    }

    #[test]
    fn test_score_bounded_for_assorted_weights() {
        let weights = [0.0, 0.5, 1.0, 3.0, 7.25, 100.0];
        for (i, &w1) in weights.iter().enumerate() {
            for &w2 in &weights[i..] {
                let catalog = FieldCatalog::new(vec![
                    FieldDefinition::one_to_one("x", Category::Searchability, "s", "X", "?").weighted(w1),
                    FieldDefinition::one_to_one("y", Category::Searchability, "s", "Y", "?").weighted(w2),
                ])
                .unwrap();
                let judgments = vec![boolean("x", true), boolean("y", false)];
                let score = &aggregate(&judgments, &catalog).categories[&Category::Searchability];
                assert!(score.score <= 100);
                let expected = percentage(w1, w1 + w2);
                assert_eq!(score.score, expected);
                if w1 + w2 > 0.0 {
                    assert_eq!(expected, (100.0 * w1 / (w1 + w2)).round() as u32);
                } else {
                    assert_eq!(expected, 0);
                }
            }
        }
    }

    #[test]
    fn test_category_weights_sum_to_one() {
        let sum: f64 = CATEGORY_WEIGHTS.iter().map(|(_, w)| w).sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_percentage_rounds_half_up() {
        assert_eq!(percentage(1.0, 8.0), 13); // 12.5
        assert_eq!(percentage(2.0, 3.0), 67);
        assert_eq!(percentage(0.0, 0.0), 0);
    }
}
