//! Improvement Extractor: The "needs attention" list shown next to a scan.
//!
//! Failed boolean checks and unmatched skills are reported separately so the
//! caller can phrase remediation differently for each.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;
use tracing::debug;

use crate::assessment::catalog::{Category, FieldCatalog};
use crate::assessment::judgment::FieldJudgment;

/// Weight reported for a skill gap; skills are scored uniformly.
const SKILL_GAP_WEIGHT: f64 = 1.0;

/// A `OneToOne` field judged false.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailedCheck {
    pub field_id: String,
    pub section_id: String,
    pub field_label: String,
    pub explanation: String,
    pub weight: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remediation_hint: Option<String>,
}

/// A skill asked for by the job description with no match in the resume.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillGap {
    pub field_id: String,
    pub section_id: String,
    pub skill_label: String,
    pub explanation: String,
    pub weight: f64,
    pub synonyms: Vec<String>,
    pub related_terms: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remediation_hint: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Improvement {
    FailedCheck(FailedCheck),
    SkillGap(SkillGap),
}

impl Improvement {
    pub fn weight(&self) -> f64 {
        match self {
            Improvement::FailedCheck(i) => i.weight,
            Improvement::SkillGap(i) => i.weight,
        }
    }

    pub fn field_id(&self) -> &str {
        match self {
            Improvement::FailedCheck(i) => &i.field_id,
            Improvement::SkillGap(i) => &i.field_id,
        }
    }
}

/// Collects improvements per category, highest weight first, ties broken by
/// field id. Categories without improvements are omitted.
pub fn extract_improvements(
    judgments: &[FieldJudgment],
    catalog: &FieldCatalog,
) -> BTreeMap<Category, Vec<Improvement>> {
    let mut improvements: BTreeMap<Category, Vec<Improvement>> = BTreeMap::new();
    let mut seen = HashSet::new();

    for judgment in judgments {
        let field = match judgment.resolve(catalog) {
            Ok(field) => field,
            Err(reason) => {
                debug!("No improvement for '{}': {reason}", judgment.id());
                continue;
            }
        };
        if !seen.insert(judgment.instance_key()) {
            debug!("No improvement for duplicate judgment '{}'", judgment.id());
            continue;
        }

        let improvement = match judgment {
            FieldJudgment::Boolean(j) if !j.value => Improvement::FailedCheck(FailedCheck {
                field_id: j.id.clone(),
                section_id: field.section.clone(),
                field_label: field.label.clone(),
                explanation: j.explanation.clone(),
                weight: field.weight(),
                remediation_hint: field.remediation_hint.clone(),
            }),
            FieldJudgment::Skill(j) if !j.is_matched() => Improvement::SkillGap(SkillGap {
                field_id: j.id.clone(),
                section_id: field.section.clone(),
                skill_label: j.label.clone(),
                explanation: j.explanation.clone(),
                weight: SKILL_GAP_WEIGHT,
                synonyms: j.synonyms.clone(),
                related_terms: j.related_terms.clone(),
                remediation_hint: field.remediation_hint.clone(),
            }),
            _ => continue,
        };

        improvements
            .entry(field.category)
            .or_default()
            .push(improvement);
    }

    for list in improvements.values_mut() {
        list.sort_by(|a, b| {
            b.weight()
                .total_cmp(&a.weight())
                .then_with(|| a.field_id().cmp(b.field_id()))
        });
    }

    improvements
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
