//! Field judgments: One verdict per evaluated field instance.
//!
//! The provider's output is duck-typed; by the time a record becomes a
//! `FieldJudgment` its shape has been validated and its variant is explicit.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::assessment::catalog::{FieldCatalog, FieldDefinition, FieldKind};

/// Verdict for a `OneToOne` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BooleanJudgment {
    pub id: String,
    pub confidence: f64,
    pub explanation: String,
    pub value: bool,
}

/// One identified skill instance under a `OneToMany` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillJudgment {
    pub id: String,
    pub parent_field_id: String,
    pub label: String,
    pub synonyms: Vec<String>,
    pub related_terms: Vec<String>,
    pub exact_match: bool,
    pub synonym_match: bool,
    pub related_term_match: bool,
    /// Informational only; does not affect scoring. Providers emit both `2` and `2.0`.
    pub exact_match_count: f64,
    pub confidence: f64,
    pub explanation: String,
}

impl SkillJudgment {
    /// A skill counts as matched on any of the three signals.
    pub fn is_matched(&self) -> bool {
        self.exact_match || self.synonym_match || self.related_term_match
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum FieldJudgment {
    Boolean(BooleanJudgment),
    Skill(SkillJudgment),
}

impl FieldJudgment {
    pub fn id(&self) -> &str {
        match self {
            FieldJudgment::Boolean(j) => &j.id,
            FieldJudgment::Skill(j) => &j.id,
        }
    }

    /// Id of the catalog field this judgment refers to.
    pub fn field_id(&self) -> &str {
        match self {
            FieldJudgment::Boolean(j) => &j.id,
            FieldJudgment::Skill(j) => &j.parent_field_id,
        }
    }

    /// Identity of the evaluated instance: the field for booleans, the parent
    /// field plus case-folded label for skills.
    pub fn instance_key(&self) -> (&str, Option<String>) {
        match self {
            FieldJudgment::Boolean(j) => (&j.id, None),
            FieldJudgment::Skill(j) => (&j.parent_field_id, Some(j.label.trim().to_lowercase())),
        }
    }

    pub fn confidence(&self) -> f64 {
        match self {
            FieldJudgment::Boolean(j) => j.confidence,
            FieldJudgment::Skill(j) => j.confidence,
        }
    }

    /// Looks up the referenced field definition and checks the variant agrees
    /// with the field's kind.
    pub fn resolve<'a>(
        &self,
        catalog: &'a FieldCatalog,
    ) -> Result<&'a FieldDefinition, Unresolved> {
        let field = catalog
            .get(self.field_id())
            .ok_or_else(|| Unresolved::UnknownField(self.field_id().to_string()))?;

        let expected = match self {
            FieldJudgment::Boolean(_) => FieldKind::OneToOne,
            FieldJudgment::Skill(_) => FieldKind::OneToMany,
        };
        if field.kind != expected {
            return Err(Unresolved::KindMismatch {
                judgment_id: self.id().to_string(),
                field_id: field.id.clone(),
                field_kind: field.kind,
            });
        }

        Ok(field)
    }
}

/// Why a judgment could not be tied to a catalog field.
#[derive(Debug, Clone, PartialEq)]
pub enum Unresolved {
    UnknownField(String),
    KindMismatch {
        judgment_id: String,
        field_id: String,
        field_kind: FieldKind,
    },
}

impl fmt::Display for Unresolved {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unresolved::UnknownField(id) => write!(f, "unknown field '{id}'"),
            Unresolved::KindMismatch {
                judgment_id,
                field_id,
                field_kind,
            } => write!(
                f,
                "judgment '{judgment_id}' does not fit {field_kind:?} field '{field_id}'"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::catalog::Category;

    fn skill(exact: bool, synonym: bool, related: bool) -> SkillJudgment {
        SkillJudgment {
            id: "hardSkill-rust".to_string(),
            parent_field_id: "hardSkills".to_string(),
            label: "Rust".to_string(),
            synonyms: vec![],
            related_terms: vec![],
            exact_match: exact,
            synonym_match: synonym,
            related_term_match: related,
            exact_match_count: 0.0,
            confidence: 0.8,
            explanation: String::new(),
        }
    }

    fn catalog() -> FieldCatalog {
        FieldCatalog::new(vec![
            FieldDefinition::one_to_one("emailPresent", Category::Searchability, "contact", "Email", "?"),
            FieldDefinition::one_to_many("hardSkills", Category::HardSkills, "hardSkills", "Hard skill", "?"),
        ])
        .unwrap()
    }

    #[test]
    fn test_skill_matched_on_any_signal() {
        assert!(!skill(false, false, false).is_matched());
        assert!(skill(true, false, false).is_matched());
        assert!(skill(false, true, false).is_matched());
        assert!(skill(false, false, true).is_matched());
    }

    #[test]
    fn test_skill_field_id_is_parent() {
        let judgment = FieldJudgment::Skill(skill(true, false, false));
        assert_eq!(judgment.id(), "hardSkill-rust");
        assert_eq!(judgment.field_id(), "hardSkills");
    }

    #[test]
    fn test_instance_key_folds_skill_label_case() {
        let mut lower = skill(true, false, false);
        lower.label = " rust ".to_string();
        let upper = skill(false, false, false);
        assert_eq!(
            FieldJudgment::Skill(lower).instance_key(),
            FieldJudgment::Skill(upper).instance_key()
        );
        let boolean = FieldJudgment::Boolean(BooleanJudgment {
            id: "emailPresent".to_string(),
            confidence: 1.0,
            explanation: String::new(),
            value: true,
        });
        assert_eq!(boolean.instance_key(), ("emailPresent", None));
    }

    #[test]
    fn test_resolve_known_fields() {
        let catalog = catalog();
        let boolean = FieldJudgment::Boolean(BooleanJudgment {
            id: "emailPresent".to_string(),
            confidence: 1.0,
            explanation: String::new(),
            value: true,
        });
        assert_eq!(boolean.resolve(&catalog).unwrap().id, "emailPresent");
        let skill = FieldJudgment::Skill(skill(false, false, false));
        assert_eq!(skill.resolve(&catalog).unwrap().id, "hardSkills");
    }

    #[test]
    fn test_resolve_unknown_field() {
        let judgment = FieldJudgment::Boolean(BooleanJudgment {
            id: "nope".to_string(),
            confidence: 1.0,
            explanation: String::new(),
            value: true,
        });
        assert_eq!(
            judgment.resolve(&catalog()).unwrap_err(),
            Unresolved::UnknownField("nope".to_string())
        );
    }

    #[test]
    fn test_resolve_kind_mismatch() {
        let judgment = FieldJudgment::Boolean(BooleanJudgment {
            id: "hardSkills".to_string(),
            confidence: 1.0,
            explanation: String::new(),
            value: true,
        });
        assert!(matches!(
            judgment.resolve(&catalog()),
            Err(Unresolved::KindMismatch { .. })
        ));
    }

    #[test]
    fn test_serialized_with_kind_tag() {
        let judgment = FieldJudgment::Skill(skill(true, false, false));
        let value = serde_json::to_value(&judgment).unwrap();
        assert_eq!(value["kind"], "skill");
        assert_eq!(value["parentFieldId"], "hardSkills");
        assert_eq!(value["exactMatch"], true);
    }
}
