//! Field Catalog: The immutable schema of everything a scan evaluates.
//!
//! Built once at startup (`FieldCatalog::standard()`) and shared through
//! `AppState` as an `Arc<FieldCatalog>`. Adding an evaluable attribute means
//! appending one entry to `standard_fields()`; nothing downstream changes.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Weight applied when a field definition does not specify one.
pub const DEFAULT_FIELD_WEIGHT: f64 = 1.0;

/// Top-level grouping of fields. Each category is scored independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    Searchability,
    BestPractices,
    HardSkills,
    SoftSkills,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Searchability,
        Category::BestPractices,
        Category::HardSkills,
        Category::SoftSkills,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Searchability => "searchability",
            Category::BestPractices => "bestPractices",
            Category::HardSkills => "hardSkills",
            Category::SoftSkills => "softSkills",
        }
    }

    /// Human-readable name used in provider prompts.
    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Searchability => "Searchability (ATS parseability)",
            Category::BestPractices => "Resume best practices",
            Category::HardSkills => "Hard skills",
            Category::SoftSkills => "Soft skills",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether the provider returns exactly one verdict for a field or a
/// data-dependent number of named instances (one per skill).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
    OneToOne,
    OneToMany,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDefinition {
    pub id: String,
    pub category: Category,
    pub section: String,
    pub kind: FieldKind,
    pub label: String,
    /// Evaluation instruction. May contain `{job_title}`, `{company}`,
    /// `{job_description}` and `{resume_text}` placeholders.
    pub instruction: String,
    pub weight_in_category: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remediation_hint: Option<String>,
}

impl FieldDefinition {
    pub fn one_to_one(
        id: &str,
        category: Category,
        section: &str,
        label: &str,
        instruction: &str,
    ) -> Self {
        Self::new(id, category, section, FieldKind::OneToOne, label, instruction)
    }

    pub fn one_to_many(
        id: &str,
        category: Category,
        section: &str,
        label: &str,
        instruction: &str,
    ) -> Self {
        Self::new(id, category, section, FieldKind::OneToMany, label, instruction)
    }

    fn new(
        id: &str,
        category: Category,
        section: &str,
        kind: FieldKind,
        label: &str,
        instruction: &str,
    ) -> Self {
        Self {
            id: id.to_string(),
            category,
            section: section.to_string(),
            kind,
            label: label.to_string(),
            instruction: instruction.to_string(),
            weight_in_category: None,
            remediation_hint: None,
        }
    }

    pub fn weighted(mut self, weight: f64) -> Self {
        self.weight_in_category = Some(weight);
        self
    }

    pub fn with_remediation(mut self, hint: &str) -> Self {
        self.remediation_hint = Some(hint.to_string());
        self
    }

    /// Effective weight within the category (1.0 when unspecified).
    pub fn weight(&self) -> f64 {
        self.weight_in_category.unwrap_or(DEFAULT_FIELD_WEIGHT)
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    #[error("Duplicate field id '{0}'")]
    DuplicateField(String),

    #[error("Field '{id}' has invalid weight {weight} (must be finite and non-negative)")]
    InvalidWeight { id: String, weight: f64 },

    #[error("Field definition has an empty id")]
    EmptyId,
}

/// Immutable, indexed collection of field definitions.
#[derive(Debug, Clone)]
pub struct FieldCatalog {
    fields: Vec<FieldDefinition>,
    index: HashMap<String, usize>,
}

impl FieldCatalog {
    /// Validates the definitions and builds the id index.
    pub fn new(fields: Vec<FieldDefinition>) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(fields.len());

        for (position, field) in fields.iter().enumerate() {
            if field.id.trim().is_empty() {
                return Err(CatalogError::EmptyId);
            }
            if let Some(weight) = field.weight_in_category {
                if !weight.is_finite() || weight < 0.0 {
                    return Err(CatalogError::InvalidWeight {
                        id: field.id.clone(),
                        weight,
                    });
                }
            }
            if index.insert(field.id.clone(), position).is_some() {
                return Err(CatalogError::DuplicateField(field.id.clone()));
            }
        }

        Ok(Self { fields, index })
    }

    /// The catalog every production scan runs against.
    pub fn standard() -> Result<Self, CatalogError> {
        Self::new(standard_fields())
    }

    pub fn list_fields(&self) -> &[FieldDefinition] {
        &self.fields
    }

    pub fn fields_by_category(&self, category: Category) -> Vec<&FieldDefinition> {
        self.fields
            .iter()
            .filter(|f| f.category == category)
            .collect()
    }

    pub fn get(&self, id: &str) -> Option<&FieldDefinition> {
        self.index.get(id).map(|&i| &self.fields[i])
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Standard field definitions
// ────────────────────────────────────────────────────────────────────────────

fn standard_fields() -> Vec<FieldDefinition> {
    use Category::{BestPractices, HardSkills, Searchability, SoftSkills};

    vec![
        // Searchability: contact information
        FieldDefinition::one_to_one(
            "emailPresent",
            Searchability,
            "contactInformation",
            "Email address",
            "Does the resume contain a valid email address in the header or contact section?",
        )
        .weighted(5.0)
        .with_remediation("Add a professional email address to the resume header."),
        FieldDefinition::one_to_one(
            "phonePresent",
            Searchability,
            "contactInformation",
            "Phone number",
            "Does the resume contain a phone number?",
        )
        .weighted(5.0)
        .with_remediation("Add a phone number so recruiters can reach you directly."),
        FieldDefinition::one_to_one(
            "addressPresent",
            Searchability,
            "contactInformation",
            "Location",
            "Does the resume state the candidate's city and state/country? \
             Recruiters for {company} often filter candidates by location.",
        )
        .weighted(5.0)
        .with_remediation("Add at least your city and state or country to the header."),
        FieldDefinition::one_to_one(
            "linkedinPresent",
            Searchability,
            "contactInformation",
            "LinkedIn profile",
            "Does the resume include a LinkedIn profile URL?",
        )
        .weighted(2.0)
        .with_remediation("Include a link to an up-to-date LinkedIn profile."),
        // Searchability: section headings
        FieldDefinition::one_to_one(
            "experienceHeading",
            Searchability,
            "sectionHeadings",
            "Experience section heading",
            "Does the resume have a clearly labelled work experience section using a \
             standard heading (e.g. 'Experience', 'Work Experience', 'Professional Experience')?",
        )
        .weighted(5.0)
        .with_remediation("Use a standard 'Work Experience' heading so ATS software can find your roles."),
        FieldDefinition::one_to_one(
            "educationHeading",
            Searchability,
            "sectionHeadings",
            "Education section heading",
            "Does the resume have a clearly labelled education section using a standard heading?",
        )
        .weighted(5.0)
        .with_remediation("Add an 'Education' section with a standard heading."),
        FieldDefinition::one_to_one(
            "skillsHeading",
            Searchability,
            "sectionHeadings",
            "Skills section heading",
            "Does the resume have a dedicated skills section using a standard heading?",
        )
        .weighted(3.0)
        .with_remediation("Add a 'Skills' section listing the tools and technologies you use."),
        // Searchability: job match
        FieldDefinition::one_to_one(
            "jobTitleMatch",
            Searchability,
            "jobTitleMatch",
            "Job title match",
            "Does the resume contain the exact job title '{job_title}' (or a very close \
             variant) in the summary or a previous role?",
        )
        .weighted(10.0)
        .with_remediation("Mirror the posting's job title in your summary or most relevant role title."),
        FieldDefinition::one_to_one(
            "educationMatch",
            Searchability,
            "education",
            "Education requirements",
            "Does the candidate's education satisfy the degree requirements stated in the \
             job description? If the job description states no requirement, answer true.",
        )
        .weighted(5.0)
        .with_remediation("Make sure your degree, field of study and institution are listed clearly."),
        FieldDefinition::one_to_one(
            "dateFormatting",
            Searchability,
            "dateFormatting",
            "Date formatting",
            "Are employment dates present for each role and written in a consistent, \
             parseable format (e.g. 'MM/YYYY' or 'Month YYYY')?",
        )
        .weighted(3.0)
        .with_remediation("Give every role a start and end date in one consistent format."),
        FieldDefinition::one_to_one(
            "simpleLayout",
            Searchability,
            "fileParseability",
            "ATS-friendly layout",
            "Is the resume free of tables, multi-column layouts, text inside images, or \
             headers/footers holding essential information that an ATS could fail to parse?",
        )
        .weighted(3.0)
        .with_remediation("Use a single-column layout and keep key details out of tables, images and page headers."),
        // Best practices
        FieldDefinition::one_to_one(
            "measurableResults",
            BestPractices,
            "measurableResults",
            "Measurable results",
            "Do at least five bullet points contain quantified results (numbers, \
             percentages, currency amounts, time saved)?",
        )
        .weighted(10.0)
        .with_remediation("Quantify your impact: add numbers, percentages or amounts to your bullet points."),
        FieldDefinition::one_to_one(
            "resumeLength",
            BestPractices,
            "wordCount",
            "Resume length",
            "Is the resume between 400 and 1000 words long?",
        )
        .weighted(5.0)
        .with_remediation("Aim for 400–1000 words; trim older or less relevant roles if you are over."),
        FieldDefinition::one_to_one(
            "actionVerbs",
            BestPractices,
            "writingStyle",
            "Strong action verbs",
            "Do most experience bullet points begin with a strong action verb \
             (e.g. 'Led', 'Built', 'Reduced') rather than passive phrasing?",
        )
        .weighted(5.0)
        .with_remediation("Start each bullet with a strong action verb describing what you did."),
        FieldDefinition::one_to_one(
            "noBuzzwords",
            BestPractices,
            "writingStyle",
            "Avoids clichés",
            "Is the resume free of overused buzzwords and clichés such as \
             'team player', 'hard worker', 'go-getter' or 'think outside the box'?",
        )
        .weighted(3.0)
        .with_remediation("Replace clichés with concrete examples that demonstrate the trait."),
        FieldDefinition::one_to_one(
            "noPersonalPronouns",
            BestPractices,
            "writingStyle",
            "No personal pronouns",
            "Is the resume written without first-person pronouns ('I', 'me', 'my')?",
        )
        .weighted(2.0)
        .with_remediation("Drop first-person pronouns; write bullets in implied first person."),
        FieldDefinition::one_to_one(
            "spellingGrammar",
            BestPractices,
            "spellingGrammar",
            "Spelling and grammar",
            "Is the resume free of spelling and grammatical errors?",
        )
        .weighted(5.0)
        .with_remediation("Proofread carefully or run the resume through a spell checker."),
        FieldDefinition::one_to_one(
            "professionalSummary",
            BestPractices,
            "summary",
            "Professional summary",
            "Does the resume open with a short professional summary tailored to the \
             '{job_title}' role?",
        )
        .weighted(3.0)
        .with_remediation("Add a two to three sentence summary aimed at this role."),
        // Skills (one judgment per identified skill)
        FieldDefinition::one_to_many(
            "hardSkills",
            HardSkills,
            "hardSkills",
            "Hard skill",
            "Identify every distinct hard skill (languages, frameworks, tools, platforms, \
             certifications, domain methods) that the job description for '{job_title}' at \
             {company} asks for. For each skill, report whether the resume mentions it exactly, \
             through a synonym, or through a related term, and count the exact mentions.",
        )
        .weighted(5.0)
        .with_remediation("If you have this skill, name it explicitly in your skills section or experience bullets."),
        FieldDefinition::one_to_many(
            "softSkills",
            SoftSkills,
            "softSkills",
            "Soft skill",
            "Identify every distinct soft skill (communication, leadership, collaboration, \
             problem solving, etc.) that the job description for '{job_title}' asks for. For each \
             skill, report whether the resume demonstrates it exactly, through a synonym, or \
             through a related term, and count the exact mentions.",
        )
        .weighted(5.0)
        .with_remediation("Show this skill through a concrete example in one of your bullet points."),
    ]
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
