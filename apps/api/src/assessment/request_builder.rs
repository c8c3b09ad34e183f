//! Judgment Request Builder: Turns one catalog category plus the job and
//! resume into the instruction payload for the judgment provider.
//!
//! Pure construction; the provider call happens in the runner.

use serde_json::{json, Value};

use crate::assessment::catalog::{Category, FieldCatalog, FieldDefinition, FieldKind};
use crate::assessment::normalizer::{abbreviate_keys, KEY_ABBREVIATIONS};
use crate::assessment::prompts::{
    ATTACHED_RESUME_NOTE, BOOLEAN_FIELDS_SECTION, JUDGMENT_PROMPT_TEMPLATE, JUDGMENT_SYSTEM,
    SKILL_FIELD_SECTION, UNKNOWN_COMPANY,
};
use crate::errors::AssessmentError;
use crate::llm_client::prompts::{EVIDENCE_INSTRUCTION, JSON_ARRAY_ONLY};
use crate::models::context::{JobContext, ResumeContext, ResumeDocument};

/// Everything the provider needs to judge one category.
#[derive(Debug, Clone)]
pub struct JudgmentRequest {
    pub category: Category,
    pub system: String,
    pub prompt: String,
    pub attachment: Option<ResumeDocument>,
    /// Field ids (or skill parent ids) the response is expected to cover.
    pub expected_field_ids: Vec<String>,
}

/// Builds the judgment request for `category`.
///
/// Fails with `UnknownCategory` when the catalog has no fields for it.
pub fn build_request(
    catalog: &FieldCatalog,
    category: Category,
    job: &JobContext,
    resume: &ResumeContext,
) -> Result<JudgmentRequest, AssessmentError> {
    let fields = catalog.fields_by_category(category);
    if fields.is_empty() {
        return Err(AssessmentError::UnknownCategory(category));
    }

    let company = job
        .company
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or(UNKNOWN_COMPANY);
    let resume_text = match resume.text.trim() {
        "" if resume.document.is_some() => ATTACHED_RESUME_NOTE,
        text => text,
    };
    let context = [
        ("job_title", job.title.trim()),
        ("company", company),
        ("job_description", job.description.trim()),
        ("resume_text", resume_text),
    ];

    let (boolean_fields, skill_fields): (Vec<&FieldDefinition>, Vec<&FieldDefinition>) = fields
        .into_iter()
        .partition(|f| f.kind == FieldKind::OneToOne);

    let mut sections = Vec::new();
    if !boolean_fields.is_empty() {
        let lines: Vec<String> = boolean_fields
            .iter()
            .map(|f| format!("- `{}` ({}): {}", f.id, f.label, render(&f.instruction, &context)))
            .collect();
        let example = boolean_example();
        sections.push(render(
            BOOLEAN_FIELDS_SECTION,
            &[
                ("fields", lines.join("\n").as_str()),
                ("boolean_example", example.to_string().as_str()),
                ("boolean_example_short", abbreviate_keys(&example).to_string().as_str()),
            ],
        ));
    }
    for field in &skill_fields {
        let example = skill_example(&field.id);
        sections.push(render(
            SKILL_FIELD_SECTION,
            &[
                ("parent_field_id", field.id.as_str()),
                ("instruction", render(&field.instruction, &context).as_str()),
                ("skill_example", example.to_string().as_str()),
                ("skill_example_short", abbreviate_keys(&example).to_string().as_str()),
            ],
        ));
    }

    let prompt = render(
        JUDGMENT_PROMPT_TEMPLATE,
        &[
            ("category", category.display_name()),
            ("job_title", job.title.trim()),
            ("company", company),
            ("job_description", job.description.trim()),
            ("resume_text", resume_text),
            ("field_sections", sections.join("\n\n").as_str()),
            ("key_legend", key_legend().as_str()),
        ],
    );

    let expected_field_ids = boolean_fields
        .iter()
        .chain(skill_fields.iter())
        .map(|f| f.id.clone())
        .collect();

    Ok(JudgmentRequest {
        category,
        system: format!("{JUDGMENT_SYSTEM} {JSON_ARRAY_ONLY}\n\n{EVIDENCE_INSTRUCTION}"),
        prompt,
        attachment: resume.document.clone(),
        expected_field_ids,
    })
}

/// Single-pass `{name}` substitution. Substituted values are never rescanned,
/// so braces inside a job description or resume are left untouched.
fn render(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open + 1..];
        let hit = values
            .iter()
            .find(|(name, _)| tail.starts_with(name) && tail[name.len()..].starts_with('}'));
        match hit {
            Some((name, value)) => {
                out.push_str(value);
                rest = &tail[name.len() + 1..];
            }
            None => {
                out.push('{');
                rest = tail;
            }
        }
    }

    out.push_str(rest);
    out
}

fn key_legend() -> String {
    KEY_ABBREVIATIONS
        .iter()
        .filter(|(short, long)| short != long)
        .map(|(short, long)| format!("{short}={long}"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn boolean_example() -> Value {
    json!({
        "id": "<field id>",
        "value": true,
        "confidence": 0.9,
        "explanation": "One sentence citing the evidence in the resume."
    })
}

fn skill_example(parent_field_id: &str) -> Value {
    json!({
        "id": format!("{parent_field_id}-kubernetes"),
        "parentFieldId": parent_field_id,
        "label": "Kubernetes",
        "synonyms": ["k8s"],
        "relatedTerms": ["container orchestration", "helm"],
        "exactMatch": false,
        "synonymMatch": true,
        "relatedTermMatch": true,
        "exactMatchCount": 0,
        "confidence": 0.85,
        "explanation": "Resume mentions k8s and Helm charts but never 'Kubernetes'."
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn job() -> JobContext {
        JobContext {
            title: "Senior Rust Engineer".to_string(),
            company: Some("Acme".to_string()),
            description: "Build distributed systems in Rust. Kafka a plus.".to_string(),
        }
    }

    fn catalog() -> FieldCatalog {
        FieldCatalog::new(vec![
            FieldDefinition::one_to_one(
                "jobTitleMatch",
                Category::Searchability,
                "jobTitleMatch",
                "Job title match",
                "Does the resume contain '{job_title}' for {company}?",
            ),
            FieldDefinition::one_to_one("emailPresent", Category::Searchability, "contact", "Email", "Email?"),
            FieldDefinition::one_to_many(
                "hardSkills",
                Category::HardSkills,
                "hardSkills",
                "Hard skill",
                "List skills from: {job_description}",
            ),
        ])
        .unwrap()
    }

    #[test]
    fn test_unknown_category_when_no_fields() {
        let err = build_request(
            &catalog(),
            Category::SoftSkills,
            &job(),
            &ResumeContext::from_text("resume"),
        )
        .unwrap_err();
        assert!(matches!(err, AssessmentError::UnknownCategory(Category::SoftSkills)));
    }

    #[test]
    fn test_standard_prompts_print_job_description_once() {
        let catalog = FieldCatalog::standard().unwrap();
        for category in Category::ALL {
            let request = build_request(
                &catalog,
                category,
                &job(),
                &ResumeContext::from_text("resume"),
            )
            .unwrap();
            assert_eq!(
                request.prompt.matches("Build distributed systems in Rust.").count(),
                1,
                "{category}"
            );
        }
    }

    #[test]
    fn test_only_requested_category_included() {
        let request = build_request(
            &catalog(),
            Category::Searchability,
            &job(),
            &ResumeContext::from_text("resume"),
        )
        .unwrap();
        assert_eq!(request.category, Category::Searchability);
        assert_eq!(request.expected_field_ids, vec!["jobTitleMatch", "emailPresent"]);
        assert!(!request.prompt.contains("hardSkills"));
    }

    #[test]
    fn test_placeholders_substituted_in_instructions() {
        let request = build_request(
            &catalog(),
            Category::Searchability,
            &job(),
            &ResumeContext::from_text("Jane Doe, Rust developer"),
        )
        .unwrap();
        assert!(request
            .prompt
            .contains("Does the resume contain 'Senior Rust Engineer' for Acme?"));
        assert!(request.prompt.contains("Jane Doe, Rust developer"));
        assert!(!request.prompt.contains("{job_title}"));
        assert!(!request.prompt.contains("{resume_text}"));
    }

    #[test]
    fn test_skill_field_requests_one_object_per_skill() {
        let request = build_request(
            &catalog(),
            Category::HardSkills,
            &job(),
            &ResumeContext::from_text("resume"),
        )
        .unwrap();
        assert!(request.prompt.contains("ONE object PER DISTINCT SKILL"));
        assert!(request.prompt.contains("NO fixed number"));
        assert!(request.prompt.contains(r#""parentFieldId":"hardSkills""#));
        assert!(request.prompt.contains(r#""p":"hardSkills""#));
        assert!(request.prompt.contains("List skills from: Build distributed systems in Rust."));
        assert!(!request.prompt.contains("YES/NO FIELDS"));
    }

    #[test]
    fn test_missing_company_falls_back() {
        let mut job = job();
        job.company = None;
        let request = build_request(
            &catalog(),
            Category::Searchability,
            &job,
            &ResumeContext::from_text("resume"),
        )
        .unwrap();
        assert!(request.prompt.contains("for the hiring company?"));
    }

    #[test]
    fn test_attachment_only_resume() {
        let resume = ResumeContext {
            text: String::new(),
            document: Some(ResumeDocument::pdf(Bytes::from_static(b"%PDF-1.4"))),
        };
        let request = build_request(&catalog(), Category::Searchability, &job(), &resume).unwrap();
        assert!(request.attachment.is_some());
        assert!(request.prompt.contains(ATTACHED_RESUME_NOTE));
    }

    #[test]
    fn test_user_text_braces_not_resubstituted() {
        let mut job = job();
        job.description = "Template engines like {resume_text} and {job_title}".to_string();
        let request = build_request(
            &catalog(),
            Category::HardSkills,
            &job,
            &ResumeContext::from_text("SECRET-RESUME"),
        )
        .unwrap();
        assert!(request
            .prompt
            .contains("Template engines like {resume_text} and {job_title}"));
        assert_eq!(request.prompt.matches("SECRET-RESUME").count(), 1);
    }

    #[test]
    fn test_system_prompt_demands_json_array() {
        let request = build_request(
            &catalog(),
            Category::Searchability,
            &job(),
            &ResumeContext::from_text("resume"),
        )
        .unwrap();
        assert!(request.system.contains("JSON array"));
        assert!(!request.prompt.contains(&request.system));
    }

    #[test]
    fn test_key_legend_lists_abbreviations() {
        let legend = key_legend();
        assert!(legend.contains("p=parentFieldId"));
        assert!(legend.contains("emc=exactMatchCount"));
        assert!(!legend.contains("id=id"));
    }

    #[test]
    fn test_render_leaves_unknown_placeholders() {
        assert_eq!(render("{a} {b} {", &[("a", "1")]), "1 {b} {");
    }
}
