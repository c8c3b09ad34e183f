// All LLM prompt constants for the assessment module.
// Reuses cross-cutting fragments from llm_client::prompts.

/// System prompt preamble for field judgments. The JSON-only and evidence
/// fragments are appended by the request builder.
pub const JUDGMENT_SYSTEM: &str = "You are an expert recruiter and applicant tracking system (ATS) analyst. \
    You evaluate how well a candidate resume matches a specific job posting, one field at a time.";

/// Judgment prompt template.
/// Replace: {category}, {job_title}, {company}, {job_description}, {resume_text},
///          {field_sections}, {key_legend}
pub const JUDGMENT_PROMPT_TEMPLATE: &str = r#"Evaluate the candidate resume against the job posting for the category: {category}.

JOB TITLE: {job_title}
COMPANY: {company}

JOB DESCRIPTION:
{job_description}

RESUME:
{resume_text}

{field_sections}

Return a single JSON ARRAY containing every judgment object described above.
Key abbreviations are accepted and encouraged to save space: {key_legend}"#;

/// Section listing the yes/no fields. Replace: {fields}, {boolean_example}, {boolean_example_short}
pub const BOOLEAN_FIELDS_SECTION: &str = r#"YES/NO FIELDS: emit exactly ONE object per field id below:
{fields}

Each object has this shape:
{boolean_example}
or, abbreviated:
{boolean_example_short}"#;

/// Section describing a one-to-many skill field.
/// Replace: {parent_field_id}, {instruction}, {skill_example}, {skill_example_short}
pub const SKILL_FIELD_SECTION: &str = r#"SKILL FIELD `{parent_field_id}`:
{instruction}

Emit ONE object PER DISTINCT SKILL you can identify in the job description. There is NO fixed number of skills;
list every distinct skill you find, no more and no fewer. Do not merge different skills into one object and do not
repeat a skill. Use a unique `id` per skill and set `parentFieldId` to "{parent_field_id}".

Each skill object has this shape:
{skill_example}
or, abbreviated:
{skill_example_short}

`exactMatch`: the resume names the skill verbatim. `synonymMatch`: the resume names one of `synonyms`.
`relatedTermMatch`: the resume mentions one of `relatedTerms`. `exactMatchCount`: number of verbatim mentions."#;

/// Text substituted for {resume_text} when the resume only arrives as an attachment.
pub const ATTACHED_RESUME_NOTE: &str = "(The resume is attached as a PDF document.)";

/// Substituted for {company} when the posting does not name one.
pub const UNKNOWN_COMPANY: &str = "the hiring company";
