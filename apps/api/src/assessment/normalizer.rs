//! Judgment Response Normalizer: Turns raw provider text into validated
//! `FieldJudgment`s.
//!
//! Payload extraction falls back through three tiers:
//! 1. the first fenced block labelled `json`
//! 2. the first fenced block of any kind
//! 3. the whole text
//!
//! A payload that is not a JSON array fails the category. A record that fails
//! validation is dropped on its own and the rest of the batch survives.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::assessment::judgment::{BooleanJudgment, FieldJudgment, SkillJudgment};
use crate::errors::AssessmentError;

const FENCE: &str = "```";

/// `(short, long)` key pairs the provider may use interchangeably.
pub const KEY_ABBREVIATIONS: &[(&str, &str)] = &[
    ("id", "id"),
    ("p", "parentFieldId"),
    ("l", "label"),
    ("v", "value"),
    ("syn", "synonyms"),
    ("rt", "relatedTerms"),
    ("em", "exactMatch"),
    ("sm", "synonymMatch"),
    ("rm", "relatedTermMatch"),
    ("emc", "exactMatchCount"),
    ("c", "confidence"),
    ("e", "explanation"),
];

/// Maps an abbreviated key to its long form. Unknown keys pass through.
pub fn expand_key(key: &str) -> &str {
    KEY_ABBREVIATIONS
        .iter()
        .find(|(short, _)| *short == key)
        .map(|(_, long)| *long)
        .unwrap_or(key)
}

/// Maps a long-form key to its abbreviation. Unknown keys pass through.
pub fn abbreviate_key(key: &str) -> &str {
    KEY_ABBREVIATIONS
        .iter()
        .find(|(_, long)| *long == key)
        .map(|(short, _)| *short)
        .unwrap_or(key)
}

/// Rewrites every key of a JSON object (recursively through arrays) to its
/// abbreviated form.
pub fn abbreviate_keys(value: &Value) -> Value {
    match value {
        Value::Object(fields) => Value::Object(
            fields
                .iter()
                .map(|(k, v)| (abbreviate_key(k).to_string(), abbreviate_keys(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(abbreviate_keys).collect()),
        other => other.clone(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Payload extraction
// ────────────────────────────────────────────────────────────────────────────

struct FencedBlock<'a> {
    label: &'a str,
    body: &'a str,
}

/// Splits text into its fenced code blocks. An unterminated final fence runs
/// to the end of the text (providers sometimes truncate).
fn fenced_blocks(text: &str) -> Vec<FencedBlock<'_>> {
    let mut blocks = Vec::new();
    let mut rest = text;

    while let Some(open) = rest.find(FENCE) {
        let after_open = &rest[open + FENCE.len()..];
        let line_end = after_open.find('\n').unwrap_or(after_open.len());
        let info = after_open[..line_end].trim();

        // "```json\n..." carries a label; "```[{...}]```" starts its body immediately;
        // "```json [{...}]```" carries a label on the body's own line.
        let (label, body_start) = if is_fence_label(info) {
            (info, (line_end + 1).min(after_open.len()))
        } else {
            match inline_label(info) {
                Some(token) => {
                    let start = after_open.find(token).unwrap_or(0) + token.len();
                    (token, start)
                }
                None => ("", 0),
            }
        };
        let body_region = &after_open[body_start..];

        match body_region.find(FENCE) {
            Some(close) => {
                blocks.push(FencedBlock {
                    label,
                    body: body_region[..close].trim(),
                });
                rest = &body_region[close + FENCE.len()..];
            }
            None => {
                blocks.push(FencedBlock {
                    label,
                    body: body_region.trim(),
                });
                break;
            }
        }
    }

    blocks
}

fn is_fence_label(info: &str) -> bool {
    info.chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '+' | '.'))
}

/// Label token of a one-line fence such as "json [..." or "json {...".
fn inline_label(info: &str) -> Option<&str> {
    let (token, rest) = info.split_once(char::is_whitespace)?;
    let rest = rest.trim_start();
    (is_fence_label(token) && (rest.starts_with('[') || rest.starts_with('{'))).then_some(token)
}

/// Locates the structured payload inside raw provider text.
pub fn extract_payload(raw: &str) -> &str {
    let blocks = fenced_blocks(raw);

    if let Some(block) = blocks.iter().find(|b| b.label.eq_ignore_ascii_case("json")) {
        return block.body;
    }
    if let Some(block) = blocks.first() {
        return block.body;
    }
    raw.trim()
}

// ────────────────────────────────────────────────────────────────────────────
// Normalization
// ────────────────────────────────────────────────────────────────────────────

/// Parses raw provider output into validated judgments, preserving the input
/// order of records that validate.
pub fn normalize(raw: &str) -> Result<Vec<FieldJudgment>, AssessmentError> {
    let payload = extract_payload(raw);

    let parsed: Value = serde_json::from_str(payload).map_err(|e| {
        AssessmentError::MalformedJudgment(format!("payload is not valid JSON: {e}"))
    })?;

    let records = match parsed {
        Value::Array(records) => records,
        other => {
            return Err(AssessmentError::MalformedJudgment(format!(
                "expected an array of judgment records, found {}",
                json_type(&other)
            )))
        }
    };

    let total = records.len();
    let judgments: Vec<FieldJudgment> = records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| match validate_record(index, record) {
            Ok(judgment) => Some(judgment),
            Err(e) => {
                warn!("Dropping judgment record: {e}");
                None
            }
        })
        .collect();

    debug!(total, valid = judgments.len(), "Normalized judgment payload");
    Ok(judgments)
}

/// Validates a single record against the boolean or skill shape.
/// The presence of `parentFieldId` (or `p`) selects the skill shape.
pub fn validate_record(index: usize, record: Value) -> Result<FieldJudgment, AssessmentError> {
    let invalid = |reason: String| AssessmentError::InvalidRecord { index, reason };

    let fields = match record {
        Value::Object(fields) => fields,
        other => return Err(invalid(format!("expected an object, found {}", json_type(&other)))),
    };
    let expanded = Value::Object(expand_record(fields));

    let judgment = if expanded.get("parentFieldId").is_some() {
        serde_json::from_value::<SkillJudgment>(expanded).map(FieldJudgment::Skill)
    } else {
        serde_json::from_value::<BooleanJudgment>(expanded).map(FieldJudgment::Boolean)
    }
    .map_err(|e| invalid(e.to_string()))?;

    if judgment.id().trim().is_empty() {
        return Err(invalid("empty id".to_string()));
    }
    if let FieldJudgment::Skill(skill) = &judgment {
        if skill.parent_field_id.trim().is_empty() {
            return Err(invalid("empty parentFieldId".to_string()));
        }
        if skill.label.trim().is_empty() {
            return Err(invalid("empty label".to_string()));
        }
        if !(skill.exact_match_count.is_finite() && skill.exact_match_count >= 0.0) {
            return Err(invalid(format!(
                "exactMatchCount {} must be a non-negative number",
                skill.exact_match_count
            )));
        }
    }
    let confidence = judgment.confidence();
    if !(0.0..=1.0).contains(&confidence) {
        return Err(invalid(format!("confidence {confidence} outside [0, 1]")));
    }

    Ok(judgment)
}

/// Expands abbreviated keys. When both forms are present the long form wins.
fn expand_record(fields: Map<String, Value>) -> Map<String, Value> {
    let mut expanded = Map::with_capacity(fields.len());
    let mut abbreviated = Vec::new();

    for (key, value) in fields {
        let long = expand_key(&key);
        if long == key {
            expanded.insert(key, value);
        } else {
            abbreviated.push((long.to_string(), value));
        }
    }
    for (long, value) in abbreviated {
        expanded.entry(long).or_insert(value);
    }

    expanded
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
