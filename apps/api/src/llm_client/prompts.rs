// Shared prompt constants and prompt-building utilities.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// System prompt fragment that enforces JSON-array-only output.
pub const JSON_ARRAY_ONLY: &str = "You MUST respond with a valid JSON array only. \
    Do NOT include any text outside the JSON array. \
    Do NOT include explanations or apologies.";

/// Instruction that keeps judgments tied to what the documents actually say.
pub const EVIDENCE_INSTRUCTION: &str = "\
    CRITICAL: Base every verdict strictly on the resume and job description provided. \
    Do NOT assume the candidate has a skill or attribute that is not evidenced in the resume. \
    When the evidence is ambiguous, lower `confidence` rather than guessing a positive verdict.";
