//! Assessment Runner: Orchestrates one scan end to end.
//!
//! Flow: build_request (per category) → provider.judge (concurrently) →
//!       normalize → aggregate → extract_improvements → ScanReport.
//!
//! Per-category error isolation: a category whose request, provider call or
//! normalization fails is recorded in `failed_categories` and scored as empty.
//! The scan itself never fails.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::assessment::aggregator::{aggregate, CategoryScore};
use crate::assessment::catalog::{Category, FieldCatalog};
use crate::assessment::improvements::{extract_improvements, Improvement};
use crate::assessment::judgment::FieldJudgment;
use crate::assessment::normalizer::normalize;
use crate::assessment::provider::JudgmentProvider;
use crate::assessment::request_builder::build_request;
use crate::errors::AssessmentError;
use crate::models::context::{JobContext, ResumeContext};

pub const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_secs(90);

#[derive(Debug, Clone)]
pub struct AssessmentOptions {
    /// Upper bound on a single category's provider call.
    pub provider_timeout: Duration,
}

impl Default for AssessmentOptions {
    fn default() -> Self {
        Self {
            provider_timeout: DEFAULT_PROVIDER_TIMEOUT,
        }
    }
}

/// A category that contributed no judgments because a stage failed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryFailure {
    pub category: Category,
    pub error: String,
}

/// Full scan result returned to callers.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub scan_id: Uuid,
    pub scanned_at: DateTime<Utc>,
    pub overall_score: u32, // 0 – 100
    pub categories: BTreeMap<Category, CategoryScore>,
    pub improvements: BTreeMap<Category, Vec<Improvement>>,
    pub judgments: Vec<FieldJudgment>,
    pub partial: bool,
    pub failed_categories: Vec<CategoryFailure>,
}

/// Runs all four category assessments and assembles the report.
pub async fn run_assessment(
    provider: &dyn JudgmentProvider,
    catalog: &FieldCatalog,
    job: &JobContext,
    resume: &ResumeContext,
    options: &AssessmentOptions,
) -> ScanReport {
    let scan_id = Uuid::new_v4();
    info!("Starting scan {scan_id} for '{}'", job.title);

    let outcomes = join_all(Category::ALL.iter().map(|&category| async move {
        let outcome = assess_category(provider, catalog, category, job, resume, options).await;
        (category, outcome)
    }))
    .await;

    let mut judgments = Vec::new();
    let mut failed_categories = Vec::new();

    for (category, outcome) in outcomes {
        match outcome {
            Ok(category_judgments) => {
                info!(
                    category = %category,
                    judgments = category_judgments.len(),
                    "Category assessed"
                );
                judgments.extend(category_judgments);
            }
            Err(e) => {
                warn!(category = %category, error = %e, "Category failed; scoring as empty");
                failed_categories.push(CategoryFailure {
                    category,
                    error: e.to_string(),
                });
            }
        }
    }

    let aggregation = aggregate(&judgments, catalog);
    let improvements = extract_improvements(&judgments, catalog);

    info!(
        "Scan {scan_id} complete: overall {}/100 ({} failed categories)",
        aggregation.overall,
        failed_categories.len()
    );

    ScanReport {
        scan_id,
        scanned_at: Utc::now(),
        overall_score: aggregation.overall,
        categories: aggregation.categories,
        improvements,
        judgments,
        partial: !failed_categories.is_empty(),
        failed_categories,
    }
}

async fn assess_category(
    provider: &dyn JudgmentProvider,
    catalog: &FieldCatalog,
    category: Category,
    job: &JobContext,
    resume: &ResumeContext,
    options: &AssessmentOptions,
) -> Result<Vec<FieldJudgment>, AssessmentError> {
    let request = build_request(catalog, category, job, resume)?;

    let raw = tokio::time::timeout(options.provider_timeout, provider.judge(&request))
        .await
        .map_err(|_| AssessmentError::ProviderTimeout {
            category,
            seconds: options.provider_timeout.as_secs(),
        })??;

    let judgments = normalize(&raw)?;
    Ok(retain_expected(category, &request.expected_field_ids, judgments))
}

/// Keeps only judgments for fields this category's request asked about, so a
/// response can never score fields owned by another category.
fn retain_expected(
    category: Category,
    expected_field_ids: &[String],
    judgments: Vec<FieldJudgment>,
) -> Vec<FieldJudgment> {
    let (kept, unexpected): (Vec<_>, Vec<_>) = judgments
        .into_iter()
        .partition(|j| expected_field_ids.iter().any(|id| id == j.field_id()));

    for judgment in &unexpected {
        warn!(
            category = %category,
            field = judgment.field_id(),
            "Dropping judgment for a field outside the requested category"
        );
    }

    let missing: Vec<&str> = expected_field_ids
        .iter()
        .map(String::as_str)
        .filter(|id| !kept.iter().any(|j| j.field_id() == *id))
        .collect();
    if !missing.is_empty() {
        debug!(category = %category, ?missing, "Response did not cover every requested field");
    }

    kept
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
