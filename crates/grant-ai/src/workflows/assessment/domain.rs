use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for configured funding programmes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FundId(pub String);

/// Pipeline stage label recorded in [`AiStatus`] task lists.
pub const STAGE_FIELD_EXTRACTION: &str = "field_extraction";
/// Pipeline stage label recorded in [`AiStatus`] task lists.
pub const STAGE_AI_ASSESSMENT: &str = "ai_assessment";

/// Sparse record of fields pulled from one application document.
///
/// Every field is optional except `application_reference`, which is
/// synthesized per run and never extracted from the document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedApplicationData {
    pub application_reference: String,
    pub organisation_name: Option<String>,
    pub contact_email: Option<String>,
    pub entity_type_confirmed: Option<bool>,
    pub total_funding_requested: Option<u64>,
    pub financially_viable: Option<bool>,
    pub upfront_costs_manageable: Option<bool>,
    pub project_duration_months: Option<u32>,
    pub business_summary: Option<String>,
    pub rd_history: Option<String>,
    pub rd_plans: Option<String>,
    pub number_of_students: Option<u32>,
    pub student_exposure_description: Option<String>,
}

/// Per-field provenance so downstream consumers can judge trustworthiness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum FieldOutcome {
    /// Supplied by a successful completion-service call.
    Completion,
    /// Recovered by the deterministic regex fallback.
    Fallback,
    /// Synthesized by this pipeline (application reference only).
    Generated,
    /// Could not be supplied by either path.
    Failed { reason: String },
}

impl FieldOutcome {
    pub fn succeeded(&self) -> bool {
        !matches!(self, FieldOutcome::Failed { .. })
    }
}

/// Aggregate outcome of one field-extraction run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldExtraction {
    /// True only when zero fields failed across all categories.
    pub success: bool,
    /// True when at least one category's completion call yielded usable JSON.
    pub ai_used: bool,
    pub data: ExtractedApplicationData,
    pub failed_fields: Vec<String>,
    pub extraction_details: BTreeMap<String, FieldOutcome>,
}

/// One named, weighted rubric dimension belonging to a [`FundBrain`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentCriterion {
    pub name: String,
    pub description: String,
    pub weight: f32,
    pub key_indicators: Vec<String>,
}

/// Aggregate statistics from historically successful applications.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SuccessPatterns {
    pub average_score: f32,
    pub common_strengths: Vec<String>,
    pub key_indicators: Vec<String>,
}

/// The read-only rubric for one fund, supplied by fund configuration storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundBrain {
    pub fund_name: String,
    pub criteria: Vec<AssessmentCriterion>,
    pub success_patterns: SuccessPatterns,
    pub assessment_instructions: String,
}

/// The four fixed assessment sub-dimensions, each in [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentDetails {
    pub completeness: u8,
    pub alignment: u8,
    pub innovation: u8,
    pub feasibility: u8,
}

/// Reviewer-facing feedback lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub suggestions: Vec<String>,
}

/// Records which pipeline stages actually used the completion service.
///
/// This is a first-class contract for human reviewers, not incidental
/// logging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiStatus {
    pub extraction_used_ai: bool,
    pub assessment_used_ai: bool,
    pub successful_ai_tasks: Vec<String>,
    pub failed_ai_tasks: Vec<String>,
}

impl AiStatus {
    pub fn new(extraction_used_ai: bool, assessment_used_ai: bool) -> Self {
        let mut successful_ai_tasks = Vec::new();
        let mut failed_ai_tasks = Vec::new();
        for (stage, used) in [
            (STAGE_FIELD_EXTRACTION, extraction_used_ai),
            (STAGE_AI_ASSESSMENT, assessment_used_ai),
        ] {
            if used {
                successful_ai_tasks.push(stage.to_string());
            } else {
                failed_ai_tasks.push(stage.to_string());
            }
        }

        Self {
            extraction_used_ai,
            assessment_used_ai,
            successful_ai_tasks,
            failed_ai_tasks,
        }
    }
}

/// The immutable output of one assessment run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentResult {
    pub fund_id: FundId,
    pub fund_name: String,
    pub source_filename: String,
    pub overall_score: u8,
    pub criteria_scores: BTreeMap<String, u8>,
    pub feedback: Feedback,
    pub confidence: f32,
    pub flag_for_review: bool,
    pub assessment_details: AssessmentDetails,
    pub extracted_fields: ExtractedApplicationData,
    pub ai_status: AiStatus,
    pub assessed_at: DateTime<Utc>,
}

/// Assessment result plus the warnings accumulated while producing it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentOutcome {
    pub result: AssessmentResult,
    pub warnings: Vec<String>,
}
