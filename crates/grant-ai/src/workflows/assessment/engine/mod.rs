//! Assessment orchestration: field extraction, three concurrent scoring
//! tasks against the fund rubric, and the deterministic fallback path.

mod fallback;
mod prompts;
mod response;

pub(crate) use prompts::{TASK_CRITERIA, TASK_FEEDBACK, TASK_OVERALL};

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use super::completion::{CompletionError, CompletionGateway, CompletionTask};
use super::domain::{
    AiStatus, AssessmentDetails, AssessmentOutcome, AssessmentResult, Feedback, FieldExtraction,
    FundBrain, FundId,
};
use super::extraction::FieldExtractor;
use fallback::fallback_assessment;
use prompts::{
    build_criteria_prompt, build_feedback_prompt, build_overall_prompt, CRITERIA_MAX_TOKENS,
    FEEDBACK_MAX_TOKENS, FEEDBACK_TEMPERATURE, OVERALL_MAX_TOKENS, SCORING_TEMPERATURE,
};
use response::{parse_stage, CriteriaResponse, FeedbackResponse, OverallResponse, StageResult};

/// Fatal assessment failures. AI unavailability is not fatal (it triggers
/// the fallback scorer); this covers inputs the pipeline cannot work with.
#[derive(Debug, thiserror::Error)]
pub enum AssessmentError {
    #[error("fund '{fund}' has no assessment criteria configured")]
    EmptyRubric { fund: String },
}

/// Scores one application document against a fund rubric.
pub struct AssessmentEngine<G> {
    gateway: Arc<G>,
    extractor: FieldExtractor<G>,
}

impl<G> AssessmentEngine<G>
where
    G: CompletionGateway,
{
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            extractor: FieldExtractor::new(gateway.clone()),
            gateway,
        }
    }

    /// Assess one document. Returns `Err` only for inputs outside the
    /// anticipated AI-failure path; a dead completion backend still yields
    /// an `Ok` outcome scored by the deterministic fallback.
    pub async fn assess_application(
        &self,
        document_text: &str,
        filename: &str,
        fund_brain: &FundBrain,
        fund_id: &FundId,
        template_placeholders: &[String],
    ) -> Result<AssessmentOutcome, AssessmentError> {
        if fund_brain.criteria.is_empty() {
            return Err(AssessmentError::EmptyRubric {
                fund: fund_brain.fund_name.clone(),
            });
        }

        info!(
            fund = %fund_brain.fund_name,
            filename,
            chars = document_text.len(),
            "assessing application document"
        );

        let mut warnings = Vec::new();

        let extraction = self
            .extractor
            .extract_fields(document_text, template_placeholders)
            .await;
        if !extraction.failed_fields.is_empty() {
            warnings.push(format!(
                "failed to extract {} field(s): {}",
                extraction.failed_fields.len(),
                extraction.failed_fields.join(", ")
            ));
        }

        let tasks = [
            CompletionTask::new(
                TASK_OVERALL,
                build_overall_prompt(fund_brain, document_text),
                OVERALL_MAX_TOKENS,
                SCORING_TEMPERATURE,
            ),
            CompletionTask::new(
                TASK_CRITERIA,
                build_criteria_prompt(fund_brain, document_text),
                CRITERIA_MAX_TOKENS,
                SCORING_TEMPERATURE,
            ),
            CompletionTask::new(
                TASK_FEEDBACK,
                build_feedback_prompt(fund_brain, document_text),
                FEEDBACK_MAX_TOKENS,
                FEEDBACK_TEMPERATURE,
            ),
        ];

        let mut outcomes = self.gateway.execute_tasks(&tasks).await.into_iter();
        let overall = parse_stage::<OverallResponse>(TASK_OVERALL, next_outcome(&mut outcomes, TASK_OVERALL));
        let criteria =
            parse_stage::<CriteriaResponse>(TASK_CRITERIA, next_outcome(&mut outcomes, TASK_CRITERIA));
        let feedback =
            parse_stage::<FeedbackResponse>(TASK_FEEDBACK, next_outcome(&mut outcomes, TASK_FEEDBACK));

        // Feedback failure is non-critical; overall or criteria failure
        // fails the whole AI stage.
        let ai_status = AiStatus::new(
            extraction.ai_used,
            overall.is_success() && criteria.is_success(),
        );

        let result = match (overall, criteria) {
            (StageResult::Success(overall), StageResult::Success(criteria)) => {
                if let StageResult::Failure { reason } = &feedback {
                    warnings.push(format!(
                        "feedback generation unavailable, lists left empty: {reason}"
                    ));
                }
                self.combine(
                    filename,
                    fund_brain,
                    fund_id,
                    &extraction,
                    overall,
                    criteria,
                    feedback,
                    ai_status,
                )
            }
            (overall, criteria) => {
                let overall_reason = match &overall {
                    StageResult::Failure { reason } => Some(reason),
                    StageResult::Success(_) => None,
                };
                let criteria_reason = match &criteria {
                    StageResult::Failure { reason } => Some(reason),
                    StageResult::Success(_) => None,
                };
                for (task, reason) in [(TASK_OVERALL, overall_reason), (TASK_CRITERIA, criteria_reason)] {
                    if let Some(reason) = reason {
                        warnings.push(format!("{task} task failed: {reason}"));
                    }
                }
                warnings.push(
                    "AI assessment unavailable; deterministic fallback scoring applied"
                        .to_string(),
                );
                warn!(fund = %fund_brain.fund_name, filename, "assessment fell back to heuristic scoring");

                let scored = fallback_assessment(document_text, &extraction.data);
                AssessmentResult {
                    fund_id: fund_id.clone(),
                    fund_name: fund_brain.fund_name.clone(),
                    source_filename: filename.to_string(),
                    overall_score: scored.overall_score,
                    criteria_scores: scored.criteria_scores,
                    feedback: scored.feedback,
                    confidence: scored.confidence,
                    flag_for_review: scored.flag_for_review,
                    assessment_details: scored.assessment_details,
                    extracted_fields: extraction.data.clone(),
                    ai_status,
                    assessed_at: Utc::now(),
                }
            }
        };

        Ok(AssessmentOutcome { result, warnings })
    }

    #[allow(clippy::too_many_arguments)]
    fn combine(
        &self,
        filename: &str,
        fund_brain: &FundBrain,
        fund_id: &FundId,
        extraction: &FieldExtraction,
        overall: OverallResponse,
        criteria: CriteriaResponse,
        feedback: StageResult<FeedbackResponse>,
        ai_status: AiStatus,
    ) -> AssessmentResult {
        if let Some(reasoning) = &overall.reasoning {
            debug!(%reasoning, "overall assessment reasoning");
        }
        if !criteria.evidence.is_empty() {
            debug!(evidence = ?criteria.evidence, "criteria scoring evidence");
        }

        let overall_score = clamp_score(overall.overall_score);
        let criteria_scores: BTreeMap<String, u8> = criteria
            .criteria_scores
            .iter()
            .map(|(name, raw)| (name.clone(), clamp_score(*raw)))
            .collect();

        let assessment_details = AssessmentDetails {
            completeness: dimension(&criteria_scores, "completeness", overall_score),
            alignment: dimension(&criteria_scores, "alignment", overall_score),
            innovation: dimension(&criteria_scores, "innovation", overall_score),
            feasibility: dimension(&criteria_scores, "feasibility", overall_score),
        };

        let feedback = feedback
            .success()
            .map(|parsed| Feedback {
                strengths: parsed.feedback.strengths,
                weaknesses: parsed.feedback.weaknesses,
                suggestions: parsed.feedback.suggestions,
            })
            .unwrap_or_default();

        AssessmentResult {
            fund_id: fund_id.clone(),
            fund_name: fund_brain.fund_name.clone(),
            source_filename: filename.to_string(),
            overall_score,
            criteria_scores,
            feedback,
            confidence: clamp_unit(overall.confidence.unwrap_or(0.7)),
            flag_for_review: overall.flag_for_review.unwrap_or(false),
            assessment_details,
            extracted_fields: extraction.data.clone(),
            ai_status,
            assessed_at: Utc::now(),
        }
    }
}

fn next_outcome(
    outcomes: &mut std::vec::IntoIter<Result<String, CompletionError>>,
    task: &str,
) -> Result<String, CompletionError> {
    outcomes.next().unwrap_or_else(|| {
        Err(CompletionError::Backend {
            task: task.to_string(),
            message: "batch result missing".to_string(),
        })
    })
}

/// Case-insensitive lookup of one fixed sub-dimension, defaulting to the
/// overall score when the response omitted it.
fn dimension(scores: &BTreeMap<String, u8>, name: &str, default: u8) -> u8 {
    scores
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, score)| *score)
        .unwrap_or(default)
}

fn clamp_score(raw: f64) -> u8 {
    if raw.is_finite() {
        raw.round().clamp(0.0, 100.0) as u8
    } else {
        0
    }
}

fn clamp_unit(raw: f64) -> f32 {
    if raw.is_finite() {
        raw.clamp(0.0, 1.0) as f32
    } else {
        0.0
    }
}
