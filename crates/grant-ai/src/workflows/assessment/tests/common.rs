use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::workflows::assessment::completion::{
    CompletionError, CompletionGateway, CompletionTask,
};
use crate::workflows::assessment::domain::{
    AssessmentCriterion, FundBrain, FundId, SuccessPatterns,
};
use crate::workflows::assessment::engine::AssessmentEngine;
use crate::workflows::assessment::extraction::FieldExtractor;

/// Gateway scripted per task name; unscripted tasks fail. Records every
/// dispatched task so tests can assert fan-out behavior.
#[derive(Default)]
pub(super) struct ScriptedGateway {
    responses: HashMap<String, Result<String, CompletionError>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedGateway {
    pub(super) fn new() -> Self {
        Self::default()
    }

    pub(super) fn with_response(mut self, task: &str, body: impl Into<String>) -> Self {
        self.responses.insert(task.to_string(), Ok(body.into()));
        self
    }

    pub(super) fn with_failure(mut self, task: &str) -> Self {
        self.responses.insert(
            task.to_string(),
            Err(CompletionError::Backend {
                task: task.to_string(),
                message: "scripted failure".to_string(),
            }),
        );
        self
    }

    pub(super) fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("call log mutex poisoned").clone()
    }
}

#[async_trait]
impl CompletionGateway for ScriptedGateway {
    async fn execute_task(&self, task: &CompletionTask) -> Result<String, CompletionError> {
        self.calls
            .lock()
            .expect("call log mutex poisoned")
            .push(task.name.clone());
        match self.responses.get(&task.name) {
            Some(result) => result.clone(),
            None => Err(CompletionError::Backend {
                task: task.name.clone(),
                message: "no scripted response".to_string(),
            }),
        }
    }
}

/// Gateway that reports the completion service as unreachable for every
/// task, driving both extraction and assessment down their fallback paths.
pub(super) struct OfflineGateway;

#[async_trait]
impl CompletionGateway for OfflineGateway {
    async fn execute_task(&self, task: &CompletionTask) -> Result<String, CompletionError> {
        Err(CompletionError::Transport {
            task: task.name.clone(),
            message: "completion service unavailable".to_string(),
        })
    }
}

pub(super) fn fund_brain() -> FundBrain {
    FundBrain {
        fund_name: "Innovation Growth Fund".to_string(),
        criteria: vec![
            AssessmentCriterion {
                name: "Strategic alignment".to_string(),
                description: "Fit with the fund's published priorities".to_string(),
                weight: 0.3,
                key_indicators: vec![
                    "clear sector focus".to_string(),
                    "references fund objectives".to_string(),
                ],
            },
            AssessmentCriterion {
                name: "Innovation".to_string(),
                description: "Novelty of the proposed R&D activity".to_string(),
                weight: 0.3,
                key_indicators: vec!["goes beyond routine development".to_string()],
            },
            AssessmentCriterion {
                name: "Financial viability".to_string(),
                description: "Ability to sustain the project financially".to_string(),
                weight: 0.2,
                key_indicators: vec!["credible budget".to_string()],
            },
            AssessmentCriterion {
                name: "Student development".to_string(),
                description: "Quality of industry exposure offered to students".to_string(),
                weight: 0.2,
                key_indicators: vec!["named placement activities".to_string()],
            },
        ],
        success_patterns: SuccessPatterns {
            average_score: 74.0,
            common_strengths: vec!["strong industry partnerships".to_string()],
            key_indicators: vec!["quantified outcomes".to_string()],
        },
        assessment_instructions: "Prioritise applications pairing credible R&D plans with \
                                  meaningful student placements."
            .to_string(),
    }
}

pub(super) fn fund_id() -> FundId {
    FundId("fund-001".to_string())
}

pub(super) fn extractor_with(gateway: ScriptedGateway) -> FieldExtractor<ScriptedGateway> {
    FieldExtractor::new(Arc::new(gateway))
}

pub(super) fn engine_with(gateway: ScriptedGateway) -> AssessmentEngine<ScriptedGateway> {
    AssessmentEngine::new(Arc::new(gateway))
}

pub(super) fn offline_engine() -> AssessmentEngine<OfflineGateway> {
    AssessmentEngine::new(Arc::new(OfflineGateway))
}

pub(super) const ORGANIZATION_JSON: &str = r#"{
    "organisation_name": "Acme Research Ltd",
    "contact_email": "grants@acme-research.co.uk",
    "entity_type_confirmed": true
}"#;

pub(super) const FINANCIAL_JSON: &str = r#"{
    "total_funding_requested": 125000,
    "financially_viable": true,
    "upfront_costs_manageable": true,
    "project_duration_months": 18
}"#;

pub(super) const BUSINESS_JSON: &str = r#"{
    "business_summary": "Develops diagnostic sensors for agriculture",
    "rd_history": "Two years of prototype development",
    "rd_plans": "Field trials of the second-generation array"
}"#;

pub(super) const STUDENT_JSON: &str = r#"{
    "number_of_students": 4,
    "student_exposure_description": "Students join sprint reviews and field trials"
}"#;

pub(super) const OVERALL_JSON: &str = r#"{
    "overallScore": 82,
    "confidence": 0.9,
    "flagForReview": false,
    "reasoning": "Strong alignment with the fund priorities."
}"#;

pub(super) const CRITERIA_JSON: &str = r#"{
    "criteriaScores": {
        "completeness": 88,
        "alignment": 75,
        "innovation": 70,
        "feasibility": 80
    },
    "evidence": {
        "completeness": "All sections answered",
        "alignment": "Sector focus matches the fund",
        "innovation": "Novel sensor design",
        "feasibility": "Costed delivery plan"
    }
}"#;

pub(super) const FEEDBACK_JSON: &str = r#"{
    "feedback": {
        "strengths": ["Credible R&D plan"],
        "weaknesses": ["Student placement detail is thin"],
        "suggestions": ["Name the placement supervisor"]
    }
}"#;

pub(super) fn gateway_with_extraction_responses() -> ScriptedGateway {
    ScriptedGateway::new()
        .with_response("extract_organization", ORGANIZATION_JSON)
        .with_response("extract_financial", FINANCIAL_JSON)
        .with_response("extract_business", BUSINESS_JSON)
        .with_response("extract_student", STUDENT_JSON)
}
