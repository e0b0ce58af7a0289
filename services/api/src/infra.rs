use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use async_trait::async_trait;
use metrics_exporter_prometheus::PrometheusHandle;

use grant_ai::workflows::assessment::{
    AssessmentCriterion, CompletionError, CompletionGateway, CompletionTask, FundBrain,
    SuccessPatterns,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Gateway that reports the completion service as unavailable, driving
/// every assessment down the deterministic fallback path. Used by the
/// offline `assess` command and by tests.
#[derive(Debug, Default, Clone)]
pub(crate) struct OfflineCompletionGateway;

#[async_trait]
impl CompletionGateway for OfflineCompletionGateway {
    async fn execute_task(&self, task: &CompletionTask) -> Result<String, CompletionError> {
        Err(CompletionError::Transport {
            task: task.name.clone(),
            message: "completion service disabled".to_string(),
        })
    }
}

/// Built-in rubric used when no fund configuration is supplied, so demos
/// and smoke tests can run without fund setup.
pub(crate) fn default_fund_brain() -> FundBrain {
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
                key_indicators: vec!["credible budget".to_string(), "match funding".to_string()],
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
            common_strengths: vec![
                "strong industry partnerships".to_string(),
                "quantified delivery milestones".to_string(),
            ],
            key_indicators: vec!["quantified outcomes".to_string()],
        },
        assessment_instructions: "Prioritise applications pairing credible R&D plans with \
                                  meaningful student placements."
            .to_string(),
    }
}
