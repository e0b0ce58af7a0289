//! Typed parsing of the three assessment task responses. Parse failures are
//! checked variants, not exceptions: every stage lands in a [`StageResult`].

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::workflows::assessment::completion::CompletionError;
use crate::workflows::assessment::extraction::first_json_object;

/// Outcome of parsing one assessment stage response.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum StageResult<T> {
    Success(T),
    Failure { reason: String },
}

impl<T> StageResult<T> {
    pub(crate) fn success(self) -> Option<T> {
        match self {
            StageResult::Success(value) => Some(value),
            StageResult::Failure { .. } => None,
        }
    }

    pub(crate) fn is_success(&self) -> bool {
        matches!(self, StageResult::Success(_))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OverallResponse {
    pub overall_score: f64,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub flag_for_review: Option<bool>,
    #[serde(default)]
    pub reasoning: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CriteriaResponse {
    pub criteria_scores: BTreeMap<String, f64>,
    #[serde(default)]
    pub evidence: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub(crate) struct FeedbackResponse {
    pub feedback: FeedbackBody,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub(crate) struct FeedbackBody {
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

/// Turn one raw task outcome into a typed stage result by locating the first
/// JSON object in the response text and deserializing it.
pub(crate) fn parse_stage<T: DeserializeOwned>(
    task: &str,
    outcome: Result<String, CompletionError>,
) -> StageResult<T> {
    let text = match outcome {
        Ok(text) => text,
        Err(err) => {
            return StageResult::Failure {
                reason: err.to_string(),
            }
        }
    };

    let Some(object) = first_json_object(&text) else {
        return StageResult::Failure {
            reason: format!("no JSON object in '{task}' response"),
        };
    };

    match serde_json::from_value(serde_json::Value::Object(object)) {
        Ok(parsed) => StageResult::Success(parsed),
        Err(err) => StageResult::Failure {
            reason: format!("'{task}' response did not match the expected shape: {err}"),
        },
    }
}
