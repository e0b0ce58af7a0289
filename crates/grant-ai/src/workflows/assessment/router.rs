use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use crate::workflows::templating::{OutputTemplate, TemplateEngine, TemplateProcessingResult};

use super::completion::CompletionGateway;
use super::domain::{AssessmentResult, FundBrain, FundId};
use super::engine::{AssessmentEngine, AssessmentError};

/// Shared state for the assessment endpoints: one engine and one template
/// engine, both constructed at process start.
pub struct AssessmentApi<G> {
    pub engine: Arc<AssessmentEngine<G>>,
    pub templates: Arc<TemplateEngine>,
}

impl<G> Clone for AssessmentApi<G> {
    fn clone(&self) -> Self {
        Self {
            engine: self.engine.clone(),
            templates: self.templates.clone(),
        }
    }
}

/// Router builder exposing HTTP endpoints for assessment and template
/// filling.
pub fn assessment_router<G>(api: AssessmentApi<G>) -> Router
where
    G: CompletionGateway + 'static,
{
    Router::new()
        .route("/api/v1/assessments", post(assess_handler::<G>))
        .route(
            "/api/v1/templates/apply",
            post(apply_template_handler::<G>),
        )
        .with_state(api)
}

#[derive(Debug, Deserialize)]
pub(crate) struct AssessmentRequest {
    pub(crate) document_text: String,
    pub(crate) filename: String,
    pub(crate) fund_id: String,
    pub(crate) fund_brain: FundBrain,
    #[serde(default)]
    pub(crate) template_placeholders: Vec<String>,
}

pub(crate) async fn assess_handler<G>(
    State(api): State<AssessmentApi<G>>,
    Json(request): Json<AssessmentRequest>,
) -> Response
where
    G: CompletionGateway + 'static,
{
    let fund_id = FundId(request.fund_id);
    match api
        .engine
        .assess_application(
            &request.document_text,
            &request.filename,
            &request.fund_brain,
            &fund_id,
            &request.template_placeholders,
        )
        .await
    {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(error @ AssessmentError::EmptyRubric { .. }) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct TemplateApplyRequest {
    pub(crate) assessment: AssessmentResult,
    pub(crate) template: OutputTemplate,
}

pub(crate) async fn apply_template_handler<G>(
    State(api): State<AssessmentApi<G>>,
    Json(request): Json<TemplateApplyRequest>,
) -> Json<TemplateProcessingResult>
where
    G: CompletionGateway + 'static,
{
    Json(
        api.templates
            .apply_template(&request.assessment, &request.template),
    )
}
