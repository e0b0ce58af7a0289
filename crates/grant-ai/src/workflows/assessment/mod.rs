//! Document assessment pipeline: field extraction, rubric scoring with an
//! explicit fallback path, and the completion-service boundary.

pub mod completion;
pub mod domain;
pub mod engine;
pub mod extraction;
pub mod router;

#[cfg(test)]
mod tests;

pub use completion::{
    CompletionError, CompletionGateway, CompletionTask, HttpCompletionClient,
};
pub use domain::{
    AiStatus, AssessmentCriterion, AssessmentDetails, AssessmentOutcome, AssessmentResult,
    ExtractedApplicationData, Feedback, FieldExtraction, FieldOutcome, FundBrain, FundId,
    SuccessPatterns, STAGE_AI_ASSESSMENT, STAGE_FIELD_EXTRACTION,
};
pub use engine::{AssessmentEngine, AssessmentError};
pub use extraction::{ExtractionCategory, FieldExtractor};
pub use router::{assessment_router, AssessmentApi};
