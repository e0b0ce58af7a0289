use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Template kinds accepted by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateKind {
    /// Raw text carrying literal placeholder tokens to substitute.
    RawPlaceholders,
    /// No placeholders; the engine renders its fixed plain-text report.
    StandardReport,
}

/// An output template registered by an external collaborator. Placeholder
/// discovery happens upstream; this core only consumes the supplied list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputTemplate {
    pub template_id: String,
    pub format_version: String,
    pub kind: TemplateKind,
    pub raw_content: Option<String>,
    pub placeholders: Option<Vec<String>>,
}

/// Format label recorded on a processing result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessedFormat {
    RawPlaceholders,
    StandardReport,
    /// The template was rejected before any substitution was attempted.
    Error,
}

/// Provenance block attached to every processing result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateMetadata {
    pub fund_name: String,
    pub source_filename: String,
    pub assessed_at: DateTime<Utc>,
    pub template_id: String,
    pub format_version: String,
}

/// Output of one template-filling run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateProcessingResult {
    pub success: bool,
    pub template_format: ProcessedFormat,
    pub filled_content: Option<String>,
    pub placeholders: Vec<String>,
    /// Total occurrences replaced across the template body.
    pub replacements_made: usize,
    pub failed_replacements: Vec<String>,
    pub metadata: TemplateMetadata,
    pub warnings: Vec<String>,
}
