//! Deterministic template filling: maps a finished assessment onto a
//! placeholder-bearing output document, reporting exactly which placeholders
//! could not be resolved.

mod context;
pub mod domain;
mod mapping;
mod report;
mod resolve;

#[cfg(test)]
mod tests;

pub use domain::{
    OutputTemplate, ProcessedFormat, TemplateKind, TemplateMetadata, TemplateProcessingResult,
};

use tracing::{debug, warn};

use crate::workflows::assessment::domain::AssessmentResult;
use mapping::direct_data_mapping;
use resolve::resolve_placeholder;

/// Fills output templates from assessment records. No AI anywhere in this
/// path; identical inputs always produce identical output.
#[derive(Debug, Default)]
pub struct TemplateEngine;

impl TemplateEngine {
    pub fn new() -> Self {
        Self
    }

    /// Apply one template. Placeholders are processed strictly in
    /// declaration order and every literal occurrence of a resolved token is
    /// replaced, so substitution order is an observable contract.
    pub fn apply_template(
        &self,
        assessment: &AssessmentResult,
        template: &OutputTemplate,
    ) -> TemplateProcessingResult {
        let metadata = TemplateMetadata {
            fund_name: assessment.fund_name.clone(),
            source_filename: assessment.source_filename.clone(),
            assessed_at: assessment.assessed_at,
            template_id: template.template_id.clone(),
            format_version: template.format_version.clone(),
        };

        match template.kind {
            TemplateKind::StandardReport => TemplateProcessingResult {
                success: true,
                template_format: ProcessedFormat::StandardReport,
                filled_content: Some(report::render_standard_report(assessment)),
                placeholders: Vec::new(),
                replacements_made: 0,
                failed_replacements: Vec::new(),
                metadata,
                warnings: Vec::new(),
            },
            TemplateKind::RawPlaceholders => {
                let (Some(raw_content), Some(placeholders)) =
                    (&template.raw_content, &template.placeholders)
                else {
                    warn!(
                        template_id = %template.template_id,
                        "raw template rejected: missing raw content or placeholder list"
                    );
                    return TemplateProcessingResult {
                        success: false,
                        template_format: ProcessedFormat::Error,
                        filled_content: None,
                        placeholders: template.placeholders.clone().unwrap_or_default(),
                        replacements_made: 0,
                        failed_replacements: template.placeholders.clone().unwrap_or_default(),
                        metadata,
                        warnings: vec![
                            "template rejected: raw placeholder template lacks raw content or placeholder list"
                                .to_string(),
                        ],
                    };
                };

                self.fill_raw_template(assessment, raw_content, placeholders, metadata)
            }
        }
    }

    fn fill_raw_template(
        &self,
        assessment: &AssessmentResult,
        raw_content: &str,
        placeholders: &[String],
        metadata: TemplateMetadata,
    ) -> TemplateProcessingResult {
        let direct = direct_data_mapping(assessment);
        let mut body = raw_content.to_string();
        let mut replacements_made = 0;
        let mut failed_replacements = Vec::new();
        let mut warnings = Vec::new();

        for placeholder in placeholders {
            // Resolution consults the current body so line context reflects
            // earlier substitutions.
            match resolve_placeholder(placeholder, assessment, &direct, &body) {
                Some(value) => {
                    let occurrences = body.matches(placeholder.as_str()).count();
                    if occurrences == 0 {
                        warnings.push(format!(
                            "placeholder '{placeholder}' resolved but not found in template content"
                        ));
                        failed_replacements.push(placeholder.clone());
                    } else {
                        debug!(%placeholder, occurrences, "replacing placeholder");
                        body = body.replace(placeholder.as_str(), &value);
                        replacements_made += occurrences;
                    }
                }
                None => {
                    warnings.push(format!("no data mapping for placeholder '{placeholder}'"));
                    failed_replacements.push(placeholder.clone());
                }
            }
        }

        TemplateProcessingResult {
            success: failed_replacements.is_empty(),
            template_format: ProcessedFormat::RawPlaceholders,
            filled_content: Some(body),
            placeholders: placeholders.to_vec(),
            replacements_made,
            failed_replacements,
            metadata,
            warnings,
        }
    }
}
