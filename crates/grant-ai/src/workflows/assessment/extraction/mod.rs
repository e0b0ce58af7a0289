//! Field extraction: four category-scoped completion tasks with a
//! deterministic regex fallback and per-field provenance.

pub(crate) mod fallback;
mod schema;

pub use schema::ExtractionCategory;
pub(crate) use schema::{truncate_for_prompt, MAX_PROMPT_DOCUMENT_CHARS};

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use rand::Rng;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::completion::{CompletionGateway, CompletionTask};
use super::domain::{ExtractedApplicationData, FieldExtraction, FieldOutcome};
use schema::{
    build_extraction_prompt, fields_for, FieldSpec, EXTRACTION_MAX_TOKENS, EXTRACTION_TEMPERATURE,
};

/// Decomposes a raw document into category-scoped extraction tasks.
pub struct FieldExtractor<G> {
    gateway: Arc<G>,
}

impl<G> FieldExtractor<G>
where
    G: CompletionGateway,
{
    pub fn new(gateway: Arc<G>) -> Self {
        Self { gateway }
    }

    /// Extract the structured fields from one document.
    ///
    /// Never fails as a whole: category failures degrade to regex recovery,
    /// and fields neither path can supply are recorded in `failed_fields`
    /// with their reason kept in `extraction_details`.
    pub async fn extract_fields(
        &self,
        document_text: &str,
        template_placeholders: &[String],
    ) -> FieldExtraction {
        let mut data = ExtractedApplicationData {
            application_reference: generate_application_reference(),
            ..ExtractedApplicationData::default()
        };
        let mut extraction_details = BTreeMap::new();
        extraction_details.insert("application_reference".to_string(), FieldOutcome::Generated);
        let mut failed_fields = Vec::new();
        let mut ai_used = false;

        let mut dispatched = Vec::new();
        let mut tasks = Vec::new();
        for category in ExtractionCategory::ALL {
            match build_extraction_prompt(category, document_text, template_placeholders) {
                Ok(prompt) => {
                    dispatched.push(category);
                    tasks.push(CompletionTask::new(
                        format!("extract_{}", category.label()),
                        prompt,
                        EXTRACTION_MAX_TOKENS,
                        EXTRACTION_TEMPERATURE,
                    ));
                }
                Err(err) => {
                    // Category-level failure: every field in the category is
                    // marked failed, the remaining categories still run.
                    warn!(
                        category = category.label(),
                        error = %err,
                        "extraction prompt could not be built"
                    );
                    let reason = format!("category failed: {err}");
                    for spec in fields_for(category) {
                        extraction_details.insert(
                            spec.name.to_string(),
                            FieldOutcome::Failed {
                                reason: reason.clone(),
                            },
                        );
                        failed_fields.push(spec.name.to_string());
                    }
                }
            }
        }

        let responses = self.gateway.execute_tasks(&tasks).await;

        for (category, response) in dispatched.into_iter().zip(responses) {
            let parsed = response.as_deref().ok().and_then(first_json_object);

            match parsed {
                Some(object) => {
                    ai_used = true;
                    for spec in fields_for(category) {
                        if assign_field(spec, object.get(spec.name), &mut data) {
                            extraction_details
                                .insert(spec.name.to_string(), FieldOutcome::Completion);
                        } else {
                            extraction_details.insert(
                                spec.name.to_string(),
                                FieldOutcome::Failed {
                                    reason: "value not present in completion response"
                                        .to_string(),
                                },
                            );
                            failed_fields.push(spec.name.to_string());
                        }
                    }
                }
                None => {
                    let reason = match &response {
                        Err(err) => err.to_string(),
                        Ok(_) => "no JSON object in completion response".to_string(),
                    };
                    debug!(
                        category = category.label(),
                        %reason,
                        "falling back to pattern extraction"
                    );
                    for spec in fields_for(category) {
                        if fallback::recover(spec.name, document_text, &mut data) {
                            extraction_details
                                .insert(spec.name.to_string(), FieldOutcome::Fallback);
                        } else {
                            extraction_details.insert(
                                spec.name.to_string(),
                                FieldOutcome::Failed {
                                    reason: reason.clone(),
                                },
                            );
                            failed_fields.push(spec.name.to_string());
                        }
                    }
                }
            }
        }

        FieldExtraction {
            success: failed_fields.is_empty(),
            ai_used,
            data,
            failed_fields,
            extraction_details,
        }
    }
}

/// Synthesize the always-present application reference:
/// `APP-YYYYMMDD-` plus six random base36 (uppercase) characters.
pub(crate) fn generate_application_reference() -> String {
    const ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    let mut rng = rand::thread_rng();
    let suffix: String = (0..6)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect();
    format!("APP-{}-{}", Utc::now().format("%Y%m%d"), suffix)
}

/// Locate the first balanced top-level `{...}` span and parse it as a JSON
/// object. Tolerates prose or markdown fences around the object.
pub(crate) fn first_json_object(text: &str) -> Option<Map<String, Value>> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    let candidate = &text[start..start + offset + ch.len_utf8()];
                    return serde_json::from_str::<Value>(candidate)
                        .ok()
                        .and_then(|value| match value {
                            Value::Object(map) => Some(map),
                            _ => None,
                        });
                }
            }
            _ => {}
        }
    }

    None
}

fn coerce_text(value: &Value) -> Option<String> {
    value
        .as_str()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

fn coerce_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(flag) => Some(*flag),
        Value::String(text) => match text.trim().to_ascii_lowercase().as_str() {
            "yes" | "true" => Some(true),
            "no" | "false" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn coerce_int(value: &Value) -> Option<u32> {
    match value {
        Value::Number(number) => number.as_u64().and_then(|raw| u32::try_from(raw).ok()),
        Value::String(text) => text.trim().parse::<u32>().ok(),
        _ => None,
    }
}

fn coerce_amount(value: &Value) -> Option<u64> {
    match value {
        Value::Number(number) => number
            .as_u64()
            .or_else(|| number.as_f64().filter(|raw| *raw >= 0.0).map(|raw| raw.round() as u64)),
        Value::String(text) => {
            let cleaned: String = text
                .chars()
                .filter(|ch| ch.is_ascii_digit())
                .collect();
            cleaned.parse::<u64>().ok()
        }
        _ => None,
    }
}

/// Copy one parsed value into the extracted record. Null, absent, and
/// empty-string values count as absent; unknown keys never reach here.
fn assign_field(
    spec: &FieldSpec,
    value: Option<&Value>,
    data: &mut ExtractedApplicationData,
) -> bool {
    let Some(value) = value else {
        return false;
    };
    if value.is_null() {
        return false;
    }

    match spec.name {
        "organisation_name" => {
            data.organisation_name = coerce_text(value);
            data.organisation_name.is_some()
        }
        "contact_email" => {
            data.contact_email = coerce_text(value);
            data.contact_email.is_some()
        }
        "entity_type_confirmed" => {
            data.entity_type_confirmed = coerce_bool(value);
            data.entity_type_confirmed.is_some()
        }
        "total_funding_requested" => {
            data.total_funding_requested = coerce_amount(value);
            data.total_funding_requested.is_some()
        }
        "financially_viable" => {
            data.financially_viable = coerce_bool(value);
            data.financially_viable.is_some()
        }
        "upfront_costs_manageable" => {
            data.upfront_costs_manageable = coerce_bool(value);
            data.upfront_costs_manageable.is_some()
        }
        "project_duration_months" => {
            data.project_duration_months = coerce_int(value);
            data.project_duration_months.is_some()
        }
        "business_summary" => {
            data.business_summary = coerce_text(value);
            data.business_summary.is_some()
        }
        "rd_history" => {
            data.rd_history = coerce_text(value);
            data.rd_history.is_some()
        }
        "rd_plans" => {
            data.rd_plans = coerce_text(value);
            data.rd_plans.is_some()
        }
        "number_of_students" => {
            data.number_of_students = coerce_int(value);
            data.number_of_students.is_some()
        }
        "student_exposure_description" => {
            data.student_exposure_description = coerce_text(value);
            data.student_exposure_description.is_some()
        }
        _ => false,
    }
}
