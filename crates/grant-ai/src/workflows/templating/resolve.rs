//! Layered placeholder resolution: direct mapping, keyword rules on the
//! placeholder text, line-context disambiguation for yes/no and generic
//! markers, then unresolved.

use std::collections::BTreeMap;

use crate::workflows::assessment::domain::AssessmentResult;

use super::context::line_context;
use super::mapping::{format_currency, format_date, normalise_key, yes_no, NOT_AVAILABLE};

pub(crate) const GENERIC_FALLBACK: &str = "[Information to be completed]";

/// Deliberate MVP stand-ins: the decision threshold behind pass/fail and
/// approve/decline placeholders is unconfirmed product logic, so these stay
/// fixed rather than gating on a score.
const PASS_LABEL: &str = "PASS";
const APPROVE_LABEL: &str = "APPROVE";

/// Resolve one placeholder against the assessment record and the current
/// (possibly partially substituted) template body. `None` means no rule
/// matched at all.
pub(crate) fn resolve_placeholder(
    placeholder: &str,
    assessment: &AssessmentResult,
    direct: &BTreeMap<String, String>,
    body: &str,
) -> Option<String> {
    let key = normalise_key(placeholder);

    if let Some(value) = direct.get(&key) {
        return Some(value.clone());
    }

    let fields = &assessment.extracted_fields;

    if key.contains("organisation name") || key.contains("organization name") {
        return Some(text_or_unavailable(fields.organisation_name.as_deref()));
    }
    if key.contains("yes") && key.contains("no") {
        return Some(resolve_yes_no(placeholder, assessment, body));
    }
    if key.contains("amount") || key.contains("funding") || key.contains("budget") {
        return Some(
            fields
                .total_funding_requested
                .map(format_currency)
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        );
    }
    if key.contains("pass") && key.contains("fail") {
        return Some(PASS_LABEL.to_string());
    }
    if key.contains("approve") && key.contains("decline") {
        return Some(APPROVE_LABEL.to_string());
    }
    if key.contains("email") || key.contains("contact") {
        return Some(text_or_unavailable(fields.contact_email.as_deref()));
    }
    if key.contains("reference") {
        return Some(fields.application_reference.clone());
    }
    if key.contains("business")
        && (key.contains("summary") || key.contains("description") || key.contains("overview"))
    {
        return Some(text_or_unavailable(fields.business_summary.as_deref()));
    }
    if (key.contains("r&d") || key.contains("research")) && key.contains("history") {
        return Some(text_or_unavailable(fields.rd_history.as_deref()));
    }
    if (key.contains("r&d") || key.contains("research")) && key.contains("plan") {
        return Some(text_or_unavailable(fields.rd_plans.as_deref()));
    }
    if key.contains("student") && (key.contains("number") || key.contains("count")) {
        return Some(
            fields
                .number_of_students
                .map(|count| count.to_string())
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        );
    }
    if key.contains("student") {
        return Some(text_or_unavailable(
            fields.student_exposure_description.as_deref(),
        ));
    }
    if key.contains("duration") {
        return Some(
            fields
                .project_duration_months
                .map(|months| format!("{months} months"))
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        );
    }
    if key.contains("entity type") {
        return Some(
            fields
                .entity_type_confirmed
                .map(|confirmed| yes_no(confirmed).to_string())
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        );
    }
    if key.contains("date") {
        return Some(format_date(assessment));
    }
    if key.contains("score") {
        return Some(assessment.overall_score.to_string());
    }
    if key.contains("number") {
        return Some(
            fields
                .number_of_students
                .map(|count| count.to_string())
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        );
    }

    if is_generic_marker(&key) {
        return Some(resolve_generic(placeholder, assessment, body));
    }

    None
}

fn text_or_unavailable(value: Option<&str>) -> String {
    value.map(str::to_string).unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

fn is_generic_marker(key: &str) -> bool {
    key.contains("to be completed")
        || key.contains("to be filled")
        || key.contains("to be confirmed")
        || key == "tbc"
        || key == "tbd"
}

/// Disambiguate a yes/no placeholder from the lines around its first
/// occurrence: the placeholder's own line first, then one line either side,
/// so neighbouring checklist rows cannot hijack the match. Defaults to
/// "Yes" when no contextual keyword matches.
fn resolve_yes_no(placeholder: &str, assessment: &AssessmentResult, body: &str) -> String {
    let fields = &assessment.extracted_fields;

    for window in [0, 1] {
        let Some(context) = line_context(body, placeholder, window) else {
            break;
        };
        let context = context.to_lowercase();

        let flag = if context.contains("entity") || context.contains("type") {
            fields.entity_type_confirmed.unwrap_or(true)
        } else if context.contains("financial") && context.contains("viable") {
            fields.financially_viable.unwrap_or(true)
        } else if context.contains("12 months") {
            fields
                .project_duration_months
                .map(|months| months >= 12)
                .unwrap_or(true)
        } else if context.contains("upfront") || context.contains("wages") {
            fields.upfront_costs_manageable.unwrap_or(true)
        } else {
            continue;
        };
        return yes_no(flag).to_string();
    }

    yes_no(true).to_string()
}

/// Resolve a generic "to be completed" marker from its line context,
/// falling back to a literal completion note.
fn resolve_generic(placeholder: &str, assessment: &AssessmentResult, body: &str) -> String {
    let fields = &assessment.extracted_fields;

    for window in [0, 1] {
        let Some(context) = line_context(body, placeholder, window) else {
            break;
        };
        let context = context.to_lowercase();

        if context.contains("organisation") || context.contains("organization") {
            if let Some(name) = &fields.organisation_name {
                return name.clone();
            }
        }
        if context.contains("reference") {
            return fields.application_reference.clone();
        }
        if context.contains("date") {
            return format_date(assessment);
        }
    }

    GENERIC_FALLBACK.to_string()
}
