//! Deterministic regex recovery used when a category's completion call or
//! JSON parse fails. Patterns are intentionally simple labelled-line
//! captures; a field with no match stays absent and is recorded as failed by
//! the extractor.

use std::sync::LazyLock;

use regex::Regex;

use crate::workflows::assessment::domain::ExtractedApplicationData;

static ORGANISATION_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^[^\S\n]*organisation name[^\S\n]*[:\-][^\S\n]*(.+)$")
        .expect("organisation name pattern")
});

static CONTACT_EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}").expect("email pattern")
});

static ENTITY_TYPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^[^\S\n]*entity type[^\S\n]*[:\-][^\S\n]*(\S.*)$")
        .expect("entity type pattern")
});

static FUNDING_REQUESTED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)(?:total[^\S\n]+)?funding[^\S\n]+requested[^\S\n]*[:\-]?[^\S\n]*[£$€]?[^\S\n]*([0-9][0-9,]*)")
        .expect("funding requested pattern")
});

static FINANCIALLY_VIABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)financially[^\S\n]+viable[^\S\n]*[:\-]?[^\S\n]*(yes|no|true|false)")
        .expect("financially viable pattern")
});

static UPFRONT_COSTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)(?:upfront[^\S\n]+costs?|wages)[^\n]*?\b(yes|no|true|false)\b")
        .expect("upfront costs pattern")
});

static PROJECT_DURATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)(?:project[^\S\n]+)?duration[^\S\n]*[:\-]?[^\S\n]*([0-9]+)[^\S\n]*months?")
        .expect("project duration pattern")
});

static BUSINESS_SUMMARY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^[^\S\n]*business summary[^\S\n]*[:\-][^\S\n]*(.+)$")
        .expect("business summary pattern")
});

static RD_HISTORY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^[^\S\n]*r&d history[^\S\n]*[:\-][^\S\n]*(.+)$").expect("r&d history pattern")
});

static RD_PLANS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^[^\S\n]*r&d plans[^\S\n]*[:\-][^\S\n]*(.+)$").expect("r&d plans pattern")
});

static NUMBER_OF_STUDENTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)number[^\S\n]+of[^\S\n]+students[^\S\n]*[:\-]?[^\S\n]*([0-9]+)")
        .expect("number of students pattern")
});

static STUDENT_EXPOSURE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^[^\S\n]*student exposure[^\S\n]*[:\-][^\S\n]*(.+)$")
        .expect("student exposure pattern")
});

fn first_capture(pattern: &Regex, text: &str) -> Option<String> {
    pattern
        .captures(text)
        .and_then(|captures| captures.get(1))
        .map(|capture| capture.as_str().trim().to_string())
        .filter(|value| !value.is_empty())
}

fn capture_bool(pattern: &Regex, text: &str) -> Option<bool> {
    first_capture(pattern, text).map(|value| {
        matches!(
            value.to_ascii_lowercase().as_str(),
            "yes" | "true"
        )
    })
}

fn capture_amount(pattern: &Regex, text: &str) -> Option<u64> {
    first_capture(pattern, text).and_then(|raw| raw.replace(',', "").parse::<u64>().ok())
}

fn capture_int(pattern: &Regex, text: &str) -> Option<u32> {
    first_capture(pattern, text).and_then(|raw| raw.parse::<u32>().ok())
}

/// Try to recover one field from the raw document text. Returns true when
/// the field was filled.
pub(crate) fn recover(
    field: &str,
    document_text: &str,
    data: &mut ExtractedApplicationData,
) -> bool {
    match field {
        "organisation_name" => {
            data.organisation_name = first_capture(&ORGANISATION_NAME, document_text);
            data.organisation_name.is_some()
        }
        "contact_email" => {
            data.contact_email = CONTACT_EMAIL
                .find(document_text)
                .map(|token| token.as_str().to_string());
            data.contact_email.is_some()
        }
        "entity_type_confirmed" => {
            data.entity_type_confirmed = first_capture(&ENTITY_TYPE, document_text).map(|_| true);
            data.entity_type_confirmed.is_some()
        }
        "total_funding_requested" => {
            data.total_funding_requested = capture_amount(&FUNDING_REQUESTED, document_text);
            data.total_funding_requested.is_some()
        }
        "financially_viable" => {
            data.financially_viable = capture_bool(&FINANCIALLY_VIABLE, document_text);
            data.financially_viable.is_some()
        }
        "upfront_costs_manageable" => {
            data.upfront_costs_manageable = capture_bool(&UPFRONT_COSTS, document_text);
            data.upfront_costs_manageable.is_some()
        }
        "project_duration_months" => {
            data.project_duration_months = capture_int(&PROJECT_DURATION, document_text);
            data.project_duration_months.is_some()
        }
        "business_summary" => {
            data.business_summary = first_capture(&BUSINESS_SUMMARY, document_text);
            data.business_summary.is_some()
        }
        "rd_history" => {
            data.rd_history = first_capture(&RD_HISTORY, document_text);
            data.rd_history.is_some()
        }
        "rd_plans" => {
            data.rd_plans = first_capture(&RD_PLANS, document_text);
            data.rd_plans.is_some()
        }
        "number_of_students" => {
            data.number_of_students = capture_int(&NUMBER_OF_STUDENTS, document_text);
            data.number_of_students.is_some()
        }
        "student_exposure_description" => {
            data.student_exposure_description = first_capture(&STUDENT_EXPOSURE, document_text);
            data.student_exposure_description.is_some()
        }
        _ => false,
    }
}
