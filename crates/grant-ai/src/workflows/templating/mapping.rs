//! Direct data mapping: placeholder labels that resolve straight to a value
//! computed once from the assessment record.

use std::collections::BTreeMap;

use crate::workflows::assessment::domain::AssessmentResult;

pub(crate) const NOT_AVAILABLE: &str = "Not available in application";

/// Normalise a placeholder for direct lookup: strip surrounding brackets,
/// collapse internal whitespace, lowercase.
pub(crate) fn normalise_key(placeholder: &str) -> String {
    placeholder
        .trim()
        .trim_start_matches(['[', '{', '('])
        .trim_end_matches([']', '}', ')'])
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

pub(crate) fn format_date(assessment: &AssessmentResult) -> String {
    assessment.assessed_at.format("%d %B %Y").to_string()
}

/// Render an amount as a display currency string with thousands separators.
pub(crate) fn format_currency(amount: u64) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("£{grouped}")
}

pub(crate) fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

/// Build the exact-match table consulted first in the resolution chain.
pub(crate) fn direct_data_mapping(assessment: &AssessmentResult) -> BTreeMap<String, String> {
    let mut mapping = BTreeMap::new();

    mapping.insert(
        "overall score".to_string(),
        assessment.overall_score.to_string(),
    );
    mapping.insert("fund name".to_string(), assessment.fund_name.clone());
    mapping.insert("assessment date".to_string(), format_date(assessment));
    mapping.insert("date of assessment".to_string(), format_date(assessment));
    mapping.insert(
        "application reference".to_string(),
        assessment.extracted_fields.application_reference.clone(),
    );
    mapping.insert(
        "confidence".to_string(),
        format!("{:.0}%", f64::from(assessment.confidence) * 100.0),
    );
    mapping.insert(
        "flag for review".to_string(),
        yes_no(assessment.flag_for_review).to_string(),
    );

    mapping.insert(
        "strengths".to_string(),
        join_or_default(&assessment.feedback.strengths),
    );
    mapping.insert(
        "weaknesses".to_string(),
        join_or_default(&assessment.feedback.weaknesses),
    );
    mapping.insert(
        "suggestions".to_string(),
        join_or_default(&assessment.feedback.suggestions),
    );
    mapping.insert(
        "recommendations".to_string(),
        join_or_default(&assessment.feedback.suggestions),
    );

    let details = &assessment.assessment_details;
    mapping.insert(
        "completeness score".to_string(),
        details.completeness.to_string(),
    );
    mapping.insert("alignment score".to_string(), details.alignment.to_string());
    mapping.insert(
        "innovation score".to_string(),
        details.innovation.to_string(),
    );
    mapping.insert(
        "feasibility score".to_string(),
        details.feasibility.to_string(),
    );

    mapping.insert(
        "source document".to_string(),
        assessment.source_filename.clone(),
    );
    mapping.insert("filename".to_string(), assessment.source_filename.clone());

    mapping
}

fn join_or_default(items: &[String]) -> String {
    if items.is_empty() {
        "None recorded".to_string()
    } else {
        items.join("; ")
    }
}
