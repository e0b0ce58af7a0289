//! Fixed plain-text report used for templates without placeholder content.

use std::fmt::Write as _;

use crate::workflows::assessment::domain::AssessmentResult;

use super::mapping::{format_currency, format_date, yes_no};

pub(crate) fn render_standard_report(assessment: &AssessmentResult) -> String {
    let mut report = String::new();

    writeln!(report, "ASSESSMENT REPORT — {}", assessment.fund_name).expect("write header");
    writeln!(report, "Source document: {}", assessment.source_filename).expect("write source");
    writeln!(report, "Assessed on: {}", format_date(assessment)).expect("write date");
    writeln!(
        report,
        "Application reference: {}",
        assessment.extracted_fields.application_reference
    )
    .expect("write reference");
    report.push('\n');

    writeln!(report, "Overall score: {}/100", assessment.overall_score).expect("write score");
    writeln!(
        report,
        "Confidence: {:.0}%  |  Flagged for review: {}",
        f64::from(assessment.confidence) * 100.0,
        yes_no(assessment.flag_for_review)
    )
    .expect("write confidence");
    report.push('\n');

    let details = &assessment.assessment_details;
    writeln!(report, "Assessment detail scores:").expect("write detail header");
    writeln!(report, "  Completeness: {}/100", details.completeness).expect("write completeness");
    writeln!(report, "  Alignment:    {}/100", details.alignment).expect("write alignment");
    writeln!(report, "  Innovation:   {}/100", details.innovation).expect("write innovation");
    writeln!(report, "  Feasibility:  {}/100", details.feasibility).expect("write feasibility");

    if !assessment.criteria_scores.is_empty() {
        report.push('\n');
        writeln!(report, "Criteria scores:").expect("write criteria header");
        for (name, score) in &assessment.criteria_scores {
            writeln!(report, "  {name}: {score}/100").expect("write criterion");
        }
    }

    report.push('\n');
    writeln!(report, "Extracted application data:").expect("write extraction header");
    let fields = &assessment.extracted_fields;
    push_field(&mut report, "Organisation name", fields.organisation_name.as_deref());
    push_field(&mut report, "Contact email", fields.contact_email.as_deref());
    push_field(
        &mut report,
        "Funding requested",
        fields
            .total_funding_requested
            .map(format_currency)
            .as_deref(),
    );
    push_field(
        &mut report,
        "Project duration",
        fields
            .project_duration_months
            .map(|months| format!("{months} months"))
            .as_deref(),
    );
    push_field(
        &mut report,
        "Number of students",
        fields
            .number_of_students
            .map(|count| count.to_string())
            .as_deref(),
    );
    push_field(&mut report, "Business summary", fields.business_summary.as_deref());

    for (title, items) in [
        ("Strengths", &assessment.feedback.strengths),
        ("Weaknesses", &assessment.feedback.weaknesses),
        ("Suggestions", &assessment.feedback.suggestions),
    ] {
        report.push('\n');
        writeln!(report, "{title}:").expect("write feedback header");
        if items.is_empty() {
            writeln!(report, "  None recorded").expect("write feedback empty");
        }
        for item in items {
            writeln!(report, "  - {item}").expect("write feedback item");
        }
    }

    report.push('\n');
    let ai_status = &assessment.ai_status;
    writeln!(
        report,
        "AI usage: field extraction {}, assessment {}",
        used_label(ai_status.extraction_used_ai),
        used_label(ai_status.assessment_used_ai)
    )
    .expect("write ai status");

    report
}

fn push_field(report: &mut String, label: &str, value: Option<&str>) {
    writeln!(report, "  {label}: {}", value.unwrap_or("Not stated")).expect("write field");
}

fn used_label(used: bool) -> &'static str {
    if used {
        "via completion service"
    } else {
        "via fallback"
    }
}
