use std::collections::BTreeMap;

use chrono::{TimeZone, Utc};

use crate::workflows::assessment::domain::{
    AiStatus, AssessmentDetails, AssessmentResult, ExtractedApplicationData, Feedback, FundId,
};
use crate::workflows::templating::{OutputTemplate, TemplateKind};

pub(super) const REFERENCE: &str = "APP-20260807-K4T9ZB";

pub(super) fn assessment() -> AssessmentResult {
    let mut criteria_scores = BTreeMap::new();
    criteria_scores.insert("completeness".to_string(), 80u8);
    criteria_scores.insert("alignment".to_string(), 75u8);
    criteria_scores.insert("innovation".to_string(), 70u8);
    criteria_scores.insert("feasibility".to_string(), 78u8);

    AssessmentResult {
        fund_id: FundId("fund-001".to_string()),
        fund_name: "Innovation Growth Fund".to_string(),
        source_filename: "acme-application.pdf".to_string(),
        overall_score: 76,
        criteria_scores,
        feedback: Feedback {
            strengths: vec!["Credible R&D plan".to_string()],
            weaknesses: vec!["Thin placement detail".to_string()],
            suggestions: vec!["Name the placement supervisor".to_string()],
        },
        confidence: 0.85,
        flag_for_review: false,
        assessment_details: AssessmentDetails {
            completeness: 80,
            alignment: 75,
            innovation: 70,
            feasibility: 78,
        },
        extracted_fields: ExtractedApplicationData {
            application_reference: REFERENCE.to_string(),
            organisation_name: Some("Acme Ltd".to_string()),
            contact_email: Some("grants@acme.example".to_string()),
            entity_type_confirmed: Some(true),
            total_funding_requested: Some(125_000),
            financially_viable: Some(false),
            upfront_costs_manageable: Some(true),
            project_duration_months: Some(9),
            business_summary: Some("Diagnostic sensors for agriculture".to_string()),
            rd_history: Some("Two years of prototyping".to_string()),
            rd_plans: Some("Field trials next spring".to_string()),
            number_of_students: Some(4),
            student_exposure_description: Some("Sprint reviews and field trials".to_string()),
        },
        ai_status: AiStatus::new(true, true),
        assessed_at: Utc.with_ymd_and_hms(2026, 8, 7, 9, 30, 0).single().expect("valid timestamp"),
    }
}

pub(super) fn raw_template(content: &str, placeholders: &[&str]) -> OutputTemplate {
    OutputTemplate {
        template_id: "tpl-award-letter".to_string(),
        format_version: "1.0".to_string(),
        kind: TemplateKind::RawPlaceholders,
        raw_content: Some(content.to_string()),
        placeholders: Some(placeholders.iter().map(|p| p.to_string()).collect()),
    }
}
