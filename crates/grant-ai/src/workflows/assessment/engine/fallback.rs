//! Deterministic heuristic scoring used when the AI assessment stage fails.
//! No randomness anywhere in this path: identical inputs yield identical
//! scores, and every fallback result demands human review.

use std::collections::BTreeMap;

use crate::workflows::assessment::domain::{
    AssessmentDetails, ExtractedApplicationData, Feedback,
};

pub(crate) const FALLBACK_CONFIDENCE: f32 = 0.5;

pub(crate) struct FallbackAssessment {
    pub overall_score: u8,
    pub criteria_scores: BTreeMap<String, u8>,
    pub assessment_details: AssessmentDetails,
    pub feedback: Feedback,
    pub confidence: f32,
    pub flag_for_review: bool,
}

pub(crate) fn fallback_assessment(
    document_text: &str,
    data: &ExtractedApplicationData,
) -> FallbackAssessment {
    let mut score: u32 = 50;
    if document_text.len() > 1000 {
        score += 15;
    }
    if data.organisation_name.is_some() {
        score += 10;
    }
    if data.total_funding_requested.is_some() {
        score += 10;
    }
    if data.contact_email.is_some() {
        score += 10;
    }
    if document_text.len() > 2000 {
        score += 5;
    }
    let overall_score = score.min(100) as u8;

    let anchored = data.organisation_name.is_some() && data.total_funding_requested.is_some();
    let assessment_details = AssessmentDetails {
        completeness: if anchored { 80 } else { 60 },
        alignment: 70,
        innovation: 65,
        feasibility: if anchored { 80 } else { 60 },
    };

    let mut criteria_scores = BTreeMap::new();
    criteria_scores.insert("completeness".to_string(), assessment_details.completeness);
    criteria_scores.insert("alignment".to_string(), assessment_details.alignment);
    criteria_scores.insert("innovation".to_string(), assessment_details.innovation);
    criteria_scores.insert("feasibility".to_string(), assessment_details.feasibility);

    FallbackAssessment {
        overall_score,
        criteria_scores,
        assessment_details,
        feedback: fallback_feedback(document_text, data),
        confidence: FALLBACK_CONFIDENCE,
        flag_for_review: true,
    }
}

fn fallback_feedback(document_text: &str, data: &ExtractedApplicationData) -> Feedback {
    let mut strengths = Vec::new();
    let mut weaknesses = Vec::new();

    match &data.organisation_name {
        Some(name) => strengths.push(format!("Organisation identity clearly stated ({name})")),
        None => weaknesses.push("Organisation name could not be identified".to_string()),
    }
    match data.total_funding_requested {
        Some(_) => strengths.push("Requested funding amount stated".to_string()),
        None => weaknesses.push("No funding amount found in the document".to_string()),
    }
    match &data.contact_email {
        Some(_) => strengths.push("Contact email available for follow-up".to_string()),
        None => weaknesses.push("No contact email found in the document".to_string()),
    }
    if document_text.len() > 1000 {
        strengths.push("Substantial application detail provided".to_string());
    } else {
        weaknesses.push("Application document is very short".to_string());
    }

    let mut suggestions = vec![
        "Manual review recommended: scored by the deterministic fallback assessor".to_string(),
    ];
    if !weaknesses.is_empty() {
        suggestions.push("Ask the applicant to supply the missing details listed above".to_string());
    }

    Feedback {
        strengths,
        weaknesses,
        suggestions,
    }
}
