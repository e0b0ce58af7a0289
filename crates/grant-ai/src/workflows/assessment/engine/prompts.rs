//! Prompt builders for the three concurrent assessment tasks.

use std::fmt::Write as _;

use crate::workflows::assessment::domain::FundBrain;
use crate::workflows::assessment::extraction::{truncate_for_prompt, MAX_PROMPT_DOCUMENT_CHARS};

pub(crate) const TASK_OVERALL: &str = "overall_assessment";
pub(crate) const TASK_CRITERIA: &str = "criteria_scoring";
pub(crate) const TASK_FEEDBACK: &str = "feedback_generation";

pub(crate) const OVERALL_MAX_TOKENS: u32 = 700;
pub(crate) const CRITERIA_MAX_TOKENS: u32 = 700;
pub(crate) const FEEDBACK_MAX_TOKENS: u32 = 900;

pub(crate) const SCORING_TEMPERATURE: f32 = 0.2;
pub(crate) const FEEDBACK_TEMPERATURE: f32 = 0.4;

fn push_document(prompt: &mut String, document_text: &str) {
    let document = truncate_for_prompt(document_text, MAX_PROMPT_DOCUMENT_CHARS);
    write!(prompt, "\nApplication document:\n\"\"\"\n{document}\n\"\"\"").expect("write document");
}

pub(crate) fn build_overall_prompt(fund_brain: &FundBrain, document_text: &str) -> String {
    let mut prompt = format!(
        "You are assessing a grant application submitted to the fund \"{}\".\n\n\
         Fund assessment instructions:\n{}\n\n\
         Historically successful applications for this fund average a score of {:.0}. \
         Their common strengths: {}. Key indicators reviewers look for: {}.\n\n\
         Score this application from 0 to 100 against the fund's expectations and \
         respond with a single JSON object:\n\
         {{\"overallScore\": 72, \"confidence\": 0.8, \"flagForReview\": false, \
         \"reasoning\": \"one short paragraph\"}}\n",
        fund_brain.fund_name,
        fund_brain.assessment_instructions,
        fund_brain.success_patterns.average_score,
        join_or_none(&fund_brain.success_patterns.common_strengths),
        join_or_none(&fund_brain.success_patterns.key_indicators),
    );
    push_document(&mut prompt, document_text);
    prompt
}

pub(crate) fn build_criteria_prompt(fund_brain: &FundBrain, document_text: &str) -> String {
    let mut prompt = format!(
        "You are scoring a grant application submitted to the fund \"{}\" against its \
         published criteria.\n\nCriteria:\n",
        fund_brain.fund_name
    );

    for criterion in &fund_brain.criteria {
        writeln!(
            prompt,
            "- {} (weight {:.2}): {}. Key indicators: {}.",
            criterion.name,
            criterion.weight,
            criterion.description,
            join_or_none(&criterion.key_indicators),
        )
        .expect("write criterion");
    }

    prompt.push_str(
        "\nScore the four assessment dimensions from 0 to 100 and cite the evidence you \
         relied on. Respond with a single JSON object:\n\
         {\"criteriaScores\": {\"completeness\": 70, \"alignment\": 70, \"innovation\": 70, \
         \"feasibility\": 70}, \"evidence\": {\"completeness\": \"...\", \"alignment\": \"...\", \
         \"innovation\": \"...\", \"feasibility\": \"...\"}}\n",
    );
    push_document(&mut prompt, document_text);
    prompt
}

pub(crate) fn build_feedback_prompt(fund_brain: &FundBrain, document_text: &str) -> String {
    let mut prompt = format!(
        "You are preparing reviewer feedback for a grant application submitted to the \
         fund \"{}\".\n\n\
         Fund assessment instructions:\n{}\n\n\
         List the application's strengths, weaknesses, and concrete suggestions for the \
         applicant. Respond with a single JSON object:\n\
         {{\"feedback\": {{\"strengths\": [\"...\"], \"weaknesses\": [\"...\"], \
         \"suggestions\": [\"...\"]}}}}\n",
        fund_brain.fund_name, fund_brain.assessment_instructions,
    );
    push_document(&mut prompt, document_text);
    prompt
}

fn join_or_none(values: &[String]) -> String {
    if values.is_empty() {
        "none recorded".to_string()
    } else {
        values.join(", ")
    }
}
