use super::common::*;
use crate::workflows::templating::{
    OutputTemplate, ProcessedFormat, TemplateEngine, TemplateKind,
};

#[test]
fn letter_template_fills_name_and_reference_from_context() {
    let engine = TemplateEngine::new();
    let template = raw_template(
        "Dear [Organisation Name], your reference is [To be completed].",
        &["[Organisation Name]", "[To be completed]"],
    );

    let result = engine.apply_template(&assessment(), &template);

    assert!(result.success);
    assert_eq!(result.template_format, ProcessedFormat::RawPlaceholders);
    assert_eq!(
        result.filled_content.as_deref(),
        Some(format!("Dear Acme Ltd, your reference is {REFERENCE}.").as_str())
    );
    assert_eq!(result.replacements_made, 2);
    assert!(result.failed_replacements.is_empty());
    assert!(result.warnings.is_empty());
}

#[test]
fn repeated_placeholder_is_replaced_at_every_occurrence() {
    let engine = TemplateEngine::new();
    let template = raw_template(
        "Students hosted: [Number]. Confirmed placements: [Number].",
        &["[Number]"],
    );

    let result = engine.apply_template(&assessment(), &template);

    assert!(result.success);
    assert_eq!(result.replacements_made, 2);
    assert_eq!(
        result.filled_content.as_deref(),
        Some("Students hosted: 4. Confirmed placements: 4.")
    );
}

#[test]
fn declared_placeholder_missing_from_the_body_is_a_failed_replacement() {
    let engine = TemplateEngine::new();
    let template = raw_template(
        "This letter never mentions the token.",
        &["[Budget]"],
    );

    let result = engine.apply_template(&assessment(), &template);

    assert!(!result.success);
    assert_eq!(result.replacements_made, 0);
    assert_eq!(result.failed_replacements, vec!["[Budget]".to_string()]);
    assert!(result
        .warnings
        .iter()
        .any(|warning| warning.contains("not found in template content")));
    // The rest of the body is untouched.
    assert_eq!(
        result.filled_content.as_deref(),
        Some("This letter never mentions the token.")
    );
}

#[test]
fn unresolvable_placeholder_is_recorded_and_others_still_replace() {
    let engine = TemplateEngine::new();
    let template = raw_template(
        "Score: [Overall Score]. Mystery: [Wingdings].",
        &["[Overall Score]", "[Wingdings]"],
    );

    let result = engine.apply_template(&assessment(), &template);

    assert!(!result.success);
    assert_eq!(result.replacements_made, 1);
    assert_eq!(result.failed_replacements, vec!["[Wingdings]".to_string()]);
    assert_eq!(
        result.filled_content.as_deref(),
        Some("Score: 76. Mystery: [Wingdings].")
    );
}

#[test]
fn placeholders_are_processed_in_declaration_order() {
    let engine = TemplateEngine::new();
    // The generic marker shares a line with the organisation placeholder;
    // once the organisation name is substituted the context still names the
    // reference, which the second resolution must observe.
    let template = raw_template(
        "[Organisation Name] reference: [To be completed]",
        &["[Organisation Name]", "[To be completed]"],
    );

    let result = engine.apply_template(&assessment(), &template);

    assert!(result.success);
    assert_eq!(
        result.filled_content.as_deref(),
        Some(format!("Acme Ltd reference: {REFERENCE}").as_str())
    );
}

#[test]
fn raw_template_without_content_is_rejected_before_substitution() {
    let engine = TemplateEngine::new();
    let template = OutputTemplate {
        template_id: "tpl-broken".to_string(),
        format_version: "1.0".to_string(),
        kind: TemplateKind::RawPlaceholders,
        raw_content: None,
        placeholders: Some(vec!["[Overall Score]".to_string()]),
    };

    let result = engine.apply_template(&assessment(), &template);

    assert!(!result.success);
    assert_eq!(result.template_format, ProcessedFormat::Error);
    assert!(result.filled_content.is_none());
    assert_eq!(result.replacements_made, 0);
    assert_eq!(
        result.failed_replacements,
        vec!["[Overall Score]".to_string()]
    );
    assert!(!result.warnings.is_empty());
}

#[test]
fn raw_template_without_placeholder_list_is_rejected() {
    let engine = TemplateEngine::new();
    let template = OutputTemplate {
        template_id: "tpl-broken".to_string(),
        format_version: "1.0".to_string(),
        kind: TemplateKind::RawPlaceholders,
        raw_content: Some("Body text".to_string()),
        placeholders: None,
    };

    let result = engine.apply_template(&assessment(), &template);

    assert!(!result.success);
    assert_eq!(result.template_format, ProcessedFormat::Error);
}

#[test]
fn standard_report_path_always_succeeds() {
    let engine = TemplateEngine::new();
    let template = OutputTemplate {
        template_id: "tpl-standard".to_string(),
        format_version: "1.0".to_string(),
        kind: TemplateKind::StandardReport,
        raw_content: None,
        placeholders: None,
    };

    let result = engine.apply_template(&assessment(), &template);

    assert!(result.success);
    assert_eq!(result.template_format, ProcessedFormat::StandardReport);
    assert_eq!(result.replacements_made, 0);
    assert!(result.failed_replacements.is_empty());
    let report = result.filled_content.expect("report rendered");
    assert!(report.contains("ASSESSMENT REPORT — Innovation Growth Fund"));
    assert!(report.contains("Overall score: 76/100"));
    assert!(report.contains("Acme Ltd"));
    assert!(report.contains(REFERENCE));
}

#[test]
fn metadata_carries_provenance_for_every_result() {
    let engine = TemplateEngine::new();
    let template = raw_template("Score: [Overall Score]", &["[Overall Score]"]);

    let result = engine.apply_template(&assessment(), &template);

    assert_eq!(result.metadata.fund_name, "Innovation Growth Fund");
    assert_eq!(result.metadata.source_filename, "acme-application.pdf");
    assert_eq!(result.metadata.template_id, "tpl-award-letter");
    assert_eq!(result.metadata.format_version, "1.0");
    assert_eq!(result.metadata.assessed_at, assessment().assessed_at);
}
