use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Documents longer than this are truncated before entering a prompt so a
/// single oversized upload cannot inflate completion cost and latency.
pub(crate) const MAX_PROMPT_DOCUMENT_CHARS: usize = 12_000;

pub(crate) const EXTRACTION_MAX_TOKENS: u32 = 600;
pub(crate) const EXTRACTION_TEMPERATURE: f32 = 0.1;

/// The four fixed extraction categories, each mapped to one focused
/// completion task so a failed call stays recoverable per category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionCategory {
    Organization,
    Financial,
    Business,
    Student,
}

impl ExtractionCategory {
    pub const ALL: [ExtractionCategory; 4] = [
        ExtractionCategory::Organization,
        ExtractionCategory::Financial,
        ExtractionCategory::Business,
        ExtractionCategory::Student,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            ExtractionCategory::Organization => "organization",
            ExtractionCategory::Financial => "financial",
            ExtractionCategory::Business => "business",
            ExtractionCategory::Student => "student",
        }
    }

    const fn guidance(self) -> &'static str {
        match self {
            ExtractionCategory::Organization => {
                "Identify the applying organisation: its registered name, the contact \
                 email address for the application, and whether the document confirms \
                 the organisation's legal entity type (limited company, charity, or \
                 similar registration)."
            }
            ExtractionCategory::Financial => {
                "Identify the financial facts of the application: the total funding \
                 amount requested (as a whole number, no currency symbols or \
                 separators), whether the applicant states the organisation is \
                 financially viable, whether upfront costs such as wages can be \
                 covered while awaiting grant payment, and the project duration in \
                 months."
            }
            ExtractionCategory::Business => {
                "Summarise the applicant's business narrative: what the organisation \
                 does, its research and development history to date, and its planned \
                 research and development activities."
            }
            ExtractionCategory::Student => {
                "Identify student involvement: how many students the project will \
                 host and how the applicant describes the industry exposure those \
                 students will receive."
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FieldKind {
    Text,
    Email,
    Boolean,
    Integer,
    Currency,
}

/// Declarative schema entry: field name, value shape, and the example value
/// serialized into the JSON-shape prompt.
pub(crate) struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub example: &'static str,
}

const ORGANIZATION_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        name: "organisation_name",
        kind: FieldKind::Text,
        example: "Acme Research Ltd",
    },
    FieldSpec {
        name: "contact_email",
        kind: FieldKind::Email,
        example: "grants@acme-research.co.uk",
    },
    FieldSpec {
        name: "entity_type_confirmed",
        kind: FieldKind::Boolean,
        example: "true",
    },
];

const FINANCIAL_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        name: "total_funding_requested",
        kind: FieldKind::Currency,
        example: "125000",
    },
    FieldSpec {
        name: "financially_viable",
        kind: FieldKind::Boolean,
        example: "true",
    },
    FieldSpec {
        name: "upfront_costs_manageable",
        kind: FieldKind::Boolean,
        example: "true",
    },
    FieldSpec {
        name: "project_duration_months",
        kind: FieldKind::Integer,
        example: "18",
    },
];

const BUSINESS_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        name: "business_summary",
        kind: FieldKind::Text,
        example: "Develops diagnostic sensors for the agricultural sector",
    },
    FieldSpec {
        name: "rd_history",
        kind: FieldKind::Text,
        example: "Two years of prototype development with a university partner",
    },
    FieldSpec {
        name: "rd_plans",
        kind: FieldKind::Text,
        example: "Field trials of the second-generation sensor array",
    },
];

const STUDENT_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        name: "number_of_students",
        kind: FieldKind::Integer,
        example: "4",
    },
    FieldSpec {
        name: "student_exposure_description",
        kind: FieldKind::Text,
        example: "Students join sprint reviews and shadow the engineering team",
    },
];

pub(crate) fn fields_for(category: ExtractionCategory) -> &'static [FieldSpec] {
    match category {
        ExtractionCategory::Organization => ORGANIZATION_FIELDS,
        ExtractionCategory::Financial => FINANCIAL_FIELDS,
        ExtractionCategory::Business => BUSINESS_FIELDS,
        ExtractionCategory::Student => STUDENT_FIELDS,
    }
}

fn example_value(spec: &FieldSpec) -> Value {
    match spec.kind {
        FieldKind::Text | FieldKind::Email => Value::String(spec.example.to_string()),
        FieldKind::Boolean => Value::Bool(spec.example == "true"),
        FieldKind::Integer | FieldKind::Currency => spec
            .example
            .parse::<u64>()
            .map(Value::from)
            .unwrap_or_else(|_| Value::String(spec.example.to_string())),
    }
}

fn example_object(category: ExtractionCategory) -> Value {
    let mut object = Map::new();
    for spec in fields_for(category) {
        object.insert(spec.name.to_string(), example_value(spec));
    }
    Value::Object(object)
}

/// Build the prompt for one category. Serialization of the example object is
/// the one fallible step; a failure here is treated as a category-level
/// failure by the extractor.
pub(crate) fn build_extraction_prompt(
    category: ExtractionCategory,
    document_text: &str,
    template_placeholders: &[String],
) -> Result<String, serde_json::Error> {
    let example = serde_json::to_string_pretty(&example_object(category))?;

    let placeholder_hint = if template_placeholders.is_empty() {
        String::new()
    } else {
        format!(
            "The output template for this fund references the following labels; \
             prefer wording that matches them: {}.\n\n",
            template_placeholders.join(", ")
        )
    };

    let document = truncate_for_prompt(document_text, MAX_PROMPT_DOCUMENT_CHARS);

    Ok(format!(
        "You are reviewing a grant application document. {guidance}\n\n\
         Respond with a single JSON object shaped exactly like this example:\n\
         {example}\n\n\
         Use null for any field the document does not state. Do not invent values.\n\n\
         {placeholder_hint}Document:\n\"\"\"\n{document}\n\"\"\"",
        guidance = category.guidance(),
    ))
}

pub(crate) fn truncate_for_prompt(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((offset, _)) => &text[..offset],
        None => text,
    }
}
