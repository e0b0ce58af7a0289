use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;

use crate::infra::{default_fund_brain, OfflineCompletionGateway};
use grant_ai::error::AppError;
use grant_ai::workflows::assessment::{AssessmentEngine, FundId};

#[derive(Args, Debug)]
pub(crate) struct AssessArgs {
    /// Path to a plain-text application document
    #[arg(long)]
    pub(crate) document: PathBuf,
    /// Fund name to show on the assessment
    #[arg(long, default_value = "Innovation Growth Fund")]
    pub(crate) fund_name: String,
}

/// One-shot assessment with the completion service treated as offline, so
/// the deterministic fallback path is exercised end to end without any
/// backend credentials.
pub(crate) async fn run_assess(args: AssessArgs) -> Result<(), AppError> {
    let document_text = std::fs::read_to_string(&args.document)?;
    let filename = args
        .document
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("document.txt")
        .to_string();

    let mut fund_brain = default_fund_brain();
    fund_brain.fund_name = args.fund_name;

    let engine = AssessmentEngine::new(Arc::new(OfflineCompletionGateway));
    let outcome = engine
        .assess_application(
            &document_text,
            &filename,
            &fund_brain,
            &FundId("demo-fund".to_string()),
            &[],
        )
        .await?;

    let rendered =
        serde_json::to_string_pretty(&outcome).expect("assessment outcome serializes");
    println!("{rendered}");

    if !outcome.warnings.is_empty() {
        eprintln!("warnings:");
        for warning in &outcome.warnings {
            eprintln!("  - {warning}");
        }
    }

    Ok(())
}
