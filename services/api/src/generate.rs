use crate::infra::SnapshotFile;
use clap::Args;
use serde::Serialize;
use std::path::{Path, PathBuf};
use subsidy_checklist::config::AppConfig;
use subsidy_checklist::error::AppError;
use subsidy_checklist::workflows::checklist::{
    ChecklistConfig, ChecklistGenerator, ChecklistItem, RequiredDocuments,
};

#[derive(Args, Debug)]
pub(crate) struct GenerateArgs {
    /// Exported application snapshot (JSON)
    #[arg(long)]
    pub(crate) snapshot: PathBuf,
    /// Print only the mandatory documents per bucket
    #[arg(long)]
    pub(crate) required_only: bool,
    /// Pretty-print the JSON output
    #[arg(long)]
    pub(crate) pretty: bool,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub(crate) enum GenerateOutput {
    Required(RequiredDocuments),
    Items(Vec<ChecklistItem>),
}

pub(crate) fn run_generate(args: GenerateArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let output = generate(&args.snapshot, args.required_only, config.checklist.rules)?;
    let rendered = if args.pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    println!("{rendered}");
    Ok(())
}

/// Offline run: recorded calculator results only, no storage and no reviewer layer.
pub(crate) fn generate(
    path: &Path,
    required_only: bool,
    rules: ChecklistConfig,
) -> Result<GenerateOutput, AppError> {
    let file = SnapshotFile::read(path)?;
    let generator = ChecklistGenerator::new(rules);
    if required_only {
        return Ok(GenerateOutput::Required(
            generator.required_documents(&file.snapshot),
        ));
    }
    let input = file.into_input();
    Ok(GenerateOutput::Items(generator.generate(&input)))
}
