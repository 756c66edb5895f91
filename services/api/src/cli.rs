use crate::generate::{run_generate, GenerateArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use subsidy_checklist::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Subsidy Checklist",
    about = "Serve or generate review checklists for housing subsidy applications",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Generate the checklist for one exported application snapshot
    Checklist(GenerateArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Directory of exported application snapshots (`<application id>.json`)
    #[arg(long)]
    pub(crate) snapshots: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Checklist(args) => run_generate(args),
    }
}
