mod cli;
mod generate;
mod infra;
mod routes;
mod server;

use subsidy_checklist::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
