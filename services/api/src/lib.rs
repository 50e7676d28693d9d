mod cli;
mod demo;
mod infra;
mod routes;
mod server;

use appointment_eval::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
