mod cli;
mod commands;
mod infra;

use home_score::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
