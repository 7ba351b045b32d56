mod cli;
mod commands;
pub mod infra;

use coa_engine::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
