use crate::commands::{run_axes, run_evaluate, run_threat};
use clap::{Args, Parser, Subcommand};
use coa_engine::config::AppConfig;
use coa_engine::error::AppError;
use coa_engine::telemetry;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "coa-cli",
    about = "Build axis states and rank candidate courses of action from battlefield tables",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the axis states resolved for a mission
    Axes(AxesArgs),
    /// Rank candidate COAs for a mission
    Evaluate(EvaluateArgs),
    /// Rank candidate COAs around one stored threat event
    Threat(ThreatArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub(crate) struct DataArgs {
    /// Directory of battlefield CSV tables (falls back to COA_DATA_DIR)
    #[arg(long)]
    pub(crate) data_dir: Option<PathBuf>,
    /// Scoring configuration JSON (threat tables, weights, METT-C floors)
    #[arg(long)]
    pub(crate) scoring: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct AxesArgs {
    #[command(flatten)]
    pub(crate) data: DataArgs,
    /// Mission identifier
    #[arg(long)]
    pub(crate) mission: String,
}

#[derive(Args, Debug)]
pub(crate) struct EvaluateArgs {
    #[command(flatten)]
    pub(crate) data: DataArgs,
    /// Mission identifier
    #[arg(long)]
    pub(crate) mission: String,
    /// JSON file with the candidate COAs (array or {"coas": [...]})
    #[arg(long)]
    pub(crate) coas: PathBuf,
}

#[derive(Args, Debug)]
pub(crate) struct ThreatArgs {
    #[command(flatten)]
    pub(crate) data: DataArgs,
    /// Stored threat event identifier
    #[arg(long)]
    pub(crate) threat_id: String,
    /// Mission identifier; resolved from the threat event when omitted
    #[arg(long)]
    pub(crate) mission: Option<String>,
    /// JSON file with the candidate COAs (array or {"coas": [...]})
    #[arg(long)]
    pub(crate) coas: PathBuf,
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    match cli.command {
        Command::Axes(args) => run_axes(&config, args),
        Command::Evaluate(args) => run_evaluate(&config, args),
        Command::Threat(args) => run_threat(&config, args),
    }
}
