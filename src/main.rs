//! vchat - Entry Point

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;
use vchat::config::CliOverrides;
use vchat::model::AppError;
use vchat::state::ListStrategy;
use vchat::view::ColorConfig;

/// vchat - streaming chat widget with a virtualized message list
#[derive(Parser, Debug)]
#[command(name = "vchat")]
#[command(version)]
#[command(about = "Terminal chat widget streaming mock assistant output into a virtualized list")]
pub struct Args {
    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// List rendering strategy (virtualized or simple)
    #[arg(long)]
    pub strategy: Option<ListStrategy>,

    /// Milliseconds between streamed chunks
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub tick_ms: Option<u64>,

    /// Words per generated response
    #[arg(short, long)]
    pub words: Option<usize>,

    /// Seed for generated responses
    #[arg(long)]
    pub seed: Option<u64>,

    /// Render message content as plain text instead of markdown
    #[arg(long)]
    pub plain: bool,

    /// Disable colors
    #[arg(long)]
    pub no_color: bool,
}

impl Args {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            strategy: self.strategy,
            tick_ms: self.tick_ms,
            target_words: self.words,
            seed: self.seed,
            plain: self.plain,
        }
    }
}

fn run(args: Args) -> Result<(), AppError> {
    // Defaults → Config File → Env Vars → CLI Args
    let config = vchat::config::resolve(args.config.clone(), args.overrides())?;

    vchat::logging::init(&config.log_file_path)?;
    info!(config = ?config, "Configuration loaded and resolved");

    let colors = ColorConfig::from_env_and_args(args.no_color);
    vchat::view::run(config.chat_settings(), colors)?;
    Ok(())
}

fn main() -> ExitCode {
    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("vchat: {err}");
            ExitCode::FAILURE
        }
    }
}
