//! Main application entry point (CLI binary).
//!
//! Thin wrapper around the `synergy_wholesale_exporter` library that handles
//! argument parsing, `.env` loading and logger setup.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use synergy_wholesale_exporter::initialization::init_logger_with;
use synergy_wholesale_exporter::{run_exporter, Config, Opt};

#[tokio::main]
async fn main() -> Result<()> {
    // Credentials may live in a .env file, either here or next to the executable
    if dotenvy::dotenv().is_err() {
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let env_path = exe_dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                }
            }
        }
    }

    let opt = Opt::parse();

    init_logger_with(opt.log_level().into(), opt.log_format())
        .context("Failed to initialize logger")?;

    let config = match Config::try_from(opt) {
        Ok(config) => config,
        Err(e) => {
            log::error!("{}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_exporter(config).await {
        log::error!("synergy_wholesale_exporter error: {:#}", e);
        process::exit(1);
    }

    Ok(())
}
