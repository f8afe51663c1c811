mod cli;
mod config;
mod platform;

use std::fs;
use std::io::{self, Read};
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::{Local, Utc};
use clap::Parser;
use planner_logging::{planner_debug, planner_info};

use cli::{Cli, Command};
use config::{AppConfig, BASE_URL_ENV};
use platform::{CommandOutput, Session};

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let (config, source) = AppConfig::load(cli.config.as_deref())?;
    planner_logging::initialize(config.log, config.level(cli.verbose));
    if let Some(path) = &source {
        planner_info!("Loaded config from {}", path.display());
    }

    let settings = config.backend_settings(std::env::var(BASE_URL_ENV).ok(), cli.base_url.clone());
    planner_debug!("Backend settings: {:?}", settings);

    let today = Local::now().date_naive();
    let mut session = Session::connect(&settings, today)
        .with_context(|| format!("connecting to {}", settings.base_url))?;

    let output = match cli.command {
        Command::Status => platform::run_status(&mut session),
        Command::Ingest {
            category,
            file,
            text,
        } => {
            let content = match (text, file) {
                (Some(text), _) => text,
                (None, Some(path)) => fs::read_to_string(&path)
                    .with_context(|| format!("reading {}", path.display()))?,
                (None, None) => {
                    let mut buffer = String::new();
                    io::stdin()
                        .read_to_string(&mut buffer)
                        .context("reading document from stdin")?;
                    buffer
                }
            };
            platform::run_ingest(&mut session, category, content, now_millis())
        }
        Command::Plan { date, guidance } => platform::run_plan(&mut session, date, guidance),
        Command::Shell => {
            let reader = io::BufReader::new(io::stdin());
            platform::run_shell(session, reader, &mut io::stdout(), now_millis)
                .context("interactive session")?;
            return Ok(ExitCode::SUCCESS);
        }
    };

    Ok(report(output))
}

fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

fn report(output: CommandOutput) -> ExitCode {
    match output {
        Ok(text) => {
            println!("{text}");
            ExitCode::SUCCESS
        }
        Err(text) => {
            eprintln!("{text}");
            ExitCode::FAILURE
        }
    }
}
