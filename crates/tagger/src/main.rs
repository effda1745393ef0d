mod cli;
mod util;

use anyhow::Context;
use clap::Parser;
use console::style;
use std::process::ExitCode;
use tagger_lib::{Config, SortOrder, TaggerError, ViewOptions};

fn main() -> ExitCode {
    let cli = cli::Cli::parse();
    init_logging(&cli);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => report_error(e),
    }
}

fn init_logging(cli: &cli::Cli) {
    let level = if cli.quiet {
        "error"
    } else if cli.verbose {
        "info"
    } else {
        "warn"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn run(cli: cli::Cli) -> anyhow::Result<()> {
    let config = Config::load(cli.config.as_deref(), cli.db.clone())
        .context("Failed to load configuration")?;

    match cli.command {
        cli::Commands::Labels {
            scheme,
            filter,
            show,
            sort,
            ascending,
        } => {
            let mut session = cli::open_session(&config)?;
            let options = ViewOptions {
                filter,
                patterns: show.into(),
                sort: sort.into(),
                order: if ascending {
                    SortOrder::Ascending
                } else {
                    SortOrder::Descending
                },
            };
            cli::labels::handle_labels_command(&mut session, scheme.into(), options, cli.quiet)?;
        }

        cli::Commands::Evaluate {
            label,
            include,
            exclude,
            scheme,
            population,
            sample_size,
            dry_run,
        } => {
            let mut config = config;
            if let Some(size) = sample_size {
                config.sample_size = size;
            }
            let session = cli::open_session(&config)?;
            cli::evaluate::handle_evaluate_command(
                session,
                &config,
                scheme.into(),
                label,
                include,
                exclude,
                population,
                dry_run,
                cli.quiet,
            )?;
        }

        cli::Commands::Report { scheme, limit } => {
            let db = cli::init_database(&config)?;
            cli::report::handle_report_command(&db, scheme.into(), limit)?;
        }
    }

    Ok(())
}

/// Pattern mistakes and unknown labels are feedback for the person typing,
/// not crashes.
fn report_error(e: anyhow::Error) -> ExitCode {
    match e.downcast_ref::<TaggerError>() {
        Some(TaggerError::InvalidPattern { pattern, message }) => {
            eprintln!(
                "{} Invalid pattern {}\n{}",
                style("✗").red(),
                style(pattern).bold(),
                message
            );
            ExitCode::from(2)
        }
        Some(TaggerError::MissingLabel(label)) => {
            println!(
                "{} No label '{}' in this scheme, choose one from `tagger labels`",
                style(">>>").cyan(),
                label
            );
            ExitCode::SUCCESS
        }
        _ => {
            eprintln!("{} {:#}", style("Error:").red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
