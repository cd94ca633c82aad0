//! rdecheck: validate Real-Driving-Emissions CSV files.

use std::io::{self, IsTerminal};

use clap::{ColorChoice, Parser};
use rde_cli::exit::{EXIT_INTERNAL, EXIT_OK, exit_code_for_error, exit_code_for_report};
use rde_cli::logging::{LogConfig, LogFormat, init_logging};
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::commands::{print_report, run_kinds, run_rules, run_validate};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(EXIT_INTERNAL);
    }
    let schema_path = cli.schema.as_deref();
    let exit_code = match &cli.command {
        Command::Validate(args) => match run_validate(args, schema_path) {
            Ok(report) => match print_report(&report, args.json) {
                Ok(()) => exit_code_for_report(&report),
                Err(error) => {
                    eprintln!("error: {error:#}");
                    EXIT_INTERNAL
                }
            },
            Err(error) => {
                eprintln!("error: {error:#}");
                exit_code_for_error(&error)
            }
        },
        Command::Kinds(args) => match run_kinds(args, schema_path) {
            Ok(()) => EXIT_OK,
            Err(error) => {
                eprintln!("error: {error:#}");
                exit_code_for_error(&error)
            }
        },
        Command::Rules => {
            run_rules();
            EXIT_OK
        }
    };
    std::process::exit(exit_code);
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let level_filter = match cli.log_level {
        Some(LogLevelArg::Error) => LevelFilter::ERROR,
        Some(LogLevelArg::Warn) => LevelFilter::WARN,
        Some(LogLevelArg::Info) => LevelFilter::INFO,
        Some(LogLevelArg::Debug) => LevelFilter::DEBUG,
        Some(LogLevelArg::Trace) => LevelFilter::TRACE,
        None => cli.verbosity.tracing_level_filter(),
    };
    let format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    let with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    LogConfig::default()
        .with_level_filter(level_filter)
        .with_env_filter(!(cli.verbosity.is_present() || cli.log_level.is_some()))
        .with_format(format)
        .with_log_file(cli.log_file.clone())
        .with_ansi(with_ansi)
}
