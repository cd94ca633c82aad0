//! CLI argument definitions for rdecheck.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "rdecheck",
    version,
    about = "Validate Real-Driving-Emissions CSV files against a files-schema",
    long_about = "Validate sectioned CSV files against a declarative files-schema.\n\n\
                  Each <FILE-SPEC> is [<file-kind>:]<path>; use `-` (or an empty path) \
                  for standard input.\n\
                  Use `rdecheck kinds` to list the available file-kinds."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Files-schema YAML to use instead of `$RDECHECK_SCHEMA` or the builtin one.
    #[arg(long = "schema", value_name = "PATH", global = true)]
    pub schema: Option<PathBuf>,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for warnings only).
    #[command(flatten)]
    pub verbosity: Verbosity<InfoLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "compact",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Validate one or more files.
    Validate(ValidateArgs),

    /// List the file-kinds of the files-schema.
    Kinds(KindsArgs),

    /// List the available cell-rules.
    Rules,
}

#[derive(Parser)]
pub struct ValidateArgs {
    /// Files to validate, as [<file-kind>:]<path>.
    #[arg(value_name = "FILE-SPEC", required = true)]
    pub file_specs: Vec<String>,

    /// File-kind for file-specs that do not name one.
    #[arg(short = 'f', long = "file-kind", value_name = "KIND")]
    pub default_kind: Option<String>,

    /// Cell delimiter, unless the file-kind declares its own.
    #[arg(short = 'd', long = "delimiter", default_value = ",", value_parser = parse_delimiter)]
    pub delimiter: u8,

    /// Keep validating the remaining files after one fails.
    #[arg(short = 'k', long = "keep-going")]
    pub keep_going: bool,

    /// Print the batch report as JSON instead of a table.
    #[arg(long = "json")]
    pub json: bool,

    /// Archive the input files after validation (not implemented).
    #[arg(long = "archive", hide = true)]
    pub archive: bool,
}

#[derive(Parser)]
pub struct KindsArgs {
    /// Print `- <kind>: <description>` lines instead of a table.
    #[arg(long = "plain")]
    pub plain: bool,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

/// Accept a single ASCII character other than a quote or line break.
pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) if ch.is_ascii() && !matches!(ch, '"' | '\r' | '\n') => Ok(ch as u8),
        _ => Err(format!("expected one ASCII character, got {value:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delimiter_is_one_ascii_char() {
        assert_eq!(parse_delimiter(";"), Ok(b';'));
        assert_eq!(parse_delimiter("\t"), Ok(b'\t'));
        assert!(parse_delimiter("").is_err());
        assert!(parse_delimiter(";;").is_err());
        assert!(parse_delimiter("\"").is_err());
        assert!(parse_delimiter("§").is_err());
    }

    #[test]
    fn validate_args_parse() {
        let cli = Cli::try_parse_from([
            "rdecheck", "validate", "-f", "f1", "-k", "--delimiter", ";", "a.csv", "f2:b.csv",
        ])
        .unwrap();
        let Command::Validate(args) = cli.command else {
            panic!("expected validate");
        };
        assert_eq!(args.default_kind.as_deref(), Some("f1"));
        assert!(args.keep_going);
        assert_eq!(args.delimiter, b';');
        assert_eq!(args.file_specs, ["a.csv", "f2:b.csv"]);
    }

    #[test]
    fn validate_requires_a_file_spec() {
        assert!(Cli::try_parse_from(["rdecheck", "validate"]).is_err());
    }
}
