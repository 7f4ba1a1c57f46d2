use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::parsers::InputFormat;

#[derive(Parser)]
#[command(name = "avwx-processor")]
#[command(about = "METAR/TAF decoding and validation engine")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,

    #[arg(
        short,
        long,
        global = true,
        help = "Configuration file [default: $AVWX_CONFIG or avwx.toml]"
    )]
    pub config: Option<PathBuf>,
}

impl Cli {
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "info"
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Decode a single METAR or SPECI and print it as JSON
    DecodeMetar {
        #[arg(help = "Raw report text, quoted")]
        raw: String,

        #[arg(long, help = "Reject the report at its first undecodable group")]
        strict: bool,
    },

    /// Decode a single TAF and print it as JSON
    DecodeTaf {
        #[arg(help = "Raw report text, quoted")]
        raw: String,

        #[arg(long, help = "Reject the report at its first undecodable group")]
        strict: bool,
    },

    /// Decode a file of reports into JSON lines
    Process {
        #[arg(short, long, help = "Input file of raw reports")]
        input: PathBuf,

        #[arg(short, long, help = "Output JSON-lines file [default: stdout]")]
        output: Option<PathBuf>,

        #[arg(short, long, value_enum, default_value_t = InputFormat::Text)]
        format: InputFormat,

        #[arg(long, help = "Worker threads [default: from config]")]
        max_workers: Option<usize>,

        #[arg(long, help = "Reports per work unit [default: from config]")]
        chunk_size: Option<usize>,

        #[arg(long, default_value = "false")]
        validate_only: bool,
    },

    /// Decode a file of reports and print a summary only
    Validate {
        #[arg(short, long, help = "Input file of raw reports")]
        input: PathBuf,

        #[arg(short, long, value_enum, default_value_t = InputFormat::Text)]
        format: InputFormat,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_process_command() {
        let cli = Cli::try_parse_from([
            "avwx-processor",
            "--verbose",
            "process",
            "--input",
            "reports.csv",
            "--format",
            "csv",
            "--max-workers",
            "4",
        ])
        .unwrap();
        assert_eq!(cli.log_level(), "debug");
        match cli.command {
            Commands::Process {
                format, max_workers, chunk_size, ..
            } => {
                assert_eq!(format, InputFormat::Csv);
                assert_eq!(max_workers, Some(4));
                assert_eq!(chunk_size, None);
            }
            _ => panic!("expected process command"),
        }
    }
}
