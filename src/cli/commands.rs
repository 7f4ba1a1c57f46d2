use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;

use serde::Serialize;
use tracing::{debug, info};

use crate::cli::args::{Cli, Commands};
use crate::config::AppConfig;
use crate::error::Result;
use crate::models::WeatherReport;
use crate::parsers::{MetarParser, TafParser};
use crate::processors::BatchProcessor;

pub async fn run(cli: Cli) -> Result<()> {
    setup_logging(&cli)?;
    let config = AppConfig::load(cli.config.as_deref())?;
    debug!("Configuration: {:?}", config);

    match cli.command {
        Commands::DecodeMetar { raw, strict } => {
            let parser = MetarParser::new()
                .with_strict(strict || config.parser.strict)
                .with_decode_remarks(config.parser.decode_remarks);
            let report = parser.parse(&raw)?;
            print_json(&report, config.output.pretty_json)?;
        }

        Commands::DecodeTaf { raw, strict } => {
            let parser = TafParser::new().with_strict(strict || config.parser.strict);
            let report = parser.parse(&raw)?;
            print_json(&report, config.output.pretty_json)?;
        }

        Commands::Process {
            input,
            output,
            format,
            max_workers,
            chunk_size,
            validate_only,
        } => {
            let mut processor = BatchProcessor::from_config(&config);
            if let Some(max_workers) = max_workers {
                processor = processor.with_max_workers(max_workers);
            }
            if let Some(chunk_size) = chunk_size {
                processor = processor.with_chunk_size(chunk_size);
            }

            info!("Input file: {}", input.display());
            info!(
                "Workers: {}, Chunk size: {}",
                processor.max_workers(),
                processor.chunk_size()
            );

            let batch = processor.process_file(&input, format, true).await?;
            eprintln!("\n{}", batch.summary);

            if validate_only {
                eprintln!("Validation complete - no output written");
                return Ok(());
            }

            match output {
                Some(path) => {
                    write_json_lines_to_file(&batch.reports, &path)?;
                    info!("Wrote {} reports to {}", batch.reports.len(), path.display());
                }
                None => {
                    let stdout = io::stdout();
                    write_json_lines(&batch.reports, &mut stdout.lock())?;
                }
            }
        }

        Commands::Validate { input, format } => {
            let processor = BatchProcessor::from_config(&config);
            let batch = processor.process_file(&input, format, true).await?;
            println!("\n{}", batch.summary);

            if batch.summary.is_clean() {
                println!("All reports decoded cleanly");
            } else {
                println!(
                    "Found {} failed and {} partially decoded reports",
                    batch.summary.failed_reports, batch.summary.partially_decoded_reports
                );
            }
        }
    }

    Ok(())
}

fn setup_logging(cli: &Cli) -> Result<()> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let log_level = cli.log_level();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("avwx_processor={}", log_level)));

    let installed = match &cli.log_file {
        Some(path) => {
            let file = File::create(path)?;
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_target(false)
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .try_init()
        }
        None => tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(io::stderr),
            )
            .try_init(),
    };

    match installed {
        Ok(()) => debug!("Logging initialized at level: {}", log_level),
        Err(e) => debug!("Keeping existing subscriber: {}", e),
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", json);
    Ok(())
}

/// One JSON object per line.
pub fn write_json_lines<W: Write>(reports: &[WeatherReport], writer: &mut W) -> Result<()> {
    for report in reports {
        serde_json::to_writer(&mut *writer, report)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

fn write_json_lines_to_file(reports: &[WeatherReport], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = BufWriter::new(File::create(path)?);
    write_json_lines(reports, &mut writer)
}
