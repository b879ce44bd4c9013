mod config;
mod csv_out;
mod extract;
mod report;
mod scan;

use clap::{Parser, Subcommand};
use report::{Layout, ParaRun};
use std::path::PathBuf;
use std::process::ExitCode;

/// Convert FTL simulator benchmark logs into CSV rows.
#[derive(Parser, Debug)]
#[command(name = "ftl-report", version, about)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Config file path
    #[arg(short, long, global = true, default_value = "ftl-report.toml")]
    config: PathBuf,

    /// Fail when metric counts differ instead of truncating rows
    #[arg(long, global = true)]
    strict: bool,

    /// Extra logging (per-column counts, skipped lines)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert one log file into one CSV file
    Data {
        /// Simulator log to read
        input: PathBuf,
        /// CSV file to write
        output: PathBuf,
    },
    /// Convert <output_dir>/<FTL>-para-j<JOBS>.out into the matching .csv
    Para {
        /// FTL name
        ftl: String,
        /// Number of parallel jobs, used verbatim in file names
        jobs: String,
    },
    /// Convert every *-para-j*.out log in a directory
    Batch {
        /// Directory to scan (default: paths.output_dir from config)
        dir: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = usage_exit_code(&e);
            let _ = e.print();
            return ExitCode::from(code);
        }
    };

    init_logging(cli.verbose, cli.quiet);
    tracing::debug!(?cli, "parsed CLI arguments");

    let cfg = config::load_config(&cli.config);
    let strict = cli.strict || cfg.extract.strict_alignment;

    match run(&cli.command, &cfg, strict) {
        Ok(()) => ExitCode::SUCCESS,
        Err(msg) => {
            tracing::error!("{msg}");
            ExitCode::from(1)
        }
    }
}

/// Usage errors exit 1; `--help` and `--version` exit 0.
fn usage_exit_code(e: &clap::Error) -> u8 {
    if e.use_stderr() {
        1
    } else {
        0
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    let default = if verbose {
        "ftl_report=debug"
    } else if quiet {
        "ftl_report=warn"
    } else {
        "ftl_report=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(command: &Command, cfg: &config::ReportConfig, strict: bool) -> Result<(), String> {
    match command {
        Command::Data { input, output } => {
            report::convert(input, output, Layout::Data, strict).map_err(|e| e.to_string())?;
        }
        Command::Para { ftl, jobs } => {
            ParaRun::new(ftl.as_str(), jobs.as_str())
                .convert(&cfg.paths.output_dir, strict)
                .map_err(|e| e.to_string())?;
        }
        Command::Batch { dir } => {
            let dir = dir.as_deref().unwrap_or(cfg.paths.output_dir.as_path());
            let summary = report::convert_batch(dir, strict).map_err(|e| e.to_string())?;
            tracing::info!(
                dir = %dir.display(),
                converted = summary.converted.len(),
                failed = summary.failed.len(),
                "batch finished"
            );
            if summary.converted.is_empty() && summary.failed.is_empty() {
                return Err(format!("no *-para-j*.out logs found in {}", dir.display()));
            }
            if !summary.failed.is_empty() {
                return Err(format!("{} log(s) failed to convert", summary.failed.len()));
            }
        }
    }
    Ok(())
}
