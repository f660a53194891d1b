#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

mod options;
mod validate;

use std::{path::PathBuf, process::ExitCode};

use anyhow::Context;
use clap::{Parser, Subcommand};
use flexi_logger::{Cleanup, Criterion, Duplicate, FileSpec, Logger, LoggerHandle, Naming};
use hzk_font::LEVELS;

use crate::options::Options;

#[derive(Parser, Debug)]
#[command(version, about = "Encode and decode .hzk font files.", long_about = None)]
pub struct Cli {
    /// Options file to use instead of the one in the configuration directory
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Log debug output
    #[arg(short, long, default_value_t = false, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(about = "Encode a directory of atlas images into a .hzk file")]
    Encode {
        /// Directory holding one atlas image per level
        #[arg(short, long, value_name = "DIR")]
        input: PathBuf,
        /// File to write
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },

    #[command(about = "Decode a .hzk file into a directory of atlas images")]
    Decode {
        /// Font file to read
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,
        /// Directory to write the atlas images to
        #[arg(short, long, value_name = "DIR")]
        output: PathBuf,
    },

    #[command(about = "Write blank atlas images to draw a new font in")]
    Template {
        #[arg(short, long, value_name = "DIR")]
        output: PathBuf,
    },

    #[command(about = "Show the layout of the .hzk format")]
    Info,
}

fn get_log_dir() -> Option<PathBuf> {
    let proj_dirs = Options::project_dirs()?;
    let dir = proj_dirs.config_dir().to_path_buf();
    if !dir.exists() {
        std::fs::create_dir_all(&dir).ok()?;
    }
    Some(dir)
}

fn start_logger(spec: &str, verbose: bool) -> Option<LoggerHandle> {
    let spec = if verbose { "debug" } else { spec };
    let duplicate = if verbose { Duplicate::All } else { Duplicate::Info };
    let logger = match Logger::try_with_env_or_str(spec) {
        Ok(logger) => logger,
        Err(err) => {
            eprintln!("Invalid log specification '{spec}': {err}");
            return None;
        }
    };

    let result = if let Some(log_dir) = get_log_dir() {
        logger
            .log_to_file(FileSpec::default().directory(&log_dir).basename("hzk_tool").suffix("log").suppress_timestamp())
            .rotate(Criterion::Size(64 * 1024), Naming::Numbers, Cleanup::KeepLogFiles(3))
            .duplicate_to_stderr(duplicate)
            .start()
    } else {
        logger.log_to_stderr().start()
    };

    match result {
        Ok(handle) => Some(handle),
        Err(err) => {
            eprintln!("Failed to start logger: {err}");
            None
        }
    }
}

fn run(command: Commands, options: &Options) -> anyhow::Result<()> {
    match command {
        Commands::Encode { input, output } => {
            validate::check_encode_input(&input)?;
            validate::check_encode_output(&output, options.strict_extensions)?;
            log::info!("Generating {} from input directory {}", output.display(), input.display());
            let report = hzk_font::encode_dir(&input, &output).with_context(|| format!("Encoding {} failed", input.display()))?;
            log::info!("Encoded {} levels, {} bytes", report.levels, report.bytes_written);
        }
        Commands::Decode { input, output } => {
            validate::check_decode_input(&input, options.strict_extensions)?;
            validate::check_output_dir(&output)?;
            log::info!("Generating {} from input file {}", output.display(), input.display());
            let report = hzk_font::decode_file(&input, &output, &options.render_options())
                .with_context(|| format!("Decoding {} failed", input.display()))?;
            log::info!("Wrote {} images from {} bytes", report.images.len(), report.bytes_read);
        }
        Commands::Template { output } => {
            validate::check_output_dir(&output)?;
            std::fs::create_dir_all(&output).with_context(|| format!("Can't create {}", output.display()))?;
            hzk_font::HzkFont::blank()
                .save_atlas_dir(&output, &options.render_options())
                .with_context(|| format!("Writing templates to {} failed", output.display()))?;
        }
        Commands::Info => print_info(),
    }
    Ok(())
}

fn print_info() {
    println!("{:>5}  {:>7}  {:>9}  {:<22}  {:>7}  {:>6}", "level", "glyph", "atlas", "file", "offset", "bytes");
    for level in LEVELS {
        println!(
            "{:>5}  {:>7}  {:>9}  {:<22}  {:>7}  {:>6}",
            level.ordinal(),
            format!("{}x{}", level.width(), level.height()),
            format!("{}x{}", level.atlas_width(), level.atlas_height()),
            level.file_name(),
            level.offset(),
            level.encoded_len()
        );
    }
    println!("total: {} bytes", hzk_font::total_encoded_len());
}

fn main() -> ExitCode {
    let args = Cli::parse();

    let (options, options_error) = match Options::load(args.config.as_deref()) {
        Ok(options) => (options, None),
        Err(err) => (Options::default(), Some(err)),
    };

    let logger = start_logger(&options.log_spec, args.verbose);
    if let Some(err) = options_error {
        log::warn!("{err:#}, using defaults");
    }

    match run(args.command, &options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if logger.is_some() {
                log::error!("{err:#}");
            } else {
                eprintln!("ERROR: {err:#}");
            }
            ExitCode::FAILURE
        }
    }
}
