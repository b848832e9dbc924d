use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use plcrash_core::header::{decode_header, ensure_addressable};
use plcrash_core::FormatResult;
use plcrash_utils::{debug, info, init_logging, init_logging_with_level, LogLevel};

/// Inspect plcrash crash-dump containers.
#[derive(Parser, Debug)]
#[command(name = "plcrash")]
#[command(version)]
#[command(about = "Inspect plcrash crash-dump containers", long_about = None)]
struct Cli
{
    /// Log level (overrides RUST_LOG)
    #[arg(long, global = true, value_parser = parse_log_level)]
    log_level: Option<LogLevel>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands
{
    /// Validate a container header and print a summary
    Inspect
    {
        /// Path to the crash-dump container
        file: PathBuf,
    },
}

fn parse_log_level(value: &str) -> Result<LogLevel, String>
{
    value.parse().map_err(|err: plcrash_utils::LoggingError| err.to_string())
}

fn main()
{
    let cli = Cli::parse();

    let logging = match cli.log_level {
        Some(level) => init_logging_with_level(level),
        None => init_logging(),
    };
    let _guard = match logging {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run_command(command: Commands) -> FormatResult<()>
{
    match command {
        Commands::Inspect { file } => inspect(&file),
    }
}

fn read_container(path: &Path) -> FormatResult<Vec<u8>>
{
    let mut file = File::open(path)?;
    let len = ensure_addressable(file.metadata()?.len())?;

    let mut bytes = Vec::with_capacity(len);
    file.read_to_end(&mut bytes)?;
    debug!(path = %path.display(), bytes = bytes.len(), "read container");
    Ok(bytes)
}

fn inspect(path: &Path) -> FormatResult<()>
{
    info!("Inspecting {}", path.display());
    let bytes = read_container(path)?;
    let header = decode_header(&bytes)?;

    println!("File:     {}", path.display());
    println!("Magic:    {}", String::from_utf8_lossy(header.magic()));
    println!("Version:  {}", header.version());
    println!("Payload:  {} bytes", header.payload().len());
    Ok(())
}
