//! # b2c-keychain
//!
//! Runs one keychain credential resolution the way the B2C CLI would and
//! prints the merged config with its provenance.

use std::process::ExitCode;

use anyhow::{Context, Result};
use b2c_keychain_core::{list_secret_stores, ConfigSource, KeychainSettings, KeychainSource, ResolveConfigOptions};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Resolve B2C CLI credentials from the system keychain
#[derive(Debug, Parser)]
#[command(name = "b2c-keychain", version, about)]
struct Cli {
    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Resolve and print the merged credentials as JSON
    Resolve(ResolveArgs),
    /// List available secret store backends
    Backends,
}

#[derive(Debug, clap::Args)]
struct ResolveArgs {
    /// Instance to load (overrides the global record's defaultInstance)
    #[arg(short, long)]
    instance: Option<String>,

    /// Keychain service name (overrides SFCC_KEYCHAIN_SERVICE)
    #[arg(long)]
    service: Option<String>,

    /// Secret store backend (overrides SFCC_KEYCHAIN_BACKEND)
    #[arg(long)]
    backend: Option<String>,

    /// Command run in place of `security` (overrides SFCC_KEYCHAIN_PROGRAM)
    #[arg(long)]
    program: Option<String>,

    /// Print JSON on a single line
    #[arg(long)]
    compact: bool,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    debug!("Tracing initialized with level: {}", level);
}

fn resolve(args: ResolveArgs) -> Result<ExitCode> {
    let mut settings = KeychainSettings::discover().context("Failed to load keychain settings")?;
    if let Some(service) = args.service {
        settings = settings.with_service(service);
    }
    if let Some(backend) = args.backend {
        settings = settings.with_backend(backend);
    }
    if let Some(program) = args.program {
        settings = settings.with_program(program);
    }

    let source = KeychainSource::from_settings(settings).context("Failed to create keychain source")?;

    let mut options = ResolveConfigOptions::new();
    options.instance = args.instance;

    match source.load(&options) {
        Some(result) => {
            let json = if args.compact {
                serde_json::to_string(&result)
            } else {
                serde_json::to_string_pretty(&result)
            }
            .context("Failed to serialize resolved config")?;
            write_stdout(&json)?;
            Ok(ExitCode::SUCCESS)
        }
        None => {
            write_stderr(&format!(
                "no keychain configuration found ({}, backend {})",
                source.path().unwrap_or_default(),
                source.settings().backend
            ))?;
            Ok(ExitCode::FAILURE)
        }
    }
}

fn backends() -> Result<ExitCode> {
    for (name, description) in list_secret_stores() {
        write_stdout(&format!("{name:<10} {description}"))?;
    }
    Ok(ExitCode::SUCCESS)
}

fn write_stdout(line: &str) -> Result<()> {
    use std::io::Write;
    writeln!(std::io::stdout(), "{line}").context("Failed to write to stdout")
}

fn write_stderr(line: &str) -> Result<()> {
    use std::io::Write;
    writeln!(std::io::stderr(), "{line}").context("Failed to write to stderr")
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Resolve(args) => resolve(args),
        Command::Backends => backends(),
    }
}
