//! Bumpwatch CLI entry point.
//!
//! This binary provides the command-line interface for Bumpwatch.

use bumpwatch::cli::{CheckArgs, CheckFileArgs, Cli, Commands};
use bumpwatch::reporter::{Reporter, TextReporter};
use bumpwatch::{BumpwatchError, Config, Detector, ReportFormat};
use clap::{CommandFactory, Parser};
use std::error::Error;
use std::io::IsTerminal;
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const DEFAULT_CONFIG_FILES: [&str; 3] = ["bumpwatch.yaml", "bumpwatch.yml", ".bumpwatch.yaml"];

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet);

    match run(cli).await {
        Ok(exit_code) => exit_code,
        Err(e) => {
            tracing::error!(error = %e, "Fatal error");

            eprintln!("Error: {e}");

            let mut source = e.source();
            if source.is_some() {
                eprintln!("\nCaused by:");
                let mut i = 0;
                while let Some(cause) = source {
                    eprintln!("  {i}: {cause}");
                    source = cause.source();
                    i += 1;
                }
            }

            let code = e
                .downcast_ref::<BumpwatchError>()
                .map_or(1, BumpwatchError::exit_code);
            ExitCode::from(code)
        }
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        // RUST_LOG wins over the verbose flag
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            let base_level = match verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            };
            EnvFilter::new(format!("warn,bumpwatch={base_level}"))
        })
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    tracing::debug!("Loading configuration");
    let mut config = load_config(&cli)?;

    match cli.command {
        Commands::Check(ref args) => {
            config.merge_cli_args(args);
            check(&cli, args, config).await
        }

        Commands::CheckFile(ref args) => check_file(args, config).await,

        Commands::Init => {
            let config_path = std::path::Path::new(DEFAULT_CONFIG_FILES[0]);

            if config_path.exists() {
                anyhow::bail!("Configuration file already exists: {}", config_path.display());
            }

            std::fs::write(config_path, Config::example_yaml())?;
            println!("Created example configuration: {}", config_path.display());
            Ok(ExitCode::SUCCESS)
        }

        Commands::Validate(ref args) => {
            let content = std::fs::read_to_string(&args.file)?;
            match Config::from_yaml(&content) {
                Ok(_) => {
                    println!("Configuration is valid: {}", args.file.display());
                    Ok(ExitCode::SUCCESS)
                }
                Err(e) => {
                    eprintln!("Configuration error: {e}");
                    Ok(ExitCode::from(1))
                }
            }
        }
    }
}

async fn check(cli: &Cli, args: &CheckArgs, mut config: Config) -> anyhow::Result<ExitCode> {
    config.output.colored &= args.output.is_none() && std::io::stdout().is_terminal();
    let detector = Detector::new(config.clone());

    let files = if args.files.is_empty() {
        let changed = detector.changed_files(&args.base_ref);
        if changed.is_empty() {
            // Nothing to do: show usage instead of an empty report
            let mut command = Cli::command();
            if let Some(check) = command.find_subcommand_mut("check") {
                println!("{}", check.render_help());
            }
            return Ok(ExitCode::SUCCESS);
        }
        tracing::info!(base_ref = %args.base_ref, "Checking git changes");
        changed
    } else {
        tracing::info!(files = args.files.len(), "Checking specific files");
        args.files.clone()
    };

    let result = detector.detect(Some(files), &args.base_ref).await?;
    let report = Reporter::new(&config).generate(&result.issues, args.format)?;

    if let Some(output_path) = &args.output {
        std::fs::write(output_path, &report)?;
        tracing::info!(path = %output_path.display(), "Report written");
    } else if !report.trim().is_empty() {
        println!("{}", report.trim_end());
    }

    if cli.verbose > 0 && args.format == ReportFormat::Text {
        match TextReporter::summary(&result.issues) {
            Some(summary) => println!("\n{summary}"),
            None => println!("✅ No issues found!"),
        }
    }

    tracing::info!(
        errors = result.has_errors(),
        warnings = result.has_warnings(),
        failed_files = result.failed_files,
        "Check finished"
    );

    Ok(if result.has_errors() {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    })
}

async fn check_file(args: &CheckFileArgs, mut config: Config) -> anyhow::Result<ExitCode> {
    if !args.file.exists() {
        anyhow::bail!("File not found: {}", args.file.display());
    }

    config.output.colored &= std::io::stdout().is_terminal();
    let detector = Detector::new(config.clone());

    let result = detector
        .detect(Some(vec![args.file.clone()]), &args.base_ref)
        .await?;

    if result.issues.is_empty() {
        println!("✅ No issues found!");
        return Ok(ExitCode::SUCCESS);
    }

    let report = Reporter::new(&config).generate(&result.issues, ReportFormat::Text)?;
    println!("{}", report.trim_end());
    Ok(ExitCode::from(1))
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    if let Some(ref config_path) = cli.config {
        tracing::debug!(path = %config_path.display(), "Loading configuration from explicit path");
        let content = std::fs::read_to_string(config_path)?;
        return Ok(Config::from_yaml(&content)?);
    }

    tracing::debug!("Searching for default configuration files");
    for path in DEFAULT_CONFIG_FILES {
        if std::path::Path::new(path).exists() {
            tracing::debug!(path = %path, "Found configuration file");
            let content = std::fs::read_to_string(path)?;
            return Ok(Config::from_yaml(&content)?);
        }
    }

    tracing::debug!("No configuration file found, using default configuration");
    Ok(Config::default())
}
