//! nllb-bridge - NLLB translation through a managed Python environment
//!
//! Command line entry point: sets up logging and configuration, then calls
//! into the orchestration API.

use anyhow::Result;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, Level};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tracing_appender::{non_blocking, rolling};

use nllb_bridge::batch::BatchDriver;
use nllb_bridge::cli::{Args, Commands};
use nllb_bridge::config::Config;
use nllb_bridge::process::{CancellationToken, TokioProcessRunner};
use nllb_bridge::translate::Translator;

const DEFAULT_CONFIG_FILE: &str = "nllb-bridge.toml";

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    setup_logging(args.verbose)?;

    let config = match &args.config {
        Some(config_path) => Config::from_file(config_path)?,
        None => {
            if Path::new(DEFAULT_CONFIG_FILE).exists() {
                info!("Found {} in current directory, loading...", DEFAULT_CONFIG_FILE);
                Config::from_file(DEFAULT_CONFIG_FILE)?
            } else {
                Config::default()
            }
        }
    };

    // Ctrl-C kills whatever subprocess is running instead of orphaning it.
    let (token, handle) = CancellationToken::new();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            handle.cancel();
        }
    });
    let runner = Arc::new(TokioProcessRunner::new().with_cancellation(token));
    let mut translator = Translator::new(config.clone(), runner)?;

    match args.command {
        Commands::Setup { force } => {
            run_setup(&mut translator, force).await?;
            println!("Environment ready at {}", translator.environment().layout().root().display());
        }
        Commands::Translate { text, to, model } => {
            run_setup(&mut translator, false).await?;
            let result = translator.translate(&text, &to, model).await?;
            println!("{}", result);
        }
        Commands::Batch { input, to, model, output } => {
            let content = std::fs::read_to_string(&input)?;
            let texts: Vec<&str> = content.lines().filter(|l| !l.trim().is_empty()).collect();
            info!("Translating {} lines from {}", texts.len(), input.display());

            let mut writer: Box<dyn Write> = match &output {
                Some(path) => Box::new(std::fs::File::create(path)?),
                None => Box::new(std::io::stdout()),
            };

            let mut failures = 0;
            let mut write_error = None;
            BatchDriver::new(&mut translator)
                .translate_all(&texts[..], &to, model, |result| {
                    let line = match result {
                        Ok(translation) => translation,
                        Err(e) => {
                            failures += 1;
                            eprintln!("error: {}", e);
                            String::new()
                        }
                    };
                    if let Err(e) = writeln!(writer, "{}", line) {
                        write_error.get_or_insert(e);
                    }
                })
                .await;

            if let Some(e) = write_error {
                return Err(e.into());
            }
            if failures > 0 {
                anyhow::bail!("{} of {} translations failed", failures, texts.len());
            }
        }
        Commands::Models => {
            println!("{:<6} {}", "Index", "Model");
            println!("{}", "-".repeat(45));
            for (index, model) in translator.models().iter() {
                println!("{:<6} {}", index, model);
            }
        }
        Commands::Languages => {
            println!("{:<12} {}", "Code", "Model code");
            println!("{}", "-".repeat(25));
            for (code, model_code) in translator.languages().codes() {
                println!("{:<12} {}", code, model_code);
            }
        }
        Commands::InitConfig { path } => {
            config.save_to_file(&path)?;
            println!("Wrote configuration to {}", path.display());
        }
    }

    Ok(())
}

/// Run setup behind a spinner; installing torch takes minutes
async fn run_setup(translator: &mut Translator, force: bool) -> Result<()> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?);
    spinner.set_message("Preparing Python environment...");
    spinner.enable_steady_tick(Duration::from_millis(120));

    let result = translator.setup(force).await;
    match &result {
        Ok(()) => spinner.finish_with_message("Python environment ready"),
        Err(_) => spinner.abandon_with_message("Python environment setup failed"),
    }
    Ok(result?)
}

/// Setup logging to both console and file
fn setup_logging(verbose: bool) -> Result<()> {
    let log_dir = std::env::current_dir()?.join(".nllb-bridge").join("log");
    std::fs::create_dir_all(&log_dir)?;

    // Daily rotation; the guard must live as long as the program
    let file_appender = rolling::daily(&log_dir, "nllb-bridge.log");
    let (non_blocking_file, guard) = non_blocking(file_appender);
    std::mem::forget(guard);

    let log_level = if verbose { Level::DEBUG } else { Level::INFO };

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_file(verbose)
        .with_line_number(verbose);

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    info!("Logging initialized - console: {}, file: {}",
          log_level, log_dir.join("nllb-bridge.log").display());

    Ok(())
}
