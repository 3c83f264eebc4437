//! Dependency Guardian binary.
//!
//! Loads configuration, wires the adapters into a cycle orchestrator, and
//! either runs one cycle (`--once`) or keeps running until interrupted.
//! `--status` only reads the persisted session memory.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::sync::watch;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use dependency_guardian::adapters::{
    AnyResetSignal, CommandRunner, ConfigFileWatch, FileMemoryStore, GitCli, GitHubClient,
    GitHubConfig, NpmCli, ResetFlag,
};
use dependency_guardian::application::handlers::SessionMemoryStore;
use dependency_guardian::application::{CycleOrchestrator, CyclePorts, Scheduler};
use dependency_guardian::config::{AppConfig, LogFormat};
use dependency_guardian::domain::foundation::Timestamp;

#[derive(Debug, Parser)]
#[command(name = "dependency-guardian", version, about)]
struct Args {
    /// Run a single cycle and exit
    #[arg(long)]
    once: bool,

    /// Path to the YAML configuration file
    #[arg(long, default_value = "config.yaml")]
    config: PathBuf,

    /// Print the persisted session memory summary and exit
    #[arg(long, conflicts_with = "once")]
    status: bool,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let config = match AppConfig::load(&args.config) {
        Ok(config) => config,
        Err(err) => {
            init_tracing(LogFormat::Pretty, args.verbose);
            tracing::error!(path = %args.config.display(), error = %err, "Could not load configuration");
            return ExitCode::FAILURE;
        }
    };
    init_tracing(config.logging.format, args.verbose);

    if args.status {
        return print_status(&config).await;
    }

    if let Err(err) = config.validate() {
        tracing::error!(error = %err, "Invalid configuration");
        return ExitCode::FAILURE;
    }

    let reset_signal = reset_signals(&args.config).await;
    let mut orchestrator = CycleOrchestrator::new(config.clone(), ports(&config, reset_signal));

    if let Err(err) = orchestrator.start().await {
        tracing::error!(error = %err, "Could not initialize session memory");
        return ExitCode::FAILURE;
    }
    tracing::info!(repo = %config.github.repo_url, "Dependency Guardian started");

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let mut scheduler = Scheduler::new(orchestrator, config.agent.check_interval(), shutdown_rx);

    if args.once {
        let report = scheduler.run_once().await;
        if let Ok(json) = serde_json::to_string(&report) {
            tracing::info!(report = %json, "Cycle report");
        }
        return ExitCode::SUCCESS;
    }

    tokio::spawn(async move {
        wait_for_termination().await;
        tracing::info!("Shutdown requested, stopping after the current cycle");
        let _ = shutdown_tx.send(true);
    });

    scheduler.run().await;
    ExitCode::SUCCESS
}

/// Reads the memory file without starting a session, so it is safe to run
/// next to a cycling process.
async fn print_status(config: &AppConfig) -> ExitCode {
    let store = SessionMemoryStore::new(Arc::new(FileMemoryStore::new(&config.paths.memory_file)));
    match store.persisted().await {
        Ok(Some(memory)) => {
            let status = serde_json::json!({
                "repo_url": memory.repo_url(),
                "stats": memory.stats(Timestamp::now()),
                "history": memory.history(),
            });
            println!("{status:#}");
            ExitCode::SUCCESS
        }
        Ok(None) => {
            println!("No session memory at {}", config.paths.memory_file.display());
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(path = %config.paths.memory_file.display(), error = %err, "Could not read session memory");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(format: LogFormat, verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let registry = tracing_subscriber::registry().with(filter);

    let result = match format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_current_span(true))
            .try_init(),
        LogFormat::Pretty => registry.with(fmt::layer()).try_init(),
    };
    if let Err(err) = result {
        eprintln!("tracing init failed: {err}");
    }
}

fn ports(config: &AppConfig, reset_signal: Arc<AnyResetSignal>) -> CyclePorts {
    let runner = CommandRunner::new(config.commands.timeout()).redacting(config.github.token());

    CyclePorts {
        source_control: Arc::new(GitCli::new(config.commands.git.clone(), runner.clone())),
        package_manager: Arc::new(NpmCli::new(config.commands.npm.clone(), runner)),
        review_host: Arc::new(GitHubClient::new(
            GitHubConfig::new(config.github.token()).with_base_url(config.github.api_base_url.clone()),
        )),
        memory_store: Arc::new(FileMemoryStore::new(&config.paths.memory_file)),
        reset_signal,
    }
}

/// Reset triggers: SIGHUP on unix, and any edit to the configuration file.
async fn reset_signals(config_path: &std::path::Path) -> Arc<AnyResetSignal> {
    let flag = ResetFlag::new();
    let watch = ConfigFileWatch::new(config_path).await;

    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::hangup()) {
            Ok(mut hangup) => {
                let flag = flag.clone();
                tokio::spawn(async move {
                    while hangup.recv().await.is_some() {
                        tracing::info!("SIGHUP received, memory will reset before the next cycle");
                        flag.raise();
                    }
                });
            }
            Err(err) => tracing::warn!(error = %err, "Could not install SIGHUP handler"),
        }
    }

    Arc::new(
        AnyResetSignal::new()
            .with(Arc::new(flag))
            .with(Arc::new(watch)),
    )
}

async fn wait_for_termination() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = terminate.recv() => {}
                }
                return;
            }
            Err(err) => tracing::warn!(error = %err, "Could not install SIGTERM handler"),
        }
    }

    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Could not listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}
