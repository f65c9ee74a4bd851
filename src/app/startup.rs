//! Application startup and the simulation run loop

use crate::app::cli::args::Args;
use crate::app::cli::config::{ConfigError, SimulationConfig};
use crate::core::error_handling::{log_error_with_context, ContextualError};
use crate::core::logging::init_logging;
use crate::core::shutdown::{CancellationToken, ShutdownCoordinator};
use crate::core::version;
use crate::sim::{Intersection, SimError};
use clap::Parser;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::time::Instant;

pub const INTERSECTION_NAME: &str = "intersection";

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Sim(#[from] SimError),

    #[error("Shutdown task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ContextualError for StartupError {
    fn is_user_actionable(&self) -> bool {
        match self {
            StartupError::Config(e) => e.is_user_actionable(),
            StartupError::Sim(e) => e.is_user_actionable(),
            StartupError::Task(_) => false,
        }
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            StartupError::Config(e) => e.user_message(),
            StartupError::Sim(e) => e.user_message(),
            StartupError::Task(_) => None,
        }
    }
}

/// Run the application; returns the process exit code
pub async fn startup() -> i32 {
    let args = Args::parse();

    let config = match SimulationConfig::resolve(&args).await {
        Ok(config) => config,
        Err(e) => {
            // Logging from the flags alone so the failure is still reported
            let color = args
                .color_override()
                .unwrap_or_else(|| std::io::IsTerminal::is_terminal(&std::io::stderr()));
            let _ = init_logging(args.log_level.as_deref(), args.log_format.as_deref(), None, color);
            log_error_with_context(&e, "Loading configuration");
            return 1;
        }
    };

    let log_file = config
        .log_file
        .as_ref()
        .map(|path| path.to_string_lossy().to_string());
    if let Err(e) = init_logging(
        Some(&config.log_level),
        Some(&config.log_format),
        log_file.as_deref(),
        config.use_color(),
    ) {
        eprintln!("Error initializing logging: {}", e);
        return 1;
    }

    log::info!(
        "trafficlight v{} ({} built {})",
        version::version(),
        version::git_hash(),
        version::build_time()
    );
    log::debug!("Configuration: {:?}", config);

    let result = ShutdownCoordinator::guard_with_coordinator(|coordinator, shutdown_rx| async move {
        let result = run_simulation(&config, coordinator.cancellation_token(), shutdown_rx).await;
        if coordinator.is_shutdown_requested() {
            log::debug!("Stopped by signal");
        }
        result
    })
    .await;

    match result {
        Ok(crossings) => {
            log::info!("Simulation finished with {} crossings", crossings);
            0
        }
        Err(e) => {
            log_error_with_context(&e, "Running simulation");
            1
        }
    }
}

/// Run the intersection until shutdown is signalled or the run time elapses
///
/// Logs a snapshot of every light each report interval. Vehicles stop as
/// soon as `cancel` fires. Returns the total number of vehicle crossings.
pub async fn run_simulation(
    config: &SimulationConfig,
    cancel: CancellationToken,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> Result<u64, StartupError> {
    let intersection = Arc::new(Intersection::with_cancellation(
        INTERSECTION_NAME,
        config.lights,
        config.light_config()?,
        cancel,
    )?);
    intersection.simulate()?;
    intersection.spawn_vehicles(config.vehicles, None)?;

    let deadline = config
        .duration()
        .and_then(|d| Instant::now().checked_add(d));
    let mut report = tokio::time::interval(config.report_interval());
    // The first tick completes immediately
    report.tick().await;

    loop {
        tokio::select! {
            _ = shutdown_rx.recv() => {
                log::info!("Shutdown requested");
                break;
            }
            _ = run_time_elapsed(deadline) => {
                log::info!("Run time of {}s elapsed", config.duration.unwrap_or_default());
                break;
            }
            _ = report.tick() => {
                log::info!("{}", intersection.snapshot());
            }
        }
    }

    let stopping = Arc::clone(&intersection);
    let crossings = tokio::task::spawn_blocking(move || stopping.shutdown()).await??;
    Ok(crossings)
}

async fn run_time_elapsed(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
