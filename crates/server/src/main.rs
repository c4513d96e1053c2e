// Copyright (C) 2026 Stayward Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Stayward server binary: database bootstrap, per-property job
//! registration, and the worker pool that runs the sweeps.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

use clap::Parser;
use std::sync::Arc;
use stayward_persistence::Persistence;
use tokio::sync::{Mutex, mpsc};
use tracing::{error, info};

mod scheduler;
mod worker;

use scheduler::{Environment, JobScheduler};
use worker::{JobQueue, WorkerPool};

/// Stayward - reservation lifecycle automation engine
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Deployment environment; selects sweep cadences.
    #[arg(short, long, value_enum, default_value = "development")]
    environment: Environment,

    /// Number of worker tasks pulling from the job queue.
    #[arg(short, long, default_value_t = 4)]
    workers: usize,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Stayward automation engine");

    // Initialize persistence (in-memory or file-based based on CLI argument)
    let mut persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    let properties = persistence.list_active_properties()?;
    let store = Arc::new(Mutex::new(persistence));

    // Wire the queue, workers, and scheduler
    let (queue, lanes) = JobQueue::new();
    let (outcome_tx, mut outcome_rx) = mpsc::unbounded_channel();
    let pool = WorkerPool::spawn(args.workers, Arc::clone(&store), lanes, outcome_tx);

    let mut scheduler = JobScheduler::new(args.environment, queue);
    for property in &properties {
        scheduler.schedule_jobs_for_property(property.property_id);
    }
    info!(
        properties = ?scheduler.registered_properties(),
        jobs = scheduler.status().repeatable_count,
        "sweep registration complete"
    );

    // Surface job outcomes in the log
    let outcome_logger = tokio::spawn(async move {
        while let Some(outcome) = outcome_rx.recv().await {
            if outcome.success {
                continue;
            }
            error!(
                property_id = outcome.property_id,
                job = %outcome.job,
                attempts = outcome.attempts,
                error = outcome.error.as_deref().unwrap_or("unknown"),
                "job gave up"
            );
        }
    });

    // Run until interrupted
    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received; draining workers");

    // Dropping the scheduler aborts the tickers and closes the queue lanes,
    // letting the pool drain and exit.
    drop(scheduler);
    pool.shutdown().await;
    outcome_logger.abort();

    info!("Stayward automation engine stopped");
    Ok(())
}
