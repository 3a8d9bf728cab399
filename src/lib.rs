// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod fs;
pub mod loaders;
pub mod logging;
pub mod logs;
pub mod model;
pub mod orchestrator;
pub mod theme;
pub mod watch;

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::Layout;
use crate::engine::{ReloadRequest, ReloadRuntime};
use crate::fs::{FileSystem, RealFileSystem};
use crate::model::Generation;
use crate::orchestrator::{Orchestrator, Services};
use crate::theme::SassCompiler;
use crate::watch::NotifyBackend;

pub use crate::orchestrator::{BuildOutcome, DashboardReload};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - the orchestrator and its collaborators
/// - the initial build
/// - source and dashboard watches
/// - the reload runtime
/// - Ctrl-C handling
pub async fn run(args: CliArgs, layout: Layout) -> Result<()> {
    if args.dry_run {
        print_dry_run(&layout);
        return Ok(());
    }

    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    let services = Services {
        fs: Arc::clone(&fs),
        compiler: Arc::new(SassCompiler::new(Arc::clone(&fs))),
        watcher: Arc::new(NotifyBackend::new()?),
    };

    let (request_tx, request_rx) = mpsc::unbounded_channel::<ReloadRequest>();
    let orchestrator = Arc::new(Orchestrator::new(layout, services, request_tx.clone())?);

    info!("dashgraph starting..");
    let outcome = tokio::task::block_in_place(|| orchestrator.build());
    if let Some(generation) = outcome.generation() {
        print_summary(generation);
    }

    if args.once {
        orchestrator.stop_watching();
        return Ok(());
    }

    orchestrator.start_watching();

    // Ctrl-C → graceful shutdown.
    {
        let tx = request_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            let _ = tx.send(ReloadRequest::Shutdown);
        });
    }

    let runtime = ReloadRuntime::new(Arc::clone(&orchestrator), request_rx);
    runtime.run().await?;

    orchestrator.stop_watching();
    Ok(())
}

fn print_dry_run(layout: &Layout) {
    println!("dashgraph dry-run");
    println!("  settings:       {}", layout.settings_file().display());
    println!("  data sources:   {}", layout.data_sources_file().display());
    println!("  shared cards:   {}", layout.shared_cards_file().display());
    println!("  users:          {}", layout.users_file().display());
    println!(
        "  dashboards:     {} ({})",
        layout.dashboards_dir().display(),
        layout.dashboard_pattern()
    );
    println!("  main dashboard: {}", layout.main_dashboard());
    println!(
        "  themes:         {} then {}",
        layout.custom_themes_dir().display(),
        layout.system_themes_dir().display()
    );
    println!("  stylesheet:     {}", layout.stylesheet().display());
    if let Some(log_file) = layout.log_file() {
        println!("  log file:       {}", log_file.display());
    }
    for dir in layout.extra_watch_dirs() {
        println!("  also watching:  {}", dir.display());
    }

    debug!("dry-run complete (nothing loaded)");
}

fn print_summary(generation: &Generation) {
    println!("generation {}", generation.id());
    println!("  theme: {}", generation.settings().theme());
    if let Some(err) = generation.settings().error() {
        println!("  settings error: {err}");
    }
    if let Some(err) = generation.data_sources().error() {
        println!("  data sources error: {err}");
    }
    if let Some(err) = generation.theme_error() {
        println!("  theme error: {err}");
    }
    println!("  data sources: {}", generation.data_sources().len());
    println!("  shared cards: {}", generation.shared_cards().len());
    println!("dashboards:");
    for dboard in generation.dashboards() {
        println!("  - {} ({} cards)", dboard.name(), dboard.cards().len());
        if let Some(err) = dboard.error() {
            println!("      error: {err}");
        }
    }
}
