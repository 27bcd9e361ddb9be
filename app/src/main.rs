//! Main application entry point for Lightbox.

mod config;
mod logging;

use api_client::ApiClient;
use cache::{KeyValueStore, LocalStore, SessionStore};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use ui::{Route, UiFlags};

#[derive(Parser)]
#[command(name = "lightbox", author, version, about = "Lightbox photo browser")]
struct Cli {
    /// Override log level (e.g. info, debug)
    #[arg(long)]
    log_level: Option<String>,
    /// Override the backend address
    #[arg(long)]
    backend_url: Option<String>,
    /// Override the directory holding generated previews
    #[arg(long)]
    previews_dir: Option<PathBuf>,
    /// Path to config file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Remember the grid size separately for every folder
    #[arg(long)]
    grid_size_per_directory: bool,
    /// Enable tokio console for debugging
    #[arg(long)]
    debug_console: bool,
    /// Enable tracing spans instrumentation
    #[arg(long)]
    trace_spans: bool,
    /// Location to open, e.g. `/d1` or `/d1/beach.jpg`
    #[arg(long)]
    open: Option<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let overrides = config::AppConfigOverrides {
        log_level: cli.log_level.clone(),
        backend_url: cli.backend_url.clone(),
        previews_dir: cli.previews_dir.clone(),
        grid_size_per_directory: cli.grid_size_per_directory,
        debug_console: cli.debug_console,
        trace_spans: cli.trace_spans,
    };
    let cfg = config::AppConfig::load_from(cli.config.clone()).apply_overrides(&overrides);
    let _log_guard = logging::init(&cfg, "lightbox.log")?;

    tracing::info!("Starting Lightbox against {}", cfg.backend_url);
    tracing::info!("Previews directory: {}", cfg.previews_dir.display());

    // The event reader lives on this runtime while iced drives the UI on the
    // main thread.
    let runtime = tokio::runtime::Runtime::new()?;
    let client = ApiClient::with_base_url(cfg.backend_url.clone());
    let events = match runtime.block_on(client.subscribe_events()) {
        Ok(subscription) => Some(subscription),
        Err(e) => {
            tracing::warn!("Preview events unavailable: {}", e);
            None
        }
    };

    let local_store: Arc<dyn KeyValueStore> =
        match LocalStore::new(&cfg.cache_path.join("storage.sqlite")) {
            Ok(store) => Arc::new(store),
            Err(e) => {
                tracing::warn!("Falling back to in-memory preferences: {}", e);
                Arc::new(SessionStore::new())
            }
        };

    let flags = UiFlags {
        client,
        events,
        previews_dir: cfg.previews_dir.clone(),
        cache_dir: cfg.cache_path.clone(),
        local_store,
        session_store: Arc::new(SessionStore::new()),
        grid_size_per_directory: cfg.grid_size_per_directory,
        initial_route: cli.open.as_deref().map(Route::parse).unwrap_or(Route::Home),
    };

    ui::run(flags)?;
    drop(runtime);
    Ok(())
}
