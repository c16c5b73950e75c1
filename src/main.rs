//! MDMA viewer - Main Entry Point
//!
//! Desktop viewer for 2D network-analyzer sweeps with a synchronized
//! viewing frame across heatmap panes.

use anyhow::Context as _;
use mdma_viewer::config::{ensure_app_data_dir, UiSessionState, ViewerConfig, LOG_DIR};
use mdma_viewer::ViewerApp;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Console logging, plus a daily log file when the data directory is usable.
fn init_logging(default_filter: &str) -> Option<WorkerGuard> {
    let (file_layer, guard) = match ensure_app_data_dir() {
        Ok(dir) => {
            let appender = tracing_appender::rolling::daily(dir.join(LOG_DIR), "mdma-viewer.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        Err(_) => (None, None),
    };

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with(tracing_subscriber::fmt::layer())
        .with(file_layer)
        .init();

    guard
}

fn main() -> anyhow::Result<()> {
    // Config comes first so its log filter can be applied
    let config = ViewerConfig::load_or_default();
    let _log_guard = init_logging(&config.log_filter);

    tracing::info!("Starting {}", config.window_title);

    let session = UiSessionState::load();
    let app = ViewerApp::new(config.clone(), session).context("Failed to build main window")?;

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size([800.0, 400.0])
            .with_title(&config.window_title),
        ..Default::default()
    };

    eframe::run_native(
        &config.window_title,
        native_options,
        Box::new(move |cc| {
            cc.egui_ctx.set_visuals(egui::Visuals::dark());
            Ok(Box::new(app))
        }),
    )
    .map_err(|e| anyhow::anyhow!("eframe error: {}", e))?;

    tracing::info!("Shutting down...");
    Ok(())
}
