#![warn(clippy::all, rust_2018_idioms)]

use std::path::PathBuf;

use clap::Parser;
use eeg_viewer::{Config, EguiApp, WsTransport};

const WINDOW_NAME: &str = "EEG Visualizer";

/// Live viewer for EEG streams served over a WebSocket.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Stream server to connect to, e.g. ws://localhost:8765
    #[arg(long)]
    url: Option<String>,
    /// Config file to load instead of ~/.eeg-viewer
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> eframe::Result {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = match Config::from_config_file(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            log::warn!("{err}, using default configuration");
            Config::default()
        }
    };
    if let Some(url) = cli.url {
        config.url = url;
    }
    log::info!("stream server: {}", config.url);

    let transport = WsTransport::new(
        &config.url,
        config.read_timeout(),
        config.connect_timeout(),
    );

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window_width, config.window_height])
            .with_min_inner_size([400.0, 300.0]),
        ..Default::default()
    };
    eframe::run_native(
        WINDOW_NAME,
        native_options,
        Box::new(|cc| Ok(Box::new(EguiApp::new(cc, config, Box::new(transport))))),
    )
}
