mod backend;
mod common;
mod config;
mod store;
mod ui;

use backend::BackendClient;
use clap::Parser;
use dotenvy::dotenv;
use tokio::sync::mpsc;
use ui::ChatApp;

#[derive(Parser)]
#[command(
    name = "chatbot_desktop",
    version,
    about = "Desktop client for the chatbot backend"
)]
struct Cli {
    /// Path to JSON config file
    #[arg(long, default_value = config::DEFAULT_CONFIG_PATH, value_name = "FILE")]
    config: String,
    /// Backend base URL (overrides the config file)
    #[arg(long, value_name = "URL")]
    backend_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), eframe::Error> {
    dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();
    let app_config = config::load_config(&cli.config);
    let backend_url = cli.backend_url.unwrap_or(app_config.backend_url);

    // UI -> backend task
    let (cmd_tx, cmd_rx) = mpsc::channel(100);
    // backend task -> UI
    let (event_tx, event_rx) = mpsc::channel(100);

    let url = backend_url.clone();
    tokio::spawn(async move {
        let client = BackendClient::new(url, event_tx, cmd_rx);
        if let Err(err) = client.run().await {
            log::error!("Backend client terminated: {err}");
        }
    });

    let options = eframe::NativeOptions::default();
    let mut event_rx = Some(event_rx);

    eframe::run_native(
        "Chatbot",
        options,
        Box::new(move |cc| {
            let event_receiver = event_rx
                .take()
                .expect("ChatApp should only be initialized once");

            log::info!("Client started against backend {backend_url}");

            Ok(Box::new(ChatApp::new(cc, cmd_tx.clone(), event_receiver)))
        }),
    )
}
