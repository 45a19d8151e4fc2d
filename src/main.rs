mod game_app;

use anyhow::Context;
use game_app::GameApp;
use tic_tac_toe_api::config::ClientConfig;
use tic_tac_toe_api::logging::init_tracing;
use tic_tac_toe_api::GameApiClient;
use tracing::info;

fn main() -> anyhow::Result<()> {
    let config = ClientConfig::from_env();
    init_tracing(&config.log_filter);

    let client = GameApiClient::new(&config.server_url)
        .with_context(|| format!("cannot use server url {}", config.server_url))?;
    info!("Using game server at {}", client.base_url());

    // The UI runs on this thread; requests are spawned onto the runtime's workers.
    let runtime = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;
    let _guard = runtime.enter();

    eframe::run_native(
        "Tic-Tac-Toe",
        eframe::NativeOptions::default(),
        Box::new(|_cc| Ok(Box::new(GameApp::new(client)))),
    )
    .map_err(|e| anyhow::anyhow!("UI error: {}", e))
}
