//! Grass node keep-alive client
//!
//! Starts one self-healing WebSocket session per configured proxy (or a
//! single direct session) and runs until interrupted.

use anyhow::Result;
use grass_node_bot::config::{config_path_from_env, BotConfig};
use grass_node_bot::logging::init_tracing;
use grass_node_bot::session::build_session;
use grass_node_bot::useragent::random_user_agent;
use steadysockets::SessionManager;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config_path = config_path_from_env();
    let config = BotConfig::load(&config_path)?;
    let routes = config.resolved_routes()?;

    // One user agent for the whole fleet, generated once at startup.
    let user_agent = random_user_agent();

    print_banner(&config.websocket.url, routes.len());

    let mut manager = SessionManager::new();
    for route in routes {
        manager.add_session(build_session(
            &config.websocket.url,
            route,
            &config.settings.user_id,
            &user_agent,
        ));
    }

    tokio::select! {
        _ = manager.run_all() => {}
        _ = tokio::signal::ctrl_c() => {
            info!("");
            info!("Received shutdown signal (Ctrl+C)");
        }
    }

    print_shutdown();
    Ok(())
}

fn print_banner(url: &str, sessions: usize) {
    info!("");
    info!("========================================");
    info!("Starting Grass node keep-alive client");
    info!("Endpoint: {}", url);
    info!("Sessions: {}", sessions);
    info!("Press Ctrl+C to stop");
    info!("========================================");
    info!("");
}

fn print_shutdown() {
    info!("");
    info!("========================================");
    info!("Grass node client stopped");
    info!("========================================");
}
