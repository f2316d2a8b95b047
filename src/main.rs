use anyhow::Result;
use enode_bridge::config::Config;
use enode_bridge::instance::InstanceRegistry;
use enode_bridge::web::{self, AppState};
use tokio::sync::watch;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {}", e))?;

    enode_bridge::logging::init_logging(&config.logging)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    info!(
        "Enode bridge {} starting up with {} entries",
        env!("APP_VERSION"),
        config.entries.len()
    );

    let instances = InstanceRegistry::from_config(&config)
        .map_err(|e| anyhow::anyhow!("Failed to set up entries: {}", e))?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let mut pollers = Vec::new();
    for instance in instances.iter() {
        instance.start().await;
        let coordinator = instance.coordinator().clone();
        pollers.push(tokio::spawn(coordinator.run(shutdown_rx.clone())));
    }

    let state = AppState::new(instances);
    let shutdown_signal = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
    };

    let served = web::serve_until(state, &config.web.host, config.web.port, shutdown_signal).await;

    info!("Shutting down");
    let _ = shutdown_tx.send(true);
    for poller in pollers {
        let _ = poller.await;
    }

    served.map_err(|e| {
        error!("Web server error: {}", e);
        e
    })
}
