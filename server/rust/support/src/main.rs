use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;

use k1s0_support_server::adapter::gateway::{
    HttpEntitlementGateway, HttpReleaseTagGateway, ZendeskConnector,
};
use k1s0_support_server::adapter::handler::{self, AppState, ServiceDeps};
use k1s0_support_server::adapter::repository::InMemoryCredentialStore;
use k1s0_support_server::domain::repository::HelpdeskConnector;
use k1s0_support_server::infrastructure::clock::SystemClock;
use k1s0_support_server::infrastructure::config::Config;
use k1s0_support_server::infrastructure::logger::init_logger;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Config
    let config_path =
        std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config/config.yaml".to_string());
    let cfg = Config::load(&config_path)?;

    // Logger
    init_logger(&cfg.app.environment, &cfg.log.format);

    info!(
        app_name = %cfg.app.name,
        version = %cfg.app.version,
        environment = %cfg.app.environment,
        "starting support server"
    );

    // Helpdesk (optional)
    let helpdesk: Option<Arc<dyn HelpdeskConnector>> = match cfg.helpdesk.as_ref() {
        Some(helpdesk_cfg) => {
            info!(url = %helpdesk_cfg.url, "helpdesk integration enabled");
            Some(Arc::new(ZendeskConnector::new(helpdesk_cfg)?))
        }
        None => {
            info!("no helpdesk configured, support request routes will return 503");
            None
        }
    };

    let deps = ServiceDeps {
        helpdesk,
        credential_store: Arc::new(InMemoryCredentialStore::new()),
        entitlement: Arc::new(HttpEntitlementGateway::new(&cfg.support)?),
        release_tags: Arc::new(HttpReleaseTagGateway::new(&cfg.support)?),
        clock: Arc::new(SystemClock),
    };
    let state = AppState::new(&cfg, deps);
    let app = handler::router(state);

    // REST server
    let host: std::net::IpAddr = cfg.server.host.parse()?;
    let addr = SocketAddr::new(host, cfg.server.port);
    info!("REST server starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("support server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
    }
    info!("shutdown signal received");
}
