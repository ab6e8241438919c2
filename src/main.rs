use anyhow::Result;
use synthetic_load::{api, config, controller, telemetry};
use config::Config;
use telemetry::init_tracing;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cfg = Config::load()?;
    init_tracing(&cfg.log);

    if cfg.server.request_timeout_secs <= synthetic_load::domain::MAX_DURATION_SECS {
        warn!(
            timeout_secs = cfg.server.request_timeout_secs,
            "request timeout does not exceed the maximum load duration; long runs will be cut off"
        );
    }

    let app_state = controller::AppState::new(cfg.clone());
    let app = api::router(app_state.clone(), &cfg);

    let addr = cfg.server.socket_addr()?;

    if cfg.server.host == "0.0.0.0" {
        warn!(
            "Server binding to 0.0.0.0 - the unauthenticated load endpoint will be reachable from the network."
        );
    }

    info!(
        %addr,
        host = app_state.controller.host(),
        processors = app_state.controller.processors(),
        "starting synthetic load generator"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(telemetry::shutdown_signal())
        .await?;

    warn!("shutdown complete");
    Ok(())
}
