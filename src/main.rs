use dotenvy::dotenv;
use tokio_util::sync::CancellationToken;
use tracing::info;

use secai::infra::{
    InfraError,
    app::create_app,
    setup::{init_app_state, init_tracing},
    shutdown::{shutdown_on, wait_for_signal},
};
use std::net::SocketAddr;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_tracing();

    let shutdown = CancellationToken::new();
    let app_state = init_app_state(shutdown.clone()).await?;

    // Read from config before moving app_state
    let bind_addr = app_state.config.bind_addr;
    let shutdown_grace = app_state.config.shutdown_grace;

    let app = create_app(app_state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(InfraError::TcpBind)?;

    info!("Backend listening at {}", &listener.local_addr()?);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_on(wait_for_signal(), shutdown, shutdown_grace))
    .await
    .map_err(InfraError::Server)?;

    info!("Server shutdown complete");
    Ok(())
}
