//! Server lifecycle — binds the listener and runs the axum server.
//!
//! Pattern: bind → spawn background task → return handle with
//! shutdown channel. `main` uses the foreground variant instead and
//! stops on Ctrl-C.

use std::net::SocketAddr;

use tokio::sync::oneshot;

use crate::api::router::build_router;
use crate::api::types::ApiContext;

/// Handle to a running server started in the background.
pub struct ServerHandle {
    pub addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl ServerHandle {
    /// Shut down the server gracefully. Safe to call twice.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            tracing::info!("server shutdown signal sent");
        }
    }
}

/// Serve in the foreground until Ctrl-C. Used by `main`.
pub async fn run(ctx: ApiContext) -> Result<(), String> {
    let addr = ctx.config.bind_addr;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| format!("Failed to bind {addr}: {e}"))?;
    tracing::info!(%addr, "serving");

    let app = build_router(ctx);
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutdown requested");
        })
        .await
        .map_err(|e| format!("Server error: {e}"))
}

/// Start the server in a background task and return a handle.
pub async fn start(ctx: ApiContext, addr: SocketAddr) -> Result<ServerHandle, String> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| format!("Failed to bind {addr}: {e}"))?;
    let addr = listener
        .local_addr()
        .map_err(|e| format!("Failed to get server address: {e}"))?;

    let app = build_router(ctx);
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    tokio::spawn(async move {
        let shutdown_signal = async move {
            let _ = shutdown_rx.await;
            tracing::info!("server received shutdown signal");
        };

        tracing::info!(%addr, "server started");
        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await
        {
            tracing::error!("server error: {e}");
        }
        tracing::info!("server stopped");
    });

    Ok(ServerHandle {
        addr,
        shutdown_tx: Some(shutdown_tx),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    fn test_ctx() -> ApiContext {
        ApiContext::new(AppConfig {
            db_path: None,
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            page_size: 10,
            username: "admin".into(),
            password: "clave123".into(),
        })
    }

    #[tokio::test]
    async fn start_binds_an_ephemeral_port_and_accepts() {
        let mut server = start(test_ctx(), "127.0.0.1:0".parse().unwrap())
            .await
            .expect("server should start");
        assert!(server.addr.port() > 0);

        // The listener accepts a TCP connection
        let stream = tokio::net::TcpStream::connect(server.addr).await;
        assert!(stream.is_ok());

        server.shutdown();
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    }

    #[tokio::test]
    async fn shutdown_is_idempotent() {
        let mut server = start(test_ctx(), "127.0.0.1:0".parse().unwrap())
            .await
            .expect("server should start");
        server.shutdown();
        server.shutdown(); // Second call should be safe
    }
}
