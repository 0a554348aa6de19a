use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use mixo_core::ConversionService;
use tokio::net::TcpListener;
use tokio::sync::watch;

use crate::error::GatewayError;
use crate::router::build_router;

#[derive(Clone)]
pub(crate) struct AppState {
    pub service: Arc<ConversionService>,
    pub started_at: Instant,
}

pub struct GatewayServer {
    addr: SocketAddr,
    rate_limit: u32,
    max_body_size: usize,
    service: Arc<ConversionService>,
    shutdown_rx: watch::Receiver<bool>,
}

impl GatewayServer {
    #[must_use]
    pub fn new(
        bind: &str,
        port: u16,
        service: ConversionService,
        shutdown_rx: watch::Receiver<bool>,
    ) -> Self {
        let addr: SocketAddr = format!("{bind}:{port}").parse().unwrap_or_else(|e| {
            tracing::warn!("invalid bind '{bind}': {e}, falling back to 127.0.0.1:{port}");
            SocketAddr::from(([127, 0, 0, 1], port))
        });

        if bind == "0.0.0.0" {
            tracing::warn!("gateway binding to 0.0.0.0, the endpoint is reachable from any host");
        }

        Self {
            addr,
            rate_limit: 120,
            max_body_size: 1_048_576,
            service: Arc::new(service),
            shutdown_rx,
        }
    }

    /// Requests per minute per client IP; `0` disables limiting.
    #[must_use]
    pub fn with_rate_limit(mut self, limit: u32) -> Self {
        self.rate_limit = limit;
        self
    }

    #[must_use]
    pub fn with_max_body_size(mut self, size: usize) -> Self {
        self.max_body_size = size;
        self
    }

    /// Bind the configured address and serve until shutdown is signalled.
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind or encounters a fatal I/O error.
    pub async fn serve(self) -> Result<(), GatewayError> {
        let listener = TcpListener::bind(self.addr)
            .await
            .map_err(|e| GatewayError::Bind(self.addr.to_string(), e))?;
        self.serve_with_listener(listener).await
    }

    /// Serve on an already bound listener, e.g. one bound to port 0.
    ///
    /// # Errors
    ///
    /// Returns an error on a fatal I/O error.
    pub async fn serve_with_listener(self, listener: TcpListener) -> Result<(), GatewayError> {
        let state = AppState {
            service: self.service,
            started_at: Instant::now(),
        };
        let router = build_router(state, self.rate_limit, self.max_body_size);

        let local = listener.local_addr().map_err(GatewayError::LocalAddr)?;
        tracing::info!("gateway listening on {local}");

        let mut shutdown_rx = self.shutdown_rx;
        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(async move {
            while !*shutdown_rx.borrow_and_update() {
                if shutdown_rx.changed().await.is_err() {
                    std::future::pending::<()>().await;
                }
            }
            tracing::info!("gateway shutting down");
        })
        .await
        .map_err(|e| GatewayError::Server(format!("{e}")))?;

        Ok(())
    }
}
