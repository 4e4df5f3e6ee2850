use crate::config::UserConfig;
use crate::services::{MongoUserStore, UserStore};
use crate::{build_router, AppState};
use axum::Router;
use service_core::error::AppError;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;

pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
    store: Arc<dyn UserStore>,
}

impl Application {
    /// Connect to MongoDB and bind the listener.
    ///
    /// An unreachable store aborts startup instead of failing the first request.
    pub async fn build(config: UserConfig) -> Result<Self, AppError> {
        let store = MongoUserStore::connect(&config.mongodb)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create MongoDB client: {}", e);
                AppError::from(e)
            })?;

        store.ping().await.map_err(|e| {
            tracing::error!("MongoDB is unreachable at startup: {}", e);
            AppError::from(e)
        })?;
        tracing::info!("Successfully connected to MongoDB");

        Self::with_store(config, Arc::new(store)).await
    }

    /// Bind the listener around an already constructed store.
    pub async fn with_store(
        config: UserConfig,
        store: Arc<dyn UserStore>,
    ) -> Result<Self, AppError> {
        let state = AppState {
            config: config.clone(),
            store: store.clone(),
        };
        let router = build_router(state);

        // Port 0 picks a random free port.
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Listening on {}", port);

        Ok(Self {
            port,
            listener,
            router,
            store,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn store(&self) -> &Arc<dyn UserStore> {
        &self.store
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
