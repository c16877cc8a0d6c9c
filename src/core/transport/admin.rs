//! Standalone admin listener.
//!
//! Serves the admin API on its own port when the tool transport has no
//! HTTP listener to share (e.g. STDIO).

use tokio::net::TcpListener;
use tracing::{error, info};

use super::{TransportError, TransportResult};
use crate::core::McpServer;
use crate::core::config::AdminConfig;

/// Admin HTTP listener.
pub struct AdminListener {
    config: AdminConfig,
}

impl AdminListener {
    /// Create a listener for the given admin config.
    pub fn new(config: AdminConfig) -> Self {
        Self { config }
    }

    /// Get the bind address.
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.host, self.config.port)
    }

    /// Bind the admin port and serve it on a background task.
    ///
    /// Binding happens before returning so a busy port fails startup.
    pub async fn spawn(self, server: &McpServer) -> TransportResult<()> {
        let addr = self.address();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| TransportError::bind(&addr, e))?;

        let app = server.admin_router();
        info!("Admin API listening on http://{}/services", addr);

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                error!("Admin listener stopped: {}", e);
            }
        });

        Ok(())
    }
}
