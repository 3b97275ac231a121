//! App Context

use std::sync::Arc;

use thiserror::Error;

use crate::{
    auth::{HttpAuthClient, TicketManager},
    config::RepositoryConfig,
    database,
    http::RepositoryHttp,
    instances::{InstancesService, LifecycleInstancesService, PgInstancesRepository},
    usage::HttpUsageClient,
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),

    #[error("failed to build repository http client")]
    Http(#[source] reqwest::Error),
}

/// Default production wiring of the lifecycle core.
#[derive(Clone)]
pub struct AppContext {
    pub tickets: Arc<TicketManager>,
    pub instances: Arc<dyn InstancesService>,
}

impl AppContext {
    /// Build application context from a database URL and repository
    /// configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when the database connection or the HTTP client
    /// cannot be established.
    pub async fn connect(
        database_url: &str,
        config: RepositoryConfig,
    ) -> Result<Self, AppInitError> {
        let pool = database::connect(database_url)
            .await
            .map_err(AppInitError::Database)?;

        let window = config.ticket_window;
        let http = RepositoryHttp::new(config).map_err(AppInitError::Http)?;

        let tickets = Arc::new(TicketManager::new(
            Arc::new(HttpAuthClient::new(http.clone())),
            window,
        ));

        let instances = Arc::new(LifecycleInstancesService::new(
            Arc::new(PgInstancesRepository::new(pool)),
            tickets.clone(),
            Arc::new(HttpUsageClient::new(http)),
        ));

        Ok(Self { tickets, instances })
    }
}
