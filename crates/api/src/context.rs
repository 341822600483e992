//! Application context - dependency injection container

use std::sync::Arc;

use focusboard_core::{
    ConnectionRepository, GitHubGateway, RelayService, SessionVerifier, TaskRepository,
    TokenExchangeService, TrackingRepository, WebhookProcessor,
};
use focusboard_domain::{Config, Result};
use focusboard_infra::{
    DbManager, GitHubApiClient, HostedSessionVerifier, NoopSessionVerifier,
    SqliteConnectionRepository, SqliteTaskRepository, SqliteTrackingRepository,
};

/// Application context - holds all services and dependencies.
pub struct AppContext {
    pub config: Config,
    pub db: Arc<DbManager>,
    pub exchange: Arc<TokenExchangeService>,
    pub relay: Arc<RelayService>,
    pub webhooks: Arc<WebhookProcessor>,
    pub sessions: Arc<dyn SessionVerifier>,
}

impl AppContext {
    /// Wire the full service graph from configuration.
    ///
    /// Runs database migrations, so a context that constructs
    /// successfully is ready to serve.
    pub fn new(config: Config) -> Result<Self> {
        let db = Arc::new(DbManager::new(&config.database.path, config.database.pool_size)?);
        db.run_migrations()?;

        let gateway: Arc<dyn GitHubGateway> = Arc::new(GitHubApiClient::new(&config.github)?);
        let connections: Arc<dyn ConnectionRepository> =
            Arc::new(SqliteConnectionRepository::new(Arc::clone(&db)));
        let tracking: Arc<dyn TrackingRepository> =
            Arc::new(SqliteTrackingRepository::new(Arc::clone(&db)));
        let tasks: Arc<dyn TaskRepository> = Arc::new(SqliteTaskRepository::new(Arc::clone(&db)));

        let sessions: Arc<dyn SessionVerifier> = match &config.auth {
            Some(auth) => Arc::new(HostedSessionVerifier::new(auth)?),
            None => Arc::new(NoopSessionVerifier),
        };

        let exchange = Arc::new(TokenExchangeService::new(
            Arc::clone(&gateway),
            Arc::clone(&connections),
            config.github.allow_anonymous,
        ));
        let relay = Arc::new(RelayService::new(gateway, connections, Arc::clone(&tracking)));
        let webhooks = Arc::new(WebhookProcessor::new(tracking, tasks));

        Ok(Self { config, db, exchange, relay, webhooks, sessions })
    }
}
