use crate::{
    app_state::AppState,
    configuration::{ApplicationSettings, DatabaseSettings, Settings},
    repository::{PostgresSubscriptionRepository, SubscriptionRepository},
    routes::{health_check, subscriptions},
    service::Subscriptions,
    telemetry::{request_span, MakeRequestUuid},
};
use anyhow::Context;
use axum::Router;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

pub struct Application {
    local_addr: SocketAddr,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Connects to Postgres, applies pending migrations and binds the listener.
    pub async fn build(config: Settings) -> Result<Self, anyhow::Error> {
        let db_pool = get_connection_pool(&config.database);

        sqlx::migrate!("./migrations")
            .run(&db_pool)
            .await
            .context("Failed to migrate the database")?;

        let repository = Arc::new(PostgresSubscriptionRepository::new(db_pool));
        Self::build_with_repository(&config.application, repository).await
    }

    pub async fn build_with_repository(
        config: &ApplicationSettings,
        repository: Arc<dyn SubscriptionRepository>,
    ) -> Result<Self, anyhow::Error> {
        let address = format!("{}:{}", config.host, config.port);
        let listener = TcpListener::bind(&address)
            .await
            .with_context(|| format!("Failed to bind {address}"))?;
        let local_addr = listener
            .local_addr()
            .context("Failed to read the bound address")?;

        let app_state = AppState {
            subscriptions: Arc::new(Subscriptions::new(repository)),
        };

        Ok(Self {
            local_addr,
            listener,
            router: router(app_state, &config.base_path),
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        tracing::info!("Listening on {}", self.local_addr);
        axum::serve(self.listener, self.router).await
    }
}

/// Builds the one pool shared by every request. Connections are opened lazily.
pub fn get_connection_pool(config: &DatabaseSettings) -> PgPool {
    PgPoolOptions::new()
        .acquire_timeout(config.acquire_timeout())
        .connect_lazy_with(config.with_db())
}

fn router(app_state: AppState, base_path: &str) -> Router {
    Router::new()
        .merge(health_check::router())
        .merge(subscriptions::router(base_path))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http().make_span_with(request_span))
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
        .with_state(app_state)
}
