use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use loan_risk_api::api;
use loan_risk_api::config::Config;
use loan_risk_api::db::Database;
use loan_risk_api::db_storage::PredictionStore;
use loan_risk_api::handlers::AppState;
use loan_risk_api::model::{LogisticModel, RiskModel};
use loan_risk_api::services::PredictionService;

/// Main entry point for the application.
///
/// This function initializes the application, including:
/// - Logging and tracing.
/// - Configuration loading.
/// - Database connection and `predictions` table.
/// - The scoring model, loaded once and shared read-only.
/// - HTTP routes and middleware (CORS, Rate Limiting).
///
/// It then starts the Axum server.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "loan_risk_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize database connection pool
    let db = Database::new(&config.database_url, config.db_max_connections).await?;
    tracing::info!("Database ready, predictions table ensured");

    // Load the model once; it is read-only for the rest of the process
    let model: Arc<dyn RiskModel> =
        Arc::new(LogisticModel::load_or_baseline(config.model_path.as_deref())?);
    tracing::info!("Model ready with {} input columns", model.input_columns().len());

    // Build application state
    let app_state = Arc::new(AppState {
        service: PredictionService::new(model, PredictionStore::new(db.pool.clone())),
    });

    // Configure rate limiter: 10 requests/second per IP, burst of 20
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(10)
            .burst_size(20)
            .key_extractor(SmartIpKeyExtractor)
            .finish()
            .ok_or_else(|| anyhow::anyhow!("invalid rate limiter configuration"))?,
    );

    // Rate limiting applies to scoring routes only; /health bypasses it
    let scoring = api::scoring_routes().layer(
        ServiceBuilder::new()
            // Rate limiting: 10 req/sec per IP, burst of 20
            .layer(GovernorLayer {
                config: governor_conf,
            }),
    );
    let app = api::with_common_layers(scoring, app_state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
