use std::sync::Arc;

use anyhow::Context;
use storage::{CollectionNames, Database, FileStore, services::accounting::Accountant};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod clients;
mod config;
mod error;
mod features;
mod middleware;
mod routes;
mod state;

use clients::{GatewayClient, GhCli, GitCli};
use config::Config;
use middleware::auth::ApiKeys;
use state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        features::webhook::handlers::handle_github_webhook,
        features::submissions::handlers::reverify_submission,
        features::leaderboard::handlers::get_leaderboard,
        features::teams::handlers::get_team_progress,
        features::health::handlers::health_check,
    ),
    components(
        schemas(
            storage::dto::webhook::IgnoredResponse,
            storage::dto::webhook::ProcessedResponse,
            storage::dto::verification::ReverifyResponse,
            storage::dto::health::HealthResponse,
            storage::dto::health::DatabaseStatus,
            storage::models::Submission,
            storage::models::SubmissionStatus,
            storage::models::VerificationMethod,
            storage::models::FileChange,
            storage::models::Hunk,
            storage::models::Progress,
            storage::models::LeaderboardEntry,
        )
    ),
    tags(
        (name = "webhook", description = "GitHub push intake"),
        (name = "submissions", description = "Manual re-verification"),
        (name = "leaderboard", description = "Public leaderboard"),
        (name = "teams", description = "Per-team progress"),
        (name = "health", description = "Service health"),
    ),
    modifiers(&SecurityAddon)
)]
struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("API Key")
                        .build(),
                ),
            )
        }
    }
}

async fn connect_database(config: &Config) -> Option<Database> {
    let Some(uri) = config.mongodb_uri.as_deref() else {
        tracing::warn!("MONGODB_URI not set, running with file storage only");
        return None;
    };

    let names = CollectionNames {
        leaderboard: config.mongodb_collection.clone(),
        ..CollectionNames::default()
    };

    match Database::connect(uri, &config.mongodb_database, names).await {
        Ok(db) => {
            tracing::info!("Connected to MongoDB database '{}'", db.name());
            Some(db)
        }
        Err(e) => {
            tracing::warn!("MongoDB connection failed, continuing without it: {}", e);
            None
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Starting GitHub Hackathon Tracker");

    let config = Config::from_env().context("Failed to load tracker configuration")?;
    tracing::info!("Configuration loaded successfully");

    let store = FileStore::new(&config.data_dir);
    store
        .init()
        .await
        .with_context(|| format!("Failed to initialize data directory {}", config.data_dir.display()))?;

    let database = connect_database(&config).await;

    let state = AppState {
        accountant: Accountant::new(store, database),
        diffs: Arc::new(GitCli::new(&config.git_base_url)),
        issues: Arc::new(GhCli::new()),
        verifier: Arc::new(
            GatewayClient::new(&config.verifier_url).context("Failed to build verifier client")?,
        ),
        domains_dir: config.domains_dir.clone(),
        points_policy: config.points_policy,
        reopen_on_failure: config.reopen_on_failure,
    };

    let api_keys = ApiKeys::from_comma_separated(&config.api_keys);
    if api_keys.is_empty() {
        tracing::warn!("API_KEYS not set, manual verification is unauthenticated");
    }

    let app = routes::router(state, api_keys).merge(
        SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()),
    );

    let bind_address = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;

    tracing::info!("Webhook endpoint: http://{}/webhook/github", bind_address);
    tracing::info!("Verification backend: {}", config.verifier_url);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
