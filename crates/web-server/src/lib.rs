use axum::{
    Router,
    http::{HeaderValue, Method},
    routing::get,
};
use catalog::Catalog;
use configuration::settings::Settings;
use database::DbRepository;
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

pub mod error;
pub mod extract;
pub mod handlers;
pub mod responses;
pub mod validation;

/// The shared application state that all handlers can access.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Catalog,
}

/// The API routes without any middleware.
pub fn router(state: Arc<AppState>) -> Router {
    let digimons = Router::new()
        .route("/", get(handlers::list_digimons))
        .route("/search", get(handlers::search_digimons))
        .route("/stats", get(handlers::get_stats))
        .route("/name/:name", get(handlers::get_digimon_by_name))
        .route("/:id", get(handlers::get_digimon_by_id))
        .route("/:id/evolutions", get(handlers::get_evolution_data));

    Router::new()
        .route("/api/health", get(handlers::health))
        .nest("/api/digimons", digimons)
        .fallback(handlers::route_not_found)
        .with_state(state)
}

/// The full application: routes plus CORS and request tracing.
pub fn app(state: Arc<AppState>, cors_origins: &[String]) -> Router {
    router(state)
        .layer(cors_layer(cors_origins))
        // This middleware will automatically log information about every incoming request.
        .layer(TraceLayer::new_for_http())
}

/// Any origin when none are configured; otherwise exactly the configured ones.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.is_empty() {
        AllowOrigin::any()
    } else {
        let parsed: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(%origin, "Ignoring invalid CORS origin.");
                    None
                }
            })
            .collect();
        AllowOrigin::list(parsed)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers(AllowHeaders::any())
}

/// Connects to the database and serves the API until Ctrl-C.
pub async fn run_server(settings: &Settings) -> anyhow::Result<()> {
    let db_pool = database::connect(&settings.database).await?;
    let catalog = Catalog::new(Arc::new(DbRepository::new(db_pool)));
    let app_state = Arc::new(AppState { catalog });

    let service = app(app_state, &settings.server.cors_origins);

    let addr = settings.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Web server started and listening on {}", addr);

    axum::serve(listener, service)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Web server stopped.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for the shutdown signal.");
        std::future::pending::<()>().await;
    }
}
