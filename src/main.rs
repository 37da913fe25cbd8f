mod certification;
mod checklist;
mod config;
mod db;
mod pdf;
mod routes;
mod state;

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "greenmark=info,tower_http=info".into()),
        )
        .init();

    let config = config::Config::from_env()?;
    let config = Arc::new(config);

    let tiers = certification::TierTable::from_spec(&config.tier_thresholds)?;
    let eligibility = certification::EligibilityPolicy::new(config.eligibility_min_percent);

    // A missing or unreadable template is a configuration fault; refuse to
    // start rather than fail on the first download request.
    let certificate = pdf::CertificateTemplate::load(&config.template_path)?;

    let pool = db::create_pool(&config.database_url).await?;
    db::run_migrations(pool.as_ref()).await?;

    let state = Arc::new(state::AppState {
        pool,
        config: config.clone(),
        tiers,
        eligibility,
        certificate,
    });

    let app = Router::new()
        .route(
            "/api/offices",
            get(routes::list_offices).post(routes::create_office),
        )
        .route(
            "/api/offices/:id",
            get(routes::get_office)
                .put(routes::update_office)
                .delete(routes::delete_office),
        )
        .route("/api/offices/:id/eligibility", get(routes::check_eligibility))
        .route("/api/offices/:id/certificate", get(routes::download_certificate))
        .fallback_service(tower_http::services::ServeDir::new("static"))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = format!("{}:{}", config.host, config.port);
    tracing::info!("Greenmark listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
