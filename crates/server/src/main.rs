mod config;
mod doc;
mod dtos;
mod error;
mod routes;
mod state;
mod utils;

use crate::{
    config::Config, doc::ApiDoc, error::envelope_unauthorized, state::AppState,
    utils::shutdown::shutdown_signal,
};
use axum::{Router, middleware::map_response};
use database::db::create_connection;
use log::{error, info};
use migration::{Migrator, MigratorTrait};
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_oauth2_resource_server::server::OAuth2ResourceServer;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() {
    env_logger::init();

    if let Err(e) = run().await {
        error!("{e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    let db = create_connection(&config.database_url).await?;
    if config.run_migrations {
        Migrator::up(&db, None).await?;
        info!("Migrations applied");
    }

    let oauth2_resource_server = <OAuth2ResourceServer>::builder()
        .issuer_url(&config.oidc_issuer_url)
        .build()
        .await
        .map_err(|e| format!("Failed to build OAuth2ResourceServer: {e:?}"))?;

    let (protected, protected_api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(routes::protected())
        .split_for_parts();
    let (public, public_api) = routes::public().split_for_parts();

    let mut api = protected_api;
    api.merge(public_api);

    let app = Router::new()
        .merge(
            protected.layer(
                ServiceBuilder::new()
                    .layer(map_response(envelope_unauthorized))
                    .layer(oauth2_resource_server.into_layer()),
            ),
        )
        .merge(public)
        .merge(SwaggerUi::new("/docs").url("/docs/openapi.json", api))
        .layer(CompressionLayer::new())
        .with_state(AppState::new(db));

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Running axum on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
