use actix_web::middleware::{NormalizePath, from_fn};
use actix_web::web::Data;
use actix_web::{App, HttpServer, Responder, get};
use std::sync::Arc;

mod api;
mod auth;
mod config;
mod docs;
mod model;
mod models;
mod routes;
mod utils;

use config::Config;

use crate::auth::client::HttpAuthApi;
use crate::auth::demo::DemoOverride;
use crate::auth::middleware::route_gate;
use crate::auth::session::SessionContext;
use crate::auth::token_store::TokenStore;
use crate::docs::ApiDoc;
use crate::utils::storage::{FileStore, KeyValueStore, NullStore};
use tracing::{info, warn};
use tracing_appender::rolling;
use utoipa::OpenApi; // ← needed for ApiDoc::openapi()
use utoipa_swagger_ui::SwaggerUi;

#[get("/")]
async fn index() -> impl Responder {
    "HRM portal"
}

/// Durable storage when a directory is configured and usable, else none.
fn open_storage(config: &Config) -> Arc<dyn KeyValueStore> {
    let Some(dir) = &config.storage_dir else {
        warn!("STORAGE_DIR not set; session will not survive restarts");
        return Arc::new(NullStore);
    };

    match FileStore::open(dir) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            warn!(error = %e, dir = %dir.display(), "Storage unavailable; session will not survive restarts");
            Arc::new(NullStore)
        }
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "portal.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false) // removes module path
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!("Portal starting...");

    let storage = open_storage(&config);
    let api = HttpAuthApi::new(
        &config.backend_url,
        config.request_timeout,
        config.connect_timeout,
    )?;

    let session = Data::new(SessionContext::new(
        TokenStore::new(storage.clone()),
        Arc::new(api),
    ));
    let demo = Data::new(DemoOverride::new(storage));

    if session.is_authenticated() {
        // Stored tokens may be stale; resolve them before serving.
        session.fetch_user().await;
    }

    let server_addr = config.server_addr.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(from_fn(route_gate))
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // ← important: wildcard {_:.*} to match JS/CSS files
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(session.clone())
            .app_data(demo.clone())
            .service(index)
            .configure(|cfg| routes::configure(cfg, &config))
    })
    .bind(server_addr)?
    .run()
    .await?;

    Ok(())
}
