use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{http::header, App, HttpServer};
use anyhow::Context;
use tracing::info;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::prelude::*;

use blog_service::config::{Config, StorageBackend};
use blog_service::middleware::AuthGate;
use blog_service::repository::{BlogRepository, InMemoryBlogRepository, PostgresBlogRepository};
use blog_service::AppState;

async fn open_repository(config: &Config) -> anyhow::Result<Arc<dyn BlogRepository>> {
    match config.database.backend {
        StorageBackend::Postgres => {
            let repo = PostgresBlogRepository::connect(&config.database)
                .await
                .context("Failed to connect to database")?;
            repo.migrate().await.context("Failed to run migrations")?;
            info!("Connected to PostgreSQL");
            Ok(Arc::new(repo))
        }
        StorageBackend::Memory => {
            info!("Using in-memory storage; data is lost on restart");
            Ok(Arc::new(InMemoryBlogRepository::new()))
        }
    }
}

fn cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE"])
        .allowed_headers(vec![header::CONTENT_TYPE, header::AUTHORIZATION])
        .max_age(3600)
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // JSON logs with span context, thread ids and source locations
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,blog_service=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(true)
                .with_span_list(true)
                .with_thread_ids(true)
                .with_thread_names(true)
                .with_line_number(true)
                .with_file(true)
                .with_target(true),
        )
        .init();

    info!("Starting Blog Service...");

    let config = Config::from_env().context("Failed to load configuration")?;
    info!(
        backend = ?config.database.backend,
        issuer = %config.jwt.issuer,
        images_dir = %config.uploads.images_dir.display(),
        "Configuration loaded"
    );

    let repo = open_repository(&config).await?;
    let state = AppState::new(&config, repo);
    state
        .images
        .ensure_dir()
        .await
        .context("Failed to create image directory")?;

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Blog Service starting on http://{}", bind_addr);
    if config.graphql.playground {
        info!("GraphiQL available at http://{}/graphql", bind_addr);
    }

    HttpServer::new(move || {
        let state = state.clone();
        App::new()
            .wrap(AuthGate::new(state.tokens.clone()))
            .wrap(cors())
            .wrap(TracingLogger::default())
            .configure(|cfg| state.configure(cfg))
    })
    .workers(config.server.workers)
    .bind(&bind_addr)?
    .run()
    .await?;

    Ok(())
}
