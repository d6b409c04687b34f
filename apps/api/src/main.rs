mod catalog;
mod config;
mod decode;
mod errors;
mod matching;
mod parsing;
mod pipeline;
mod routes;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::catalog::{builtin::load_builtin, load_catalog, Catalog};
use crate::config::Config;
use crate::parsing::entities::{HeadlineNameFinder, NoPersonFinder, PersonFinder};
use crate::parsing::sections::KeywordHeadings;
use crate::pipeline::Pipeline;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting RoleMatch API v{}", env!("CARGO_PKG_VERSION"));

    // A bad catalog must stop the process before it serves anything
    let catalog = load_configured_catalog(&config)?;
    info!(
        "Skill catalog loaded: {} categories, {} skills, {} role templates",
        catalog.skills.categories().len(),
        catalog.skills.all_skills().len(),
        catalog.roles.len()
    );
    info!(
        "Matcher tuning: fuzzy >= {}, weights {}/{}, top {}",
        config.tuning.fuzzy_threshold,
        config.tuning.must_have_weight,
        config.tuning.nice_to_have_weight,
        config.tuning.top_k
    );

    let people: Box<dyn PersonFinder> = if config.enable_name_detection {
        Box::new(HeadlineNameFinder)
    } else {
        info!("Name detection disabled");
        Box::new(NoPersonFinder)
    };

    let pipeline = Pipeline::new(
        catalog,
        config.tuning.clone(),
        config.limits.clone(),
        Box::new(KeywordHeadings),
        people,
    );

    // Build app state
    let state = AppState {
        pipeline: Arc::new(pipeline),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn load_configured_catalog(config: &Config) -> Result<Catalog> {
    match &config.catalog_path {
        Some(path) => {
            info!("Loading skill catalog from {}", path.display());
            load_catalog(path).context("Skill catalog is invalid")
        }
        None => load_builtin().context("Built-in skill catalog is invalid"),
    }
}
