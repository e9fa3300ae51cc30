mod config;
mod errors;
mod jobs;
mod models;
mod recommend;
mod routes;
mod state;
mod store;
mod text;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::recommend::model::{CountVectorizer, ForestClassifier};
use crate::recommend::CategoryRecommender;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::{CachedJobStore, CsvJobStore, JobStore};
use crate::text::Stopwords;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting jobs API v{}", env!("CARGO_PKG_VERSION"));

    // Stopwords and model artifacts are loaded once; the service cannot recommend without them.
    let stopwords = Arc::new(Stopwords::from_file(&config.stopwords_path)?);
    let vectorizer = Arc::new(CountVectorizer::from_file(&config.vectorizer_path)?);
    let classifier = Arc::new(ForestClassifier::from_file(&config.classifier_path)?);
    let recommender = CategoryRecommender::new(vectorizer, classifier, stopwords)?;

    // Initialize job store
    let csv_store = CsvJobStore::new(&config.data_path);
    match csv_store.load().await {
        Ok(records) => info!(
            "Job table {} holds {} records",
            csv_store.path().display(),
            records.len()
        ),
        Err(e) => warn!("Job table is not readable yet: {e}"),
    }
    let store: Arc<dyn JobStore> = if config.cache_records {
        info!("Record cache enabled");
        Arc::new(CachedJobStore::new(csv_store))
    } else {
        Arc::new(csv_store)
    };

    let state = AppState {
        store,
        write_lock: Arc::new(Mutex::new(())),
        recommender,
        config: config.clone(),
    };

    let app = build_router(state).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
