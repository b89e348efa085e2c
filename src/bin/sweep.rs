//! Conclusion Engine Sweep Binary
//!
//! Periodically scans running experiments and concludes the decisive ones.
//! `--once` runs a single sweep and exits, for manual or CI invocation.

use banditsvc::conclusion::{AnnotationSink, ConclusionEngine, HttpAnnotationSink, NoopAnnotationSink};
use banditsvc::config::Config;
use banditsvc::{registry, store};
use clap::Parser;
use std::sync::Arc;
use tokio_postgres::Client;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Run a single sweep and exit instead of looping at the configured cadence.
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    banditsvc::init_logging();
    let args = Args::parse();
    let config = Config::from_env();
    let store = store::connect(&config.store_url).await;
    let registry = registry::connect(&config.db_url).await;

    match config.annotation_sink_url.clone() {
        Some(url) => {
            let annotation = HttpAnnotationSink::new(
                url,
                config.annotation_sink_token.clone(),
                config.annotation_timeout_secs,
            );
            run(store, registry, annotation, &config, args.once).await
        }
        None => {
            log::warn!("ANNOTATION_SINK_URL not set; conclusions will not be annotated");
            run(store, registry, NoopAnnotationSink, &config, args.once).await
        }
    }
}

async fn run<A: AnnotationSink>(
    store: redis::aio::ConnectionManager,
    registry: Arc<Client>,
    annotation: A,
    config: &Config,
    once: bool,
) -> anyhow::Result<()> {
    let engine = ConclusionEngine::new(
        store,
        registry,
        annotation,
        config.stopping_threshold,
        config.m_stop,
    );
    if once {
        engine.sweep().await?;
        return Ok(());
    }
    let mut interval =
        tokio::time::interval(std::time::Duration::from_secs(config.sweep_interval_secs));
    loop {
        interval.tick().await;
        if let Err(e) = engine.sweep().await {
            log::error!("sweep failed: {e}");
        }
    }
}
