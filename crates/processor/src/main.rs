//! Fraud processor: consumes raw transactions, evaluates each one and
//! publishes the verdict to the alerts topic.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use radar_cache::RedisCache;
use radar_core::{FraudAlert, Transaction};
use radar_db::PgUserStore;
use radar_events::{admin, KafkaSource, TopicConsumer, TopicPublisher};
use radar_pipeline::{FraudDetector, RiskClient};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;

use config::ProcessorConfig;

/// Database connection attempts at startup, one second apart.
const DB_CONNECT_ATTEMPTS: u32 = 30;
const DB_CONNECT_DELAY: Duration = Duration::from_secs(1);

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    if let Err(e) = run().await {
        tracing::error!(error = %format!("{e:#}"), "Processor stopped with error");
        std::process::exit(1);
    }
}

/// `RUST_LOG` sets the filter, `LOG_FORMAT=json` switches to JSON lines.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "radar_processor=info,radar_pipeline=info,radar_events=info,radar_db=info".into()
    });
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn run() -> anyhow::Result<()> {
    let config = ProcessorConfig::from_env().context("Failed to load configuration")?;
    tracing::info!(
        topic = %config.transactions_topic,
        alerts_topic = %config.alerts_topic,
        group_id = %config.group_id,
        "Loaded processor configuration"
    );

    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            shutdown_signal().await;
            cancel.cancel();
        }
    });

    // --- Database ---
    let pool = radar_db::connect_with_retry(&config.database_url, DB_CONNECT_ATTEMPTS, DB_CONNECT_DELAY)
        .await
        .with_context(|| format!("Postgres unreachable after {DB_CONNECT_ATTEMPTS} attempts"))?;
    radar_db::health_check(&pool)
        .await
        .context("Database health check failed")?;
    radar_db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("Database ready, migrations applied");

    if let Err(e) = radar_db::seed::seed_users(&pool).await {
        tracing::error!(error = %e, "Seeding failed, continuing");
    }

    // --- Cache ---
    let cache = RedisCache::connect(&config.redis_url)
        .await
        .context("Failed to connect to Redis")?;
    cache.ping().await.context("Redis ping failed")?;
    let cache = Arc::new(cache);
    tracing::info!("Redis connected");

    // --- Risk engine ---
    let risk_client = RiskClient::new(&config.risk_engine_url, cancel.child_token())
        .context("Failed to build risk engine client")?;
    tracing::info!(endpoint = risk_client.endpoint(), "Risk engine client ready");

    // --- Topics ---
    admin::ensure_topics(
        &config.brokers,
        &[config.transactions_topic.as_str(), config.alerts_topic.as_str()],
    )
    .await
    .context("Failed to ensure Kafka topics")?;

    let publisher = TopicPublisher::<FraudAlert>::new(&config.brokers, &config.alerts_topic)
        .context("Failed to create alert publisher")?;

    let detector = FraudDetector::new(
        Arc::new(PgUserStore::new(pool.clone())),
        cache.clone(),
        cache.clone(),
        cache,
        Arc::new(risk_client),
        Arc::new(publisher),
    );

    // --- Consume ---
    let source = KafkaSource::subscribe(
        &config.brokers,
        &config.transactions_topic,
        &config.group_id,
    )
    .context("Failed to subscribe to transactions topic")?;
    let mut consumer = TopicConsumer::<_, Transaction>::new(source);

    tracing::info!(topic = %config.transactions_topic, "Fraud processor started");

    let detector = &detector;
    let result = consumer
        .consume(&cancel, |tx: Transaction| async move {
            detector.detect(&tx).await.map(|_| ()).inspect_err(|e| {
                tracing::error!(tx_id = %tx.id, error = %e, "Failed to evaluate transaction");
            })
        })
        .await;

    pool.close().await;
    tracing::info!("Processor stopped");

    result.context("Transaction stream failed")
}

/// Wait for SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received SIGINT, shutting down"),
        () = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
