use std::{net::SocketAddr, process::ExitCode, sync::Arc};

use mongodb::Client;
use tracing_subscriber::EnvFilter;

use floorwatch::{
    config::{self, StoreBackend},
    routes,
    services::{
        alert_evaluator::{spawn_alert_evaluator, AlertEvaluator, Schedule},
        alert_store::{AlertStore, MongoAlertStore},
        db_init,
        memory_store::MemoryStore,
        notifier::TelegramNotifier,
        opensea::OpenSeaClient,
        watch_store::{MongoWatchStore, WatchStore},
    },
    AppState,
};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = config::load()?;

    let (alerts, watches): (Arc<dyn AlertStore>, Arc<dyn WatchStore>) = match settings.store_backend {
        StoreBackend::Mongo => {
            let client = Client::with_uri_str(&settings.mongodb_uri).await?;
            let db = client.database(&settings.mongodb_db);
            db_init::ensure_indexes(&db).await?;

            (Arc::new(MongoAlertStore::new(&db)), Arc::new(MongoWatchStore::new(&db)))
        }
        StoreBackend::Memory => {
            tracing::warn!("STORE_BACKEND=memory, alerts and watches will not survive a restart");
            let store = Arc::new(MemoryStore::new());
            (store.clone(), store)
        }
    };

    let prices = Arc::new(OpenSeaClient::new(
        settings.opensea_api_base.clone(),
        settings.opensea_api_key.clone(),
        settings.http_connect_timeout,
        settings.http_timeout,
    )?);

    let notifier = Arc::new(TelegramNotifier::new(
        settings.telegram_api_base.clone(),
        settings.telegram_bot_token.clone(),
        settings.http_connect_timeout,
        settings.http_timeout,
    )?);

    let evaluator = AlertEvaluator::new(alerts.clone(), prices.clone(), notifier)
        .with_fetch_concurrency(settings.alert_fetch_concurrency);
    let evaluator_task = spawn_alert_evaluator(
        Arc::new(evaluator),
        Schedule {
            first_run_delay: settings.alert_first_run_delay,
            interval: settings.alert_check_interval,
        },
    );

    let state = AppState {
        alerts,
        watches,
        prices,
    };

    let addr = SocketAddr::from((settings.host.parse::<std::net::IpAddr>()?, settings.port));
    tracing::info!("listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, routes::app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Store writes are single-record, so abandoning a pass mid-way is safe.
    evaluator_task.abort();
    tracing::info!("shut down");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
