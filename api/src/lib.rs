use std::sync::Arc;

use tokio::sync::mpsc;

use cache::Cache;
use common::config::{Config, PaymentConfig};
use db::DbRepo;
use oss::Oss;
use ws::Manager;

mod api_utils;
pub(crate) mod handlers;
pub(crate) mod routes;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DbRepo>,
    pub cache: Arc<dyn Cache>,
    pub oss: Arc<dyn Oss>,
    pub hub: Manager,
    pub jwt_secret: String,
    pub payment: PaymentConfig,
}

pub async fn start(config: Config) {
    let db = Arc::new(DbRepo::from_config(&config).await);
    let cache = cache::cache(&config);
    let oss = oss::oss(&config).await;

    let (tx, rx) = mpsc::channel(1024);
    let hub = Manager::new(tx, cache.clone(), db.clone());
    let mut cloned_hub = hub.clone();
    tokio::spawn(async move {
        cloned_hub.run(rx).await;
    });

    let state = AppState {
        db,
        cache,
        oss,
        hub: hub.clone(),
        jwt_secret: config.auth.jwt_secret.clone(),
        payment: config.payment.clone(),
    };

    let app = routes::app_routes(state)
        .merge(ws::router(hub, config.auth.jwt_secret.clone()));

    let listener = tokio::net::TcpListener::bind(&config.server.server_url())
        .await
        .unwrap();
    tracing::debug!("listening on {}", listener.local_addr().unwrap());
    axum::serve(listener, app).await.unwrap();
}
