use std::net::SocketAddr;

use axum::{routing::get, Router};

use crate::ledger::Ledger;
use crate::storage::Storage;

mod handlers;
mod models;

use handlers::{
    add_customer, add_payment, customer_payments, customer_total, delete_customer, get_customer,
    health, list_customers, list_villages, not_found, period_payments,
};

#[derive(Clone)]
pub struct AppState<S: Storage> {
    pub ledger: Ledger<S>,
    pub started_at: std::time::SystemTime,
}

pub fn router<S: Storage + Clone + Send + Sync + 'static>(state: AppState<S>) -> Router {
    Router::new()
        .route("/health", get(health::<S>))
        .route(
            "/customers",
            get(list_customers::<S>).post(add_customer::<S>),
        )
        .route(
            "/customers/:id",
            get(get_customer::<S>).delete(delete_customer::<S>),
        )
        .route("/customers/:id/total", get(customer_total::<S>))
        .route("/customers/:id/payments", get(customer_payments::<S>))
        .route("/payments", get(period_payments::<S>).post(add_payment::<S>))
        .route("/villages", get(list_villages::<S>))
        .fallback(not_found)
        .with_state(state)
}

pub async fn serve<S: Storage + Clone + Send + Sync + 'static>(
    addr: SocketAddr,
    ledger: Ledger<S>,
    shutdown: tokio_util::sync::CancellationToken,
) -> anyhow::Result<()> {
    let state = AppState {
        ledger,
        started_at: std::time::SystemTime::now(),
    };
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("🌐 REST listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown.cancelled().await;
            log::info!("🛑 REST shutdown requested");
        })
        .await?;
    log::info!("👋 REST server exited");
    Ok(())
}
