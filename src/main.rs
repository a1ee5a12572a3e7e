mod app;
mod cli;
mod commands;
mod configuration;
mod context;
mod ledger;
mod rest;
mod storage;
mod tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    app::run().await
}
