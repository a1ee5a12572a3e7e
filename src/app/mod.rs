mod wiring;

use crate::commands::CommandRunner;
use crate::configuration::TotalsSource;
use crate::ledger::Ledger;
use crate::{cli, context, rest, storage};
use anyhow::{Context as AnyhowContext, Result};
use std::path::Path;
use tokio_util::sync::CancellationToken;

pub struct App {
    pub ctx: context::Context,
    pub ledger: Ledger<storage::SqliteStorage>,
}

impl App {
    pub fn from_cli() -> Result<(Self, cli::Cli)> {
        let cli = crate::cli::parse();
        let ctx = context::Context::from_cli(&cli);

        crate::tracing::init(ctx.config.log_file.as_deref().map(Path::new));
        log::info!("🚀 Starting scheme-ledger");
        log::info!("📂 Data dir: {}", ctx.config.data_dir);
        match &ctx.config.totals {
            TotalsSource::StoredAmounts => log::info!("🧮 Totals: stored amounts"),
            TotalsSource::PriceTable(path) => {
                log::info!("🧮 Totals: priced periods from {}", path)
            }
        }

        wiring::init_data_dir(&ctx).context("initializing data dir")?;
        let storage = wiring::init_storage(&ctx)?;
        let settings = wiring::build_settings(&ctx)?;
        let ledger = wiring::build_ledger(storage, settings);

        Ok((Self { ctx, ledger }, cli))
    }
}

pub async fn run_daemon(app: App) -> Result<()> {
    if let Some(path) = app.ctx.config.log_file.as_deref() {
        log::info!("📝 Log file: {}", path);
    }

    let shutdown = CancellationToken::new();

    let api_addr = app.ctx.config.api_listen;
    let rest_shutdown = shutdown.clone();
    let ledger = app.ledger.clone();

    let mut rest_handle =
        tokio::spawn(async move { rest::serve(api_addr, ledger, rest_shutdown).await });

    let early = tokio::select! {
        _ = tokio::signal::ctrl_c() => None,
        res = &mut rest_handle => Some(res),
    };

    shutdown.cancel();
    let rest_result = match early {
        Some(res) => {
            log::error!("REST server stopped unexpectedly");
            res
        }
        None => {
            log::info!("🧨 Ctrl-C received, shutting down");
            rest_handle.await
        }
    };

    match rest_result {
        Ok(Ok(())) => {}
        Ok(Err(e)) => {
            log::error!("REST server error: {}", e);
            return Err(e);
        }
        Err(e) => {
            log::error!("REST task failed: {}", e);
            return Err(e.into());
        }
    }

    log::info!("✅ Shutdown complete");
    Ok(())
}

pub async fn run() -> Result<()> {
    let (app, cli) = App::from_cli()?;

    if let Some(cmd) = &cli.cmd {
        // one-shot command mode
        cmd.run(&app.ledger)?;
        return Ok(());
    }

    run_daemon(app).await
}
