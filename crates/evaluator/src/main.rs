use anyhow::Result;
use std::sync::Arc;

mod aggregate;
mod cli;
mod dominance;
mod ingestion;
mod jobs;
mod merge;
mod metrics;
mod probe;
mod recommend;
mod scheduler;

#[allow(clippy::too_many_lines)] // job wiring and worker loops
#[tokio::main]
async fn main() -> Result<()> {
    let config = common::config::Config::load()?;

    let dispatch = common::observability::build_dispatch(&config.general.log_level);
    tracing::dispatcher::set_global_default(dispatch).map_err(anyhow::Error::msg)?;

    tracing::info!("evaluator starting");

    let store = common::store::SnapshotStore::new(&config.store.root);

    // CLI commands are read-side and synchronous; run and exit immediately.
    let cmd = cli::parse_args(std::env::args()).map_err(anyhow::Error::msg)?;
    if cmd != cli::Command::Run {
        return cli::run_command(&store, &config, cmd);
    }

    metrics::install_prometheus(config.observability.prometheus_port)?;
    metrics::describe();

    let cfg = Arc::new(config);
    let api = Arc::new(common::feeds::FeedClient::new(
        &cfg.euroleague.boxscore_api_url,
        &cfg.dunkest.api_url,
        &cfg.injuries.api_url,
        std::time::Duration::from_secs(cfg.fetch.request_timeout_secs),
    )?);

    let (stats_tx, mut stats_rx) = tokio::sync::mpsc::channel::<()>(8);
    let (valuation_tx, mut valuation_rx) = tokio::sync::mpsc::channel::<()>(8);
    let (injury_tx, mut injury_rx) = tokio::sync::mpsc::channel::<()>(8);

    // ── Spawn worker loops BEFORE starting the scheduler so immediate ticks
    // are never dropped. Each loop owns one job; the fetch inside each job is
    // strictly sequential.
    tokio::spawn({
        let api = api.clone();
        let cfg = cfg.clone();
        let store = store.clone();
        async move {
            while stats_rx.recv().await.is_some() {
                let span = tracing::info_span!("job_run", job = "stats_refresh");
                let _g = span.enter();
                match jobs::run_stats_refresh_once(&store, api.as_ref(), &cfg.euroleague, &cfg.fetch)
                    .await
                {
                    Ok((rows, last)) => {
                        tracing::info!(rows, last_game_code = last, "stats_refresh done");
                    }
                    Err(e) => tracing::error!(error = %e, "stats_refresh failed"),
                }
            }
        }
    });

    tokio::spawn({
        let api = api.clone();
        let cfg = cfg.clone();
        let store = store.clone();
        async move {
            while valuation_rx.recv().await.is_some() {
                let span = tracing::info_span!("job_run", job = "valuation_snapshot");
                let _g = span.enter();
                let today = chrono::Utc::now().date_naive();
                match jobs::run_valuation_snapshot_once(&store, api.as_ref(), &cfg.dunkest, today)
                    .await
                {
                    Ok(rows) => tracing::info!(rows, "valuation_snapshot done"),
                    Err(e) => tracing::error!(error = %e, "valuation_snapshot failed"),
                }
            }
        }
    });

    tokio::spawn({
        let api = api.clone();
        let store = store.clone();
        async move {
            while injury_rx.recv().await.is_some() {
                let span = tracing::info_span!("job_run", job = "injury_snapshot");
                let _g = span.enter();
                match jobs::run_injury_snapshot_once(&store, api.as_ref()).await {
                    Ok(rows) => tracing::info!(rows, "injury_snapshot done"),
                    Err(e) => tracing::error!(error = %e, "injury_snapshot failed"),
                }
            }
        }
    });

    let _scheduler_handles = scheduler::start(vec![
        scheduler::JobSpec {
            name: "stats_refresh".to_string(),
            interval: std::time::Duration::from_secs(cfg.fetch.stats_refresh_interval_secs),
            tick: stats_tx,
            run_immediately: false,
        },
        scheduler::JobSpec {
            name: "valuation_snapshot".to_string(),
            interval: std::time::Duration::from_secs(cfg.fetch.valuation_refresh_interval_secs),
            tick: valuation_tx,
            run_immediately: false,
        },
        scheduler::JobSpec {
            name: "injury_snapshot".to_string(),
            interval: std::time::Duration::from_secs(cfg.fetch.injury_refresh_interval_secs),
            tick: injury_tx,
            run_immediately: false,
        },
    ]);

    // ── Bootstrap: run every job once at startup so a fresh deployment has
    // data before the first scheduled tick.
    let today = chrono::Utc::now().date_naive();
    let (stats_res, valuation_res, injury_res) = tokio::join!(
        jobs::run_stats_refresh_once(&store, api.as_ref(), &cfg.euroleague, &cfg.fetch),
        jobs::run_valuation_snapshot_once(&store, api.as_ref(), &cfg.dunkest, today),
        jobs::run_injury_snapshot_once(&store, api.as_ref()),
    );

    match stats_res {
        Ok((rows, last)) => {
            tracing::info!(rows, last_game_code = last, "bootstrap: stats_refresh done");
        }
        Err(e) => tracing::error!(error = %e, "bootstrap: stats_refresh failed"),
    }
    match valuation_res {
        Ok(rows) => tracing::info!(rows, "bootstrap: valuation_snapshot done"),
        Err(e) => tracing::error!(error = %e, "bootstrap: valuation_snapshot failed"),
    }
    match injury_res {
        Ok(rows) => tracing::info!(rows, "bootstrap: injury_snapshot done"),
        Err(e) => tracing::error!(error = %e, "bootstrap: injury_snapshot failed"),
    }

    tracing::info!("bootstrap done; worker loops receiving scheduler ticks");

    tokio::signal::ctrl_c().await?;
    tracing::info!("shutting down (force exit in 5s)");

    // Give spawned tasks a moment to finish, then force exit.
    tokio::spawn(async {
        tokio::time::sleep(std::time::Duration::from_secs(5)).await;
        tracing::warn!("force exit after timeout");
        std::process::exit(0);
    });

    Ok(())
}
