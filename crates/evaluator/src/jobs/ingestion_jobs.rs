use anyhow::Result;
use chrono::NaiveDate;
use common::config::{Dunkest, Euroleague, Fetch};
use common::store::SnapshotStore;
use common::types::{coerce_numeric, coerce_string, InjuryRecord, MarketPlayer, RawInjuryRow, ValuationRecord};

use super::fetcher_traits::*;
use crate::ingestion::{ingest_season_games, BoxscoreFetcher};
use crate::merge::{capitalize, dedup_injuries, valuation_key};

/// Incrementally extend the season's game table. Returns (rows in the merged
/// table, highest game code seen).
pub async fn run_stats_refresh_once<F: BoxscoreFetcher + Sync>(
    store: &SnapshotStore,
    fetcher: &F,
    euroleague: &Euroleague,
    fetch: &Fetch,
) -> Result<(u64, u32)> {
    let rows = ingest_season_games(
        store,
        fetcher,
        &euroleague.stats_key(),
        &euroleague.season_code(),
        fetch.max_consecutive_failures,
        fetch.max_games_per_run,
    )
    .await?;
    let last = rows.iter().map(|r| r.game_code).max().unwrap_or(0);
    Ok((rows.len() as u64, last))
}

/// Map raw market entries to valuation rows. Entries missing either name part
/// are unusable as a join key and are dropped; an unparseable cost is kept as
/// an unknown cost, not dropped.
pub fn valuation_rows_from_market(players: &[MarketPlayer]) -> Vec<ValuationRecord> {
    players
        .iter()
        .filter_map(|p| {
            let first = p.first_name.as_deref()?.trim();
            let last = p.last_name.as_deref()?.trim();
            if first.is_empty() || last.is_empty() {
                return None;
            }
            Some(ValuationRecord {
                player_name: format!("{} {}", capitalize(first), capitalize(last)),
                cr: p.cr.as_ref().and_then(coerce_numeric),
                position: p
                    .position
                    .as_ref()
                    .and_then(coerce_string)
                    .unwrap_or_default(),
            })
        })
        .collect()
}

/// Full cost/position snapshot for `today`, replacing that day's file.
pub async fn run_valuation_snapshot_once<F: ValuationFetcher + Sync>(
    store: &SnapshotStore,
    fetcher: &F,
    filters: &Dunkest,
    today: NaiveDate,
) -> Result<u64> {
    let players = fetcher.fetch_market_table(filters).await?;
    let rows = valuation_rows_from_market(&players);
    let key = valuation_key(today);
    store.save(&key, &rows);
    metrics::counter!("evaluator_valuation_rows_total").increment(rows.len() as u64);
    tracing::info!(key = %key, rows = rows.len(), "valuation snapshot written");
    Ok(rows.len() as u64)
}

/// Normalize loosely-named injury rows. Rows without a player name cannot be
/// joined and are dropped.
pub fn injury_rows_from_raw(raw: &[RawInjuryRow]) -> Vec<InjuryRecord> {
    let rows: Vec<InjuryRecord> = raw
        .iter()
        .filter_map(|r| {
            let player = r.player.as_deref()?.trim();
            if player.is_empty() {
                return None;
            }
            Some(InjuryRecord {
                player: player.to_string(),
                team: r.team.clone().unwrap_or_default(),
                position: r.position.clone().unwrap_or_default(),
                injury: r.injury.clone().unwrap_or_default(),
                status: r.status.clone().unwrap_or_default(),
            })
        })
        .collect();
    dedup_injuries(&rows)
}

/// Latest-only injury snapshot; no history is kept.
pub async fn run_injury_snapshot_once<F: InjuryFetcher + Sync>(
    store: &SnapshotStore,
    fetcher: &F,
) -> Result<u64> {
    let raw = fetcher.fetch_injury_report().await?;
    let rows = injury_rows_from_raw(&raw);
    store.save("injury_report.csv", &rows);
    metrics::counter!("evaluator_injury_rows_total").increment(rows.len() as u64);
    tracing::info!(rows = rows.len(), "injury snapshot written");
    Ok(rows.len() as u64)
}
