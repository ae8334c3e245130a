use anyhow::Result;
use common::store::SnapshotStore;
use common::types::{BoxscoreResponse, GameRecord};

use crate::probe::{FrontierProbe, ProbeStatus};

pub trait BoxscoreFetcher {
    fn fetch_boxscore(
        &self,
        game_code: u32,
        season_code: &str,
    ) -> impl std::future::Future<Output = Result<BoxscoreResponse>> + Send;
}

/// Flatten one box-score payload into per-player rows.
///
/// Rows without a `Stats` array never reach this function; the caller treats
/// such payloads as a frontier miss.
pub fn flatten_boxscore(
    season_code: &str,
    game_code: u32,
    payload: &BoxscoreResponse,
) -> Vec<GameRecord> {
    let Some(stats) = payload.stats.as_ref() else {
        return Vec::new();
    };
    let mut rows = Vec::new();
    for team_stat in stats {
        let team = team_stat.team.clone().unwrap_or_default();
        for player in &team_stat.players_stats {
            rows.push(GameRecord {
                season: season_code.to_string(),
                game_code,
                team: team.clone(),
                player_id: player.player_id.as_deref().unwrap_or("").trim().to_string(),
                player_name: player.player.as_deref().unwrap_or("").trim().to_string(),
                pir: player.valuation,
                points: player.points,
                rebounds: player.total_rebounds,
                assists: player.assistances,
                steals: player.steals,
                blocks: player.blocks_favour,
                turnovers: player.turnovers,
                minutes: player.minutes.clone(),
            });
        }
    }
    rows
}

/// Deduplicate on (game_code, player_id), keeping the last occurrence of each
/// identity while preserving the overall row order. Last wins so a re-fetched
/// box score (the API does revise past games) replaces the stale row.
pub fn dedup_keep_last(rows: Vec<GameRecord>) -> Vec<GameRecord> {
    let mut seen = std::collections::HashSet::new();
    let mut kept: Vec<GameRecord> = rows
        .into_iter()
        .rev()
        .filter(|r| seen.insert((r.game_code, r.player_id.clone())))
        .collect();
    kept.reverse();
    kept
}

/// Incrementally extend the stored season table with newly played games.
///
/// Loads the existing table, probes game codes past the stored frontier until
/// the consecutive-miss threshold trips, appends and deduplicates, and
/// persists. Individual fetch failures only feed the miss counter; the one
/// result this returns is the merged table (unchanged when nothing new was
/// found, in which case the store is not rewritten).
pub async fn ingest_season_games<F: BoxscoreFetcher + Sync>(
    store: &SnapshotStore,
    fetcher: &F,
    key: &str,
    season_code: &str,
    stop_after: u32,
    max_probes: u32,
) -> Result<Vec<GameRecord>> {
    let existing: Vec<GameRecord> = store.load(key);
    let last_game_code = existing.iter().map(|r| r.game_code).max().unwrap_or(0);
    tracing::info!(key, last_game_code, "starting incremental game fetch");

    let mut fetched: Vec<GameRecord> = Vec::new();
    let mut games_found = 0_u64;
    let mut probe = FrontierProbe::new(last_game_code, stop_after, max_probes);

    while let Some(game_code) = probe.next_candidate() {
        match fetcher.fetch_boxscore(game_code, season_code).await {
            Ok(payload) if payload.stats.is_some() => {
                probe.hit();
                games_found += 1;
                fetched.extend(flatten_boxscore(season_code, game_code, &payload));
            }
            Ok(_) => {
                tracing::debug!(game_code, "no stats in payload; counting as miss");
                if probe.miss() == ProbeStatus::Stopped {
                    tracing::info!(game_code, "consecutive-miss threshold reached; stopping");
                }
            }
            Err(e) => {
                tracing::debug!(game_code, error = %e, "boxscore fetch failed; counting as miss");
                if probe.miss() == ProbeStatus::Stopped {
                    tracing::info!(game_code, "consecutive-miss threshold reached; stopping");
                }
            }
        }
    }

    if fetched.is_empty() {
        tracing::info!(key, "no new games fetched; table unchanged");
        return Ok(existing);
    }

    let mut combined = existing;
    combined.extend(fetched);
    let merged = dedup_keep_last(combined);
    store.save(key, &merged);

    metrics::counter!("evaluator_games_fetched_total").increment(games_found);
    metrics::gauge!("evaluator_last_game_code")
        .set(f64::from(merged.iter().map(|r| r.game_code).max().unwrap_or(0)));
    tracing::info!(
        key,
        games = games_found,
        rows = merged.len(),
        "season table updated"
    );
    Ok(merged)
}
