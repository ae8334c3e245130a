use anyhow::{Context, Result};
use common::config::Config;
use common::store::SnapshotStore;
use common::types::{GameRecord, InjuryRecord};

use crate::aggregate::{calculate_pir_aggregates, Window};
use crate::dominance::dominant_players;
use crate::merge::{
    filter_by_cr_and_position, join_injuries, merge_game_rows, resolve_valuation_snapshot,
    MergedRow,
};
use crate::recommend::{recommend_decay, recommend_linear, DecayParams, LinearParams};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Run,
    Aggregates { window: Window },
    Frontier { window: Window },
    Recommend { top: usize },
    RecommendDecay { top: usize },
    Boxscores { games: Option<usize> },
    Injuries,
}

fn parse_window(arg: Option<String>) -> std::result::Result<Window, String> {
    match arg.as_deref() {
        None | Some("all") => Ok(Window::AllGames),
        Some(n) => n
            .parse::<usize>()
            .map(Window::LastN)
            .map_err(|_| format!("expected a number of games or \"all\", got: {n}")),
    }
}

fn parse_top(arg: Option<String>) -> std::result::Result<usize, String> {
    match arg {
        None => Ok(10),
        Some(n) => n
            .parse::<usize>()
            .map_err(|_| format!("expected a player count, got: {n}")),
    }
}

pub fn parse_args<I>(mut args: I) -> std::result::Result<Command, String>
where
    I: Iterator<Item = String>,
{
    // Drop argv[0].
    let _ = args.next();

    let Some(cmd) = args.next() else {
        return Ok(Command::Run);
    };

    match cmd.as_str() {
        "run" => Ok(Command::Run),
        "aggregates" => Ok(Command::Aggregates {
            window: parse_window(args.next())?,
        }),
        "frontier" => Ok(Command::Frontier {
            window: parse_window(args.next())?,
        }),
        "recommend" => Ok(Command::Recommend {
            top: parse_top(args.next())?,
        }),
        "recommend-decay" => Ok(Command::RecommendDecay {
            top: parse_top(args.next())?,
        }),
        "boxscores" => {
            let games = match args.next().as_deref() {
                None | Some("all") => None,
                Some(n) => Some(
                    n.parse::<usize>()
                        .map_err(|_| format!("expected a number of games or \"all\", got: {n}"))?,
                ),
            };
            Ok(Command::Boxscores { games })
        }
        "injuries" => Ok(Command::Injuries),
        other => Err(format!("unknown command: {other}")),
    }
}

pub fn run_command(store: &SnapshotStore, config: &Config, cmd: Command) -> Result<()> {
    match cmd {
        Command::Run => Ok(()),
        Command::Aggregates { window } => show_aggregates(store, config, window, false),
        Command::Frontier { window } => show_aggregates(store, config, window, true),
        Command::Recommend { top } => show_recommendations(store, config, top),
        Command::RecommendDecay { top } => show_decay_recommendations(store, config, top),
        Command::Boxscores { games } => show_boxscores(store, config, games),
        Command::Injuries => show_injuries(store),
    }
}

/// Load the stored season table and join valuation + injury snapshots,
/// applying the configured read-side filters.
fn merged_rows(store: &SnapshotStore, config: &Config) -> Result<Vec<MergedRow>> {
    let games: Vec<GameRecord> = store.load(&config.euroleague.stats_key());
    let today = chrono::Utc::now().date_naive();
    let valuation = resolve_valuation_snapshot(store, today, config.valuation.lookback_days)
        .context("cannot merge without a valuation snapshot")?;
    tracing::debug!(key = %valuation.key, "joined valuation snapshot");

    let mut rows = merge_game_rows(&games, &valuation.rows);
    let injuries: Vec<InjuryRecord> = store.load("injury_report.csv");
    if !injuries.is_empty() {
        join_injuries(&mut rows, &injuries);
    }
    Ok(filter_by_cr_and_position(
        rows,
        config.filters.min_cr,
        config.filters.max_cr,
        config.filters.position.as_deref(),
    ))
}

fn fmt_opt(v: Option<f64>) -> String {
    v.map_or_else(|| "-".to_string(), |v| format!("{v:.1}"))
}

fn show_aggregates(
    store: &SnapshotStore,
    config: &Config,
    window: Window,
    frontier_only: bool,
) -> Result<()> {
    let rows = merged_rows(store, config)?;
    let mut aggregates = calculate_pir_aggregates(&rows, window);
    if frontier_only {
        aggregates = dominant_players(&aggregates);
    }
    aggregates.sort_by(|a, b| {
        b.average_pir
            .partial_cmp(&a.average_pir)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    println!("{:<28} {:>8} {:>8} {:>6} {:<4} {}", "Player", "AvgPIR", "StdDev", "CR", "Pos", "Status");
    for a in aggregates {
        println!(
            "{:<28} {:>8.2} {:>8.2} {:>6} {:<4} {}",
            a.player_name,
            a.average_pir,
            a.stddev_pir,
            fmt_opt(a.cr),
            a.position.as_deref().unwrap_or("-"),
            a.injury_status.as_deref().unwrap_or(""),
        );
    }
    Ok(())
}

fn show_recommendations(store: &SnapshotStore, config: &Config, top: usize) -> Result<()> {
    let rows = merged_rows(store, config)?;
    let recs = recommend_linear(&rows, &LinearParams::from_config(&config.scoring));
    println!("{:<28} {:>8} {:>8} {:>6} {:<4} {:>8}", "Player", "AvgPIR", "StdErr", "CR", "Pos", "Score");
    for r in recs.into_iter().take(top) {
        println!(
            "{:<28} {:>8.2} {:>8.3} {:>6} {:<4} {:>8.3}",
            r.player_name,
            r.pir_avg,
            r.stderr,
            fmt_opt(r.cr),
            r.position.as_deref().unwrap_or("-"),
            r.score,
        );
    }
    Ok(())
}

fn show_decay_recommendations(store: &SnapshotStore, config: &Config, top: usize) -> Result<()> {
    let rows = merged_rows(store, config)?;
    let recs = recommend_decay(&rows, &DecayParams::from_config(&config.recommendation));
    println!(
        "{:<28} {:>8} {:>8} {:>8} {:>6} {:<4} {:>8}",
        "Player", "WAvgPIR", "Eff", "StdErr", "CR", "Pos", "Score"
    );
    for r in recs.into_iter().take(top) {
        println!(
            "{:<28} {:>8.2} {:>8.3} {:>8.3} {:>6} {:<4} {:>8.3}",
            r.player_name,
            r.weighted_avg_pir,
            r.efficiency,
            r.stderr,
            fmt_opt(r.cr),
            r.position.as_deref().unwrap_or("-"),
            r.score,
        );
    }
    Ok(())
}

fn show_boxscores(store: &SnapshotStore, config: &Config, games: Option<usize>) -> Result<()> {
    let rows = merged_rows(store, config)?;
    let rows = match games {
        None => rows,
        Some(n) => {
            let mut codes: Vec<u32> = rows.iter().map(|r| r.game_code).collect();
            codes.sort_unstable_by(|a, b| b.cmp(a));
            codes.dedup();
            codes.truncate(n);
            let keep: std::collections::HashSet<u32> = codes.into_iter().collect();
            rows.into_iter().filter(|r| keep.contains(&r.game_code)).collect()
        }
    };

    println!(
        "{:>5} {:<28} {:<4} {:>6} {:>5} {:>5} {:>4} {:>4} {:>7}",
        "Game", "Player", "Pos", "CR", "PIR", "Pts", "Reb", "Ast", "Min"
    );
    for r in rows {
        println!(
            "{:>5} {:<28} {:<4} {:>6} {:>5} {:>5} {:>4} {:>4} {:>7}",
            r.game_code,
            r.player_name,
            r.position.as_deref().unwrap_or("-"),
            fmt_opt(r.cr),
            fmt_opt(r.pir),
            fmt_opt(r.points),
            fmt_opt(r.rebounds),
            fmt_opt(r.assists),
            r.minutes.as_deref().unwrap_or("-"),
        );
    }
    Ok(())
}

fn show_injuries(store: &SnapshotStore) -> Result<()> {
    let injuries: Vec<InjuryRecord> = store.load("injury_report.csv");
    println!("{:<28} {:<20} {:<4} {:<24} {}", "Player", "Team", "Pos", "Injury", "Status");
    for i in injuries {
        println!(
            "{:<28} {:<20} {:<4} {:<24} {}",
            i.player, i.team, i.position, i.injury, i.status
        );
    }
    Ok(())
}
