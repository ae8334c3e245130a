use chrono::NaiveDate;
use common::store::SnapshotStore;
use common::types::{GameRecord, InjuryRecord, ValuationRecord};

/// Raised when no usable valuation snapshot exists inside the lookback
/// window. Callers must see this one: scoring against a missing cost table
/// would silently produce garbage rankings.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("no valuation snapshot within the last {lookback_days} days (searched back to {oldest})")]
    SnapshotNotFound {
        lookback_days: u32,
        oldest: NaiveDate,
    },
}

pub fn valuation_key(date: NaiveDate) -> String {
    format!("player_cr_data_{}.csv", date.format("%Y-%m-%d"))
}

pub fn capitalize(part: &str) -> String {
    let mut chars = part.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

/// Canonical join key: "Last, First" becomes "First Last" with each part
/// capitalized. Anything that is not exactly two comma-separated parts passes
/// through unchanged.
pub fn format_player_name(name: &str) -> String {
    let parts: Vec<&str> = name.split(", ").collect();
    match parts.as_slice() {
        [last, first] => format!("{} {}", capitalize(first), capitalize(last)),
        _ => name.to_string(),
    }
}

#[derive(Debug, Clone)]
pub struct ResolvedValuation {
    pub date: NaiveDate,
    pub key: String,
    pub rows: Vec<ValuationRecord>,
}

/// Walk backward from `today` looking for the most recent non-empty
/// valuation snapshot. The daily snapshot job can lag (or fail outright), so
/// consumers tolerate a stale table up to the lookback ceiling.
pub fn resolve_valuation_snapshot(
    store: &SnapshotStore,
    today: NaiveDate,
    lookback_days: u32,
) -> Result<ResolvedValuation, LookupError> {
    for offset in 0..=lookback_days {
        let date = today - chrono::Duration::days(i64::from(offset));
        let key = valuation_key(date);
        let rows: Vec<ValuationRecord> = store.load(&key);
        if !rows.is_empty() {
            if offset > 0 {
                tracing::info!(%date, days_back = offset, "using stale valuation snapshot");
            }
            return Ok(ResolvedValuation { date, key, rows });
        }
    }
    Err(LookupError::SnapshotNotFound {
        lookback_days,
        oldest: today - chrono::Duration::days(i64::from(lookback_days)),
    })
}

/// One player-game line joined with its static market attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedRow {
    pub season: String,
    pub game_code: u32,
    pub team: String,
    pub player_id: String,
    pub player_name: String,
    pub pir: Option<f64>,
    pub points: Option<f64>,
    pub rebounds: Option<f64>,
    pub assists: Option<f64>,
    pub steals: Option<f64>,
    pub blocks: Option<f64>,
    pub turnovers: Option<f64>,
    pub minutes: Option<String>,
    pub cr: Option<f64>,
    pub position: Option<String>,
    pub injury_status: Option<String>,
    pub injury: Option<String>,
}

/// Left join of game rows onto the valuation snapshot by canonical player
/// name. Unmatched players keep None cost/position.
pub fn merge_game_rows(games: &[GameRecord], valuations: &[ValuationRecord]) -> Vec<MergedRow> {
    let by_name: std::collections::HashMap<&str, &ValuationRecord> = valuations
        .iter()
        .map(|v| (v.player_name.as_str(), v))
        .collect();

    games
        .iter()
        .map(|g| {
            let name = format_player_name(&g.player_name);
            let valuation = by_name.get(name.as_str());
            MergedRow {
                season: g.season.clone(),
                game_code: g.game_code,
                team: g.team.clone(),
                player_id: g.player_id.clone(),
                player_name: name,
                pir: g.pir,
                points: g.points,
                rebounds: g.rebounds,
                assists: g.assists,
                steals: g.steals,
                blocks: g.blocks,
                turnovers: g.turnovers,
                minutes: g.minutes.clone(),
                cr: valuation.and_then(|v| v.cr),
                position: valuation.map(|v| v.position.clone()),
                injury_status: None,
                injury: None,
            }
        })
        .collect()
}

/// Collapse the injury table to one row per player. First occurrence wins;
/// the feed lists the most recent report first.
pub fn dedup_injuries(rows: &[InjuryRecord]) -> Vec<InjuryRecord> {
    let mut seen = std::collections::HashSet::new();
    rows.iter()
        .filter(|r| seen.insert(format_player_name(&r.player)))
        .cloned()
        .collect()
}

/// Left join injury status onto merged rows by canonical player name.
/// After this pass every row carries Some(..); players without a report get
/// empty strings so downstream display stays stable.
pub fn join_injuries(rows: &mut [MergedRow], injuries: &[InjuryRecord]) {
    let deduped = dedup_injuries(injuries);
    let by_name: std::collections::HashMap<String, &InjuryRecord> = deduped
        .iter()
        .map(|r| (format_player_name(&r.player), r))
        .collect();
    for row in rows.iter_mut() {
        match by_name.get(&row.player_name) {
            Some(report) => {
                row.injury_status = Some(report.status.clone());
                row.injury = Some(report.injury.clone());
            }
            None => {
                row.injury_status = Some(String::new());
                row.injury = Some(String::new());
            }
        }
    }
}

/// Read-side filter: cost range plus optional position. Rows with no known
/// cost fall outside any range, matching the join's left-join semantics.
pub fn filter_by_cr_and_position(
    rows: Vec<MergedRow>,
    min_cr: f64,
    max_cr: f64,
    position: Option<&str>,
) -> Vec<MergedRow> {
    rows.into_iter()
        .filter(|r| match position {
            Some(p) if !p.is_empty() => r.position.as_deref() == Some(p),
            _ => true,
        })
        .filter(|r| matches!(r.cr, Some(cr) if cr >= min_cr && cr <= max_cr))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(code: u32, name: &str, pir: Option<f64>) -> GameRecord {
        GameRecord {
            season: "E2025".to_string(),
            game_code: code,
            team: "PAN".to_string(),
            player_id: format!("P-{name}"),
            player_name: name.to_string(),
            pir,
            points: None,
            rebounds: None,
            assists: None,
            steals: None,
            blocks: None,
            turnovers: None,
            minutes: None,
        }
    }

    fn valuation(name: &str, cr: Option<f64>, position: &str) -> ValuationRecord {
        ValuationRecord {
            player_name: name.to_string(),
            cr,
            position: position.to_string(),
        }
    }

    #[test]
    fn test_format_player_name_swaps_and_capitalizes() {
        assert_eq!(format_player_name("DONCIC, LUKA"), "Luka Doncic");
        assert_eq!(format_player_name("Doncic, Luka"), "Luka Doncic");
    }

    #[test]
    fn test_format_player_name_passes_malformed_through() {
        assert_eq!(format_player_name("Doncic Luka"), "Doncic Luka");
        assert_eq!(format_player_name("DONCIC, LUKA, JR"), "DONCIC, LUKA, JR");
        assert_eq!(format_player_name(""), "");
    }

    #[test]
    fn test_merge_left_join_keeps_unmatched_players() {
        let games = vec![game(1, "SLOUKAS, KOSTAS", Some(19.0)), game(1, "NOBODY, KNOWN", Some(4.0))];
        let valuations = vec![valuation("Kostas Sloukas", Some(15.8), "G")];
        let merged = merge_game_rows(&games, &valuations);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].player_name, "Kostas Sloukas");
        assert_eq!(merged[0].cr, Some(15.8));
        assert_eq!(merged[0].position.as_deref(), Some("G"));
        assert_eq!(merged[1].cr, None);
        assert_eq!(merged[1].position, None);
    }

    #[test]
    fn test_resolve_valuation_snapshot_walks_back_to_yesterday() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path());
        let today = NaiveDate::from_ymd_opt(2026, 1, 10).unwrap();
        let yesterday = NaiveDate::from_ymd_opt(2026, 1, 9).unwrap();
        store.save(
            &valuation_key(yesterday),
            &[valuation("Kostas Sloukas", Some(15.8), "G")],
        );

        let resolved = resolve_valuation_snapshot(&store, today, 14).unwrap();
        assert_eq!(resolved.date, yesterday);
        assert_eq!(resolved.key, "player_cr_data_2026-01-09.csv");
        assert_eq!(resolved.rows.len(), 1);
    }

    #[test]
    fn test_resolve_valuation_snapshot_not_found_past_ceiling() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path());
        let today = NaiveDate::from_ymd_opt(2026, 1, 10).unwrap();
        // A snapshot older than the window must not be picked up.
        let too_old = today - chrono::Duration::days(15);
        store.save(
            &valuation_key(too_old),
            &[valuation("Kostas Sloukas", Some(15.8), "G")],
        );

        let err = resolve_valuation_snapshot(&store, today, 14).unwrap_err();
        assert!(matches!(err, LookupError::SnapshotNotFound { lookback_days: 14, .. }));
    }

    #[test]
    fn test_join_injuries_fills_missing_with_empty_strings() {
        let games = vec![game(1, "SLOUKAS, KOSTAS", Some(19.0)), game(1, "NUNN, KENDRICK", Some(22.0))];
        let mut merged = merge_game_rows(&games, &[]);
        let injuries = vec![
            InjuryRecord {
                player: "Kostas Sloukas".to_string(),
                team: "PAN".to_string(),
                position: "G".to_string(),
                injury: "Calf".to_string(),
                status: "Out".to_string(),
            },
            // Duplicate report for the same player; the first one wins.
            InjuryRecord {
                player: "Kostas Sloukas".to_string(),
                team: "PAN".to_string(),
                position: "G".to_string(),
                injury: "Calf (old)".to_string(),
                status: "Questionable".to_string(),
            },
        ];
        join_injuries(&mut merged, &injuries);
        assert_eq!(merged[0].injury_status.as_deref(), Some("Out"));
        assert_eq!(merged[0].injury.as_deref(), Some("Calf"));
        assert_eq!(merged[1].injury_status.as_deref(), Some(""));
        assert_eq!(merged[1].injury.as_deref(), Some(""));
    }

    #[test]
    fn test_filter_by_cr_and_position() {
        let games = vec![
            game(1, "SLOUKAS, KOSTAS", Some(19.0)),
            game(1, "NUNN, KENDRICK", Some(22.0)),
            game(1, "TAVARES, WALTER", Some(24.0)),
        ];
        let valuations = vec![
            valuation("Kostas Sloukas", Some(15.8), "G"),
            valuation("Kendrick Nunn", Some(21.4), "G"),
            valuation("Walter Tavares", Some(19.1), "C"),
        ];
        let merged = merge_game_rows(&games, &valuations);

        let guards = filter_by_cr_and_position(merged.clone(), 0.0, 100.0, Some("G"));
        assert_eq!(guards.len(), 2);

        let cheap = filter_by_cr_and_position(merged, 0.0, 20.0, None);
        assert_eq!(cheap.len(), 2); // Nunn (21.4) filtered out
    }
}
