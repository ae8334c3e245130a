use crate::merge::MergedRow;
use std::collections::BTreeMap;

/// How many recent games feed a player's rolling stats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Window {
    LastN(usize),
    AllGames,
}

/// Rolling per-player stats over the selected window, with the static market
/// attributes carried from the most recent row of that window.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerAggregate {
    pub player_name: String,
    pub average_pir: f64,
    pub stddev_pir: f64,
    pub cr: Option<f64>,
    pub position: Option<String>,
    pub injury_status: Option<String>,
    pub injury: Option<String>,
}

pub fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (N-1 denominator); 0.0 below two samples.
pub fn sample_stddev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    var.sqrt()
}

/// Compute per-player average and standard deviation of PIR over the last N
/// games (head-N by descending game code; fewer if the player has played
/// fewer). Players whose window holds no PIR values at all are dropped, and
/// an input with no PIR anywhere short-circuits to empty.
pub fn calculate_pir_aggregates(rows: &[MergedRow], window: Window) -> Vec<PlayerAggregate> {
    if rows.iter().all(|r| r.pir.is_none()) {
        tracing::warn!("no performance index data available; returning empty aggregates");
        return Vec::new();
    }

    let n = match window {
        Window::LastN(n) => n.max(1),
        Window::AllGames => {
            let distinct: std::collections::HashSet<u32> = rows.iter().map(|r| r.game_code).collect();
            distinct.len().max(1)
        }
    };

    let mut sorted: Vec<&MergedRow> = rows.iter().collect();
    sorted.sort_by_key(|r| std::cmp::Reverse(r.game_code));

    let mut groups: BTreeMap<&str, Vec<&MergedRow>> = BTreeMap::new();
    for row in sorted {
        groups.entry(row.player_name.as_str()).or_default().push(row);
    }

    let mut aggregates = Vec::new();
    for (name, group) in groups {
        let window_rows = &group[..group.len().min(n)];
        let values: Vec<f64> = window_rows.iter().filter_map(|r| r.pir).collect();
        if values.is_empty() {
            continue;
        }
        let stddev = if n == 1 { 0.0 } else { sample_stddev(&values) };
        let newest = window_rows[0];
        aggregates.push(PlayerAggregate {
            player_name: name.to_string(),
            average_pir: mean(&values),
            stddev_pir: stddev,
            cr: newest.cr,
            position: newest.position.clone(),
            injury_status: newest.injury_status.clone(),
            injury: newest.injury.clone(),
        });
    }
    aggregates
}
