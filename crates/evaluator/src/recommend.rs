use crate::aggregate::{mean, sample_stddev};
use crate::merge::MergedRow;
use std::collections::BTreeMap;

/// Weighted linear scorer configuration.
#[derive(Debug, Clone, Copy)]
pub struct LinearParams {
    pub last_x_games: usize,
    pub weight_pir_norm: f64,
    pub weight_cost_norm: f64,
    pub weight_stderr_penalty: f64,
}

impl Default for LinearParams {
    fn default() -> Self {
        Self {
            last_x_games: 10,
            weight_pir_norm: 1.0,
            weight_cost_norm: 1.0,
            weight_stderr_penalty: 1.0,
        }
    }
}

impl LinearParams {
    pub fn from_config(cfg: &common::config::Scoring) -> Self {
        Self {
            last_x_games: cfg.last_x_games,
            weight_pir_norm: cfg.weight_pir_norm,
            weight_cost_norm: cfg.weight_cost_norm,
            weight_stderr_penalty: cfg.weight_stderr_penalty,
        }
    }
}

/// Exponential-decay scorer configuration. Higher alpha keeps older games
/// relevant; lower alpha leans on the latest form.
#[derive(Debug, Clone, Copy)]
pub struct DecayParams {
    pub last_x_games: usize,
    pub alpha: f64,
    pub weight_efficiency: f64,
    pub weight_mean_pir: f64,
    pub weight_consistency: f64,
}

impl Default for DecayParams {
    fn default() -> Self {
        Self {
            last_x_games: 5,
            alpha: 0.85,
            weight_efficiency: 2.0,
            weight_mean_pir: 1.0,
            weight_consistency: 1.0,
        }
    }
}

impl DecayParams {
    pub fn from_config(cfg: &common::config::Recommendation) -> Self {
        Self {
            last_x_games: cfg.last_x_games,
            alpha: cfg.alpha,
            weight_efficiency: cfg.weight_efficiency,
            weight_mean_pir: cfg.weight_mean_pir,
            weight_consistency: cfg.weight_consistency,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LinearRecommendation {
    pub player_name: String,
    pub pir_avg: f64,
    pub stderr: f64,
    pub cr: Option<f64>,
    pub position: Option<String>,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DecayRecommendation {
    pub player_name: String,
    pub weighted_avg_pir: f64,
    pub efficiency: f64,
    pub stderr: f64,
    pub cr: Option<f64>,
    pub position: Option<String>,
    pub score: f64,
}

/// Group rows per player, newest game first, truncated to the window.
fn windows_by_player(rows: &[MergedRow], last_x_games: usize) -> BTreeMap<&str, Vec<&MergedRow>> {
    let mut sorted: Vec<&MergedRow> = rows.iter().collect();
    sorted.sort_by_key(|r| std::cmp::Reverse(r.game_code));
    let mut groups: BTreeMap<&str, Vec<&MergedRow>> = BTreeMap::new();
    for row in sorted {
        let group = groups.entry(row.player_name.as_str()).or_default();
        if group.len() < last_x_games.max(1) {
            group.push(row);
        }
    }
    groups
}

fn sort_by_score_desc<T, F: Fn(&T) -> f64>(items: &mut [T], score: F) {
    items.sort_by(|a, b| {
        score(b)
            .partial_cmp(&score(a))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

/// Linear weighted scorer: min-max normalized average PIR, inverted min-max
/// normalized cost, minus a standard-error penalty.
///
/// Normalization runs against the full candidate pool's row-level PIR and
/// cost ranges; degenerate pools (max == min) contribute 0 instead of
/// dividing by zero. Players with unknown or non-positive cost stay in the
/// ranking with their score forced to 0.
pub fn recommend_linear(rows: &[MergedRow], params: &LinearParams) -> Vec<LinearRecommendation> {
    if rows.iter().all(|r| r.pir.is_none()) {
        tracing::warn!("no performance index data available; returning empty recommendations");
        return Vec::new();
    }

    let pool_pir: Vec<f64> = rows.iter().filter_map(|r| r.pir).collect();
    let pool_cr: Vec<f64> = rows.iter().filter_map(|r| r.cr).collect();
    let (pir_min, pir_max) = min_max(&pool_pir);
    let (cr_min, cr_max) = min_max(&pool_cr);

    let mut recommendations = Vec::new();
    for (name, window) in windows_by_player(rows, params.last_x_games) {
        let values: Vec<f64> = window.iter().filter_map(|r| r.pir).collect();
        if values.is_empty() {
            continue;
        }
        let pir_avg = mean(&values);
        let stderr = sample_stddev(&values) / (window.len() as f64).sqrt();
        let cr = window[0].cr;
        let position = window[0].position.clone();

        let pir_norm = if pir_max > pir_min {
            (pir_avg - pir_min) / (pir_max - pir_min)
        } else {
            0.0
        };
        let score = match cr {
            Some(c) if c > 0.0 => {
                let cost_norm = if cr_max > cr_min {
                    (cr_max - c) / (cr_max - cr_min)
                } else {
                    0.0
                };
                params.weight_pir_norm * pir_norm + params.weight_cost_norm * cost_norm
                    - params.weight_stderr_penalty * stderr
            }
            // Unknown or non-positive cost: keep the row, zero the score.
            _ => 0.0,
        };

        recommendations.push(LinearRecommendation {
            player_name: name.to_string(),
            pir_avg,
            stderr,
            cr,
            position,
            score,
        });
    }

    sort_by_score_desc(&mut recommendations, |r| r.score);
    recommendations
}

/// Exponential-decay scorer: recent games weighted `alpha^i` (i=0 newest),
/// blended with cost efficiency and a consistency penalty.
pub fn recommend_decay(rows: &[MergedRow], params: &DecayParams) -> Vec<DecayRecommendation> {
    if rows.iter().all(|r| r.pir.is_none()) {
        tracing::warn!("no performance index data available; returning empty recommendations");
        return Vec::new();
    }

    let mut recommendations = Vec::new();
    for (name, window) in windows_by_player(rows, params.last_x_games) {
        let mut weighted_sum = 0.0;
        let mut weight_total = 0.0;
        for (i, row) in window.iter().enumerate() {
            if let Some(pir) = row.pir {
                let w = params.alpha.powi(i as i32);
                weighted_sum += w * pir;
                weight_total += w;
            }
        }
        if weight_total <= 0.0 {
            continue;
        }
        let weighted_avg_pir = weighted_sum / weight_total;

        let values: Vec<f64> = window.iter().filter_map(|r| r.pir).collect();
        let stderr = sample_stddev(&values) / (window.len() as f64).sqrt();

        let cr = window[0].cr;
        let position = window[0].position.clone();
        // Non-positive cost behaves as infinite cost: efficiency collapses.
        let efficiency = match cr {
            Some(c) if c > 0.0 => weighted_avg_pir / c,
            _ => 0.0,
        };

        let score = params.weight_mean_pir * weighted_avg_pir
            + params.weight_efficiency * efficiency
            - params.weight_consistency * stderr;

        recommendations.push(DecayRecommendation {
            player_name: name.to_string(),
            weighted_avg_pir,
            efficiency,
            stderr,
            cr,
            position,
            score,
        });
    }

    sort_by_score_desc(&mut recommendations, |r| r.score);
    recommendations
}

fn min_max(values: &[f64]) -> (f64, f64) {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    (min, max)
}
