use anyhow::Result;
use serde::Deserialize;
use std::str::FromStr;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub general: General,
    pub store: Store,
    pub euroleague: Euroleague,
    pub dunkest: Dunkest,
    pub injuries: Injuries,
    pub fetch: Fetch,
    pub valuation: Valuation,
    pub filters: Filters,
    pub scoring: Scoring,
    pub recommendation: Recommendation,
    pub observability: Observability,
}

#[derive(Debug, Deserialize)]
pub struct General {
    pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Store {
    pub root: String,
}

#[derive(Debug, Deserialize)]
pub struct Euroleague {
    pub boxscore_api_url: String,
    /// Season year, e.g. "2025". The remote endpoint expects "E2025".
    pub season: String,
}

impl Euroleague {
    pub fn season_code(&self) -> String {
        format!("E{}", self.season)
    }

    /// Store key for the per-season game table.
    pub fn stats_key(&self) -> String {
        format!("player_stats_{}.csv", self.season)
    }
}

#[derive(Debug, Deserialize)]
pub struct Dunkest {
    pub api_url: String,
    pub season_id: u32,
    pub mode: String,
    pub stats_type: String,
    pub teams: Vec<u32>,
    pub positions: Vec<u32>,
    pub min_cr: f64,
    pub max_cr: f64,
}

#[derive(Debug, Deserialize)]
pub struct Injuries {
    pub api_url: String,
}

#[derive(Debug, Deserialize)]
pub struct Fetch {
    pub request_timeout_secs: u64,
    pub max_consecutive_failures: u32,
    pub max_games_per_run: u32,
    pub stats_refresh_interval_secs: u64,
    pub valuation_refresh_interval_secs: u64,
    pub injury_refresh_interval_secs: u64,
}

#[derive(Debug, Deserialize)]
pub struct Valuation {
    pub lookback_days: u32,
}

/// Read-side player filters applied by the CLI views.
#[derive(Debug, Deserialize)]
pub struct Filters {
    pub min_cr: f64,
    pub max_cr: f64,
    pub position: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Scoring {
    pub last_x_games: usize,
    pub weight_pir_norm: f64,
    pub weight_cost_norm: f64,
    pub weight_stderr_penalty: f64,
}

#[derive(Debug, Deserialize)]
pub struct Recommendation {
    pub last_x_games: usize,
    pub alpha: f64,
    pub weight_efficiency: f64,
    pub weight_mean_pir: f64,
    pub weight_consistency: f64,
}

#[derive(Debug, Deserialize)]
pub struct Observability {
    pub prometheus_port: u16,
}

impl Config {
    pub fn load() -> Result<Self> {
        let content = std::fs::read_to_string("config/default.toml")?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }
}

impl FromStr for Config {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::from_toml_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_default_config() {
        let config = Config::from_toml_str(include_str!("../../../config/default.toml")).unwrap();
        assert_eq!(config.euroleague.season, "2025");
        assert_eq!(config.fetch.max_consecutive_failures, 5);
        assert_eq!(config.fetch.request_timeout_secs, 10);
        assert_eq!(config.valuation.lookback_days, 14);
        assert!(config.dunkest.teams.contains(&32));
    }

    #[test]
    fn test_season_code_and_stats_key() {
        let config = Config::from_toml_str(include_str!("../../../config/default.toml")).unwrap();
        assert_eq!(config.euroleague.season_code(), "E2025");
        assert_eq!(config.euroleague.stats_key(), "player_stats_2025.csv");
    }

    #[test]
    fn test_filters_position_optional() {
        // [filters] without a position key should parse to None (= all positions).
        let config = Config::from_toml_str(include_str!("../../../config/default.toml")).unwrap();
        assert!(config.filters.position.is_none());
    }

    #[test]
    fn test_recommendation_defaults_in_file() {
        let config = Config::from_toml_str(include_str!("../../../config/default.toml")).unwrap();
        assert_eq!(config.recommendation.last_x_games, 5);
        assert!((config.recommendation.alpha - 0.85).abs() < 1e-9);
        assert!((config.recommendation.weight_efficiency - 2.0).abs() < 1e-9);
    }
}
