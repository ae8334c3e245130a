use crate::config::Dunkest;
use crate::types::{BoxscoreResponse, MarketPlayer, RawInjuryRow};
use anyhow::{Context, Result};
use reqwest::Url;
use std::time::Duration;

/// HTTP client for the three upstream feeds: per-game box scores, the fantasy
/// market cost table, and the injury report.
///
/// Base URLs come from configuration; the caller owns construction and
/// injects the client into jobs, so tests can swap in fakes at the trait
/// seam instead of hitting the network.
pub struct FeedClient {
    boxscore_api_url: String,
    market_api_url: String,
    injury_api_url: String,
    http: reqwest::Client,
}

impl FeedClient {
    pub fn new(
        boxscore_api_url: &str,
        market_api_url: &str,
        injury_api_url: &str,
        timeout: Duration,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            boxscore_api_url: boxscore_api_url.trim_end_matches('/').to_string(),
            market_api_url: market_api_url.trim_end_matches('/').to_string(),
            injury_api_url: injury_api_url.to_string(),
            http,
        })
    }

    pub fn boxscore_url(&self, game_code: u32, season_code: &str) -> Result<String> {
        let mut url = Url::parse(&self.boxscore_api_url)
            .context("boxscore_api_url must be a valid absolute URL")?;
        {
            let mut qp = url.query_pairs_mut();
            qp.append_pair("gamecode", &game_code.to_string());
            qp.append_pair("seasoncode", season_code);
        }
        Ok(url.to_string())
    }

    /// Fetch one game's box score. Non-2xx, timeout, and malformed JSON all
    /// surface as errors; the caller counts them toward its failure streak.
    pub async fn fetch_boxscore(
        &self,
        game_code: u32,
        season_code: &str,
    ) -> Result<BoxscoreResponse> {
        let url = self.boxscore_url(game_code, season_code)?;
        let body = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(serde_json::from_str(&body)?)
    }

    pub fn market_table_url(&self, filters: &Dunkest) -> Result<String> {
        let mut url = Url::parse(&self.market_api_url)
            .context("market api_url must be a valid absolute URL")?;
        {
            let mut qp = url.query_pairs_mut();
            qp.append_pair("season_id", &filters.season_id.to_string());
            qp.append_pair("mode", &filters.mode);
            qp.append_pair("stats_type", &filters.stats_type);
            for team in &filters.teams {
                qp.append_pair("teams[]", &team.to_string());
            }
            for position in &filters.positions {
                qp.append_pair("positions[]", &position.to_string());
            }
            qp.append_pair("min_cr", &filters.min_cr.to_string());
            qp.append_pair("max_cr", &filters.max_cr.to_string());
            qp.append_pair("sort_by", "pdk");
            qp.append_pair("sort_order", "desc");
        }
        Ok(url.to_string())
    }

    /// One bulk request for the full cost/position table. No pagination.
    pub async fn fetch_market_table(&self, filters: &Dunkest) -> Result<Vec<MarketPlayer>> {
        let url = self.market_table_url(filters)?;
        let body = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(serde_json::from_str(&body)?)
    }

    pub fn injury_url(&self) -> &str {
        &self.injury_api_url
    }

    pub async fn fetch_injury_report(&self) -> Result<Vec<RawInjuryRow>> {
        let body = self
            .http
            .get(&self.injury_api_url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(serde_json::from_str(&body)?)
    }
}
