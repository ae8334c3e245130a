use anyhow::Result;
use common::config::Dunkest;
use common::feeds::FeedClient;
use common::types::{BoxscoreResponse, MarketPlayer, RawInjuryRow};
use std::time::Instant;

use super::fetcher_traits::*;

impl crate::ingestion::BoxscoreFetcher for FeedClient {
    async fn fetch_boxscore(&self, game_code: u32, season_code: &str) -> Result<BoxscoreResponse> {
        let start = Instant::now();
        let res = FeedClient::fetch_boxscore(self, game_code, season_code).await;
        let ms = start.elapsed().as_secs_f64() * 1000.0;
        metrics::histogram!("evaluator_api_latency_ms", "endpoint" => "boxscore").record(ms);
        match res {
            Ok(v) => {
                metrics::counter!("evaluator_api_requests_total", "endpoint" => "boxscore", "status" => "ok").increment(1);
                Ok(v)
            }
            Err(e) => {
                metrics::counter!("evaluator_api_requests_total", "endpoint" => "boxscore", "status" => "error").increment(1);
                Err(e)
            }
        }
    }
}

impl ValuationFetcher for FeedClient {
    async fn fetch_market_table(&self, filters: &Dunkest) -> Result<Vec<MarketPlayer>> {
        let start = Instant::now();
        let res = FeedClient::fetch_market_table(self, filters).await;
        let ms = start.elapsed().as_secs_f64() * 1000.0;
        metrics::histogram!("evaluator_api_latency_ms", "endpoint" => "market_table").record(ms);
        match res {
            Ok(v) => {
                metrics::counter!("evaluator_api_requests_total", "endpoint" => "market_table", "status" => "ok").increment(1);
                Ok(v)
            }
            Err(e) => {
                metrics::counter!("evaluator_api_requests_total", "endpoint" => "market_table", "status" => "error").increment(1);
                Err(e)
            }
        }
    }
}

impl InjuryFetcher for FeedClient {
    async fn fetch_injury_report(&self) -> Result<Vec<RawInjuryRow>> {
        let start = Instant::now();
        let res = FeedClient::fetch_injury_report(self).await;
        let ms = start.elapsed().as_secs_f64() * 1000.0;
        metrics::histogram!("evaluator_api_latency_ms", "endpoint" => "injuries").record(ms);
        match res {
            Ok(v) => {
                metrics::counter!("evaluator_api_requests_total", "endpoint" => "injuries", "status" => "ok").increment(1);
                Ok(v)
            }
            Err(e) => {
                metrics::counter!("evaluator_api_requests_total", "endpoint" => "injuries", "status" => "error").increment(1);
                Err(e)
            }
        }
    }
}
