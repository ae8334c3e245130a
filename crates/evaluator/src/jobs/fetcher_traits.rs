use anyhow::Result;
use common::config::Dunkest;
use common::types::{MarketPlayer, RawInjuryRow};

pub trait ValuationFetcher {
    fn fetch_market_table(
        &self,
        filters: &Dunkest,
    ) -> impl std::future::Future<Output = Result<Vec<MarketPlayer>>> + Send;
}

pub trait InjuryFetcher {
    fn fetch_injury_report(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<RawInjuryRow>>> + Send;
}
