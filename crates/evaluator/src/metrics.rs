use anyhow::Result;
use metrics::{describe_counter, describe_gauge, describe_histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::net::SocketAddr;

pub fn describe() {
    describe_counter!(
        "evaluator_games_fetched_total",
        "Number of newly discovered games flattened into the season table."
    );
    describe_gauge!(
        "evaluator_last_game_code",
        "Highest game code present in the stored season table."
    );
    describe_counter!(
        "evaluator_valuation_rows_total",
        "Number of valuation rows written to the daily cost snapshot."
    );
    describe_counter!(
        "evaluator_injury_rows_total",
        "Number of rows written to the injury snapshot."
    );
    describe_counter!(
        "evaluator_api_requests_total",
        "Number of feed API requests made."
    );
    describe_histogram!(
        "evaluator_api_latency_ms",
        "Feed API request latency in milliseconds."
    );
    describe_counter!(
        "evaluator_store_errors_total",
        "Snapshot store operations that degraded to empty/no-op."
    );
}

pub fn install_prometheus(port: u16) -> Result<PrometheusHandle> {
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    Ok(PrometheusBuilder::new()
        .with_http_listener(addr)
        .install_recorder()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prometheus_handle_renders_metric_names() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();

        describe();

        metrics::with_local_recorder(&recorder, || {
            let c = metrics::counter!("evaluator_games_fetched_total");
            c.increment(1);
        });

        let rendered = handle.render();
        assert!(rendered.contains("evaluator_games_fetched_total"));
    }
}
