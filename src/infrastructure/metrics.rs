// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::MetricsSettings;
use metrics::describe_counter;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use tracing::info;

pub fn init_metrics(settings: &MetricsSettings) {
    if !settings.enabled {
        info!("Metrics exporter disabled");
        return;
    }

    let addr: SocketAddr = match settings.addr.parse() {
        Ok(addr) => addr,
        Err(e) => {
            tracing::warn!("Invalid metrics address '{}': {}", settings.addr, e);
            return;
        }
    };

    let builder = PrometheusBuilder::new();

    // Start the exporter
    // Ignore error if address is already in use (for development/testing)
    if let Err(e) = builder.with_http_listener(addr).install() {
        tracing::warn!("Failed to install Prometheus recorder: {}. This might happen if the port is already in use.", e);
    }

    describe_counter!("scrape_requests_total", "Total full-page scrape requests");
    describe_counter!("scrape_failures_total", "Failed full-page scrape requests");
    describe_counter!("selector_requests_total", "Total selector extraction requests");
    describe_counter!(
        "selector_failures_total",
        "Failed selector extraction requests"
    );
    describe_counter!(
        "session_scrape_requests_total",
        "Total cookie-authenticated scrape requests"
    );
    describe_counter!(
        "session_scrape_failures_total",
        "Failed cookie-authenticated scrape requests"
    );
    describe_counter!("picker_sessions_total", "Total mouse-mode picker sessions");
    describe_counter!("picker_failures_total", "Failed mouse-mode picker sessions");

    info!("Metrics exporter listening on {}", addr);
}
