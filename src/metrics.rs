use std::net::SocketAddr;
use tracing::{info, warn};

pub const METRICS_PORT_ENV: &str = "SITE_EDITOR_METRICS_PORT";
const DEFAULT_METRICS_PORT: u16 = 9898;

/// Every counter the service records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricName {
    FtpReadSuccess,
    FtpReadError,
    FtpWriteSuccess,
    FtpWriteError,
    FtpListSuccess,
    FtpListError,
    FragmentsRegenerated,
}

impl MetricName {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::FtpReadSuccess => "site_editor_ftp_reads_success_total",
            MetricName::FtpReadError => "site_editor_ftp_reads_error_total",
            MetricName::FtpWriteSuccess => "site_editor_ftp_writes_success_total",
            MetricName::FtpWriteError => "site_editor_ftp_writes_error_total",
            MetricName::FtpListSuccess => "site_editor_ftp_lists_success_total",
            MetricName::FtpListError => "site_editor_ftp_lists_error_total",
            MetricName::FragmentsRegenerated => "site_editor_fragments_regenerated_total",
        }
    }
}

pub fn increment(name: MetricName) {
    ::metrics::counter!(name.as_str()).increment(1);
}

/// Count a regeneration of the `fragment` region ("events" or "schedule").
pub fn record_regeneration(fragment: &'static str) {
    ::metrics::counter!(MetricName::FragmentsRegenerated.as_str(), "fragment" => fragment).increment(1);
}

pub fn init_metrics() {
    let port: u16 = std::env::var(METRICS_PORT_ENV)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_METRICS_PORT);
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    let builder = metrics_exporter_prometheus::PrometheusBuilder::new().with_http_listener(addr);
    match builder.install() {
        Ok(()) => info!("Prometheus exporter listening on http://{}/metrics", addr),
        Err(e) => warn!("Prometheus exporter install failed (possibly already installed): {}", e),
    }
}
