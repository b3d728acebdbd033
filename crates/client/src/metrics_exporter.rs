//! Prometheus metrics exporter.
//!
//! Serves everything recorded through [`crate::metrics::MetricsCollector`] in
//! Prometheus text format at `http://{bind_addr}/metrics`.
//!
//! # Example
//!
//! ```rust,ignore
//! use sumo_client::metrics_exporter::MetricsExporter;
//!
//! // Must run inside a tokio runtime; the listener is a background task.
//! let exporter = MetricsExporter::install("127.0.0.1:9090")?;
//! ```

use std::net::SocketAddr;

use metrics_exporter_prometheus::{Matcher, PrometheusBuilder};
use tracing::info;

use crate::metrics::{METRIC_RECORDS_FETCHED, METRIC_REQUEST_DURATION};

/// Installed Prometheus exporter.
pub struct MetricsExporter {
    bind_addr: SocketAddr,
}

impl MetricsExporter {
    /// Install the Prometheus recorder globally and start its HTTP listener.
    ///
    /// # Errors
    /// - The bind address does not parse
    /// - A global recorder is already installed, or the listener cannot start
    pub fn install(bind_addr: &str) -> Result<Self, MetricsExporterError> {
        let addr: SocketAddr = bind_addr
            .parse()
            .map_err(|e| MetricsExporterError::InvalidBindAddress(bind_addr.to_string(), e))?;

        PrometheusBuilder::new()
            .set_buckets_for_metric(
                Matcher::Full(METRIC_REQUEST_DURATION.to_string()),
                &[
                    0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0,
                ],
            )?
            .set_buckets_for_metric(
                Matcher::Full(METRIC_RECORDS_FETCHED.to_string()),
                &[0.0, 1.0, 10.0, 100.0, 1_000.0, 5_000.0, 10_000.0],
            )?
            .with_http_listener(addr)
            .install()?;

        info!(
            "Prometheus metrics exporter started on http://{}/metrics",
            addr
        );

        Ok(Self { bind_addr: addr })
    }

    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}

/// Errors that can occur when installing the metrics exporter.
#[derive(Debug, thiserror::Error)]
pub enum MetricsExporterError {
    #[error("Invalid bind address '{0}': {1}")]
    InvalidBindAddress(String, std::net::AddrParseError),

    /// Recorder build, global install or listener start failed.
    #[error("Failed to install Prometheus exporter: {0}")]
    BuildError(String),
}

impl From<metrics_exporter_prometheus::BuildError> for MetricsExporterError {
    fn from(err: metrics_exporter_prometheus::BuildError) -> Self {
        MetricsExporterError::BuildError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_bind_address() {
        let result = MetricsExporter::install("not-a-valid-addr");
        assert!(matches!(
            result,
            Err(MetricsExporterError::InvalidBindAddress(_, _))
        ));
    }

    #[test]
    fn test_error_display() {
        let parse_error = "invalid".parse::<SocketAddr>().unwrap_err();
        let error = MetricsExporterError::InvalidBindAddress("test".to_string(), parse_error);
        let error_string = error.to_string();
        assert!(error_string.contains("Invalid bind address"));
        assert!(error_string.contains("test"));
    }
}
