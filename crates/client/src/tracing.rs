//! Logging and OpenTelemetry tracing initialization.
//!
//! Responsibilities:
//! - Install the global `tracing` subscriber (text or JSON lines on stderr).
//! - Optionally export spans over OTLP when an endpoint is configured.
//! - Propagate W3C trace context onto outgoing Sumo Logic requests.
//!
//! Does NOT handle:
//! - Metrics (see `metrics` and `metrics_exporter`).
//!
//! Invariants:
//! - Log output never goes to stdout; stdout is reserved for command results.
//! - `RUST_LOG` overrides the configured default filter.
//!
//! # Usage
//!
//! ```rust,ignore
//! use sumo_client::tracing::{LogFormat, TracingConfig};
//!
//! let guard = TracingConfig::new()
//!     .with_otlp_endpoint("http://localhost:4317")
//!     .with_log_format(LogFormat::Json)
//!     .init()?;
//! // Run application...
//! guard.shutdown();
//! ```

use opentelemetry::trace::TracerProvider;
use opentelemetry_sdk::trace::SdkTracerProvider;
use opentelemetry_semantic_conventions::resource::{SERVICE_NAME, SERVICE_VERSION};
use std::time::Duration;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable holding the OTLP collector endpoint.
pub const OTLP_ENDPOINT_ENV: &str = "SUMOLOGIC_OTLP_ENDPOINT";

/// Log line encoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Configuration for logging and OpenTelemetry tracing.
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// OTLP endpoint (e.g., "http://localhost:4317" for Jaeger/Tempo)
    pub otlp_endpoint: Option<String>,
    pub service_name: String,
    pub service_version: String,
    pub log_format: LogFormat,
    /// Filter directive used when `RUST_LOG` is unset.
    pub default_filter: String,
    /// Batch span export timeout
    pub timeout: Duration,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            otlp_endpoint: std::env::var(OTLP_ENDPOINT_ENV)
                .ok()
                .filter(|v| !v.trim().is_empty()),
            service_name: "sumo-cli".to_string(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            log_format: LogFormat::Text,
            default_filter: "warn".to_string(),
            timeout: Duration::from_secs(5),
        }
    }
}

impl TracingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_otlp_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.otlp_endpoint = Some(endpoint.into());
        self
    }

    pub fn with_service_name(mut self, name: impl Into<String>) -> Self {
        self.service_name = name.into();
        self
    }

    pub fn with_log_format(mut self, format: LogFormat) -> Self {
        self.log_format = format;
        self
    }

    pub fn with_default_filter(mut self, filter: impl Into<String>) -> Self {
        self.default_filter = filter.into();
        self
    }

    /// Install the global subscriber.
    ///
    /// # Returns
    /// A guard that must be held until shutdown so pending spans are flushed.
    ///
    /// # Errors
    /// Returns an error if the OTLP pipeline fails to initialize or a global
    /// subscriber is already set.
    pub fn init(&self) -> Result<TracingGuard, TracingError> {
        use tracing_subscriber::fmt;

        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&self.default_filter));

        let fmt_layer = match self.log_format {
            LogFormat::Text => fmt::layer().with_writer(std::io::stderr).boxed(),
            LogFormat::Json => fmt::layer()
                .json()
                .with_current_span(true)
                .with_writer(std::io::stderr)
                .boxed(),
        };

        let provider = match self.otlp_endpoint.as_deref() {
            Some(endpoint) => Some(self.create_tracer_provider(endpoint)?),
            None => None,
        };

        let otel_layer = provider.as_ref().map(|provider| {
            tracing_opentelemetry::layer().with_tracer(provider.tracer("sumo-client"))
        });

        tracing_subscriber::registry()
            .with(fmt_layer)
            .with(env_filter)
            .with(otel_layer)
            .try_init()
            .map_err(|e| TracingError::InitError(e.to_string()))?;

        Ok(TracingGuard { provider })
    }

    fn create_tracer_provider(&self, endpoint: &str) -> Result<SdkTracerProvider, TracingError> {
        use opentelemetry_otlp::{Protocol, WithExportConfig};
        use opentelemetry_sdk::trace::{BatchConfig, BatchSpanProcessor, Sampler};

        let otlp_exporter = opentelemetry_otlp::SpanExporter::builder()
            .with_tonic()
            .with_endpoint(endpoint)
            .with_timeout(self.timeout)
            .with_protocol(Protocol::Grpc)
            .build()
            .map_err(|e| TracingError::InitError(e.to_string()))?;

        let batch_processor = BatchSpanProcessor::builder(otlp_exporter)
            .with_batch_config(BatchConfig::default())
            .build();

        let resource = opentelemetry_sdk::Resource::builder()
            .with_attributes(vec![
                opentelemetry::KeyValue::new(SERVICE_NAME, self.service_name.clone()),
                opentelemetry::KeyValue::new(SERVICE_VERSION, self.service_version.clone()),
            ])
            .build();

        Ok(SdkTracerProvider::builder()
            .with_span_processor(batch_processor)
            .with_resource(resource)
            .with_sampler(Sampler::ParentBased(Box::new(Sampler::AlwaysOn)))
            .build())
    }
}

/// Holds the tracer provider until application shutdown.
pub struct TracingGuard {
    provider: Option<SdkTracerProvider>,
}

impl TracingGuard {
    /// Flush pending spans and stop the exporter.
    pub fn shutdown(&self) {
        if let Some(ref provider) = self.provider
            && let Err(e) = provider.shutdown()
        {
            eprintln!("Failed to flush traces: {e}");
        }
    }
}

/// Errors that can occur during tracing initialization.
#[derive(Debug, thiserror::Error)]
pub enum TracingError {
    #[error("Failed to initialize tracing: {0}")]
    InitError(String),
}

/// Inject the current span context into request headers (W3C `traceparent`).
pub fn inject_trace_context(builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
    use opentelemetry::propagation::TextMapPropagator;
    use opentelemetry_sdk::propagation::TraceContextPropagator;
    use std::collections::HashMap;
    use tracing_opentelemetry::OpenTelemetrySpanExt;

    let mut headers = HashMap::new();
    let context = tracing::Span::current().context();
    TraceContextPropagator::new().inject_context(&context, &mut headers);

    headers
        .into_iter()
        .fold(builder, |builder, (key, value)| builder.header(key, value))
}
