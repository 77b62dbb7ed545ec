//! Tracing and OpenTelemetry setup for socialctl
//!
//! Usage:
//!   socialctl --debug ...               # Debug logging
//!   socialctl --otel ...                # Export traces to OTLP (telemetry feature)
//!   RUST_LOG=socialctl_db=debug socialctl
//!
//! Environment variables:
//!   RUST_LOG                            # Log filter (default: info)
//!   OTEL_EXPORTER_OTLP_ENDPOINT         # OTLP endpoint (default: http://localhost:4317)
//!   OTEL_SERVICE_NAME                   # Service name (default: socialctl)
//!
//! Logs go to stderr so they do not interleave with menu output on stdout.

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Default)]
pub struct TracingConfig {
    /// Debug level unless RUST_LOG is set
    pub debug: bool,
    /// Enable OpenTelemetry OTLP export
    pub otel: bool,
    /// Level from the config file, used when neither RUST_LOG nor --debug is set
    pub level: Option<String>,
}

impl TracingConfig {
    fn default_level(&self) -> &str {
        if self.debug {
            "debug"
        } else {
            self.level.as_deref().unwrap_or("info")
        }
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.default_level()))
    }
}

/// Console-only tracing
pub fn init_tracing(config: &TracingConfig) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(config.filter())
        .with_target(config.debug)
        .with_writer(std::io::stderr)
        .compact()
        .try_init()
        .map_err(|err| anyhow!(err))
}

/// Console tracing plus OTLP span export
#[cfg(feature = "telemetry")]
pub fn init_tracing_with_otel(config: &TracingConfig) -> Result<()> {
    use opentelemetry::trace::TracerProvider as _;
    use opentelemetry::KeyValue;
    use opentelemetry_otlp::WithExportConfig;
    use opentelemetry_sdk::trace::TracerProvider;
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let endpoint = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
        .unwrap_or_else(|_| "http://localhost:4317".to_string());
    let service_name =
        std::env::var("OTEL_SERVICE_NAME").unwrap_or_else(|_| "socialctl".to_string());

    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(&endpoint)
        .build()
        .map_err(|e| anyhow!("Failed to create OTLP exporter: {}", e))?;

    let provider = TracerProvider::builder()
        .with_batch_exporter(exporter, opentelemetry_sdk::runtime::Tokio)
        .with_resource(opentelemetry_sdk::Resource::new(vec![KeyValue::new(
            "service.name",
            service_name.clone(),
        )]))
        .build();

    let tracer = provider.tracer("socialctl");
    // Provider must outlive the subscriber or export stops
    let _ = opentelemetry::global::set_tracer_provider(provider);

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(config.debug)
        .with_writer(std::io::stderr)
        .compact();

    tracing_subscriber::registry()
        .with(config.filter())
        .with(fmt_layer)
        .with(tracing_opentelemetry::layer().with_tracer(tracer))
        .try_init()
        .map_err(|err| anyhow!(err))?;

    tracing::info!(endpoint = %endpoint, service = %service_name, "OpenTelemetry tracing initialized");
    Ok(())
}

/// Flush pending spans
#[cfg(feature = "telemetry")]
pub fn shutdown_otel() {
    opentelemetry::global::shutdown_tracer_provider();
}

#[cfg(not(feature = "telemetry"))]
pub fn shutdown_otel() {}

/// Pick console-only or OTLP export from `config.otel`.
pub fn init(config: &TracingConfig) -> Result<()> {
    #[cfg(feature = "telemetry")]
    if config.otel {
        return init_tracing_with_otel(config);
    }

    #[cfg(not(feature = "telemetry"))]
    if config.otel {
        eprintln!("--otel ignored: socialctl was built without the `telemetry` feature");
    }

    init_tracing(config)
}
