//! Tracing subscriber and optional OpenTelemetry export.

use opentelemetry::global;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{propagation::TraceContextPropagator, trace as sdktrace};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "info,micropay_app=debug,micropay_hex=debug";

/// Keeps the tracer provider alive until shutdown.
pub struct Telemetry {
    provider: Option<sdktrace::SdkTracerProvider>,
}

impl Telemetry {
    /// Flushes pending spans.
    pub fn shutdown(self) {
        if let Some(provider) = self.provider {
            if let Err(e) = provider.shutdown() {
                tracing::warn!("failed to flush traces: {}", e);
            }
        }
    }
}

fn init_tracer(
    service_name: &'static str,
    endpoint: &str,
) -> anyhow::Result<(sdktrace::Tracer, sdktrace::SdkTracerProvider)> {
    global::set_text_map_propagator(TraceContextPropagator::new());

    // Use gRPC exporter with batch processing (non-blocking)
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .build()?;

    let provider = sdktrace::SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .build();

    global::set_tracer_provider(provider.clone());

    Ok((provider.tracer(service_name), provider))
}

/// Installs the global subscriber.
///
/// Spans are exported over OTLP only when `otlp_endpoint` is set.
pub fn init(service_name: &'static str, otlp_endpoint: Option<&str>) -> anyhow::Result<Telemetry> {
    let (otel_layer, provider) = match otlp_endpoint {
        Some(endpoint) => {
            let (tracer, provider) = init_tracer(service_name, endpoint)?;
            (
                Some(tracing_opentelemetry::layer().with_tracer(tracer)),
                Some(provider),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into()))
        .with(tracing_subscriber::fmt::layer())
        .with(otel_layer)
        .init();

    Ok(Telemetry { provider })
}
