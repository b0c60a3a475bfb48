//! Logging, tracing export and per-request metrics.
//!
//! Console logging is always on. Traces and logs are additionally exported
//! over OTLP when a collector is configured and reachable. Database queries
//! are counted per request through diesel's connection instrumentation.

use axum::{
    body::Body,
    extract::MatchedPath,
    http::{HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use diesel::connection::{Instrumentation, InstrumentationEvent};
use opentelemetry::trace::TracerProvider;
use opentelemetry_appender_tracing::layer::OpenTelemetryTracingBridge;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::logs::SdkLoggerProvider;
use opentelemetry_sdk::trace::SdkTracerProvider;
use std::env;
use std::net::{TcpStream, ToSocketAddrs};
use std::sync::{
    atomic::{AtomicU32, Ordering},
    Arc, LazyLock,
};
use std::time::Duration;
use tower_http::classify::{ServerErrorsAsFailures, ServerErrorsFailureClass, SharedClassifier};
use tower_http::trace::{DefaultOnBodyChunk, DefaultOnEos, TraceLayer};
use tracing::Span;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

static TRACK_DB_QUERY_COUNT: LazyLock<bool> = LazyLock::new(|| {
    env::var("TRACK_DB_QUERY_COUNT")
        .map(|v| v == "1")
        .unwrap_or(false)
});

tokio::task_local! {
    /// Queries issued by the current request. Diesel runs synchronously
    /// inside the handler's task, so the counter follows it across awaits.
    static DB_QUERY_COUNTER: Arc<AtomicU32>;
}

/// Initialize console logging, plus OTLP export of traces and logs when
/// `OTEL_EXPORTER_OTLP_ENDPOINT` points at a reachable collector.
pub fn init_telemetry() -> anyhow::Result<()> {
    let fmt_layer = tracing_subscriber::fmt::layer();
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let Some(endpoint) = env::var("OTEL_EXPORTER_OTLP_ENDPOINT").ok() else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .init();
        tracing::debug!("OTEL_EXPORTER_OTLP_ENDPOINT not set, using console logging only");
        return Ok(());
    };

    if !collector_reachable(&endpoint) {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .init();
        tracing::info!(
            "OpenTelemetry endpoint {} not reachable, using console logging only",
            endpoint
        );
        return Ok(());
    }

    let service_name =
        env::var("OTEL_SERVICE_NAME").unwrap_or_else(|_| "foodgram-server".to_string());

    let resource = opentelemetry_sdk::Resource::builder()
        .with_service_name(service_name.clone())
        .build();

    let trace_exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(&endpoint)
        .build()?;

    let trace_provider = SdkTracerProvider::builder()
        .with_batch_exporter(trace_exporter)
        .with_resource(resource.clone())
        .build();

    let tracer = trace_provider.tracer("foodgram-server");
    opentelemetry::global::set_tracer_provider(trace_provider);

    let log_exporter = opentelemetry_otlp::LogExporter::builder()
        .with_tonic()
        .with_endpoint(&endpoint)
        .build()?;

    let log_provider = SdkLoggerProvider::builder()
        .with_batch_exporter(log_exporter)
        .with_resource(resource)
        .build();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .with(tracing_opentelemetry::layer().with_tracer(tracer))
        .with(OpenTelemetryTracingBridge::new(&log_provider))
        .init();

    tracing::info!(
        "OpenTelemetry enabled, exporting traces and logs to {} as {}",
        endpoint,
        service_name
    );
    Ok(())
}

// Quick TCP check so a missing collector doesn't stall every export.
fn collector_reachable(endpoint: &str) -> bool {
    let host_port = endpoint
        .trim_start_matches("http://")
        .trim_start_matches("https://");

    host_port
        .to_socket_addrs()
        .ok()
        .and_then(|mut addrs| addrs.next())
        .map(|addr| TcpStream::connect_timeout(&addr, Duration::from_millis(100)).is_ok())
        .unwrap_or(false)
}

/// Request spans named after the matched route, with status and latency
/// logged on completion.
pub fn http_trace_layer() -> TraceLayer<
    SharedClassifier<ServerErrorsAsFailures>,
    impl Fn(&Request<Body>) -> Span + Clone,
    impl Fn(&Request<Body>, &Span) + Clone,
    impl Fn(&Response, Duration, &Span) + Clone,
    DefaultOnBodyChunk,
    DefaultOnEos,
    impl Fn(ServerErrorsFailureClass, Duration, &Span) + Clone,
> {
    TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            let path = request
                .extensions()
                .get::<MatchedPath>()
                .map(MatchedPath::as_str)
                .unwrap_or(request.uri().path());

            tracing::info_span!("http_request", method = %request.method(), path = %path)
        })
        .on_request(|_request: &Request<Body>, _span: &Span| {})
        .on_response(|response: &Response, latency: Duration, _span: &Span| {
            let status = response.status().as_u16();
            if status >= 500 {
                tracing::error!(
                    status = %status,
                    latency_ms = %latency.as_millis(),
                    "request failed with server error"
                );
            } else {
                tracing::info!(
                    status = %status,
                    latency_ms = %latency.as_millis(),
                    "request completed"
                );
            }
        })
        .on_failure(
            |error: ServerErrorsFailureClass, latency: Duration, _span: &Span| {
                tracing::error!(
                    error = %error,
                    latency_ms = %latency.as_millis(),
                    "request failed"
                );
            },
        )
}

/// Diesel instrumentation that logs each query at trace level and bumps the
/// current request's counter.
pub struct QueryCounter;

impl Instrumentation for QueryCounter {
    fn on_connection_event(&mut self, event: InstrumentationEvent<'_>) {
        if let InstrumentationEvent::StartQuery { query, .. } = event {
            tracing::trace!(query = %query, "db.query");
            let _ = DB_QUERY_COUNTER.try_with(|counter| {
                counter.fetch_add(1, Ordering::Relaxed);
            });
        }
    }
}

/// Attach [`QueryCounter`] to every connection established from now on.
/// Must run before the pool opens its first connection.
pub fn install_query_counter() -> anyhow::Result<()> {
    diesel::connection::set_default_instrumentation(query_counter)
        .map_err(|e| anyhow::anyhow!("Failed to install query instrumentation: {}", e))
}

fn query_counter() -> Option<Box<dyn Instrumentation>> {
    Some(Box::new(QueryCounter))
}

/// Current request's query count, if called inside a counted request.
pub fn get_query_count() -> Option<u32> {
    DB_QUERY_COUNTER
        .try_with(|counter| counter.load(Ordering::Relaxed))
        .ok()
}

/// Scope a fresh query counter around the rest of the request.
pub async fn query_counting_middleware(request: Request<Body>, next: Next) -> Response {
    let counter = Arc::new(AtomicU32::new(0));
    DB_QUERY_COUNTER.scope(counter, next.run(request)).await
}

/// Adds `X-DB-Query-Count` to responses when `TRACK_DB_QUERY_COUNT=1`.
pub async fn db_query_count_header_middleware(request: Request<Body>, next: Next) -> Response {
    let mut response = next.run(request).await;

    if *TRACK_DB_QUERY_COUNT {
        if let Some(count) = get_query_count() {
            if let Ok(value) = HeaderValue::from_str(&count.to_string()) {
                response.headers_mut().insert("X-DB-Query-Count", value);
            }
        }
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_query_count_scoped_per_task() {
        assert_eq!(get_query_count(), None);

        let counter = Arc::new(AtomicU32::new(0));
        let count = DB_QUERY_COUNTER
            .scope(counter.clone(), async {
                counter.fetch_add(3, Ordering::Relaxed);
                get_query_count()
            })
            .await;

        assert_eq!(count, Some(3));
        assert_eq!(get_query_count(), None);
    }
}
