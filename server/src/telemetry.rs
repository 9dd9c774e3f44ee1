//! Logging setup and per-request database query counting.

use anyhow::Context as _;
use axum::{body::Body, http::Request, middleware::Next, response::Response};
use opentelemetry::trace::TracerProvider;
use opentelemetry_appender_tracing::layer::OpenTelemetryTracingBridge;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::logs::SdkLoggerProvider;
use opentelemetry_sdk::trace::SdkTracerProvider;
use std::env;
use std::net::{TcpStream, ToSocketAddrs};
use std::sync::{
    atomic::{AtomicU32, Ordering},
    Arc,
};
use std::time::Duration;
use tracing::{span::Id, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

const DEFAULT_SERVICE_NAME: &str = "thali-server";

/// Quick TCP check that the collector is up, resolving the hostname first.
fn collector_reachable(endpoint: &str) -> bool {
    let host_port = endpoint
        .trim_start_matches("http://")
        .trim_start_matches("https://")
        .trim_end_matches('/');

    host_port
        .to_socket_addrs()
        .ok()
        .and_then(|mut addrs| addrs.next())
        .map(|addr| TcpStream::connect_timeout(&addr, Duration::from_millis(100)).is_ok())
        .unwrap_or(false)
}

fn log_filter() -> EnvFilter {
    EnvFilter::from_default_env()
}

/// Console output, filtered by `RUST_LOG`.
///
/// The filter is per-layer so [`DbQueryCountingLayer`] still sees debug-level
/// `db.query` spans when console logging is quieter.
fn console_layer<S>(filter: EnvFilter) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    tracing_subscriber::fmt::layer().with_filter(filter)
}

/// Initialize logging with optional OpenTelemetry export.
///
/// If `OTEL_EXPORTER_OTLP_ENDPOINT` is set and reachable, traces and logs are
/// sent to the collector. Otherwise only console logging is used.
pub fn init_telemetry() -> anyhow::Result<()> {
    let Some(endpoint) = env::var("OTEL_EXPORTER_OTLP_ENDPOINT").ok() else {
        tracing_subscriber::registry()
            .with(console_layer(log_filter()))
            .with(DbQueryCountingLayer)
            .init();

        tracing::debug!("OTEL_EXPORTER_OTLP_ENDPOINT not set, using console logging only");
        return Ok(());
    };

    if !collector_reachable(&endpoint) {
        tracing_subscriber::registry()
            .with(console_layer(log_filter()))
            .with(DbQueryCountingLayer)
            .init();

        tracing::info!(
            "OpenTelemetry endpoint {} not reachable, using console logging only",
            endpoint
        );
        return Ok(());
    }

    let service_name =
        env::var("OTEL_SERVICE_NAME").unwrap_or_else(|_| DEFAULT_SERVICE_NAME.to_string());

    let resource = opentelemetry_sdk::Resource::builder()
        .with_service_name(service_name.clone())
        .build();

    let trace_exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(&endpoint)
        .build()
        .context("Failed to create OTLP trace exporter")?;

    let trace_provider = SdkTracerProvider::builder()
        .with_batch_exporter(trace_exporter)
        .with_resource(resource.clone())
        .build();

    let tracer = trace_provider.tracer(DEFAULT_SERVICE_NAME);
    opentelemetry::global::set_tracer_provider(trace_provider);

    let otel_trace_layer = tracing_opentelemetry::layer().with_tracer(tracer);

    let log_exporter = opentelemetry_otlp::LogExporter::builder()
        .with_tonic()
        .with_endpoint(&endpoint)
        .build()
        .context("Failed to create OTLP log exporter")?;

    let log_provider = SdkLoggerProvider::builder()
        .with_batch_exporter(log_exporter)
        .with_resource(resource)
        .build();

    let otel_log_layer = OpenTelemetryTracingBridge::new(&log_provider);

    tracing_subscriber::registry()
        .with(console_layer(log_filter()))
        .with(DbQueryCountingLayer)
        .with(otel_trace_layer.with_filter(log_filter()))
        .with(otel_log_layer.with_filter(log_filter()))
        .init();

    tracing::info!(
        "OpenTelemetry enabled, exporting traces and logs to {} as {}",
        endpoint,
        service_name
    );
    Ok(())
}

tokio::task_local! {
    /// Database queries issued by the current request.
    static DB_QUERY_COUNTER: Arc<AtomicU32>;
}

/// The database query count for this request, if a counter is in scope.
pub fn get_query_count() -> Option<u32> {
    DB_QUERY_COUNTER
        .try_with(|counter| counter.load(Ordering::Relaxed))
        .ok()
}

/// Counts `db.query` spans against the task-local counter of the request
/// that opened them.
///
/// Catalog calls run synchronously inside the handler's task, so the
/// task-local is still in scope when their spans are created.
pub struct DbQueryCountingLayer;

impl<S> Layer<S> for DbQueryCountingLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(&self, _attrs: &tracing::span::Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else {
            return;
        };

        if span.name() == "db.query" {
            let _ = DB_QUERY_COUNTER.try_with(|counter| {
                counter.fetch_add(1, Ordering::Relaxed);
            });
        }
    }
}

/// Scope a fresh query counter around the rest of the request.
///
/// Must be layered outside [`db_query_count_header_middleware`].
pub async fn query_counting_middleware(request: Request<Body>, next: Next) -> Response {
    let counter = Arc::new(AtomicU32::new(0));
    DB_QUERY_COUNTER.scope(counter, next.run(request)).await
}

/// Report the request's query count in an `X-DB-Query-Count` header.
pub async fn db_query_count_header_middleware(request: Request<Body>, next: Next) -> Response {
    let mut response = next.run(request).await;

    if let Some(count) = get_query_count() {
        if let Ok(value) = axum::http::header::HeaderValue::from_str(&count.to_string()) {
            response.headers_mut().insert("X-DB-Query-Count", value);
        }
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::get;
    use axum::{middleware, Router};
    use tower::ServiceExt;

    async fn two_queries() -> &'static str {
        let first = tracing::debug_span!("db.query", operation = "list").entered();
        drop(first);
        let _second = tracing::debug_span!("db.query", operation = "get").entered();
        let _other = tracing::debug_span!("render").entered();
        "ok"
    }

    #[tokio::test]
    async fn test_query_count_header() {
        let _guard = tracing_subscriber::registry()
            .with(DbQueryCountingLayer)
            .set_default();

        let app = Router::new()
            .route("/", get(two_queries))
            .layer(middleware::from_fn(db_query_count_header_middleware))
            .layer(middleware::from_fn(query_counting_middleware));

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.headers()["X-DB-Query-Count"], "2");
    }

    #[tokio::test]
    async fn test_query_count_ignores_console_log_level() {
        let _guard = tracing_subscriber::registry()
            .with(console_layer(EnvFilter::new("error")))
            .with(DbQueryCountingLayer)
            .set_default();

        let app = Router::new()
            .route("/", get(two_queries))
            .layer(middleware::from_fn(db_query_count_header_middleware))
            .layer(middleware::from_fn(query_counting_middleware));

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.headers()["X-DB-Query-Count"], "2");
    }

    #[test]
    fn test_unparseable_collector_is_unreachable() {
        assert!(!collector_reachable("not a host"));
    }

    #[test]
    fn test_counter_absent_outside_request() {
        assert_eq!(get_query_count(), None);
    }
}
