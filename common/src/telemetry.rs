// Telemetry module for structured logging and metrics

use crate::config::LogFormat;
use crate::models::Table;
use anyhow::Result;
use metrics::{counter, describe_counter, describe_histogram, histogram};
use std::time::Duration;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

pub const HTTP_REQUESTS_TOTAL: &str = "http_requests_total";
pub const BULK_IMPORT_ROWS_TOTAL: &str = "bulk_import_rows_total";
pub const BULK_OPERATION_DURATION_SECONDS: &str = "bulk_operation_duration_seconds";

/// Initialize structured logging
///
/// `RUST_LOG` wins over the configured level when set. JSON output carries
/// the current span so handler and repository fields end up on every line.
#[tracing::instrument(skip_all)]
pub fn init_logging(log_level: &str, format: LogFormat) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .map_err(|e| anyhow::anyhow!("Failed to create env filter: {}", e))?;

    let layer = match format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_filter(env_filter)
            .boxed(),
        LogFormat::Pretty => fmt::layer()
            .with_target(false)
            .with_filter(env_filter)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing subscriber: {}", e))?;

    tracing::info!(log_level = log_level, format = ?format, "Structured logging initialized");
    Ok(())
}

/// Register metric descriptions with whatever recorder is installed
pub fn describe_metrics() {
    describe_counter!(HTTP_REQUESTS_TOTAL, "HTTP requests served, by method and status");
    describe_counter!(BULK_IMPORT_ROWS_TOTAL, "Rows written by bulk imports, by table");
    describe_histogram!(
        BULK_OPERATION_DURATION_SECONDS,
        "Wall time of bulk import and delete operations"
    );
}

pub fn record_http_request(method: &str, status: u16) {
    counter!(
        HTTP_REQUESTS_TOTAL,
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

pub fn record_bulk_import(table: Table, rows: u64, elapsed: Duration) {
    counter!(BULK_IMPORT_ROWS_TOTAL, "table" => table.as_str()).increment(rows);
    histogram!(
        BULK_OPERATION_DURATION_SECONDS,
        "operation" => format!("import_{}", table.as_str())
    )
    .record(elapsed.as_secs_f64());
}

pub fn record_bulk_delete(elapsed: Duration) {
    histogram!(BULK_OPERATION_DURATION_SECONDS, "operation" => "delete_all")
        .record(elapsed.as_secs_f64());
}
