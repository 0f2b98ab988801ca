use prometheus::register_counter_vec;
use prometheus::CounterVec;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use lazy_static::lazy_static;

lazy_static! {
    pub static ref REQUESTS_CNTR: CounterVec = register_counter_vec!(
        "api_requests_total",
        "Number of requests handled per resource operation",
        &["resource", "operation"]
    )
    .unwrap();
}

pub fn count_request(resource: &str, operation: &str) {
    REQUESTS_CNTR
        .with_label_values(&[resource, operation])
        .inc();
}

/// Installs the global subscriber. Loads `.env` first so `LOG_LEVEL` can
/// live there like the other settings.
pub fn init_tracing() {
    dotenv::dotenv().ok();
    let mut fmt_layer = fmt::layer();
    if std::env::var("INCLUDE_SPAN_EVENTS").is_ok_and(|value| value.eq_ignore_ascii_case("true")) {
        fmt_layer = fmt_layer.with_span_events(FmtSpan::ENTER | FmtSpan::EXIT);
    }
    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt_layer)
        .init();
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env("LOG_LEVEL")
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap()
}
