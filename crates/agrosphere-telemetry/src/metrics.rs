//! Metric names and recording helpers
//!
//! Instruments are created from the global meter, which is a no-op until
//! [`crate::init`] installs an exporting provider.

use std::time::Duration;

use opentelemetry::KeyValue;
use opentelemetry::global;
use opentelemetry::metrics::{Histogram, Meter};

/// Instrumentation scope for every gateway instrument
pub const METER_NAME: &str = "agrosphere";

/// Resolved requests, by `status` and `origin`
pub const INFERENCE_REQUEST_COUNT: &str = "agrosphere.inference.request.count";
/// Provider call latency in seconds, by `provider` and `outcome`
pub const INFERENCE_PROVIDER_DURATION: &str = "agrosphere.inference.provider.duration";
/// Offline fallbacks, by the `family` the request was routed to
pub const INFERENCE_OFFLINE_COUNT: &str = "agrosphere.inference.offline.count";

/// Meter for gateway instruments
pub fn meter() -> Meter {
    global::meter(METER_NAME)
}

/// Record a duration in seconds on a histogram
pub fn record_duration(histogram: &Histogram<f64>, elapsed: Duration, attributes: &[KeyValue]) {
    histogram.record(elapsed.as_secs_f64(), attributes);
}
