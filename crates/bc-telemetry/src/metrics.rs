//! Prometheus metrics for chaincode invocations.
//!
//! All metrics follow the naming convention: `bc_<area>_<metric>_<unit>`

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, CounterVec, Encoder, Histogram, HistogramOpts, Opts, Registry,
    TextEncoder,
};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // INVOCATION METRICS
    // =========================================================================

    /// Invocations by action and response status
    pub static ref INVOCATIONS_TOTAL: CounterVec = CounterVec::new(
        Opts::new("bc_chaincode_invocations_total", "Total chaincode invocations"),
        &["action", "status"]
    ).expect("metric creation failed");

    /// Failed invocations by action and error code
    pub static ref INVOCATION_FAILURES: CounterVec = CounterVec::new(
        Opts::new("bc_chaincode_invocation_failures_total", "Failed invocations by error code"),
        &["action", "code"]
    ).expect("metric creation failed");

    /// Time spent per invocation, proposal begin to commit or rollback
    pub static ref INVOCATION_DURATION: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "bc_chaincode_invocation_duration_seconds",
            "Time spent executing an invocation"
        ).buckets(exponential_buckets(0.00001, 2.0, 16).expect("valid buckets"))
    ).expect("metric creation failed");
}

/// Register all metrics with the global registry.
///
/// Registering twice is a no-op.
pub fn register_metrics() -> Result<(), TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(INVOCATIONS_TOTAL.clone()),
        Box::new(INVOCATION_FAILURES.clone()),
        Box::new(INVOCATION_DURATION.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }
    Ok(())
}

/// Record one invocation outcome.
///
/// `code` is the error code of a failed invocation. Latency is observed
/// separately through a [`HistogramTimer`] on [`INVOCATION_DURATION`].
pub fn record_invocation(action: &str, status: u16, code: Option<&str>) {
    crate::metric_inc!(INVOCATIONS_TOTAL, &[action, &status.to_string()]);
    if let Some(code) = code {
        crate::metric_inc!(INVOCATION_FAILURES, &[action, code]);
    }
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

/// Timer guard for automatic histogram observation.
pub struct HistogramTimer {
    histogram: Histogram,
    start: std::time::Instant,
}

impl HistogramTimer {
    /// Start a new timer for the given histogram.
    pub fn new(histogram: &Histogram) -> Self {
        Self {
            histogram: histogram.clone(),
            start: std::time::Instant::now(),
        }
    }

    /// Seconds since the timer started.
    pub fn elapsed_secs(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}

impl Drop for HistogramTimer {
    fn drop(&mut self) {
        self.histogram.observe(self.elapsed_secs());
    }
}
