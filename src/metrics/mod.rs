//! Metrics for the tag catalog
//!
//! Each phase (scanning the catalog tree, loading a catalog file) defines its
//! metrics in a dedicated submodule. Recording goes through the `metrics`
//! facade, so the calls are no-ops until [`init_metrics`] installs the
//! Prometheus recorder.

pub mod load;
pub mod registry;
pub mod scan;

pub use load::LoadMetrics;
pub use scan::ScanMetrics;

use std::net::SocketAddr;
use std::sync::Once;
use tracing::{info, warn};

static INIT: Once = Once::new();

/// Install the Prometheus recorder and its HTTP exporter on `addr`.
///
/// Idempotent. Must be called from within the tokio runtime so the exporter
/// can be spawned on it.
pub fn init_metrics(addr: SocketAddr) {
    INIT.call_once(|| {
        let builder = metrics_exporter_prometheus::PrometheusBuilder::new().with_http_listener(addr);

        match builder.install() {
            Ok(()) => {
                info!("Prometheus HTTP exporter started at http://{}/metrics", addr);
                registry::register_all_metrics();
            }
            Err(e) => {
                warn!("Failed to install Prometheus recorder: {}", e);
            }
        }
    });
}

/// Trait for phase-specific metrics collections
pub trait PhaseMetrics {
    /// Pre-register every metric so it shows up before first use
    fn register_metrics();

    fn phase_name() -> &'static str;

    fn metrics_documentation() -> Vec<MetricDoc>;
}

/// Documentation for a single metric
#[derive(Debug, Clone)]
pub struct MetricDoc {
    pub name: &'static str,
    pub metric_type: MetricType,
    pub help: &'static str,
    pub labels: Vec<&'static str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricType {
    Counter,
    Histogram,
    Gauge,
}

/// Build a metric name following `tag_catalog_{phase}_{name}[_total]`
macro_rules! phase_metric {
    (counter, $phase:literal, $name:literal) => {
        concat!("tag_catalog_", $phase, "_", $name, "_total")
    };
    (histogram, $phase:literal, $name:literal) => {
        concat!("tag_catalog_", $phase, "_", $name)
    };
    (gauge, $phase:literal, $name:literal) => {
        concat!("tag_catalog_", $phase, "_", $name)
    };
}

pub(crate) use phase_metric;
