//! Catalog scan metrics
//!
//! Recorded once per tree build: how many catalog files were found and how
//! many directories could not be listed.

use crate::metrics::{phase_metric, MetricDoc, MetricType, PhaseMetrics};

pub struct ScanMetrics;

impl ScanMetrics {
    pub fn record_scan(files: usize, warnings: usize) {
        ::metrics::counter!(phase_metric!(counter, "scan", "runs")).increment(1);
        ::metrics::counter!(phase_metric!(counter, "scan", "warnings")).increment(warnings as u64);
        ::metrics::gauge!(phase_metric!(gauge, "scan", "files")).set(files as f64);
    }
}

impl PhaseMetrics for ScanMetrics {
    fn register_metrics() {
        use metrics::{counter, gauge};

        let _ = counter!(phase_metric!(counter, "scan", "runs"));
        let _ = counter!(phase_metric!(counter, "scan", "warnings"));
        let _ = gauge!(phase_metric!(gauge, "scan", "files"));
    }

    fn phase_name() -> &'static str {
        "scan"
    }

    fn metrics_documentation() -> Vec<MetricDoc> {
        vec![
            MetricDoc {
                name: phase_metric!(counter, "scan", "runs"),
                metric_type: MetricType::Counter,
                help: "Total number of catalog tree scans",
                labels: vec![],
            },
            MetricDoc {
                name: phase_metric!(counter, "scan", "warnings"),
                metric_type: MetricType::Counter,
                help: "Directories that could not be listed during a scan",
                labels: vec![],
            },
            MetricDoc {
                name: phase_metric!(gauge, "scan", "files"),
                metric_type: MetricType::Gauge,
                help: "Catalog files found by the most recent scan",
                labels: vec![],
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_metrics_registration() {
        ScanMetrics::register_metrics();
        ScanMetrics::record_scan(3, 1);
    }

    #[test]
    fn test_metrics_documentation() {
        let docs = ScanMetrics::metrics_documentation();
        assert_eq!(docs.len(), 3);
        for doc in docs {
            assert!(doc.name.starts_with("tag_catalog_scan_"));
        }
    }
}
