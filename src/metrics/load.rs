//! Catalog file load metrics

use crate::metrics::{phase_metric, MetricDoc, MetricType, PhaseMetrics};

pub struct LoadMetrics;

impl LoadMetrics {
    pub fn record_load_success(duration_secs: f64, records: usize) {
        ::metrics::counter!(phase_metric!(counter, "load", "success")).increment(1);
        ::metrics::histogram!(phase_metric!(histogram, "load", "duration_seconds"))
            .record(duration_secs);
        ::metrics::histogram!(phase_metric!(histogram, "load", "records")).record(records as f64);
    }

    /// `kind` is the error label from `CatalogError::kind`
    pub fn record_load_error(kind: &'static str) {
        ::metrics::counter!(phase_metric!(counter, "load", "error"), "kind" => kind).increment(1);
    }
}

impl PhaseMetrics for LoadMetrics {
    fn register_metrics() {
        use metrics::{counter, histogram};

        let _ = counter!(phase_metric!(counter, "load", "success"));
        let _ = counter!(phase_metric!(counter, "load", "error"));
        let _ = histogram!(phase_metric!(histogram, "load", "duration_seconds"));
        let _ = histogram!(phase_metric!(histogram, "load", "records"));
    }

    fn phase_name() -> &'static str {
        "load"
    }

    fn metrics_documentation() -> Vec<MetricDoc> {
        vec![
            MetricDoc {
                name: phase_metric!(counter, "load", "success"),
                metric_type: MetricType::Counter,
                help: "Catalog files loaded and normalized successfully",
                labels: vec![],
            },
            MetricDoc {
                name: phase_metric!(counter, "load", "error"),
                metric_type: MetricType::Counter,
                help: "Catalog file loads that failed",
                labels: vec!["kind"],
            },
            MetricDoc {
                name: phase_metric!(histogram, "load", "duration_seconds"),
                metric_type: MetricType::Histogram,
                help: "Time spent reading and normalizing a catalog file",
                labels: vec![],
            },
            MetricDoc {
                name: phase_metric!(histogram, "load", "records"),
                metric_type: MetricType::Histogram,
                help: "Tag records returned per catalog file",
                labels: vec![],
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_metrics_recording() {
        LoadMetrics::register_metrics();
        LoadMetrics::record_load_success(0.002, 12);
        LoadMetrics::record_load_error("parse");
    }

    // The only test in this crate that installs a global recorder
    #[test]
    fn test_load_metrics_reach_prometheus_exporter() {
        let handle = metrics_exporter_prometheus::PrometheusBuilder::new()
            .install_recorder()
            .unwrap();

        LoadMetrics::record_load_success(0.01, 3);
        LoadMetrics::record_load_error("not_found");

        let rendered = handle.render();
        assert!(rendered.contains("tag_catalog_load_success_total"), "{}", rendered);
        assert!(rendered.contains("tag_catalog_load_error_total"), "{}", rendered);
        assert!(rendered.contains("kind=\"not_found\""), "{}", rendered);
    }

    #[test]
    fn test_metrics_documentation() {
        let docs = LoadMetrics::metrics_documentation();
        assert_eq!(docs.len(), 4);
        assert!(docs
            .iter()
            .all(|doc| doc.name.starts_with("tag_catalog_load_")));
        assert_eq!(docs[1].labels, vec!["kind"]);
    }
}
