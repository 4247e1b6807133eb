//! Registers every phase's metrics and detects naming conflicts early.

use crate::metrics::{LoadMetrics, MetricDoc, PhaseMetrics, ScanMetrics};
use std::collections::HashMap;
use tracing::{debug, info, warn};

pub fn register_all_metrics() {
    let mut all_metrics = HashMap::new();

    register_phase_metrics::<ScanMetrics>(&mut all_metrics);
    register_phase_metrics::<LoadMetrics>(&mut all_metrics);

    info!(
        "Registered {} total metrics across all phases",
        all_metrics.len()
    );
}

fn register_phase_metrics<T: PhaseMetrics>(all_metrics: &mut HashMap<&'static str, MetricDoc>) {
    T::register_metrics();
    let phase_name = T::phase_name();

    for doc in T::metrics_documentation() {
        if all_metrics.contains_key(doc.name) {
            warn!(
                "Metric name conflict detected: '{}' registered again by phase '{}'",
                doc.name, phase_name
            );
        } else {
            debug!(
                "Registered {} ({:?}) for phase '{}': {}",
                doc.name, doc.metric_type, phase_name, doc.help
            );
            all_metrics.insert(doc.name, doc);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_metric_names_are_unique() {
        let mut all_metrics = HashMap::new();
        register_phase_metrics::<ScanMetrics>(&mut all_metrics);
        register_phase_metrics::<LoadMetrics>(&mut all_metrics);
        assert_eq!(
            all_metrics.len(),
            ScanMetrics::metrics_documentation().len() + LoadMetrics::metrics_documentation().len()
        );
    }
}
