use metrics_exporter_prometheus::PrometheusHandle;
use sentiserve_classifiers::ClassifierHandle;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// The process-wide classifier, loaded before the listener binds
    pub classifier: ClassifierHandle,

    /// Prometheus renderer; `/metrics` answers 404 without one
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(classifier: ClassifierHandle) -> Self {
        Self {
            classifier,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}
