use chrono::NaiveDate;
use fleet_quality::config::QualityConfig;
use fleet_quality::quality::alerts::ALERT_CAPACITY;
use fleet_quality::quality::{Alert, AlertError, AlertPublisher, QualityEngine, VesselId};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::VecDeque;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Logs each published alert and keeps the most recent ones in memory.
#[derive(Default, Clone)]
pub(crate) struct InMemoryAlertPublisher {
    events: Arc<Mutex<VecDeque<Alert>>>,
}

impl AlertPublisher for InMemoryAlertPublisher {
    fn publish(&self, alert: &Alert) -> Result<(), AlertError> {
        info!(
            alert = %alert.id,
            severity = alert.severity.label(),
            vessels = alert.affected_vessels.len(),
            "{}",
            alert.title
        );
        let mut guard = self
            .events
            .lock()
            .map_err(|_| AlertError::Transport("alert log poisoned".to_string()))?;
        if guard.len() == ALERT_CAPACITY {
            guard.pop_front();
        }
        guard.push_back(alert.clone());
        Ok(())
    }
}

impl InMemoryAlertPublisher {
    #[cfg(test)]
    pub(crate) fn events(&self) -> Vec<Alert> {
        self.events
            .lock()
            .expect("alert mutex poisoned")
            .iter()
            .cloned()
            .collect()
    }
}

pub(crate) fn build_engine(config: &QualityConfig) -> QualityEngine {
    QualityEngine::standard(config.seed)
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn vessel_selection(raw: &[String]) -> Option<Vec<VesselId>> {
    if raw.is_empty() {
        None
    } else {
        Some(raw.iter().map(|id| VesselId::new(id.trim())).collect())
    }
}

pub(crate) fn kpi_selection(raw: &[String]) -> Option<Vec<String>> {
    if raw.is_empty() {
        None
    } else {
        Some(raw.iter().map(|id| id.trim().to_string()).collect())
    }
}
