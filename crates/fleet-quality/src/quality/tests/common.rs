use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde_json::Value;

use crate::quality::alerts::Alert;
use crate::quality::engine::{AssessmentRequest, QualityEngine};
use crate::quality::injector::DateRange;
use crate::quality::service::{AlertError, AlertPublisher, QualityService};
use crate::quality::quality_router;

pub(super) const SEED: u64 = 42;

pub(super) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 10).expect("valid date")
}

pub(super) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn window() -> DateRange {
    DateRange::trailing(today(), 7)
}

pub(super) fn assessment_request() -> AssessmentRequest {
    AssessmentRequest::for_window(window())
}

pub(super) fn build_service() -> (QualityService<MemoryAlerts>, Arc<MemoryAlerts>) {
    let alerts = Arc::new(MemoryAlerts::default());
    let service = QualityService::new(QualityEngine::standard(SEED), alerts.clone());
    (service, alerts)
}

pub(super) fn quality_router_with_service(service: QualityService<MemoryAlerts>) -> axum::Router {
    quality_router(Arc::new(service))
}

#[derive(Default, Clone)]
pub(super) struct MemoryAlerts {
    events: Arc<Mutex<Vec<Alert>>>,
}

impl MemoryAlerts {
    pub(super) fn events(&self) -> Vec<Alert> {
        self.events.lock().expect("alert mutex poisoned").clone()
    }
}

impl AlertPublisher for MemoryAlerts {
    fn publish(&self, alert: &Alert) -> Result<(), AlertError> {
        self.events
            .lock()
            .expect("alert mutex poisoned")
            .push(alert.clone());
        Ok(())
    }
}

pub(super) struct OfflineAlerts;

impl AlertPublisher for OfflineAlerts {
    fn publish(&self, _alert: &Alert) -> Result<(), AlertError> {
        Err(AlertError::Transport("pager offline".to_string()))
    }
}

/// Fails the first delivery, then records every later alert.
#[derive(Default)]
pub(super) struct FlakyAlerts {
    attempts: Mutex<usize>,
    delivered: MemoryAlerts,
}

impl FlakyAlerts {
    pub(super) fn delivered(&self) -> Vec<Alert> {
        self.delivered.events()
    }
}

impl AlertPublisher for FlakyAlerts {
    fn publish(&self, alert: &Alert) -> Result<(), AlertError> {
        let mut attempts = self.attempts.lock().expect("attempt mutex poisoned");
        *attempts += 1;
        if *attempts == 1 {
            return Err(AlertError::Transport("pager timeout".to_string()));
        }
        self.delivered.publish(alert)
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
