use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::warn;

use super::alerts::Alert;
use super::catalog::{KpiCatalog, StandardKpiCatalog};
use super::domain::{DataFrequency, VesselId};
use super::engine::{AssessmentRequest, QualityEngine};
use super::fleet::FleetMetrics;
use super::injector::{DateRange, QualitySeries};
use super::report::views::{QualityAssessment, QualityHistoryView, VesselQualityView};
use super::report::vessel_views;

/// Longest date window a single request may span.
pub const MAX_WINDOW_DAYS: i64 = 366;

/// Rejects windows longer than [`MAX_WINDOW_DAYS`].
pub fn check_window(window: &DateRange) -> Result<(), QualityServiceError> {
    let days = window.len_days();
    if days > MAX_WINDOW_DAYS {
        warn!(days, max = MAX_WINDOW_DAYS, "window rejected");
        return Err(QualityServiceError::WindowTooLarge {
            days,
            max: MAX_WINDOW_DAYS,
        });
    }
    Ok(())
}

/// Outbound hook for alerts the engine has newly raised.
pub trait AlertPublisher: Send + Sync {
    fn publish(&self, alert: &Alert) -> Result<(), AlertError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AlertError {
    #[error("alert transport unavailable: {0}")]
    Transport(String),
}

/// Request for a raw injected series, without running a full tick.
#[derive(Debug, Clone, Deserialize)]
pub struct SeriesRequest {
    pub window: DateRange,
    #[serde(default)]
    pub vessels: Option<Vec<VesselId>>,
    #[serde(default)]
    pub kpis: Option<Vec<String>>,
    #[serde(default)]
    pub frequency: DataFrequency,
}

/// Thread-safe facade over a single engine session.
pub struct QualityService<P, C = StandardKpiCatalog> {
    engine: Mutex<QualityEngine<C>>,
    alerts: Arc<P>,
}

impl<P, C> QualityService<P, C>
where
    P: AlertPublisher + 'static,
    C: KpiCatalog + 'static,
{
    pub fn new(engine: QualityEngine<C>, alerts: Arc<P>) -> Self {
        Self {
            engine: Mutex::new(engine),
            alerts,
        }
    }

    fn engine(&self) -> Result<MutexGuard<'_, QualityEngine<C>>, QualityServiceError> {
        self.engine
            .lock()
            .map_err(|_| QualityServiceError::EngineUnavailable)
    }

    pub fn profiles(&self) -> Result<Vec<VesselQualityView>, QualityServiceError> {
        let engine = self.engine()?;
        Ok(vessel_views(engine.profiles(), engine.thresholds()))
    }

    pub fn fleet(&self) -> Result<FleetMetrics, QualityServiceError> {
        Ok(self.engine()?.aggregate_fleet())
    }

    /// Runs one tick and forwards the newly raised alerts to the publisher.
    ///
    /// Every new alert gets one delivery attempt. Alerts stay stored even when
    /// delivery fails and are not retried on later ticks; the first failure is
    /// returned once all attempts are made.
    pub fn assess(
        &self,
        request: &AssessmentRequest,
        now: DateTime<Utc>,
    ) -> Result<QualityAssessment, QualityServiceError> {
        check_window(&request.window)?;
        let assessment = self.engine()?.assess(request, now);

        let mut first_failure = None;
        for alert in &assessment.new_alerts {
            if let Err(source) = self.alerts.publish(alert) {
                warn!(alert = %alert.id, error = %source, "alert publish failed");
                first_failure.get_or_insert(source);
            }
        }

        match first_failure {
            Some(source) => Err(QualityServiceError::Publish(source)),
            None => Ok(assessment),
        }
    }

    pub fn series(&self, request: &SeriesRequest) -> Result<QualitySeries, QualityServiceError> {
        check_window(&request.window)?;
        let mut engine = self.engine()?;
        let vessels: Vec<VesselId> = match &request.vessels {
            Some(ids) => ids.clone(),
            None => engine.profiles().vessels().map(|vessel| vessel.id.clone()).collect(),
        };
        let kpis = match &request.kpis {
            Some(kpis) => kpis.clone(),
            None => engine.catalog().ids(),
        };
        Ok(engine.inject_faults(&request.window, &vessels, &kpis, request.frequency))
    }

    pub fn history(&self) -> Result<QualityHistoryView, QualityServiceError> {
        Ok(self.engine()?.history_view())
    }

    pub fn alerts(&self) -> Result<Vec<Alert>, QualityServiceError> {
        Ok(self.engine()?.alerts())
    }

    pub fn dismiss_alert(&self, alert_id: &str) -> Result<(), QualityServiceError> {
        if self.engine()?.dismiss_alert(alert_id) {
            Ok(())
        } else {
            Err(QualityServiceError::AlertNotFound(alert_id.to_string()))
        }
    }

    pub fn clear_alerts(&self) -> Result<usize, QualityServiceError> {
        Ok(self.engine()?.clear_all_alerts())
    }
}

/// Error raised by the quality service.
#[derive(Debug, thiserror::Error)]
pub enum QualityServiceError {
    #[error("quality engine unavailable")]
    EngineUnavailable,
    #[error("alert '{0}' not found")]
    AlertNotFound(String),
    #[error("window spans {days} days, at most {max} allowed")]
    WindowTooLarge { days: i64, max: i64 },
    #[error(transparent)]
    Publish(#[from] AlertError),
}
