use super::completeness::{CompletenessRecord, VesselCompleteness};
use super::domain::{DataFrequency, VesselId};
use super::fleet::FleetMetrics;
use super::injector::DateRange;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet, VecDeque};
use tracing::debug;

pub const ALERT_CAPACITY: usize = 50;
/// Completeness below which a completeness alert escalates to critical.
pub const CRITICAL_COMPLETENESS: f64 = 70.0;
pub const RECENT_WINDOW_DAYS: u32 = 3;
/// Fixed cutoff for the recent-missing scan; independent of `alert_threshold`.
pub const RECENT_MISSING_THRESHOLD: f64 = 50.0;

/// Consumer-supplied alerting preferences.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertSettings {
    pub enable_real_time_checks: bool,
    pub alert_threshold: f64,
    pub auto_refresh: bool,
}

impl Default for AlertSettings {
    fn default() -> Self {
        Self {
            enable_real_time_checks: true,
            alert_threshold: 85.0,
            auto_refresh: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertSeverity {
    Warning,
    Critical,
}

impl AlertSeverity {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Warning => "Warning",
            Self::Critical => "Critical",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    FleetCompleteness,
    VesselCompleteness,
    RecentMissingData,
}

impl AlertKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::FleetCompleteness => "Fleet Completeness",
            Self::VesselCompleteness => "Vessel Completeness",
            Self::RecentMissingData => "Recent Missing Data",
        }
    }

    const fn slug(self) -> &'static str {
        match self {
            Self::FleetCompleteness => "fleet-completeness",
            Self::VesselCompleteness => "vessel-completeness",
            Self::RecentMissingData => "recent-missing",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub severity: AlertSeverity,
    pub title: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub affected_vessels: Vec<VesselId>,
    pub action_required: bool,
}

/// Everything one alert scan looks at.
#[derive(Debug, Clone, Copy)]
pub struct AlertInput<'a> {
    pub metrics: &'a FleetMetrics,
    pub vessels: &'a [VesselCompleteness],
    pub records: &'a [CompletenessRecord],
    pub today: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlertGenerator {
    pub critical_below: f64,
    pub recent_window_days: u32,
    pub recent_missing_below: f64,
}

impl Default for AlertGenerator {
    fn default() -> Self {
        Self {
            critical_below: CRITICAL_COMPLETENESS,
            recent_window_days: RECENT_WINDOW_DAYS,
            recent_missing_below: RECENT_MISSING_THRESHOLD,
        }
    }
}

impl AlertGenerator {
    pub fn generate(
        &self,
        input: &AlertInput<'_>,
        settings: &AlertSettings,
        now: DateTime<Utc>,
    ) -> Vec<Alert> {
        if !settings.enable_real_time_checks {
            return Vec::new();
        }

        let threshold = settings.alert_threshold.clamp(0.0, 100.0);
        let mut alerts = Vec::new();

        if input.metrics.total_vessels > 0 && input.metrics.avg_completeness < threshold {
            let completeness = input.metrics.avg_completeness;
            let severity = self.severity_for(completeness);
            alerts.push(Alert {
                id: alert_id(AlertKind::FleetCompleteness, "fleet", now),
                kind: AlertKind::FleetCompleteness,
                severity,
                title: "Fleet data completeness below threshold".to_string(),
                message: format!(
                    "Fleet completeness is {completeness:.1}%, below the {threshold:.0}% threshold"
                ),
                timestamp: now,
                affected_vessels: Vec::new(),
                action_required: severity == AlertSeverity::Critical,
            });
        }

        for vessel in input.vessels {
            if vessel.records == 0 || vessel.completeness >= threshold {
                continue;
            }
            let severity = self.severity_for(vessel.completeness);
            alerts.push(Alert {
                id: alert_id(AlertKind::VesselCompleteness, vessel.vessel_id.as_str(), now),
                kind: AlertKind::VesselCompleteness,
                severity,
                title: format!("{} data completeness below threshold", vessel.vessel_name),
                message: format!(
                    "{} averaged {:.1}% completeness, below the {threshold:.0}% threshold",
                    vessel.vessel_name, vessel.completeness
                ),
                timestamp: now,
                affected_vessels: vec![vessel.vessel_id.clone()],
                action_required: severity == AlertSeverity::Critical,
            });
        }

        if let Some(alert) = self.recent_missing(input, now) {
            alerts.push(alert);
        }

        let mut seen = HashSet::new();
        alerts.retain(|alert| seen.insert(alert.id.clone()));

        debug!(count = alerts.len(), threshold, "alert scan complete");
        alerts
    }

    fn severity_for(&self, completeness: f64) -> AlertSeverity {
        if completeness < self.critical_below {
            AlertSeverity::Critical
        } else {
            AlertSeverity::Warning
        }
    }

    fn recent_missing(&self, input: &AlertInput<'_>, now: DateTime<Utc>) -> Option<Alert> {
        let window = DateRange::trailing(input.today, self.recent_window_days);
        let mut vessels = BTreeSet::new();
        let mut sensors = BTreeSet::new();
        let mut frequencies = BTreeSet::new();

        for record in input.records {
            if window.contains(record.date) && record.completeness < self.recent_missing_below {
                vessels.insert(record.vessel_id.clone());
                sensors.insert((&record.vessel_id, record.kpi.as_str()));
                frequencies.insert(record.frequency);
            }
        }

        if vessels.is_empty() {
            return None;
        }

        let feeds: Vec<&str> = frequencies.into_iter().map(DataFrequency::label).collect();

        Some(Alert {
            id: alert_id(AlertKind::RecentMissingData, "fleet", now),
            kind: AlertKind::RecentMissingData,
            severity: AlertSeverity::Warning,
            title: "Recent missing data detected".to_string(),
            message: format!(
                "{} sensor(s) on {} vessel(s) reported under {:.0}% of expected data in the last {} days ({})",
                sensors.len(),
                vessels.len(),
                self.recent_missing_below,
                self.recent_window_days,
                feeds.join(", ")
            ),
            timestamp: now,
            affected_vessels: vessels.into_iter().collect(),
            action_required: true,
        })
    }
}

fn alert_id(kind: AlertKind, scope: &str, now: DateTime<Utc>) -> String {
    format!("{}-{}-{}", kind.slug(), scope, now.timestamp_millis())
}

/// Most-recent-first alert store with id de-duplication.
#[derive(Debug, Clone)]
pub struct AlertBook {
    alerts: VecDeque<Alert>,
    capacity: usize,
}

impl Default for AlertBook {
    fn default() -> Self {
        Self::new(ALERT_CAPACITY)
    }
}

impl AlertBook {
    pub fn new(capacity: usize) -> Self {
        Self {
            alerts: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.alerts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.alerts.iter().any(|alert| alert.id == id)
    }

    pub fn alerts(&self) -> Vec<Alert> {
        self.alerts.iter().cloned().collect()
    }

    /// Adds alerts whose ids are not yet stored and returns those added.
    pub fn merge(&mut self, incoming: Vec<Alert>) -> Vec<Alert> {
        let mut added = Vec::new();
        for alert in incoming {
            if self.contains(&alert.id) || added.iter().any(|a: &Alert| a.id == alert.id) {
                continue;
            }
            added.push(alert);
        }

        for alert in added.iter().rev() {
            self.alerts.push_front(alert.clone());
        }
        self.alerts.truncate(self.capacity);

        added
    }

    pub fn dismiss(&mut self, id: &str) -> bool {
        let before = self.alerts.len();
        self.alerts.retain(|alert| alert.id != id);
        before != self.alerts.len()
    }

    pub fn clear(&mut self) -> usize {
        let removed = self.alerts.len();
        self.alerts.clear();
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 9, 30, 0)
            .single()
            .expect("valid timestamp")
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).expect("valid")
    }

    fn metrics(avg_completeness: f64) -> FleetMetrics {
        FleetMetrics {
            avg_completeness,
            avg_correctness: 95.0,
            total_vessels: 3,
            ..FleetMetrics::default()
        }
    }

    fn vessel(id: &str, completeness: f64) -> VesselCompleteness {
        VesselCompleteness {
            vessel_id: VesselId::new(id),
            vessel_name: format!("Vessel {id}"),
            completeness,
            records: 5,
        }
    }

    fn record(id: &str, days_ago: i64, completeness: f64, frequency: DataFrequency) -> CompletenessRecord {
        CompletenessRecord {
            vessel_id: VesselId::new(id),
            vessel_name: format!("Vessel {id}"),
            kpi: "rpm".to_string(),
            date: today() - Duration::days(days_ago),
            frequency,
            expected: 8,
            present: 0,
            completeness,
        }
    }

    #[test]
    fn healthy_fleet_raises_nothing() {
        let metrics = metrics(96.0);
        let vessels = vec![vessel("V001", 97.0)];
        let input = AlertInput {
            metrics: &metrics,
            vessels: &vessels,
            records: &[],
            today: today(),
        };
        let alerts = AlertGenerator::default().generate(&input, &AlertSettings::default(), now());
        assert!(alerts.is_empty());
    }

    #[test]
    fn severity_escalates_below_critical_floor() {
        let metrics = metrics(65.0);
        let vessels = vec![vessel("V001", 80.0), vessel("V002", 50.0), vessel("V003", 99.0)];
        let input = AlertInput {
            metrics: &metrics,
            vessels: &vessels,
            records: &[],
            today: today(),
        };
        let alerts = AlertGenerator::default().generate(&input, &AlertSettings::default(), now());

        assert_eq!(alerts.len(), 3);
        assert_eq!(alerts[0].kind, AlertKind::FleetCompleteness);
        assert_eq!(alerts[0].severity, AlertSeverity::Critical);
        assert!(alerts[0].action_required);
        assert_eq!(alerts[1].severity, AlertSeverity::Warning);
        assert_eq!(alerts[1].affected_vessels, vec![VesselId::new("V001")]);
        assert_eq!(alerts[2].severity, AlertSeverity::Critical);
    }

    #[test]
    fn disabled_real_time_checks_suppress_alerts() {
        let metrics = metrics(10.0);
        let input = AlertInput {
            metrics: &metrics,
            vessels: &[],
            records: &[],
            today: today(),
        };
        let settings = AlertSettings {
            enable_real_time_checks: false,
            ..AlertSettings::default()
        };
        assert!(AlertGenerator::default()
            .generate(&input, &settings, now())
            .is_empty());
    }

    #[test]
    fn recent_missing_data_is_one_aggregate_warning() {
        let metrics = metrics(95.0);
        let records = vec![
            record("V002", 0, 25.0, DataFrequency::Daily),
            record("V001", 1, 40.0, DataFrequency::HighFrequency),
            record("V002", 2, 10.0, DataFrequency::HighFrequency),
            record("V003", 3, 0.0, DataFrequency::Daily),
            record("V003", 0, 75.0, DataFrequency::Daily),
        ];
        let input = AlertInput {
            metrics: &metrics,
            vessels: &[],
            records: &records,
            today: today(),
        };
        let alerts = AlertGenerator::default().generate(&input, &AlertSettings::default(), now());

        assert_eq!(alerts.len(), 1);
        let alert = &alerts[0];
        assert_eq!(alert.kind, AlertKind::RecentMissingData);
        assert_eq!(alert.severity, AlertSeverity::Warning);
        assert_eq!(
            alert.affected_vessels,
            vec![VesselId::new("V001"), VesselId::new("V002")]
        );
        assert!(alert.message.starts_with("2 sensor(s) on 2 vessel(s)"));
        assert!(alert.message.contains("Daily, High Frequency"));
    }

    #[test]
    fn ids_are_unique_within_a_scan() {
        let metrics = metrics(40.0);
        let vessels = vec![vessel("V001", 30.0), vessel("V001", 30.0)];
        let records = vec![record("V001", 0, 0.0, DataFrequency::Daily)];
        let input = AlertInput {
            metrics: &metrics,
            vessels: &vessels,
            records: &records,
            today: today(),
        };
        let alerts = AlertGenerator::default().generate(&input, &AlertSettings::default(), now());
        let ids: HashSet<_> = alerts.iter().map(|alert| alert.id.clone()).collect();
        assert_eq!(ids.len(), alerts.len());
        assert_eq!(alerts.len(), 3);
    }

    #[test]
    fn empty_fleet_raises_no_fleet_alert() {
        let metrics = FleetMetrics::default();
        let input = AlertInput {
            metrics: &metrics,
            vessels: &[],
            records: &[],
            today: today(),
        };
        assert!(AlertGenerator::default()
            .generate(&input, &AlertSettings::default(), now())
            .is_empty());
    }

    fn sample_alert(id: &str) -> Alert {
        Alert {
            id: id.to_string(),
            kind: AlertKind::FleetCompleteness,
            severity: AlertSeverity::Warning,
            title: "t".to_string(),
            message: "m".to_string(),
            timestamp: now(),
            affected_vessels: Vec::new(),
            action_required: false,
        }
    }

    #[test]
    fn book_skips_known_ids_and_keeps_newest_first() {
        let mut book = AlertBook::default();
        let added = book.merge(vec![sample_alert("a"), sample_alert("b")]);
        assert_eq!(added.len(), 2);

        let added = book.merge(vec![sample_alert("b"), sample_alert("c")]);
        assert_eq!(added.len(), 1);
        let ids: Vec<_> = book.alerts().into_iter().map(|alert| alert.id).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn book_truncates_to_capacity() {
        let mut book = AlertBook::default();
        for batch in 0..6 {
            let alerts = (0..10)
                .map(|slot| sample_alert(&format!("alert-{batch}-{slot}")))
                .collect();
            book.merge(alerts);
        }
        assert_eq!(book.len(), ALERT_CAPACITY);
        assert!(book.contains("alert-5-0"));
        assert!(!book.contains("alert-0-9"));
    }

    #[test]
    fn dismiss_and_clear_remove_alerts() {
        let mut book = AlertBook::default();
        book.merge(vec![sample_alert("a"), sample_alert("b")]);
        assert!(book.dismiss("a"));
        assert!(!book.dismiss("a"));
        assert_eq!(book.len(), 1);
        assert_eq!(book.clear(), 1);
        assert!(book.is_empty());
    }
}
