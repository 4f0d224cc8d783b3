use super::super::alerts::{Alert, AlertSeverity};
use super::super::domain::QualityGrade;
use super::super::fleet::{FleetMetrics, HealthBucket};
use super::super::trend::{QualityTrends, TrendDirection};
use super::views::{QualityInsights, VesselQualityView};
use std::collections::BTreeMap;

pub(crate) fn generate_insights(
    fleet: &FleetMetrics,
    vessels: &[VesselQualityView],
    trends: &QualityTrends,
    new_alerts: &[Alert],
) -> QualityInsights {
    let health_level = HealthBucket::for_score(fleet.overall_health);

    let mut poor: Vec<&VesselQualityView> = vessels
        .iter()
        .filter(|view| view.grade == QualityGrade::Poor)
        .collect();
    poor.sort_by_key(|view| view.overall_score);
    let focus_vessels: Vec<String> = poor
        .iter()
        .take(3)
        .map(|view| format!("{} ({}%)", view.vessel_name, view.overall_score))
        .collect();

    let mut observations = Vec::new();
    if fleet.total_vessels > 0 {
        observations.push(format!(
            "{} of {} vessels healthy ({}% fleet health)",
            fleet.healthy_vessels, fleet.total_vessels, fleet.overall_health
        ));
    }

    if fleet.critical_issues > 0 {
        observations.push(format!(
            "{} high-severity correctness issue(s) across the fleet",
            fleet.critical_issues
        ));
    }

    if trends.overall != TrendDirection::Stable {
        observations.push(format!(
            "Overall quality {} ({:+.1}% against the previous window)",
            trends.overall.label().to_lowercase(),
            trends.overall_change_pct
        ));
    }

    let critical_alerts = new_alerts
        .iter()
        .filter(|alert| alert.severity == AlertSeverity::Critical)
        .count();
    if !new_alerts.is_empty() {
        observations.push(format!(
            "{} new alert(s) this cycle, {} critical",
            new_alerts.len(),
            critical_alerts
        ));
    }

    let mut recommended_actions = Vec::new();

    let mut by_kpi: BTreeMap<&str, usize> = BTreeMap::new();
    for view in vessels {
        for issue in &view.issues {
            *by_kpi.entry(issue.kpi.as_str()).or_default() += 1;
        }
    }
    if let Some((kpi, count)) = by_kpi.iter().max_by_key(|(_, count)| **count) {
        recommended_actions.push(format!(
            "Inspect {kpi} sensors first ({count} open issue{})",
            if *count == 1 { "" } else { "s" }
        ));
    }

    if fleet.missing_issues > 0 && fleet.missing_issues >= fleet.incorrect_issues {
        recommended_actions
            .push("Check data-logger connectivity on vessels with gaps".to_string());
    }

    if fleet.incorrect_issues > 0 {
        recommended_actions
            .push("Review range validation for KPIs reporting out-of-range values".to_string());
    }

    if trends.overall == TrendDirection::Degrading {
        recommended_actions.push("Schedule a sensor calibration review".to_string());
    }

    if critical_alerts > 0 {
        recommended_actions
            .push("Escalate critical completeness alerts to the vessel superintendent".to_string());
    }

    if observations.is_empty() {
        observations.push("No vessels under assessment".to_string());
    }

    if recommended_actions.is_empty() {
        recommended_actions
            .push("No action needed; maintain current monitoring cadence".to_string());
    }

    QualityInsights {
        health_level,
        health_label: health_level.label(),
        focus_vessels,
        observations,
        recommended_actions,
    }
}
