use super::super::alerts::{Alert, AlertSettings};
use super::super::completeness::VesselCompleteness;
use super::super::domain::{DataFrequency, Issue, QualityGrade, VesselId};
use super::super::fleet::{FleetMetrics, HealthBucket};
use super::super::injector::{DateRange, QualitySeries};
use super::super::trend::{QualityHistoryEntry, QualityTrends};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct VesselQualityView {
    pub vessel_id: VesselId,
    pub vessel_name: String,
    pub completeness: f64,
    pub correctness: f64,
    pub overall_score: u8,
    pub grade: QualityGrade,
    pub grade_label: &'static str,
    pub bucket: HealthBucket,
    pub bucket_label: &'static str,
    pub missing_count: usize,
    pub incorrect_count: usize,
    pub critical_issues: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<Issue>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GradeDistributionEntry {
    pub grade: QualityGrade,
    pub grade_label: &'static str,
    pub vessels: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct QualityInsights {
    pub health_level: HealthBucket,
    pub health_label: &'static str,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub focus_vessels: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub observations: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub recommended_actions: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QualityHistoryView {
    pub entries: Vec<QualityHistoryEntry>,
    pub trends: QualityTrends,
}

/// Full output of one assessment tick.
#[derive(Debug, Clone, Serialize)]
pub struct QualityAssessment {
    pub assessed_at: DateTime<Utc>,
    pub window: DateRange,
    pub frequency: DataFrequency,
    pub settings: AlertSettings,
    pub fleet: FleetMetrics,
    pub grade_distribution: Vec<GradeDistributionEntry>,
    pub vessels: Vec<VesselQualityView>,
    pub completeness: Vec<VesselCompleteness>,
    pub history_len: usize,
    pub trends: QualityTrends,
    pub new_alerts: Vec<Alert>,
    pub active_alerts: usize,
    pub insights: QualityInsights,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub series: Option<QualitySeries>,
}
