//! Data-quality assessment for the fleet dashboard.
//!
//! Issue profiles are derived per vessel from a fixed fault table, scored,
//! and rolled up into fleet metrics. Each assessment tick also samples a
//! synthetic KPI series with injected gaps and out-of-range readings, feeds
//! the bounded quality history, and raises completeness alerts.

pub mod alerts;
pub mod catalog;
pub mod completeness;
pub mod domain;
pub mod engine;
pub mod export;
pub mod fleet;
pub mod injector;
pub mod profile;
pub mod report;
pub mod router;
pub mod scoring;
pub mod service;
pub mod trend;

#[cfg(test)]
mod tests;

pub use alerts::{
    Alert, AlertBook, AlertGenerator, AlertInput, AlertKind, AlertSettings, AlertSeverity,
};
pub use catalog::{KpiCatalog, KpiMeta, StandardKpiCatalog, TRACKED_KPI_COUNT};
pub use completeness::{summarize_completeness, vessel_averages, CompletenessRecord, VesselCompleteness};
pub use domain::{
    fleet_roster, DataFrequency, Issue, IssueSeverity, IssueType, QualityGrade, QualityType,
    Vessel, VesselId,
};
pub use engine::{AssessmentRequest, QualityEngine};
pub use export::write_series_csv;
pub use fleet::{aggregate_fleet, FleetMetrics, HealthBucket};
pub use injector::{DateRange, FaultInjector, QualityDataPoint, QualityRow, QualitySeries, SeriesColumn};
pub use profile::{IssuePattern, IssueProfile, ProfileBook};
pub use report::views::{
    GradeDistributionEntry, QualityAssessment, QualityHistoryView, QualityInsights,
    VesselQualityView,
};
pub use router::quality_router;
pub use scoring::{QualityScorer, QualityThresholds, ScoreJitter, VesselScore};
pub use service::{
    check_window, AlertError, AlertPublisher, QualityService, QualityServiceError, SeriesRequest,
    MAX_WINDOW_DAYS,
};
pub use trend::{compute_trends, QualityHistory, QualityHistoryEntry, QualityTrends, TrendDirection};
