use super::alerts::{Alert, AlertBook, AlertGenerator, AlertInput, AlertSettings};
use super::catalog::{KpiCatalog, StandardKpiCatalog, TRACKED_KPI_COUNT};
use super::completeness::{summarize_completeness, vessel_averages};
use super::domain::{fleet_roster, DataFrequency, Vessel, VesselId};
use super::fleet::{aggregate_fleet, FleetMetrics};
use super::injector::{DateRange, FaultInjector, QualitySeries};
use super::profile::{IssueProfile, ProfileBook};
use super::report::views::{QualityAssessment, QualityHistoryView};
use super::report::{generate_insights, grade_distribution, vessel_views};
use super::scoring::{QualityScorer, QualityThresholds, VesselScore};
use super::trend::{QualityHistory, QualityHistoryEntry, QualityTrends, HISTORY_CAPACITY};
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Deserialize;
use tracing::{info, warn};

/// Inputs a consumer supplies for one assessment tick.
#[derive(Debug, Clone, Deserialize)]
pub struct AssessmentRequest {
    pub window: DateRange,
    /// Vessels to sample; `None` selects the whole roster.
    #[serde(default)]
    pub vessels: Option<Vec<VesselId>>,
    /// KPI ids to sample; `None` selects the whole catalog.
    #[serde(default)]
    pub kpis: Option<Vec<String>>,
    #[serde(default)]
    pub settings: AlertSettings,
    #[serde(default)]
    pub include_series: bool,
}

impl AssessmentRequest {
    pub fn for_window(window: DateRange) -> Self {
        Self {
            window,
            vessels: None,
            kpis: None,
            settings: AlertSettings::default(),
            include_series: false,
        }
    }
}

/// Owns the session's profiles, history, and alert buffers and drives the
/// scoring, injection, aggregation, trend, and alert stages.
#[derive(Debug)]
pub struct QualityEngine<C = StandardKpiCatalog> {
    catalog: C,
    book: ProfileBook,
    scorer: QualityScorer,
    thresholds: QualityThresholds,
    injector: FaultInjector,
    generator: AlertGenerator,
    history: QualityHistory,
    alerts: AlertBook,
    rng: StdRng,
}

impl QualityEngine<StandardKpiCatalog> {
    pub fn standard(seed: u64) -> Self {
        Self::new(StandardKpiCatalog::standard(), fleet_roster(), seed)
    }
}

impl<C: KpiCatalog> QualityEngine<C> {
    pub fn new(catalog: C, roster: Vec<Vessel>, seed: u64) -> Self {
        let scorer = QualityScorer::new(TRACKED_KPI_COUNT);
        let thresholds = QualityThresholds::default();
        let book = ProfileBook::new(roster, scorer, seed);

        info!(vessels = book.len(), seed, "quality engine initialised");

        Self {
            catalog,
            book,
            scorer,
            thresholds,
            injector: FaultInjector::default(),
            generator: AlertGenerator::default(),
            history: QualityHistory::new(HISTORY_CAPACITY, thresholds),
            alerts: AlertBook::default(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn with_profile_book(mut self, book: ProfileBook) -> Self {
        self.book = book;
        self
    }

    pub fn with_injector(mut self, injector: FaultInjector) -> Self {
        self.injector = injector;
        self
    }

    pub fn with_alert_generator(mut self, generator: AlertGenerator) -> Self {
        self.generator = generator;
        self
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn profiles(&self) -> &ProfileBook {
        &self.book
    }

    pub fn thresholds(&self) -> &QualityThresholds {
        &self.thresholds
    }

    pub fn history(&self) -> &QualityHistory {
        &self.history
    }

    pub fn issue_profile(&self, vessel_index: usize) -> IssueProfile {
        self.book.issue_profile(vessel_index)
    }

    /// Recomputes a profile's scores from its issues and recorded jitter.
    pub fn score_vessel(&self, profile: &IssueProfile) -> VesselScore {
        self.scorer.score(
            profile.missing_count,
            profile.incorrect_count,
            &profile.issues,
            profile.jitter,
        )
    }

    /// Roster vessels matching `ids`, in request order. Unknown ids are skipped.
    pub fn resolve_vessels(&self, ids: &[VesselId]) -> Vec<Vessel> {
        ids.iter()
            .filter_map(|id| {
                let vessel = self.book.vessel(id).cloned();
                if vessel.is_none() {
                    warn!(vessel = %id, "skipping unknown vessel");
                }
                vessel
            })
            .collect()
    }

    pub fn inject_faults(
        &mut self,
        range: &DateRange,
        vessel_ids: &[VesselId],
        kpis: &[String],
        frequency: DataFrequency,
    ) -> QualitySeries {
        let vessels = self.resolve_vessels(vessel_ids);
        self.injector.inject(
            range,
            &vessels,
            kpis,
            &self.book,
            &self.catalog,
            frequency,
            &mut self.rng,
        )
    }

    /// Rolls up the canonical fleet, regardless of any consumer selection.
    pub fn aggregate_fleet(&self) -> FleetMetrics {
        aggregate_fleet(self.book.profiles())
    }

    pub fn record_history(
        &mut self,
        metrics: &FleetMetrics,
        timestamp: DateTime<Utc>,
    ) -> Vec<QualityHistoryEntry> {
        self.history.record(metrics, timestamp)
    }

    pub fn compute_trends(&self) -> QualityTrends {
        self.history.trends()
    }

    pub fn history_view(&self) -> QualityHistoryView {
        QualityHistoryView {
            entries: self.history.snapshot(),
            trends: self.history.trends(),
        }
    }

    /// Scans for alerts and merges them into the alert book. Returns only
    /// the alerts that were not already stored.
    pub fn generate_alerts(
        &mut self,
        input: &AlertInput<'_>,
        settings: &AlertSettings,
        now: DateTime<Utc>,
    ) -> Vec<Alert> {
        let generated = self.generator.generate(input, settings, now);
        let added = self.alerts.merge(generated);
        if !added.is_empty() {
            info!(added = added.len(), stored = self.alerts.len(), "alerts raised");
        }
        added
    }

    pub fn alerts(&self) -> Vec<Alert> {
        self.alerts.alerts()
    }

    pub fn dismiss_alert(&mut self, id: &str) -> bool {
        let dismissed = self.alerts.dismiss(id);
        if dismissed {
            info!(alert = id, "alert dismissed");
        }
        dismissed
    }

    pub fn clear_all_alerts(&mut self) -> usize {
        let cleared = self.alerts.clear();
        info!(cleared, "alerts cleared");
        cleared
    }

    /// Runs one assessment tick: aggregate, record history, sample the
    /// requested window, raise alerts, and summarise.
    pub fn assess(&mut self, request: &AssessmentRequest, now: DateTime<Utc>) -> QualityAssessment {
        let fleet = self.aggregate_fleet();
        self.history.record(&fleet, now);
        let trends = self.history.trends();

        let vessel_ids: Vec<VesselId> = match &request.vessels {
            Some(ids) => ids.clone(),
            None => self.book.vessels().map(|vessel| vessel.id.clone()).collect(),
        };
        let kpis = match &request.kpis {
            Some(kpis) => kpis.clone(),
            None => self.catalog.ids(),
        };

        let daily = self.inject_faults(&request.window, &vessel_ids, &kpis, DataFrequency::Daily);
        let high_frequency = self.inject_faults(
            &request.window,
            &vessel_ids,
            &kpis,
            DataFrequency::HighFrequency,
        );

        let daily_records = summarize_completeness(&daily);
        let mut records = daily_records.clone();
        records.extend(summarize_completeness(&high_frequency));
        let completeness = vessel_averages(&daily_records);

        let input = AlertInput {
            metrics: &fleet,
            vessels: &completeness,
            records: &records,
            today: request.window.end,
        };
        let new_alerts = self.generate_alerts(&input, &request.settings, now);

        let vessels = vessel_views(&self.book, &self.thresholds);
        let insights = generate_insights(&fleet, &vessels, &trends, &new_alerts);

        info!(
            vessels = fleet.total_vessels,
            health = fleet.overall_health,
            new_alerts = new_alerts.len(),
            trend = trends.overall.label(),
            "quality assessment complete"
        );

        QualityAssessment {
            assessed_at: now,
            window: request.window,
            frequency: DataFrequency::Daily,
            settings: request.settings,
            grade_distribution: grade_distribution(&vessels),
            fleet,
            vessels,
            completeness,
            history_len: self.history.len(),
            trends,
            new_alerts,
            active_alerts: self.alerts.len(),
            insights,
            series: request.include_series.then_some(daily),
        }
    }
}
