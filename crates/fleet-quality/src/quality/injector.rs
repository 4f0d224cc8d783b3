use super::catalog::{KpiCatalog, KpiMeta};
use super::domain::{DataFrequency, Issue, IssueType, QualityType, Vessel, VesselId};
use super::profile::{IssueProfile, ProfileBook};
use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;
use tracing::{debug, warn};

pub const DEFAULT_MISSING_PROBABILITY: f64 = 0.3;
pub const DEFAULT_INCORRECT_PROBABILITY: f64 = 0.2;

/// Length of the synthetic operating cycle, in days.
const CYCLE_DAYS: f64 = 14.0;

/// Inclusive calendar window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// The `days` calendar days ending on `end`.
    pub fn trailing(end: NaiveDate, days: u32) -> Self {
        let span = i64::from(days.saturating_sub(1));
        let start = end
            .checked_sub_signed(chrono::Duration::days(span))
            .unwrap_or(NaiveDate::MIN);
        Self { start, end }
    }

    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }

    /// Number of calendar days covered, zero when inverted.
    pub fn len_days(&self) -> i64 {
        if self.is_empty() {
            0
        } else {
            (self.end - self.start).num_days() + 1
        }
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |day| *day <= end)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// One KPI reading for one vessel at one sample time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityDataPoint {
    pub value: Option<f64>,
    pub quality_type: QualityType,
    pub has_issue: bool,
    pub issue_details: Option<Issue>,
}

impl QualityDataPoint {
    fn normal(value: f64) -> Self {
        Self {
            value: Some(value),
            quality_type: QualityType::Normal,
            has_issue: false,
            issue_details: None,
        }
    }

    fn missing(issue: Issue) -> Self {
        Self {
            value: None,
            quality_type: QualityType::Missing,
            has_issue: true,
            issue_details: Some(issue),
        }
    }

    fn incorrect(value: f64, issue: Issue) -> Self {
        Self {
            value: Some(value),
            quality_type: QualityType::Incorrect,
            has_issue: true,
            issue_details: Some(issue),
        }
    }

    pub fn is_present(&self) -> bool {
        self.value.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesColumn {
    pub vessel_id: VesselId,
    pub vessel_name: String,
    pub kpi: String,
    pub unit: String,
}

impl SeriesColumn {
    pub fn header(&self) -> String {
        format!("{}_{}", self.vessel_id, self.kpi)
    }
}

/// All points sampled at one instant, aligned with `QualitySeries::columns`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityRow {
    pub timestamp: NaiveDateTime,
    pub points: Vec<QualityDataPoint>,
}

impl QualityRow {
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualitySeries {
    pub frequency: DataFrequency,
    pub columns: Vec<SeriesColumn>,
    pub rows: Vec<QualityRow>,
}

impl QualitySeries {
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() || self.rows.is_empty()
    }

    pub fn points(&self) -> impl Iterator<Item = (&SeriesColumn, &QualityRow, &QualityDataPoint)> {
        self.rows.iter().flat_map(move |row| {
            self.columns
                .iter()
                .zip(row.points.iter())
                .map(move |(column, point)| (column, row, point))
        })
    }

    pub fn count_by_type(&self, quality_type: QualityType) -> usize {
        self.points()
            .filter(|(_, _, point)| point.quality_type == quality_type)
            .count()
    }
}

/// Fault-injection model that keeps a synthetic series consistent with each
/// vessel's issue profile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaultInjector {
    missing_probability: f64,
    incorrect_probability: f64,
}

impl Default for FaultInjector {
    fn default() -> Self {
        Self::with_probabilities(DEFAULT_MISSING_PROBABILITY, DEFAULT_INCORRECT_PROBABILITY)
    }
}

impl FaultInjector {
    pub fn with_probabilities(missing: f64, incorrect: f64) -> Self {
        Self {
            missing_probability: sanitize_probability(missing),
            incorrect_probability: sanitize_probability(incorrect),
        }
    }

    pub fn missing_probability(&self) -> f64 {
        self.missing_probability
    }

    pub fn incorrect_probability(&self) -> f64 {
        self.incorrect_probability
    }

    #[allow(clippy::too_many_arguments)]
    pub fn inject<C, R>(
        &self,
        range: &DateRange,
        vessels: &[Vessel],
        kpis: &[String],
        profiles: &ProfileBook,
        catalog: &C,
        frequency: DataFrequency,
        rng: &mut R,
    ) -> QualitySeries
    where
        C: KpiCatalog + ?Sized,
        R: Rng + ?Sized,
    {
        let metas: Vec<&KpiMeta> = kpis
            .iter()
            .filter_map(|id| {
                let meta = catalog.lookup(id);
                if meta.is_none() {
                    warn!(kpi = %id, "skipping unknown KPI");
                }
                meta
            })
            .collect();

        let mut columns = Vec::with_capacity(vessels.len() * metas.len());
        let mut slots = Vec::with_capacity(columns.capacity());
        for vessel in vessels {
            let profile = profiles.profile_for(&vessel.id);
            for meta in &metas {
                columns.push(SeriesColumn {
                    vessel_id: vessel.id.clone(),
                    vessel_name: vessel.name.clone(),
                    kpi: meta.id.to_string(),
                    unit: meta.unit.to_string(),
                });
                slots.push((*meta, profile, identity_phase(&vessel.id, meta.id)));
            }
        }

        let hours = sample_hours(frequency);
        let mut rows = Vec::new();
        if !slots.is_empty() {
            for day in range.days() {
                for timestamp in hours.iter().filter_map(|hour| day.and_hms_opt(*hour, 0, 0)) {
                    let points = slots
                        .iter()
                        .map(|(meta, profile, phase)| {
                            self.sample_point(meta, *profile, *phase, timestamp, rng)
                        })
                        .collect();
                    rows.push(QualityRow { timestamp, points });
                }
            }
        }

        debug!(
            columns = columns.len(),
            rows = rows.len(),
            frequency = frequency.label(),
            "fault-injected series generated"
        );

        QualitySeries {
            frequency,
            columns,
            rows,
        }
    }

    fn sample_point<R: Rng + ?Sized>(
        &self,
        meta: &KpiMeta,
        profile: Option<&IssueProfile>,
        phase: f64,
        timestamp: NaiveDateTime,
        rng: &mut R,
    ) -> QualityDataPoint {
        if let Some(issue) = profile.and_then(|p| p.issue_for(meta.id, IssueType::Completeness)) {
            if rng.gen_bool(self.missing_probability) {
                return QualityDataPoint::missing(issue.clone());
            }
        }

        let base = nominal_value(meta, phase, timestamp, rng);

        if let Some(issue) = profile.and_then(|p| p.issue_for(meta.id, IssueType::Correctness)) {
            if rng.gen_bool(self.incorrect_probability) {
                let raw = issue.original_value.unwrap_or(meta.incorrect_fallback);
                return QualityDataPoint::incorrect(finalize(raw), issue.clone());
            }
        }

        QualityDataPoint::normal(finalize(base))
    }
}

fn sanitize_probability(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

fn sample_hours(frequency: DataFrequency) -> Vec<u32> {
    match frequency.samples_per_day() {
        0 => Vec::new(),
        1 => vec![12],
        samples => (0..samples).map(|slot| slot * 24 / samples).collect(),
    }
}

/// Stable phase offset so each vessel/KPI pair traces its own curve.
fn identity_phase(vessel: &VesselId, kpi: &str) -> f64 {
    let hash = vessel
        .as_str()
        .bytes()
        .chain(kpi.bytes())
        .fold(17u32, |acc, byte| acc.wrapping_mul(31).wrapping_add(u32::from(byte)));
    f64::from(hash % 360).to_radians()
}

/// Sinusoid over the operating cycle plus uniform noise, kept inside the
/// KPI's nominal range.
fn nominal_value<R: Rng + ?Sized>(
    meta: &KpiMeta,
    phase: f64,
    timestamp: NaiveDateTime,
    rng: &mut R,
) -> f64 {
    let day = f64::from(timestamp.date().num_days_from_ce()) + f64::from(timestamp.hour()) / 24.0;
    let wave = (day * TAU / CYCLE_DAYS + phase).sin();
    let noise: f64 = rng.gen_range(-1.0..1.0);
    let midpoint = meta.min + meta.span() / 2.0;
    let value = midpoint + (meta.span() / 2.0) * (0.6 * wave + 0.3 * noise);
    value.clamp(meta.min, meta.max)
}

fn finalize(value: f64) -> f64 {
    (value.max(0.0) * 100.0).round() / 100.0
}
