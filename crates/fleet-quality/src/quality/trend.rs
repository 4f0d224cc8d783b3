use super::domain::QualityGrade;
use super::fleet::FleetMetrics;
use super::scoring::QualityThresholds;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

pub const HISTORY_CAPACITY: usize = 30;
/// Entries per comparison window.
pub const TREND_WINDOW: usize = 5;
/// Percent movement below which a metric counts as stable.
pub const STABLE_BAND_PCT: f64 = 2.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityHistoryEntry {
    pub timestamp: DateTime<Utc>,
    pub completeness: f64,
    pub correctness: f64,
    pub score: u8,
    pub grade: QualityGrade,
    pub issue_count: usize,
}

impl QualityHistoryEntry {
    pub fn from_metrics(
        metrics: &FleetMetrics,
        thresholds: &QualityThresholds,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            timestamp,
            completeness: metrics.avg_completeness,
            correctness: metrics.avg_correctness,
            score: metrics.overall_health,
            grade: thresholds.grade(metrics.avg_completeness, metrics.avg_correctness),
            issue_count: metrics.total_issues,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Improving,
    Stable,
    Degrading,
}

impl TrendDirection {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Improving => "Improving",
            Self::Stable => "Stable",
            Self::Degrading => "Degrading",
        }
    }

    pub const fn sign(self) -> i8 {
        match self {
            Self::Improving => 1,
            Self::Stable => 0,
            Self::Degrading => -1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualityTrends {
    pub completeness: TrendDirection,
    pub correctness: TrendDirection,
    pub overall: TrendDirection,
    /// Sign of the overall movement: 1, 0 or -1.
    pub direction: i8,
    pub overall_change_pct: f64,
}

impl QualityTrends {
    pub const STABLE: Self = Self {
        completeness: TrendDirection::Stable,
        correctness: TrendDirection::Stable,
        overall: TrendDirection::Stable,
        direction: 0,
        overall_change_pct: 0.0,
    };
}

impl Default for QualityTrends {
    fn default() -> Self {
        Self::STABLE
    }
}

/// Bounded assessment history, oldest entry evicted first.
#[derive(Debug, Clone)]
pub struct QualityHistory {
    entries: VecDeque<QualityHistoryEntry>,
    capacity: usize,
    thresholds: QualityThresholds,
}

impl Default for QualityHistory {
    fn default() -> Self {
        Self::new(HISTORY_CAPACITY, QualityThresholds::default())
    }
}

impl QualityHistory {
    pub fn new(capacity: usize, thresholds: QualityThresholds) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            thresholds,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn latest(&self) -> Option<&QualityHistoryEntry> {
        self.entries.back()
    }

    pub fn record(
        &mut self,
        metrics: &FleetMetrics,
        timestamp: DateTime<Utc>,
    ) -> Vec<QualityHistoryEntry> {
        self.push(QualityHistoryEntry::from_metrics(
            metrics,
            &self.thresholds,
            timestamp,
        ));
        self.snapshot()
    }

    pub fn push(&mut self, entry: QualityHistoryEntry) {
        if self.capacity == 0 {
            return;
        }
        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    pub fn snapshot(&self) -> Vec<QualityHistoryEntry> {
        self.entries.iter().cloned().collect()
    }

    pub fn trends(&self) -> QualityTrends {
        compute_trends(&self.snapshot())
    }
}

pub fn compute_trends(entries: &[QualityHistoryEntry]) -> QualityTrends {
    if entries.len() < TREND_WINDOW {
        return QualityTrends::STABLE;
    }

    let completeness: Vec<f64> = entries.iter().map(|entry| entry.completeness).collect();
    let correctness: Vec<f64> = entries.iter().map(|entry| entry.correctness).collect();
    let overall: Vec<f64> = entries.iter().map(|entry| f64::from(entry.score)).collect();

    let (overall_direction, overall_change_pct) = classify(&overall);

    QualityTrends {
        completeness: classify(&completeness).0,
        correctness: classify(&correctness).0,
        overall: overall_direction,
        direction: overall_direction.sign(),
        overall_change_pct,
    }
}

/// Compares the last window against up to one window before it.
fn classify(values: &[f64]) -> (TrendDirection, f64) {
    let len = values.len();
    if len < TREND_WINDOW {
        return (TrendDirection::Stable, 0.0);
    }

    let recent = &values[len - TREND_WINDOW..];
    let older = &values[len.saturating_sub(TREND_WINDOW * 2)..len - TREND_WINDOW];
    let (Some(recent_mean), Some(older_mean)) = (mean(recent), mean(older)) else {
        return (TrendDirection::Stable, 0.0);
    };
    if older_mean == 0.0 {
        return (TrendDirection::Stable, 0.0);
    }

    let change = (recent_mean - older_mean) / older_mean * 100.0;
    let direction = if change.abs() < STABLE_BAND_PCT {
        TrendDirection::Stable
    } else if change > 0.0 {
        TrendDirection::Improving
    } else {
        TrendDirection::Degrading
    };

    (direction, change)
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}
