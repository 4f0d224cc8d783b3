use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier for a vessel in the canonical fleet roster.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VesselId(pub String);

impl VesselId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VesselId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vessel {
    pub id: VesselId,
    pub name: String,
}

impl Vessel {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: VesselId::new(id),
            name: name.to_string(),
        }
    }
}

const ROSTER: [(&str, &str); 10] = [
    ("V001", "Nordic Aurora"),
    ("V002", "Pacific Meridian"),
    ("V003", "Atlantic Voyager"),
    ("V004", "Coral Navigator"),
    ("V005", "Baltic Endeavour"),
    ("V006", "Cape Horizon"),
    ("V007", "Arctic Tern"),
    ("V008", "Indian Spirit"),
    ("V009", "Caspian Pearl"),
    ("V010", "Southern Cross"),
];

/// The canonical fleet. Aggregation always runs over this list, independent
/// of whichever vessels a consumer has selected for charting.
pub fn fleet_roster() -> Vec<Vessel> {
    ROSTER
        .iter()
        .map(|(id, name)| Vessel::new(id, name))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueType {
    Completeness,
    Correctness,
}

impl IssueType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Completeness => "Completeness",
            Self::Correctness => "Correctness",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueSeverity {
    High,
    Medium,
    Low,
}

impl IssueSeverity {
    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

/// A single simulated data-quality defect attached to one KPI of a vessel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub issue_type: IssueType,
    pub kpi: String,
    pub message: String,
    pub severity: IssueSeverity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_value: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityType {
    Normal,
    Missing,
    Incorrect,
}

impl QualityType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Missing => "Missing",
            Self::Incorrect => "Incorrect",
        }
    }

    pub const fn is_issue(self) -> bool {
        !matches!(self, Self::Normal)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityGrade {
    Good,
    Acceptable,
    Poor,
}

impl QualityGrade {
    pub const fn ordered() -> [Self; 3] {
        [Self::Good, Self::Acceptable, Self::Poor]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Good => "Good",
            Self::Acceptable => "Acceptable",
            Self::Poor => "Poor",
        }
    }
}

/// Reporting cadence of a telemetry feed.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum DataFrequency {
    /// Noon reports, one sample per day.
    #[default]
    Daily,
    /// Automated logger feed, sampled every six hours.
    HighFrequency,
}

impl DataFrequency {
    pub const fn ordered() -> [Self; 2] {
        [Self::Daily, Self::HighFrequency]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Daily => "Daily",
            Self::HighFrequency => "High Frequency",
        }
    }

    pub const fn samples_per_day(self) -> u32 {
        match self {
            Self::Daily => 1,
            Self::HighFrequency => 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roster_has_ten_unique_vessels() {
        let roster = fleet_roster();
        assert_eq!(roster.len(), 10);
        let mut ids: Vec<_> = roster.iter().map(|vessel| vessel.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 10);
    }

    #[test]
    fn only_normal_quality_is_issue_free() {
        assert!(!QualityType::Normal.is_issue());
        assert!(QualityType::Missing.is_issue());
        assert!(QualityType::Incorrect.is_issue());
    }

    #[test]
    fn frequency_serializes_as_snake_case() {
        let raw = serde_json::to_string(&DataFrequency::HighFrequency).expect("serializes");
        assert_eq!(raw, "\"high_frequency\"");
    }

    #[test]
    fn frequencies_sort_in_display_order() {
        let mut feeds = vec![DataFrequency::HighFrequency, DataFrequency::Daily];
        feeds.sort();
        assert_eq!(feeds, DataFrequency::ordered());
    }
}
