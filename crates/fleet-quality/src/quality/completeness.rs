use super::domain::{DataFrequency, VesselId};
use super::injector::QualitySeries;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Share of expected points one sensor (vessel KPI) reported on one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletenessRecord {
    pub vessel_id: VesselId,
    pub vessel_name: String,
    pub kpi: String,
    pub date: NaiveDate,
    pub frequency: DataFrequency,
    pub expected: usize,
    pub present: usize,
    pub completeness: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VesselCompleteness {
    pub vessel_id: VesselId,
    pub vessel_name: String,
    pub completeness: f64,
    pub records: usize,
}

/// Records are per sensor-day, so a single dark sensor shows up even when
/// the vessel's other KPIs report normally.
pub fn summarize_completeness(series: &QualitySeries) -> Vec<CompletenessRecord> {
    let mut tallies: BTreeMap<(VesselId, String, NaiveDate), (String, usize, usize)> =
        BTreeMap::new();

    for (column, row, point) in series.points() {
        let entry = tallies
            .entry((column.vessel_id.clone(), column.kpi.clone(), row.date()))
            .or_insert_with(|| (column.vessel_name.clone(), 0, 0));
        entry.1 += 1;
        if point.is_present() {
            entry.2 += 1;
        }
    }

    tallies
        .into_iter()
        .map(
            |((vessel_id, kpi, date), (vessel_name, expected, present))| CompletenessRecord {
                vessel_id,
                vessel_name,
                kpi,
                date,
                frequency: series.frequency,
                expected,
                present,
                completeness: percentage(present, expected),
            },
        )
        .collect()
}

/// Mean sensor-day completeness per vessel, ordered by vessel id.
pub fn vessel_averages(records: &[CompletenessRecord]) -> Vec<VesselCompleteness> {
    let mut sums: BTreeMap<&VesselId, (&str, f64, usize)> = BTreeMap::new();
    for record in records {
        let entry = sums
            .entry(&record.vessel_id)
            .or_insert((record.vessel_name.as_str(), 0.0, 0));
        entry.1 += record.completeness;
        entry.2 += 1;
    }

    sums.into_iter()
        .map(|(vessel_id, (name, total, count))| VesselCompleteness {
            vessel_id: vessel_id.clone(),
            vessel_name: name.to_string(),
            completeness: if count == 0 { 0.0 } else { total / count as f64 },
            records: count,
        })
        .collect()
}

fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}
