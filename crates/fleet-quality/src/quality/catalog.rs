use serde::Serialize;

/// Number of KPIs a vessel is expected to report. Completeness is scored
/// against this denominator.
pub const TRACKED_KPI_COUNT: usize = 8;

/// Static metadata describing one telemetry KPI.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiMeta {
    pub id: &'static str,
    pub name: &'static str,
    pub unit: &'static str,
    /// Lower bound of the nominal physical range.
    pub min: f64,
    /// Upper bound of the nominal physical range.
    pub max: f64,
    /// Value written for an incorrect reading when the issue carries none.
    pub incorrect_fallback: f64,
    pub color: &'static str,
}

impl KpiMeta {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }
}

/// Lookup service for KPI metadata. Callers must tolerate unknown ids.
pub trait KpiCatalog: Send + Sync {
    fn kpis(&self) -> &[KpiMeta];

    fn lookup(&self, id: &str) -> Option<&KpiMeta> {
        self.kpis().iter().find(|meta| meta.id == id)
    }

    fn ids(&self) -> Vec<String> {
        self.kpis().iter().map(|meta| meta.id.to_string()).collect()
    }
}

#[derive(Debug, Clone)]
pub struct StandardKpiCatalog {
    entries: Vec<KpiMeta>,
}

impl StandardKpiCatalog {
    pub fn standard() -> Self {
        let entries = vec![
            KpiMeta {
                id: "obs_speed",
                name: "Observed Speed",
                unit: "kn",
                min: 8.0,
                max: 18.0,
                incorrect_fallback: 35.0,
                color: "#1f77b4",
            },
            KpiMeta {
                id: "me_consumption",
                name: "Main Engine Consumption",
                unit: "t/day",
                min: 15.0,
                max: 40.0,
                incorrect_fallback: 95.0,
                color: "#ff7f0e",
            },
            KpiMeta {
                id: "me_power",
                name: "Main Engine Power",
                unit: "kW",
                min: 6000.0,
                max: 15000.0,
                incorrect_fallback: 25000.0,
                color: "#2ca02c",
            },
            KpiMeta {
                id: "rpm",
                name: "Shaft RPM",
                unit: "rpm",
                min: 60.0,
                max: 110.0,
                incorrect_fallback: 250.0,
                color: "#d62728",
            },
            KpiMeta {
                id: "wind_force",
                name: "Wind Force",
                unit: "Bft",
                min: 0.0,
                max: 9.0,
                incorrect_fallback: 15.0,
                color: "#9467bd",
            },
            KpiMeta {
                id: "total_consumption",
                name: "Total Consumption",
                unit: "t/day",
                min: 18.0,
                max: 48.0,
                incorrect_fallback: 120.0,
                color: "#8c564b",
            },
            KpiMeta {
                id: "slip",
                name: "Propeller Slip",
                unit: "%",
                min: 0.0,
                max: 20.0,
                incorrect_fallback: 65.0,
                color: "#e377c2",
            },
            KpiMeta {
                id: "sfoc",
                name: "Specific Fuel Oil Consumption",
                unit: "g/kWh",
                min: 160.0,
                max: 200.0,
                incorrect_fallback: 340.0,
                color: "#7f7f7f",
            },
        ];

        Self { entries }
    }
}

impl Default for StandardKpiCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl KpiCatalog for StandardKpiCatalog {
    fn kpis(&self) -> &[KpiMeta] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_catalog_tracks_expected_kpi_count() {
        let catalog = StandardKpiCatalog::standard();
        assert_eq!(catalog.kpis().len(), TRACKED_KPI_COUNT);
    }

    #[test]
    fn lookup_returns_none_for_unknown_ids() {
        let catalog = StandardKpiCatalog::standard();
        assert!(catalog.lookup("rpm").is_some());
        assert!(catalog.lookup("bogus_kpi").is_none());
    }

    #[test]
    fn fallbacks_sit_outside_nominal_range() {
        let catalog = StandardKpiCatalog::standard();
        for meta in catalog.kpis() {
            assert!(
                !meta.contains(meta.incorrect_fallback),
                "{} fallback should be out of range",
                meta.id
            );
        }
    }
}
