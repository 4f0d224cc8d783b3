use super::profile::IssueProfile;
use serde::{Deserialize, Serialize};

pub const HEALTHY_SCORE: u8 = 85;
pub const AVERAGE_SCORE: u8 = 70;

/// Health bucket of a vessel by overall score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthBucket {
    Healthy,
    Average,
    Poor,
}

impl HealthBucket {
    pub const fn for_score(score: u8) -> Self {
        if score >= HEALTHY_SCORE {
            Self::Healthy
        } else if score >= AVERAGE_SCORE {
            Self::Average
        } else {
            Self::Poor
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Healthy => "Healthy",
            Self::Average => "Average",
            Self::Poor => "Poor",
        }
    }
}

/// Fleet-wide rollup of vessel issue profiles.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FleetMetrics {
    pub avg_completeness: f64,
    pub avg_correctness: f64,
    pub overall_health: u8,
    pub total_issues: usize,
    pub critical_issues: usize,
    pub missing_issues: usize,
    pub incorrect_issues: usize,
    pub healthy_vessels: usize,
    pub average_vessels: usize,
    pub poor_vessels: usize,
    pub total_vessels: usize,
}

pub fn aggregate_fleet<'a, I>(profiles: I) -> FleetMetrics
where
    I: IntoIterator<Item = &'a IssueProfile>,
{
    let mut metrics = FleetMetrics::default();
    let mut completeness_sum = 0.0;
    let mut correctness_sum = 0.0;

    for profile in profiles {
        metrics.total_vessels += 1;
        completeness_sum += profile.completeness;
        correctness_sum += profile.correctness;
        metrics.total_issues += profile.issue_count();
        metrics.critical_issues += profile.critical_count();
        metrics.missing_issues += profile.missing_count;
        metrics.incorrect_issues += profile.incorrect_count;

        match HealthBucket::for_score(profile.overall_score) {
            HealthBucket::Healthy => metrics.healthy_vessels += 1,
            HealthBucket::Average => metrics.average_vessels += 1,
            HealthBucket::Poor => metrics.poor_vessels += 1,
        }
    }

    if metrics.total_vessels > 0 {
        let count = metrics.total_vessels as f64;
        metrics.avg_completeness = completeness_sum / count;
        metrics.avg_correctness = correctness_sum / count;
        metrics.overall_health = ((metrics.avg_completeness + metrics.avg_correctness) / 2.0)
            .round()
            .clamp(0.0, 100.0) as u8;
    }

    metrics
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quality::domain::fleet_roster;
    use crate::quality::profile::{IssuePattern, ProfileBook};
    use crate::quality::scoring::{QualityScorer, ScoreJitter};

    fn profile(index: usize, pattern: IssuePattern) -> IssueProfile {
        IssueProfile::from_pattern(index, pattern, &QualityScorer::default(), ScoreJitter::NONE)
    }

    #[test]
    fn empty_fleet_yields_zeroed_metrics() {
        let metrics = aggregate_fleet(std::iter::empty());
        assert_eq!(metrics, FleetMetrics::default());
    }

    #[test]
    fn buckets_partition_the_fleet() {
        let book = ProfileBook::new(fleet_roster(), QualityScorer::default(), 42);
        let metrics = aggregate_fleet(book.profiles());
        assert_eq!(metrics.total_vessels, 10);
        assert_eq!(
            metrics.healthy_vessels + metrics.average_vessels + metrics.poor_vessels,
            metrics.total_vessels
        );
    }

    #[test]
    fn sums_issue_counts_and_averages_scores() {
        let profiles = vec![
            profile(0, IssuePattern::new(0, 0)),
            profile(1, IssuePattern::new(2, 3)),
        ];
        let metrics = aggregate_fleet(&profiles);

        assert_eq!(metrics.total_issues, 5);
        assert_eq!(metrics.missing_issues, 2);
        assert_eq!(metrics.incorrect_issues, 3);
        assert_eq!(metrics.critical_issues, 1);
        assert_eq!(metrics.avg_completeness, (100.0 + 75.0) / 2.0);
        assert_eq!(metrics.avg_correctness, (100.0 + 40.0) / 2.0);
        assert_eq!(metrics.overall_health, 79);
        assert_eq!(metrics.healthy_vessels, 1);
        assert_eq!(metrics.poor_vessels, 1);
    }

    #[test]
    fn bucket_thresholds() {
        assert_eq!(HealthBucket::for_score(85), HealthBucket::Healthy);
        assert_eq!(HealthBucket::for_score(84), HealthBucket::Average);
        assert_eq!(HealthBucket::for_score(70), HealthBucket::Average);
        assert_eq!(HealthBucket::for_score(69), HealthBucket::Poor);
    }
}
