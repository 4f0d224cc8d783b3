use super::catalog::TRACKED_KPI_COUNT;
use super::domain::{Issue, IssueSeverity, IssueType, QualityGrade};
use rand::Rng;
use serde::{Deserialize, Serialize};

pub const COMPLETENESS_FLOOR: f64 = 40.0;
pub const CORRECTNESS_FLOOR: f64 = 30.0;
/// Exclusive upper bound of the jitter subtracted from each score.
pub const MAX_JITTER: f64 = 5.0;

const HIGH_SEVERITY_PENALTY: f64 = 30.0;
const MEDIUM_SEVERITY_PENALTY: f64 = 15.0;
const PER_INCORRECT_PENALTY: f64 = 5.0;

/// Noise subtracted from a vessel's scores so the fleet view does not look
/// synthetic. Drawn once per profile.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScoreJitter {
    pub completeness: f64,
    pub correctness: f64,
}

impl ScoreJitter {
    pub const NONE: Self = Self {
        completeness: 0.0,
        correctness: 0.0,
    };

    pub fn draw<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            completeness: rng.gen_range(0.0..MAX_JITTER),
            correctness: rng.gen_range(0.0..MAX_JITTER),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VesselScore {
    pub completeness: f64,
    pub correctness: f64,
    pub overall_score: u8,
}

/// Grade boundaries shared by the scorer, trend history, and alerting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualityThresholds {
    pub good_completeness: f64,
    pub good_correctness: f64,
    pub acceptable_completeness: f64,
    pub acceptable_correctness: f64,
}

impl Default for QualityThresholds {
    fn default() -> Self {
        Self {
            good_completeness: 95.0,
            good_correctness: 98.0,
            acceptable_completeness: 85.0,
            acceptable_correctness: 90.0,
        }
    }
}

impl QualityThresholds {
    pub fn grade(&self, completeness: f64, correctness: f64) -> QualityGrade {
        if completeness >= self.good_completeness && correctness >= self.good_correctness {
            QualityGrade::Good
        } else if completeness >= self.acceptable_completeness
            && correctness >= self.acceptable_correctness
        {
            QualityGrade::Acceptable
        } else {
            QualityGrade::Poor
        }
    }
}

/// Converts issue counts into completeness/correctness percentages.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualityScorer {
    tracked_kpis: usize,
}

impl Default for QualityScorer {
    fn default() -> Self {
        Self::new(TRACKED_KPI_COUNT)
    }
}

impl QualityScorer {
    pub fn new(tracked_kpis: usize) -> Self {
        Self { tracked_kpis }
    }

    pub fn tracked_kpis(&self) -> usize {
        self.tracked_kpis
    }

    pub fn score(
        &self,
        missing_count: usize,
        incorrect_count: usize,
        issues: &[Issue],
        jitter: ScoreJitter,
    ) -> VesselScore {
        let missing_ratio = if self.tracked_kpis == 0 {
            0.0
        } else {
            missing_count as f64 / self.tracked_kpis as f64
        };
        let completeness =
            (100.0 - missing_ratio * 100.0 - jitter.completeness).max(COMPLETENESS_FLOOR);

        let correctness =
            (100.0 - severity_penalty(incorrect_count, issues) - jitter.correctness)
                .max(CORRECTNESS_FLOOR);

        VesselScore {
            completeness,
            correctness,
            overall_score: overall_score(completeness, correctness),
        }
    }
}

/// Penalty from correctness issues: weighted by severity, plus a flat
/// amount per incorrect unit.
pub fn severity_penalty(incorrect_count: usize, issues: &[Issue]) -> f64 {
    let (high, medium) = issues
        .iter()
        .filter(|issue| issue.issue_type == IssueType::Correctness)
        .fold((0usize, 0usize), |(high, medium), issue| match issue.severity {
            IssueSeverity::High => (high + 1, medium),
            IssueSeverity::Medium => (high, medium + 1),
            IssueSeverity::Low => (high, medium),
        });

    HIGH_SEVERITY_PENALTY * high as f64
        + MEDIUM_SEVERITY_PENALTY * medium as f64
        + PER_INCORRECT_PENALTY * incorrect_count as f64
}

pub fn overall_score(completeness: f64, correctness: f64) -> u8 {
    ((completeness + correctness) / 2.0).round().clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn correctness_issue(severity: IssueSeverity) -> Issue {
        Issue {
            issue_type: IssueType::Correctness,
            kpi: "rpm".to_string(),
            message: "RPM-speed correlation warning".to_string(),
            severity,
            original_value: Some(250.0),
        }
    }

    fn completeness_issue() -> Issue {
        Issue {
            issue_type: IssueType::Completeness,
            kpi: "wind_force".to_string(),
            message: "Sensor data unavailable".to_string(),
            severity: IssueSeverity::Medium,
            original_value: None,
        }
    }

    #[test]
    fn clean_profile_scores_full_marks_without_jitter() {
        let score = QualityScorer::default().score(0, 0, &[], ScoreJitter::NONE);
        assert_eq!(score.completeness, 100.0);
        assert_eq!(score.correctness, 100.0);
        assert_eq!(score.overall_score, 100);
    }

    #[test]
    fn completeness_issues_do_not_count_toward_severity_penalty() {
        let issues = vec![completeness_issue(), completeness_issue()];
        assert_eq!(severity_penalty(0, &issues), 0.0);
    }

    #[test]
    fn scores_clamp_to_floors() {
        let issues: Vec<_> = (0..6)
            .map(|_| correctness_issue(IssueSeverity::High))
            .collect();
        let score = QualityScorer::default().score(
            20,
            6,
            &issues,
            ScoreJitter {
                completeness: 4.9,
                correctness: 4.9,
            },
        );
        assert_eq!(score.completeness, COMPLETENESS_FLOOR);
        assert_eq!(score.correctness, CORRECTNESS_FLOOR);
        assert_eq!(score.overall_score, 35);
    }

    #[test]
    fn more_issues_never_raise_scores() {
        let scorer = QualityScorer::default();
        let jitter = ScoreJitter {
            completeness: 2.0,
            correctness: 2.0,
        };
        let mut previous = scorer.score(0, 0, &[], jitter);
        let mut issues = Vec::new();
        for count in 1..6 {
            issues.push(correctness_issue(IssueSeverity::Low));
            let next = scorer.score(count, count, &issues, jitter);
            assert!(next.completeness <= previous.completeness);
            assert!(next.correctness <= previous.correctness);
            previous = next;
        }
    }

    #[test]
    fn zero_tracked_kpis_does_not_divide_by_zero() {
        let score = QualityScorer::new(0).score(3, 0, &[], ScoreJitter::NONE);
        assert_eq!(score.completeness, 100.0);
    }

    #[test]
    fn grade_boundaries_are_inclusive() {
        let thresholds = QualityThresholds::default();
        assert_eq!(thresholds.grade(95.0, 98.0), QualityGrade::Good);
        assert_eq!(thresholds.grade(94.9, 98.0), QualityGrade::Acceptable);
        assert_eq!(thresholds.grade(85.0, 90.0), QualityGrade::Acceptable);
        assert_eq!(thresholds.grade(85.0, 89.9), QualityGrade::Poor);
    }
}
