use super::domain::{Issue, IssueSeverity, IssueType, QualityGrade, Vessel, VesselId};
use super::scoring::{QualityScorer, QualityThresholds, ScoreJitter, VesselScore};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Declared number of completeness and correctness faults for a vessel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuePattern {
    pub missing: usize,
    pub incorrect: usize,
}

impl IssuePattern {
    pub const fn new(missing: usize, incorrect: usize) -> Self {
        Self { missing, incorrect }
    }
}

/// Per-vessel fault table, applied cyclically by roster position.
pub const ISSUE_PATTERNS: [IssuePattern; 10] = [
    IssuePattern::new(0, 0),
    IssuePattern::new(1, 0),
    IssuePattern::new(2, 3),
    IssuePattern::new(0, 1),
    IssuePattern::new(1, 2),
    IssuePattern::new(3, 1),
    IssuePattern::new(0, 0),
    IssuePattern::new(4, 4),
    IssuePattern::new(2, 1),
    IssuePattern::new(1, 1),
];

/// KPIs that issues are assigned to, round-robin.
pub const PROFILE_KPIS: [&str; 5] = ["wind_force", "me_power", "rpm", "me_consumption", "obs_speed"];

const MISSING_MESSAGE: &str = "Sensor data unavailable";

/// Message and literal reading for the n-th correctness issue; the last
/// entry repeats for every later issue.
const INCORRECT_FINDINGS: [(&str, f64); 3] = [
    ("Negative speed detected", -2.5),
    ("Consumption spike detected", 45.8),
    ("RPM-speed correlation warning", 250.0),
];

pub fn pattern_for(index: usize) -> IssuePattern {
    ISSUE_PATTERNS[index % ISSUE_PATTERNS.len()]
}

fn incorrect_severity(position: usize) -> IssueSeverity {
    match position {
        0 => IssueSeverity::High,
        1 => IssueSeverity::Medium,
        _ => IssueSeverity::Low,
    }
}

/// Expands a pattern into its ordered issue list: completeness issues
/// first, then correctness issues.
pub fn build_issues(pattern: IssuePattern) -> Vec<Issue> {
    let missing = (0..pattern.missing).map(|position| Issue {
        issue_type: IssueType::Completeness,
        kpi: PROFILE_KPIS[position % PROFILE_KPIS.len()].to_string(),
        message: MISSING_MESSAGE.to_string(),
        severity: IssueSeverity::Medium,
        original_value: None,
    });

    let incorrect = (0..pattern.incorrect).map(|position| {
        let (message, value) = INCORRECT_FINDINGS[position.min(INCORRECT_FINDINGS.len() - 1)];
        Issue {
            issue_type: IssueType::Correctness,
            kpi: PROFILE_KPIS[position % PROFILE_KPIS.len()].to_string(),
            message: message.to_string(),
            severity: incorrect_severity(position),
            original_value: Some(value),
        }
    });

    missing.chain(incorrect).collect()
}

/// A vessel's simulated data-quality defects and the scores derived from them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueProfile {
    pub vessel_index: usize,
    pub missing_count: usize,
    pub incorrect_count: usize,
    pub issues: Vec<Issue>,
    pub completeness: f64,
    pub correctness: f64,
    pub overall_score: u8,
    pub jitter: ScoreJitter,
}

impl IssueProfile {
    pub fn generate<R: Rng + ?Sized>(index: usize, scorer: &QualityScorer, rng: &mut R) -> Self {
        Self::from_pattern(index, pattern_for(index), scorer, ScoreJitter::draw(rng))
    }

    pub fn from_pattern(
        index: usize,
        pattern: IssuePattern,
        scorer: &QualityScorer,
        jitter: ScoreJitter,
    ) -> Self {
        let issues = build_issues(pattern);
        let score = scorer.score(pattern.missing, pattern.incorrect, &issues, jitter);

        Self {
            vessel_index: index,
            missing_count: pattern.missing,
            incorrect_count: pattern.incorrect,
            issues,
            completeness: score.completeness,
            correctness: score.correctness,
            overall_score: score.overall_score,
            jitter,
        }
    }

    pub fn score(&self) -> VesselScore {
        VesselScore {
            completeness: self.completeness,
            correctness: self.correctness,
            overall_score: self.overall_score,
        }
    }

    pub fn grade(&self, thresholds: &QualityThresholds) -> QualityGrade {
        thresholds.grade(self.completeness, self.correctness)
    }

    pub fn issue_count(&self) -> usize {
        self.issues.len()
    }

    pub fn critical_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|issue| issue.severity == IssueSeverity::High)
            .count()
    }

    /// First issue of the given type on a KPI, if the profile declares one.
    pub fn issue_for(&self, kpi: &str, issue_type: IssueType) -> Option<&Issue> {
        self.issues
            .iter()
            .find(|issue| issue.issue_type == issue_type && issue.kpi == kpi)
    }
}

/// Session-wide profile cache. Profiles are computed once from a seed so
/// every view of a vessel agrees on its scores.
#[derive(Debug, Clone)]
pub struct ProfileBook {
    seed: u64,
    scorer: QualityScorer,
    entries: Vec<(Vessel, IssueProfile)>,
}

impl ProfileBook {
    pub fn new(roster: Vec<Vessel>, scorer: QualityScorer, seed: u64) -> Self {
        let entries: Vec<_> = roster
            .into_iter()
            .enumerate()
            .map(|(index, vessel)| {
                let profile = derive_profile(seed, index, &scorer);
                (vessel, profile)
            })
            .collect();

        debug!(vessels = entries.len(), seed, "issue profiles computed");

        Self {
            seed,
            scorer,
            entries,
        }
    }

    /// Builds a book from explicit profiles, bypassing the pattern table.
    pub fn from_entries(entries: Vec<(Vessel, IssueProfile)>, scorer: QualityScorer) -> Self {
        Self {
            seed: 0,
            scorer,
            entries,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[(Vessel, IssueProfile)] {
        &self.entries
    }

    pub fn vessels(&self) -> impl Iterator<Item = &Vessel> {
        self.entries.iter().map(|(vessel, _)| vessel)
    }

    pub fn profiles(&self) -> impl Iterator<Item = &IssueProfile> {
        self.entries.iter().map(|(_, profile)| profile)
    }

    pub fn get(&self, index: usize) -> Option<&IssueProfile> {
        self.entries.get(index).map(|(_, profile)| profile)
    }

    /// Cached profile for roster positions, derived on demand past the end.
    pub fn issue_profile(&self, index: usize) -> IssueProfile {
        match self.get(index) {
            Some(profile) => profile.clone(),
            None => derive_profile(self.seed, index, &self.scorer),
        }
    }

    pub fn vessel(&self, id: &VesselId) -> Option<&Vessel> {
        self.entries
            .iter()
            .map(|(vessel, _)| vessel)
            .find(|vessel| &vessel.id == id)
    }

    pub fn profile_for(&self, id: &VesselId) -> Option<&IssueProfile> {
        self.entries
            .iter()
            .find(|(vessel, _)| &vessel.id == id)
            .map(|(_, profile)| profile)
    }
}

fn derive_profile(seed: u64, index: usize, scorer: &QualityScorer) -> IssueProfile {
    let mut rng = StdRng::seed_from_u64(vessel_seed(seed, index));
    IssueProfile::generate(index, scorer, &mut rng)
}

fn vessel_seed(seed: u64, index: usize) -> u64 {
    seed ^ (index as u64).wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quality::domain::fleet_roster;
    use crate::quality::scoring::{COMPLETENESS_FLOOR, CORRECTNESS_FLOOR};

    #[test]
    fn issue_count_matches_declared_counts_for_every_pattern() {
        let scorer = QualityScorer::default();
        let mut rng = StdRng::seed_from_u64(7);
        for index in 0..25 {
            let profile = IssueProfile::generate(index, &scorer, &mut rng);
            assert_eq!(
                profile.issues.len(),
                profile.missing_count + profile.incorrect_count
            );
        }
    }

    #[test]
    fn patterns_cycle_past_table_length() {
        assert_eq!(pattern_for(2), pattern_for(12));
        assert_eq!(pattern_for(0), pattern_for(ISSUE_PATTERNS.len()));
    }

    #[test]
    fn incorrect_issues_follow_severity_and_message_order() {
        let issues = build_issues(IssuePattern::new(0, 4));
        let severities: Vec<_> = issues.iter().map(|issue| issue.severity).collect();
        assert_eq!(
            severities,
            vec![
                IssueSeverity::High,
                IssueSeverity::Medium,
                IssueSeverity::Low,
                IssueSeverity::Low
            ]
        );
        assert_eq!(issues[0].message, "Negative speed detected");
        assert_eq!(issues[0].original_value, Some(-2.5));
        assert_eq!(issues[1].original_value, Some(45.8));
        assert_eq!(issues[3].message, "RPM-speed correlation warning");
        assert_eq!(issues[3].original_value, Some(250.0));
    }

    #[test]
    fn issues_rotate_through_profile_kpis() {
        let issues = build_issues(IssuePattern::new(6, 0));
        let kpis: Vec<_> = issues.iter().map(|issue| issue.kpi.as_str()).collect();
        assert_eq!(
            kpis,
            vec![
                "wind_force",
                "me_power",
                "rpm",
                "me_consumption",
                "obs_speed",
                "wind_force"
            ]
        );
        assert!(issues
            .iter()
            .all(|issue| issue.severity == IssueSeverity::Medium
                && issue.message == "Sensor data unavailable"));
    }

    #[test]
    fn book_is_reproducible_for_a_seed() {
        let first = ProfileBook::new(fleet_roster(), QualityScorer::default(), 99);
        let second = ProfileBook::new(fleet_roster(), QualityScorer::default(), 99);
        let left: Vec<_> = first.profiles().cloned().collect();
        let right: Vec<_> = second.profiles().cloned().collect();
        assert_eq!(left, right);
    }

    #[test]
    fn uncached_index_matches_a_fresh_book() {
        let book = ProfileBook::new(fleet_roster(), QualityScorer::default(), 5);
        let derived = book.issue_profile(14);
        assert_eq!(derived.vessel_index, 14);
        assert_eq!(derived, book.issue_profile(14));
        assert_eq!(derived.missing_count, pattern_for(14).missing);
    }

    #[test]
    fn profile_scores_respect_floors() {
        let book = ProfileBook::new(fleet_roster(), QualityScorer::default(), 1);
        for profile in book.profiles() {
            assert!((COMPLETENESS_FLOOR..=100.0).contains(&profile.completeness));
            assert!((CORRECTNESS_FLOOR..=100.0).contains(&profile.correctness));
        }
    }

    #[test]
    fn issue_lookup_distinguishes_types() {
        let profile = IssueProfile::from_pattern(
            2,
            IssuePattern::new(2, 3),
            &QualityScorer::default(),
            ScoreJitter::NONE,
        );
        let missing = profile
            .issue_for("me_power", IssueType::Completeness)
            .expect("me_power missing issue");
        assert_eq!(missing.severity, IssueSeverity::Medium);
        let incorrect = profile
            .issue_for("rpm", IssueType::Correctness)
            .expect("rpm incorrect issue");
        assert_eq!(incorrect.original_value, Some(250.0));
        assert!(profile
            .issue_for("rpm", IssueType::Completeness)
            .is_none());
        assert_eq!(profile.critical_count(), 1);
    }
}
