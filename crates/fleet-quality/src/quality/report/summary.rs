use super::super::domain::QualityGrade;
use super::super::fleet::HealthBucket;
use super::super::profile::ProfileBook;
use super::super::scoring::QualityThresholds;
use super::views::{GradeDistributionEntry, VesselQualityView};

pub fn vessel_views(book: &ProfileBook, thresholds: &QualityThresholds) -> Vec<VesselQualityView> {
    book.entries()
        .iter()
        .map(|(vessel, profile)| {
            let grade = profile.grade(thresholds);
            let bucket = HealthBucket::for_score(profile.overall_score);
            VesselQualityView {
                vessel_id: vessel.id.clone(),
                vessel_name: vessel.name.clone(),
                completeness: profile.completeness,
                correctness: profile.correctness,
                overall_score: profile.overall_score,
                grade,
                grade_label: grade.label(),
                bucket,
                bucket_label: bucket.label(),
                missing_count: profile.missing_count,
                incorrect_count: profile.incorrect_count,
                critical_issues: profile.critical_count(),
                issues: profile.issues.clone(),
            }
        })
        .collect()
}

pub fn grade_distribution(views: &[VesselQualityView]) -> Vec<GradeDistributionEntry> {
    QualityGrade::ordered()
        .into_iter()
        .map(|grade| GradeDistributionEntry {
            grade,
            grade_label: grade.label(),
            vessels: views.iter().filter(|view| view.grade == grade).count(),
        })
        .collect()
}
