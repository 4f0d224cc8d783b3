use crate::infra::{build_engine, kpi_selection, parse_date, vessel_selection};
use chrono::{Local, NaiveDate, Utc};
use clap::Args;
use fleet_quality::config::{AppConfig, TelemetryConfig};
use fleet_quality::error::AppError;
use fleet_quality::telemetry::{self, TelemetryError};
use fleet_quality::quality::{
    check_window, write_series_csv, AssessmentRequest, DataFrequency, DateRange, KpiCatalog,
    QualityAssessment,
};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    /// Last day of the assessment window (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Number of days in the window, ending on `today`
    #[arg(long, default_value_t = 14)]
    pub(crate) days: u32,
    /// Restrict sampling to these vessel ids (repeatable)
    #[arg(long = "vessel")]
    pub(crate) vessels: Vec<String>,
    /// Restrict sampling to these KPI ids (repeatable)
    #[arg(long = "kpi")]
    pub(crate) kpis: Vec<String>,
    /// Override the configured completeness alert threshold
    #[arg(long)]
    pub(crate) threshold: Option<f64>,
    /// Print the full assessment as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ExportArgs {
    /// Last day of the exported window (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Number of days in the window, ending on `today`
    #[arg(long, default_value_t = 7)]
    pub(crate) days: u32,
    /// Restrict the export to these vessel ids (repeatable)
    #[arg(long = "vessel")]
    pub(crate) vessels: Vec<String>,
    /// Restrict the export to these KPI ids (repeatable)
    #[arg(long = "kpi")]
    pub(crate) kpis: Vec<String>,
    /// Sample four times a day instead of once
    #[arg(long)]
    pub(crate) high_frequency: bool,
    /// Destination file (defaults to stdout)
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
}

/// Logs go to stderr so CSV and JSON written to stdout stay clean.
fn init_logging(config: &TelemetryConfig) -> Result<(), AppError> {
    match telemetry::init(config) {
        Ok(()) | Err(TelemetryError::Subscriber(_)) => Ok(()),
        Err(error) => Err(error.into()),
    }
}

pub(crate) fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    init_logging(&config.telemetry)?;
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());

    let mut settings = config.quality.alerts;
    if let Some(threshold) = args.threshold {
        settings.alert_threshold = threshold.clamp(0.0, 100.0);
    }

    let window = DateRange::trailing(today, args.days);
    check_window(&window)?;
    let request = AssessmentRequest {
        vessels: vessel_selection(&args.vessels),
        kpis: kpi_selection(&args.kpis),
        settings,
        ..AssessmentRequest::for_window(window)
    };

    let mut engine = build_engine(&config.quality);
    let assessment = engine.assess(&request, Utc::now());

    if args.json {
        let rendered = serde_json::to_string_pretty(&assessment).map_err(io::Error::from)?;
        println!("{rendered}");
    } else {
        render_assessment(&assessment);
    }

    Ok(())
}

pub(crate) fn run_export(args: ExportArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    init_logging(&config.telemetry)?;
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let frequency = if args.high_frequency {
        DataFrequency::HighFrequency
    } else {
        DataFrequency::Daily
    };

    let window = DateRange::trailing(today, args.days);
    check_window(&window)?;

    let mut engine = build_engine(&config.quality);
    let vessels = vessel_selection(&args.vessels)
        .unwrap_or_else(|| engine.profiles().vessels().map(|v| v.id.clone()).collect());
    let kpis = kpi_selection(&args.kpis).unwrap_or_else(|| engine.catalog().ids());
    let series = engine.inject_faults(
        &window,
        &vessels,
        &kpis,
        frequency,
    );

    match args.output {
        Some(path) => {
            let writer = BufWriter::new(File::create(&path)?);
            write_series_csv(&series, writer)?;
            eprintln!(
                "Wrote {} rows x {} columns to {}",
                series.rows.len(),
                series.columns.len(),
                path.display()
            );
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            write_series_csv(&series, &mut handle)?;
            handle.flush()?;
        }
    }

    Ok(())
}

pub(crate) fn render_assessment(assessment: &QualityAssessment) {
    let fleet = &assessment.fleet;

    println!("Fleet data quality");
    println!(
        "Window: {} -> {} (assessed {})",
        assessment.window.start,
        assessment.window.end,
        assessment.assessed_at.format("%Y-%m-%d %H:%M UTC")
    );
    println!(
        "Alert threshold: {:.0}% | real-time checks {}",
        assessment.settings.alert_threshold,
        if assessment.settings.enable_real_time_checks {
            "on"
        } else {
            "off"
        }
    );

    println!("\nFleet summary");
    println!(
        "- Health {}% ({}) | completeness {:.1}% | correctness {:.1}%",
        fleet.overall_health,
        assessment.insights.health_label,
        fleet.avg_completeness,
        fleet.avg_correctness
    );
    println!(
        "- {} healthy, {} average, {} poor of {} vessels",
        fleet.healthy_vessels, fleet.average_vessels, fleet.poor_vessels, fleet.total_vessels
    );
    println!(
        "- {} issues ({} missing, {} incorrect, {} high severity)",
        fleet.total_issues, fleet.missing_issues, fleet.incorrect_issues, fleet.critical_issues
    );

    println!("\nGrade distribution");
    for entry in &assessment.grade_distribution {
        println!("- {}: {}", entry.grade_label, entry.vessels);
    }

    println!("\nVessels");
    for view in &assessment.vessels {
        println!(
            "- {} {}: {}% [{}] completeness {:.1}% correctness {:.1}% ({} missing, {} incorrect)",
            view.vessel_id,
            view.vessel_name,
            view.overall_score,
            view.grade_label,
            view.completeness,
            view.correctness,
            view.missing_count,
            view.incorrect_count
        );
    }

    if !assessment.completeness.is_empty() {
        println!("\nObserved completeness (daily feed)");
        for vessel in &assessment.completeness {
            println!(
                "- {}: {:.1}% over {} sensor-day(s)",
                vessel.vessel_name, vessel.completeness, vessel.records
            );
        }
    }

    if assessment.new_alerts.is_empty() {
        println!("\nAlerts: none");
    } else {
        println!("\nAlerts");
        for alert in &assessment.new_alerts {
            println!(
                "- [{}] {}: {}",
                alert.severity.label(),
                alert.title,
                alert.message
            );
        }
    }

    println!("\nInsights");
    for note in &assessment.insights.observations {
        println!("- {note}");
    }
    if !assessment.insights.focus_vessels.is_empty() {
        println!(
            "Focus vessels: {}",
            assessment.insights.focus_vessels.join(", ")
        );
    }
    println!("Recommended actions");
    for action in &assessment.insights.recommended_actions {
        println!("- {action}");
    }
}
