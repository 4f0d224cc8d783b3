use super::domain::QualityType;
use super::injector::QualitySeries;
use std::io::Write;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Writes the series as one CSV row per sample, one column per vessel KPI,
/// followed by a count of flagged cells. Missing readings are left empty.
pub fn write_series_csv<W: Write>(series: &QualitySeries, writer: W) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    let mut header = Vec::with_capacity(series.columns.len() + 2);
    header.push("timestamp".to_string());
    header.extend(series.columns.iter().map(|column| column.header()));
    header.push("flagged".to_string());
    csv_writer.write_record(&header)?;

    for row in &series.rows {
        let mut record = Vec::with_capacity(header.len());
        record.push(row.timestamp.format(TIMESTAMP_FORMAT).to_string());
        record.extend(row.points.iter().map(|point| match point.value {
            Some(value) => format!("{value:.2}"),
            None => String::new(),
        }));
        let flagged = row
            .points
            .iter()
            .filter(|point| point.quality_type != QualityType::Normal)
            .count();
        record.push(flagged.to_string());
        csv_writer.write_record(&record)?;
    }

    csv_writer.flush()?;
    Ok(())
}
