use chrono::{DateTime, Local};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tracing::info;

use crate::error::Result;
use crate::models::{FilterCriteria, Histogram, MonthlySummary, ParseStats, TemperatureSummary};
use crate::utils::constants::{BAR_MARKER, DEFAULT_BAR_WIDTH, REPORT_SEPARATOR_WIDTH};

/// Everything one analysis run produced, as written to the JSON report.
#[derive(Debug, Clone, Serialize)]
pub struct AggregateReport {
    pub generated_at: DateTime<Local>,
    pub source: String,
    pub criteria: FilterCriteria,
    pub work_group_size: usize,
    pub parse_stats: ParseStats,
    pub summary: TemperatureSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub histogram: Option<Histogram>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub monthly: Vec<MonthlySummary>,
}

impl AggregateReport {
    pub fn new(
        source: impl Into<String>,
        criteria: FilterCriteria,
        work_group_size: usize,
        parse_stats: ParseStats,
        summary: TemperatureSummary,
    ) -> Self {
        Self {
            generated_at: Local::now(),
            source: source.into(),
            criteria,
            work_group_size,
            parse_stats,
            summary,
            histogram: None,
            monthly: Vec::new(),
        }
    }

    pub fn with_histogram(mut self, histogram: Histogram) -> Self {
        self.histogram = Some(histogram);
        self
    }

    pub fn with_monthly(mut self, monthly: Vec<MonthlySummary>) -> Self {
        self.monthly = monthly;
        self
    }
}

/// Renders statistics as text and writes JSON reports.
pub struct ReportWriter {
    bar_width: usize,
}

impl ReportWriter {
    pub fn new() -> Self {
        Self {
            bar_width: DEFAULT_BAR_WIDTH,
        }
    }

    pub fn with_bar_width(mut self, bar_width: usize) -> Self {
        self.bar_width = bar_width;
        self
    }

    pub fn render_summary(&self, summary: &TemperatureSummary) -> String {
        format!(
            "The maximum temperature is = {:.1}\n\
            The minimum temperature is = {:.1}\n\
            The Average Temperature is = {:.2}",
            summary.max_degrees(),
            summary.min_degrees(),
            summary.average_degrees()
        )
    }

    pub fn render_histogram(&self, histogram: &Histogram) -> String {
        let mut lines = vec!["-".repeat(REPORT_SEPARATOR_WIDTH)];

        for bin in histogram.bins() {
            let bar: String = std::iter::repeat(BAR_MARKER)
                .take(histogram.bar_length(bin.count, self.bar_width))
                .collect();
            lines.push(format!(
                "  ({:.2})   \t - \t   ({:.2}):\t{}\t |{}",
                bin.lower, bin.upper, bin.count, bar
            ));
        }

        lines.join("\n")
    }

    pub fn render_monthly(&self, monthly: &[MonthlySummary]) -> String {
        let mut lines = vec![format!(
            "{:<10} {:>8} {:>8} {:>8} {:>10}",
            "Month", "Min", "Max", "Average", "Records"
        )];

        for entry in monthly {
            lines.push(format!(
                "{:<10} {:>8.1} {:>8.1} {:>8.2} {:>10}",
                entry.month_name(),
                entry.summary.min_degrees(),
                entry.summary.max_degrees(),
                entry.summary.average_degrees(),
                entry.summary.count
            ));
        }

        lines.join("\n")
    }

    pub fn render_report(&self, report: &AggregateReport) -> String {
        let mut sections = vec![
            format!("Source: {} ({})", report.source, report.criteria),
            report.parse_stats.summary(),
            self.render_summary(&report.summary),
        ];
        if let Some(histogram) = &report.histogram {
            sections.push(self.render_histogram(histogram));
        }
        if !report.monthly.is_empty() {
            sections.push(self.render_monthly(&report.monthly));
        }
        sections.join("\n\n")
    }

    /// Write `report` as pretty-printed JSON, creating parent directories.
    pub fn write_json(&self, report: &AggregateReport, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, report)?;

        info!(path = %path.display(), "report written");
        Ok(())
    }
}

impl Default for ReportWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BinLayout, FilterField};
    use tempfile::TempDir;

    fn scenario_report() -> AggregateReport {
        let summary = TemperatureSummary::new(4, 10, 40, 100).unwrap();
        let histogram = Histogram::new(BinLayout::new(10, 40, 2).unwrap(), vec![2, 2]).unwrap();
        AggregateReport::new(
            "lincolnshire.txt",
            FilterCriteria::new().with(FilterField::Year, "1987"),
            4,
            ParseStats::default(),
            summary,
        )
        .with_histogram(histogram)
    }

    #[test]
    fn test_render_summary_in_degrees() {
        let summary = TemperatureSummary::new(4, 10, 40, 100).unwrap();
        let text = ReportWriter::new().render_summary(&summary);
        assert!(text.contains("The maximum temperature is = 4.0"));
        assert!(text.contains("The minimum temperature is = 1.0"));
        assert!(text.contains("The Average Temperature is = 2.50"));
    }

    #[test]
    fn test_render_histogram_rows() {
        let report = scenario_report();
        let text = ReportWriter::new()
            .with_bar_width(10)
            .render_histogram(report.histogram.as_ref().unwrap());

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].len(), REPORT_SEPARATOR_WIDTH);
        assert!(lines[1].contains("(1.00)"));
        assert!(lines[1].contains("(2.50)"));
        assert!(lines[2].ends_with("|##########"));
    }

    #[test]
    fn test_write_json_report() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("nested").join("report.json");

        ReportWriter::new().write_json(&scenario_report(), &path)?;

        let json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path)?)?;
        assert_eq!(json["summary"]["min"], 10);
        assert_eq!(json["summary"]["average"], 25.0);
        assert_eq!(json["histogram"]["counts"], serde_json::json!([2, 2]));
        assert!(json.get("monthly").is_none());
        Ok(())
    }

    #[test]
    fn test_monthly_report_text_and_json() -> Result<()> {
        let monthly = vec![
            MonthlySummary {
                month: 1,
                summary: TemperatureSummary::new(2, -20, 10, -10)?,
            },
            MonthlySummary {
                month: 7,
                summary: TemperatureSummary::new(2, 190, 210, 400)?,
            },
        ];
        let report = AggregateReport::new(
            "lincolnshire.txt",
            FilterCriteria::new(),
            64,
            ParseStats::default(),
            TemperatureSummary::new(4, -20, 210, 390)?,
        )
        .with_monthly(monthly);

        let text = ReportWriter::new().render_report(&report);
        assert!(text.starts_with("Source: lincolnshire.txt (all records)"));
        assert!(text.contains("The maximum temperature is = 21.0"));
        assert!(text.contains("January"));
        assert!(text.contains("July"));
        assert!(!text.contains(&"-".repeat(REPORT_SEPARATOR_WIDTH)));

        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("monthly.json");
        ReportWriter::new().write_json(&report, &path)?;

        let json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path)?)?;
        assert_eq!(json["monthly"][1]["month"], 7);
        assert_eq!(json["monthly"][0]["summary"]["min"], -20);
        assert!(json.get("histogram").is_none());
        Ok(())
    }
}
