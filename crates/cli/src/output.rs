//! Output formatting utilities

use clap::ValueEnum;
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};
use triage_lib::MetricsRecord;

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

/// Row for the metrics table
#[derive(Tabled)]
struct MetricRow {
    #[tabled(rename = "Metric")]
    name: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

/// Print the evaluation metrics of a run as a table
pub fn print_metrics(metrics: &MetricsRecord) {
    let rows = vec![
        MetricRow {
            name: "rmse",
            value: format_score(Some(metrics.rmse)),
        },
        MetricRow {
            name: "threshold_top10_percent",
            value: format_score(Some(metrics.threshold_top10_percent)),
        },
        MetricRow {
            name: "precision_at_top10",
            value: color_ratio(metrics.precision_at_top10),
        },
        MetricRow {
            name: "recall_at_top10",
            value: color_ratio(metrics.recall_at_top10),
        },
    ];
    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{}", table);
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

/// Format an optional score, `n/a` when absent
pub fn format_score(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.4}", v),
        None => "n/a".to_string(),
    }
}

/// Color a [0, 1] ratio based on value
fn color_ratio(value: Option<f64>) -> String {
    let formatted = format_score(value);
    match value {
        Some(v) if v >= 0.7 => formatted.green().to_string(),
        Some(v) if v >= 0.4 => formatted.yellow().to_string(),
        Some(_) => formatted.red().to_string(),
        None => formatted.dimmed().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_score() {
        assert_eq!(format_score(Some(53.123456)), "53.1235");
        assert_eq!(format_score(None), "n/a");
    }
}
