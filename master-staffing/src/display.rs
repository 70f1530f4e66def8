use std::path::Path;

use chrono::Weekday;
use csv::WriterBuilder;

use crate::coverage::{CoverageReport, SpendSummary};
use crate::error::Result;
use crate::model::{full_day_name, ROTA_WEEKS};

/// Formats a colleague name with their line manager
pub fn format_colleague(colleague: &str, line_manager: Option<&str>) -> String {
    match line_manager {
        Some(manager) if !manager.is_empty() => format!("{} (manager: {})", colleague, manager),
        _ => colleague.to_string(),
    }
}

/// Prints the coverage series for one day of one rota week
pub fn print_coverage(report: &CoverageReport, weekday: Weekday, week: u8) {
    println!("\n=== {} Week {} ===", full_day_name(weekday), week);

    let series = report.series(weekday, week);
    if series.is_empty() {
        println!("No demand data for this day.");
        return;
    }

    println!(
        "{:<8} {:>9} {:>8} {:>9} {:>8}",
        "Time", "Scheduled", "Demand", "Variance", "Spend"
    );
    for row in series {
        println!(
            "{:<8} {:>9} {:>8.2} {:>+9.2} {:>7.2}h",
            row.time, row.scheduled, row.demand, row.variance, row.spend_hours
        );
    }

    if let Some(spend) = &report.spend {
        println!("Day spend: {:.2}h", spend.day_hours(weekday, week));
    }
}

/// Prints per-day, per-week and bi-weekly spend in labor-hours
pub fn print_spend_summary(summary: &SpendSummary) {
    println!("\n=== Spend Summary (slot = {:.2}h) ===", summary.slot_hours);
    for week in ROTA_WEEKS {
        println!("Week {}: {:.2}h", week, summary.week_hours(week));
        for day in summary.daily.iter().filter(|d| d.week == week) {
            println!("  {:<10} {:>8.2}h", full_day_name(day.weekday), day.hours);
        }
    }
    println!("Total (both weeks): {:.2}h", summary.total_hours);
}

/// Writes every coverage row to a CSV file, header first
pub fn write_coverage_csv<P: AsRef<Path>>(report: &CoverageReport, csv_path: P) -> Result<()> {
    let mut wtr = WriterBuilder::new().has_headers(true).from_path(csv_path)?;

    wtr.write_record([
        "week",
        "day",
        "time",
        "scheduled",
        "demand",
        "variance",
        "spend_hours",
    ])?;

    for row in &report.rows {
        wtr.write_record([
            row.week.to_string(),
            full_day_name(row.weekday).to_string(),
            row.time.clone(),
            row.scheduled.to_string(),
            row.demand.to_string(),
            row.variance.to_string(),
            row.spend_hours.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
