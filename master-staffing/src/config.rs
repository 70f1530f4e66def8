use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::coverage::CoverageOptions;
use crate::loader::{DEMAND_FILE, STAFF_FILE};

#[derive(Debug, Parser)]
#[command(name = "master-staffing", version, about = "Staff rota editor and coverage charts")]
pub struct Cli {
    #[command(flatten)]
    pub data: DataArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Args)]
pub struct DataArgs {
    /// Directory holding the staff schedule and demand JSON files
    #[arg(long, global = true, env = "STAFFING_DATA_DIR", default_value = "data")]
    pub data_dir: PathBuf,

    #[arg(long, global = true, default_value = STAFF_FILE)]
    pub staff_file: String,

    #[arg(long, global = true, default_value = DEMAND_FILE)]
    pub demand_file: String,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the editor and chart pages
    Web {
        #[arg(short, long, env = "STAFFING_PORT", default_value_t = 8080)]
        port: u16,

        #[arg(long, default_value = "0.0.0.0")]
        bind: String,

        /// Hide the spend summary on the chart page
        #[arg(long)]
        no_spend: bool,
    },
    /// Print coverage for one day and week, optionally exporting every row to CSV
    Report {
        #[arg(long, default_value = "Monday")]
        day: String,

        #[arg(long, default_value_t = 1)]
        week: u8,

        #[arg(long)]
        csv: Option<PathBuf>,

        #[arg(long)]
        no_spend: bool,
    },
    /// Change one shift field and print the resulting schedules
    Edit {
        #[arg(long)]
        staff: usize,

        /// Rota day token, e.g. "Mon 1"
        #[arg(long)]
        day: String,

        /// `start` or `end`
        #[arg(long)]
        field: String,

        #[arg(long)]
        value: String,
    },
}

/// Resolved paths and feature switches shared by the CLI and the web server
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub staff_path: PathBuf,
    pub demand_path: PathBuf,
    pub coverage: CoverageOptions,
}

impl AppConfig {
    pub fn new(data: &DataArgs, spend_summary: bool) -> Self {
        Self {
            staff_path: data.data_dir.join(&data.staff_file),
            demand_path: data.data_dir.join(&data.demand_file),
            coverage: CoverageOptions { spend_summary },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn web_defaults() {
        let cli = Cli::try_parse_from(["master-staffing", "web"]).unwrap();
        match cli.command {
            Command::Web { port, bind, no_spend } => {
                assert_eq!(port, 8080);
                assert_eq!(bind, "0.0.0.0");
                assert!(!no_spend);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn data_paths_join_the_data_dir() {
        let cli = Cli::try_parse_from([
            "master-staffing",
            "report",
            "--data-dir",
            "/srv/rota",
            "--no-spend",
        ])
        .unwrap();
        let config = AppConfig::new(&cli.data, false);
        assert_eq!(config.staff_path, PathBuf::from("/srv/rota/staff_schedule.json"));
        assert_eq!(config.demand_path, PathBuf::from("/srv/rota/demand_data_filtered.json"));
        assert!(!config.coverage.spend_summary);
    }

    #[test]
    fn edit_requires_all_fields() {
        assert!(Cli::try_parse_from(["master-staffing", "edit", "--staff", "0"]).is_err());
        let cli = Cli::try_parse_from([
            "master-staffing",
            "edit",
            "--staff",
            "1",
            "--day",
            "Mon 1",
            "--field",
            "end",
            "--value",
            "16:00",
        ])
        .unwrap();
        assert!(matches!(cli.command, Command::Edit { staff: 1, .. }));
    }
}
