mod clock;
mod config;
mod coverage;
mod display;
mod editor;
mod error;
mod loader;
mod model;
mod web;

use clap::Parser;
use log::info;

use config::{AppConfig, Cli, Command};
use coverage::generate_coverage;
use display::{format_colleague, print_coverage, print_spend_summary, write_coverage_csv};
use editor::{editor_rows, receipt, set_shift_field, ShiftField};
use error::StaffingError;
use loader::{load_demand, load_or_empty, load_staff_schedules};
use model::{parse_day_name, ROTA_WEEKS};

fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Command::Web { port, bind, no_spend } => {
            let config = AppConfig::new(&cli.data, !no_spend);
            println!("Access the site at http://localhost:{}", port);
            web::start_server(config, &bind, port).await?;
        }

        Command::Report {
            day,
            week,
            csv,
            no_spend,
        } => {
            let weekday = parse_day_name(&day).ok_or(StaffingError::UnknownDay(day))?;
            if !ROTA_WEEKS.contains(&week) {
                return Err(StaffingError::UnknownWeek(week).into());
            }

            let config = AppConfig::new(&cli.data, !no_spend);
            let staff = load_or_empty("staff schedules", &config.staff_path, |p| {
                load_staff_schedules(p)
            });
            let demand = load_or_empty("demand data", &config.demand_path, |p| load_demand(p));

            println!("Staff on the rota ({}):", staff.len());
            for member in &staff {
                println!(
                    "  - {}",
                    format_colleague(&member.colleague, member.line_manager.as_deref())
                );
                for (day, shift) in editor_rows(member) {
                    println!("      {:<8} {} - {}", day, shift.start, shift.end);
                }
            }

            let report = generate_coverage(&staff, &demand, config.coverage);
            if report.is_empty() {
                println!("\nNo coverage data: demand series is empty.");
                return Ok(());
            }

            print_coverage(&report, weekday, week);
            if let Some(spend) = &report.spend {
                print_spend_summary(spend);
            }

            if let Some(path) = csv {
                write_coverage_csv(&report, &path)?;
                info!("Wrote {} coverage rows to {}", report.rows.len(), path.display());
            }
        }

        Command::Edit {
            staff,
            day,
            field,
            value,
        } => {
            let config = AppConfig::new(&cli.data, true);
            let field: ShiftField = field.parse()?;
            let schedules = load_staff_schedules(&config.staff_path)?;
            let updated = set_shift_field(&schedules, staff, &day, field, &value)?;
            // stdout carries the document, so skip the info log that save() emits
            println!("{}", receipt(&updated)?.json);
        }
    }

    Ok(())
}
