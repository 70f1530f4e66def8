use chrono::Weekday;
use serde::{Serialize, Serializer};

use crate::clock::{duration_hours, slot_duration, ClockTime};
use crate::model::{full_day_name, DayToken, DemandRecord, StaffSchedule, DEMAND_DAYS, ROTA_WEEKS};

#[derive(Debug, Clone, Copy)]
pub struct CoverageOptions {
    /// Attach daily/weekly/total spend to the report
    pub spend_summary: bool,
}

impl Default for CoverageOptions {
    fn default() -> Self {
        Self { spend_summary: true }
    }
}

fn serialize_weekday<S: Serializer>(day: &Weekday, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(full_day_name(*day))
}

/// Scheduled vs required headcount for one slot of one rota day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverageRow {
    pub week: u8,
    #[serde(serialize_with = "serialize_weekday")]
    pub weekday: Weekday,
    pub label: String,
    pub time: String,
    pub scheduled: u32,
    pub demand: f64,
    pub variance: f64,
    pub spend_hours: f64,
}

/// Point for the area-chart variant
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AreaPoint {
    pub time: String,
    pub required: f64,
    pub actual: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySpend {
    pub week: u8,
    #[serde(serialize_with = "serialize_weekday")]
    pub weekday: Weekday,
    pub hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklySpend {
    pub week: u8,
    pub hours: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SpendSummary {
    pub slot_hours: f64,
    pub daily: Vec<DailySpend>,
    pub weekly: Vec<WeeklySpend>,
    pub total_hours: f64,
}

impl SpendSummary {
    fn from_rows(rows: &[CoverageRow], slot_hours: f64) -> Self {
        let mut daily: Vec<DailySpend> = Vec::new();
        for row in rows {
            match daily
                .iter_mut()
                .find(|d| d.week == row.week && d.weekday == row.weekday)
            {
                Some(entry) => entry.hours += row.spend_hours,
                None => daily.push(DailySpend {
                    week: row.week,
                    weekday: row.weekday,
                    hours: row.spend_hours,
                }),
            }
        }
        daily.sort_by_key(|d| DayToken::new(d.weekday, d.week));

        // Weekly totals are built from the daily entries so the two always agree
        let weekly: Vec<WeeklySpend> = ROTA_WEEKS
            .iter()
            .map(|&week| WeeklySpend {
                week,
                hours: daily.iter().filter(|d| d.week == week).map(|d| d.hours).sum(),
            })
            .collect();
        let total_hours = weekly.iter().map(|w| w.hours).sum();

        Self {
            slot_hours,
            daily,
            weekly,
            total_hours,
        }
    }

    pub fn week_hours(&self, week: u8) -> f64 {
        self.weekly
            .iter()
            .find(|w| w.week == week)
            .map(|w| w.hours)
            .unwrap_or(0.0)
    }

    pub fn day_hours(&self, weekday: Weekday, week: u8) -> f64 {
        self.daily
            .iter()
            .find(|d| d.weekday == weekday && d.week == week)
            .map(|d| d.hours)
            .unwrap_or(0.0)
    }
}

/// Result of one coverage generation; replaced wholesale on each run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CoverageReport {
    pub rows: Vec<CoverageRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spend: Option<SpendSummary>,
}

impl CoverageReport {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows charted for one selected day and week
    pub fn series(&self, weekday: Weekday, week: u8) -> Vec<&CoverageRow> {
        self.rows
            .iter()
            .filter(|row| row.weekday == weekday && row.week == week)
            .collect()
    }

    pub fn area_points(&self, weekday: Weekday, week: u8) -> Vec<AreaPoint> {
        self.series(weekday, week)
            .into_iter()
            .map(|row| AreaPoint {
                time: row.time.clone(),
                required: row.demand,
                actual: row.scheduled,
            })
            .collect()
    }
}

/// Number of staff on shift for a rota day at the given time
pub fn staff_on_shift(staff: &[StaffSchedule], token: &DayToken, time: ClockTime) -> u32 {
    staff
        .iter()
        .filter(|member| {
            member
                .shift_on(token)
                .map(|shift| shift.covers(time))
                .unwrap_or(false)
        })
        .count() as u32
}

/// Reconciles scheduled coverage against demand for both rota weeks
pub fn generate_coverage(
    staff: &[StaffSchedule],
    demand: &[DemandRecord],
    options: CoverageOptions,
) -> CoverageReport {
    if demand.is_empty() {
        return CoverageReport::default();
    }

    let slot_hours = duration_hours(slot_duration(demand));
    let mut rows = Vec::new();

    for week in ROTA_WEEKS {
        for entry in demand {
            let time = ClockTime::parse(&entry.time);

            for day in DEMAND_DAYS {
                let Some(required) = entry.demand_for(day) else {
                    continue;
                };

                let token = DayToken::new(day, week);
                let scheduled = time
                    .map(|time| staff_on_shift(staff, &token, time))
                    .unwrap_or(0);

                rows.push(CoverageRow {
                    week,
                    weekday: day,
                    label: format!("{} Week {}", full_day_name(day), week),
                    time: entry.time.clone(),
                    scheduled,
                    demand: required,
                    variance: f64::from(scheduled) - required,
                    spend_hours: f64::from(scheduled) * slot_hours,
                });
            }
        }
    }

    let spend = options
        .spend_summary
        .then(|| SpendSummary::from_rows(&rows, slot_hours));

    CoverageReport { rows, spend }
}
