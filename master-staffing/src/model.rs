use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::Weekday;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::StaffingError;

/// Weeks of the two-week rota
pub const ROTA_WEEKS: [u8; 2] = [1, 2];

/// Weekdays in the column order of the demand series
pub const DEMAND_DAYS: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

/// Abbreviation used in rota day tokens ("Tues 1", "Thurs 2")
pub fn rota_abbreviation(day: Weekday) -> &'static str {
    match day {
        Weekday::Sun => "Sun",
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tues",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thurs",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
    }
}

pub fn full_day_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Sun => "Sunday",
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
    }
}

/// Accepts a full day name ("Monday"), a demand column ("Monday Demand")
/// or a rota abbreviation ("Mon", "Tues"), case-insensitively.
pub fn parse_day_name(name: &str) -> Option<Weekday> {
    let trimmed = name.trim();
    let trimmed = trimmed.strip_suffix(" Demand").unwrap_or(trimmed);
    DEMAND_DAYS.into_iter().find(|&day| {
        full_day_name(day).eq_ignore_ascii_case(trimmed)
            || rota_abbreviation(day).eq_ignore_ascii_case(trimmed)
    })
}

/// Position of a day in Sunday-first demand order
fn demand_index(day: Weekday) -> u32 {
    day.num_days_from_sunday()
}

/// A day-of-rota key such as "Mon 1"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DayToken {
    pub weekday: Weekday,
    pub week: u8,
}

impl DayToken {
    pub fn new(weekday: Weekday, week: u8) -> Self {
        Self { weekday, week }
    }
}

impl fmt::Display for DayToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", rota_abbreviation(self.weekday), self.week)
    }
}

impl FromStr for DayToken {
    type Err = StaffingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let (Some(day), Some(week), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(StaffingError::UnknownDay(s.to_string()));
        };
        let weekday = DEMAND_DAYS
            .into_iter()
            .find(|&d| rota_abbreviation(d) == day)
            .ok_or_else(|| StaffingError::UnknownDay(s.to_string()))?;
        let week = week
            .parse::<u8>()
            .map_err(|_| StaffingError::UnknownDay(s.to_string()))?;
        Ok(Self { weekday, week })
    }
}

impl Ord for DayToken {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.week, demand_index(self.weekday)).cmp(&(other.week, demand_index(other.weekday)))
    }
}

impl PartialOrd for DayToken {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// One shift interval, kept as the raw strings the editor writes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shift {
    #[serde(default)]
    pub start: String,
    #[serde(default)]
    pub end: String,
}

impl Shift {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }
}

/// Per-colleague rota, as stored in `staff_schedule.json`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StaffSchedule {
    #[serde(rename = "Colleague", alias = "name", default)]
    pub colleague: String,
    #[serde(
        rename = "Line Manager",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub line_manager: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<serde_json::Value>,
    #[serde(
        rename = "patternLength",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub pattern_length: Option<u8>,
    #[serde(
        rename = "Schedule",
        alias = "rota",
        default,
        deserialize_with = "skip_null_shifts"
    )]
    pub schedule: BTreeMap<String, Shift>,
}

impl StaffSchedule {
    pub fn shift_on(&self, token: &DayToken) -> Option<&Shift> {
        self.schedule.get(&token.to_string())
    }
}

fn skip_null_shifts<'de, D>(deserializer: D) -> Result<BTreeMap<String, Shift>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<BTreeMap<String, Option<Shift>>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(day, shift)| shift.map(|shift| (day, shift)))
        .collect())
}

/// One time slot of the demand series, with required headcount per weekday
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DemandRecord {
    #[serde(rename = "Time")]
    pub time: String,
    #[serde(rename = "Sunday Demand", default)]
    pub sunday: Option<f64>,
    #[serde(rename = "Monday Demand", default)]
    pub monday: Option<f64>,
    #[serde(rename = "Tuesday Demand", default)]
    pub tuesday: Option<f64>,
    #[serde(rename = "Wednesday Demand", default)]
    pub wednesday: Option<f64>,
    #[serde(rename = "Thursday Demand", default)]
    pub thursday: Option<f64>,
    #[serde(rename = "Friday Demand", default)]
    pub friday: Option<f64>,
    #[serde(rename = "Saturday Demand", default)]
    pub saturday: Option<f64>,
}

impl DemandRecord {
    pub fn demand_for(&self, day: Weekday) -> Option<f64> {
        match day {
            Weekday::Sun => self.sunday,
            Weekday::Mon => self.monday,
            Weekday::Tue => self.tuesday,
            Weekday::Wed => self.wednesday,
            Weekday::Thu => self.thursday,
            Weekday::Fri => self.friday,
            Weekday::Sat => self.saturday,
        }
    }
}
