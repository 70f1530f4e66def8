use chrono::Duration;

use crate::model::{DemandRecord, Shift};

/// Slot length used when the demand series does not reveal one
pub const DEFAULT_SLOT_MINUTES: i64 = 30;

/// Time of day as an (hour, minute) pair, compared hour first.
/// No range check is applied, so "25:10" parses and sorts after "23:59".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ClockTime {
    pub hour: u32,
    pub minute: u32,
}

impl ClockTime {
    /// Parses a time string (HH:MM); any further fields such as seconds are ignored
    pub fn parse(time_str: &str) -> Option<Self> {
        let mut fields = time_str.trim().split(':');
        let hour: u32 = fields.next()?.trim().parse().ok()?;
        let minute: u32 = fields.next()?.trim().parse().ok()?;
        Some(Self { hour, minute })
    }

    pub fn minutes_since_midnight(self) -> i64 {
        i64::from(self.hour) * 60 + i64::from(self.minute)
    }
}

impl Shift {
    /// Half-open containment: start <= t < end. Shifts crossing midnight cover nothing.
    pub fn covers(&self, time: ClockTime) -> bool {
        match (ClockTime::parse(&self.start), ClockTime::parse(&self.end)) {
            (Some(start), Some(end)) => start <= time && time < end,
            _ => false,
        }
    }
}

/// Slot length inferred from the first two time labels of the series
pub fn slot_duration(demand: &[DemandRecord]) -> Duration {
    let inferred = match demand {
        [first, second, ..] => ClockTime::parse(&first.time)
            .zip(ClockTime::parse(&second.time))
            .map(|(a, b)| b.minutes_since_midnight() - a.minutes_since_midnight())
            .filter(|minutes| *minutes > 0),
        _ => None,
    };
    Duration::minutes(inferred.unwrap_or(DEFAULT_SLOT_MINUTES))
}

pub fn duration_hours(duration: Duration) -> f64 {
    duration.num_minutes() as f64 / 60.0
}
