use std::fmt;
use std::str::FromStr;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::{Result, StaffingError};
use crate::model::{DayToken, Shift, StaffSchedule};

pub const SAVE_ACKNOWLEDGEMENT: &str = "Schedules saved!";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShiftField {
    Start,
    End,
}

impl FromStr for ShiftField {
    type Err = StaffingError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "start" => Ok(Self::Start),
            "end" => Ok(Self::End),
            other => Err(StaffingError::UnknownField(other.to_string())),
        }
    }
}

impl fmt::Display for ShiftField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => f.write_str("start"),
            Self::End => f.write_str("end"),
        }
    }
}

/// Returns a copy of `schedules` with one shift field replaced.
///
/// A missing day entry is created blank first. The value is stored as given;
/// neither its format nor the start/end ordering is checked.
pub fn set_shift_field(
    schedules: &[StaffSchedule],
    staff_index: usize,
    day: &str,
    field: ShiftField,
    value: &str,
) -> Result<Vec<StaffSchedule>> {
    if staff_index >= schedules.len() {
        return Err(StaffingError::UnknownStaff(staff_index));
    }

    let mut updated = schedules.to_vec();
    let shift = updated[staff_index]
        .schedule
        .entry(day.to_string())
        .or_insert_with(Shift::default);

    match field {
        ShiftField::Start => shift.start = value.to_string(),
        ShiftField::End => shift.end = value.to_string(),
    }

    debug!(
        "Set {} of {} for staff #{} to {:?}",
        field, day, staff_index, value
    );

    Ok(updated)
}

/// Day entries of one colleague in rota order; unrecognised keys go last
pub fn editor_rows(staff: &StaffSchedule) -> Vec<(&str, &Shift)> {
    let mut rows: Vec<(&str, &Shift)> = staff
        .schedule
        .iter()
        .map(|(day, shift)| (day.as_str(), shift))
        .collect();
    rows.sort_by_key(|(day, _)| {
        let token = day.parse::<DayToken>().ok();
        (token.is_none(), token, *day)
    });
    rows
}

#[derive(Debug, Clone, Serialize)]
pub struct SaveReceipt {
    pub success: bool,
    pub message: &'static str,
    pub staff_count: usize,
    #[serde(skip)]
    pub json: String,
}

/// Serializes the schedules into a receipt without logging them
pub fn receipt(schedules: &[StaffSchedule]) -> Result<SaveReceipt> {
    Ok(SaveReceipt {
        success: true,
        message: SAVE_ACKNOWLEDGEMENT,
        staff_count: schedules.len(),
        json: serde_json::to_string_pretty(schedules)?,
    })
}

/// Local-only save: the schedules are surfaced through the log, nothing is written
pub fn save(schedules: &[StaffSchedule]) -> Result<SaveReceipt> {
    let receipt = receipt(schedules)?;
    info!("Updated Schedules: {}", receipt.json);
    Ok(receipt)
}
