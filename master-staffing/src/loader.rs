use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use log::{error, info};
use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::model::{DemandRecord, StaffSchedule};

pub const STAFF_FILE: &str = "staff_schedule.json";
pub const DEMAND_FILE: &str = "demand_data_filtered.json";

fn read_json_array<T: DeserializeOwned, R: Read>(reader: R) -> Result<Vec<T>> {
    Ok(serde_json::from_reader(BufReader::new(reader))?)
}

pub fn staff_schedules_from_reader<R: Read>(reader: R) -> Result<Vec<StaffSchedule>> {
    read_json_array(reader)
}

/// Loads staff schedules from a JSON file
pub fn load_staff_schedules<P: AsRef<Path>>(path: P) -> Result<Vec<StaffSchedule>> {
    staff_schedules_from_reader(File::open(path)?)
}

pub fn demand_from_reader<R: Read>(reader: R) -> Result<Vec<DemandRecord>> {
    read_json_array(reader)
}

/// Loads the demand series from a JSON file
pub fn load_demand<P: AsRef<Path>>(path: P) -> Result<Vec<DemandRecord>> {
    demand_from_reader(File::open(path)?)
}

/// Runs a loader once; a failure is logged and yields an empty collection
pub fn load_or_empty<T, P, F>(what: &str, path: P, load: F) -> Vec<T>
where
    P: AsRef<Path>,
    F: FnOnce(&Path) -> Result<Vec<T>>,
{
    let path = path.as_ref();
    match load(path) {
        Ok(items) => {
            info!("Loaded {} {} from {}", items.len(), what, path.display());
            items
        }
        Err(e) => {
            error!("Error fetching {} from {}: {}", what, path.display(), e);
            Vec::new()
        }
    }
}
