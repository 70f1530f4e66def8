use thiserror::Error;

#[derive(Debug, Error)]
pub enum StaffingError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("no staff member at index {0}")]
    UnknownStaff(usize),
    #[error("unknown shift field: {0} (expected `start` or `end`)")]
    UnknownField(String),
    #[error("unknown day: {0}")]
    UnknownDay(String),
    #[error("unknown rota week: {0} (expected 1 or 2)")]
    UnknownWeek(u8),
}

pub type Result<T> = std::result::Result<T, StaffingError>;
