use thiserror::Error;

/// Recurrence compilation and time resolution errors
#[derive(Error, Debug)]
pub enum RfcError {
    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Unknown timezone: {0}")]
    UnknownTimezone(String),

    #[error("Non-existent time (DST gap): {0}")]
    NonExistentTime(String),

    #[error("Invalid weekday list: {0}")]
    InvalidWeekdayList(String),

    #[error("Invalid recurrence selector: {0}")]
    InvalidSelector(String),

    #[error("RRule error: {0}")]
    RRuleError(#[from] rrule::RRuleError),
}

pub type RfcResult<T> = std::result::Result<T, RfcError>;
