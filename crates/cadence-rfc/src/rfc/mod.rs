pub mod recurrence;
pub mod time;
