//! Typed meeting, exception and occurrence records.

mod exception;
mod occurrence;
mod series;
pub mod wire;

pub use exception::OccurrenceException;
pub use occurrence::Occurrence;
pub use series::MeetingSeries;
