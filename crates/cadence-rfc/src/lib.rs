//! Recurrence-rule compilation and the date/time helpers it relies on.

pub mod error;
pub mod rfc;
