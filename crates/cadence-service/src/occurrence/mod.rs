//! Occurrence materialization.

mod id;
mod lookup;
mod materializer;
mod segment;


pub use id::{occurrence_id, parse_occurrence_id};
pub use materializer::{Materializer, OccurrenceQuery};
