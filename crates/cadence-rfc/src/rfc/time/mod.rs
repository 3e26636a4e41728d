//! Timezone anchoring and past-occurrence checks.

mod past;
mod timezone;

pub use past::is_past;
pub use timezone::{in_location, local_to_utc, local_to_utc_lenient, resolve_timezone};
