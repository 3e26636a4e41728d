//! Occurrence materialization for recurring meetings.
//!
//! ## Summary
//! [`occurrence::Materializer`] turns a [`model::MeetingSeries`] into the
//! ordered list of concrete occurrences, applying per-occurrence edits,
//! all-following edits and cancellations. [`legacy`] maps loosely typed
//! upstream records onto the typed model.

pub mod error;
pub mod legacy;
pub mod model;
pub mod occurrence;
