//! Matching rule instants against recorded exceptions.

use crate::model::OccurrenceException;

/// Latest all-following exception whose old or new id is `occurrence_id`.
pub(crate) fn find_all_following<'a>(
    exceptions: &'a [OccurrenceException],
    occurrence_id: &str,
) -> Option<&'a OccurrenceException> {
    exceptions
        .iter()
        .rev()
        .find(|exception| exception.all_following && exception.matches(occurrence_id))
}

/// Latest single-occurrence exception matching any of `candidates`.
///
/// A re-edit of the same occurrence supersedes the earlier record.
pub(crate) fn find_single<'a>(
    exceptions: &'a [OccurrenceException],
    candidates: &[&str],
) -> Option<&'a OccurrenceException> {
    exceptions.iter().rev().find(|exception| {
        !exception.all_following
            && candidates
                .iter()
                .any(|candidate| !candidate.is_empty() && exception.matches(candidate))
    })
}
