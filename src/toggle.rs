//! Confirmed-patch updates for the saved flag of library entries.
//!
//! Callers must hold a server-confirmed value before patching; nothing here
//! flips state ahead of the collaborator's answer.

use crate::models::Entry;

/// Returns a copy of `collection` with `is_saved` of entry `id` set to `saved`.
///
/// An id that is no longer in the collection is not an error: the result is
/// simply equal to the input.
pub fn apply_toggle_result(collection: &[Entry], id: i64, saved: bool) -> Vec<Entry> {
    collection
        .iter()
        .map(|entry| {
            if entry.id == id {
                Entry {
                    is_saved: saved,
                    ..entry.clone()
                }
            } else {
                entry.clone()
            }
        })
        .collect()
}
