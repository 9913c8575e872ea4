//! Version label merging.

use crate::linear::LinearLabel;

/// Computes the label ids an issue should carry after applying `label`.
///
/// Labels in the same group as `label` are removed so an issue only ever
/// carries one version label per group. Returns `None` when the issue
/// already has exactly the right labels.
#[must_use]
pub fn merge_exclusive(current: &[LinearLabel], label: &LinearLabel) -> Option<Vec<String>> {
    let conflicts = |existing: &LinearLabel| {
        existing.id != label.id
            && label.parent_id.is_some()
            && existing.parent_id == label.parent_id
    };

    let already_applied = current.iter().any(|existing| existing.id == label.id);
    if already_applied && !current.iter().any(conflicts) {
        return None;
    }

    let mut ids: Vec<String> = current
        .iter()
        .filter(|existing| existing.id != label.id && !conflicts(existing))
        .map(|existing| existing.id.clone())
        .collect();
    ids.push(label.id.clone());
    Some(ids)
}
