use std::collections::HashSet;

use effacer_core::Line;

/// Drop `parentUuid` from every record whose parent did not survive.
///
/// Returns the number of records promoted to roots.
pub fn resolve_orphans(lines: &mut [Line]) -> usize {
    let survivors: HashSet<String> = lines
        .iter()
        .filter_map(Line::as_record)
        .filter_map(|r| r.uuid().map(str::to_string))
        .collect();

    let mut promoted = 0;
    for record in lines.iter_mut().filter_map(Line::as_record_mut) {
        let Some(parent) = record.parent_uuid() else {
            continue;
        };
        if survivors.contains(parent) {
            continue;
        }
        tracing::debug!(
            uuid = record.uuid().unwrap_or("-"),
            parent = parent,
            "orphan promoted to root"
        );
        record.remove_parent_uuid();
        promoted += 1;
    }
    promoted
}
