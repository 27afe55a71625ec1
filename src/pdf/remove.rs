//! Deleting located JavaScript actions from their containers

use lopdf::{Document, Object};
use tracing::debug;
use super::classify::resolves_to_javascript_action;
use super::locate::{Finding, Target};
use super::value::entries_of;

/// What happened when a finding was applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    /// The entry was deleted
    Removed,
    /// The container or entry no longer exists
    Absent,
    /// Something other than a JavaScript action now sits at the target
    Stale,
}

/// Delete the entry a finding points at
///
/// Removing an absent key or index is a no-op. Every target is checked again
/// before deletion because an earlier removal from an array shifts the elements
/// after it, both for targets in that array and for containers whose path runs
/// through it. Anything that no longer holds a JavaScript action is left alone
/// and picked up by the next pass. Containers are never deleted, even when they
/// end up empty.
pub fn remove_finding(doc: &mut Document, finding: &Finding, max_depth: usize) -> Removal {
    let removal = match &finding.target {
        Target::Key(key) => remove_key(doc, finding, key, max_depth),
        Target::Index(index) => remove_elements(doc, finding, *index, *index, 1, max_depth),
        Target::NamePair(index) => remove_elements(doc, finding, index + 1, *index, 2, max_depth),
    };

    debug!(%finding, ?removal, "applied finding");
    removal
}

fn remove_key(doc: &mut Document, finding: &Finding, key: &[u8], max_depth: usize) -> Removal {
    let still_javascript = match finding.container.locate(doc).and_then(entries_of) {
        Some(dict) => match dict.get(key) {
            Ok(value) => resolves_to_javascript_action(doc, value, max_depth),
            Err(_) => return Removal::Absent,
        },
        None => return Removal::Absent,
    };

    if !still_javascript {
        return Removal::Stale;
    }

    let removed = match finding.container.locate_mut(doc) {
        Some(Object::Dictionary(dict)) => dict.remove(key),
        Some(Object::Stream(stream)) => stream.dict.remove(key),
        _ => None,
    };
    removed.map_or(Removal::Absent, |_| Removal::Removed)
}

/// Remove `count` elements starting at `first`, provided the element at
/// `action` still resolves to a JavaScript action
fn remove_elements(
    doc: &mut Document,
    finding: &Finding,
    action: usize,
    first: usize,
    count: usize,
    max_depth: usize,
) -> Removal {
    let still_javascript = match finding.container.locate(doc) {
        Some(Object::Array(items)) => match items.get(action) {
            Some(item) => resolves_to_javascript_action(doc, item, max_depth),
            None => return Removal::Absent,
        },
        _ => return Removal::Absent,
    };

    if !still_javascript {
        return Removal::Stale;
    }

    match finding.container.locate_mut(doc) {
        Some(Object::Array(items)) => {
            items.drain(first..first + count);
            Removal::Removed
        }
        _ => Removal::Absent,
    }
}
