//! Predicates identifying JavaScript actions

use lopdf::{Dictionary, Document, Object};
use super::value::{as_dict, resolve};

/// Action type discriminator key
pub const ACTION_TYPE_KEY: &[u8] = b"S";

/// Action type of a JavaScript action
pub const JAVASCRIPT: &[u8] = b"JavaScript";

/// True if the dictionary is an action whose `/S` is the name `JavaScript`
pub fn is_javascript_action(dict: &Dictionary) -> bool {
    matches!(dict.get(ACTION_TYPE_KEY), Ok(Object::Name(name)) if name.as_slice() == JAVASCRIPT)
}

/// True if `value` resolves to a JavaScript action dictionary
///
/// Unresolvable values are not actions.
pub fn resolves_to_javascript_action(doc: &Document, value: &Object, max_depth: usize) -> bool {
    resolve(doc, value, max_depth)
        .ok()
        .and_then(|resolved| as_dict(resolved.value))
        .is_some_and(is_javascript_action)
}

/// True if a name-tree entry value belongs to the `JavaScript` name tree and
/// resolves to a JavaScript action
///
/// `tree` is the key under the catalog's `/Names` dictionary the entry was found in.
pub fn is_javascript_name_tree_entry(
    doc: &Document,
    tree: &[u8],
    value: &Object,
    max_depth: usize,
) -> bool {
    tree == JAVASCRIPT && resolves_to_javascript_action(doc, value, max_depth)
}
