//! Cycle-safe depth-first traversal of the object graph

use std::collections::HashSet;
use lopdf::{Document, Object, ObjectId};
use tracing::{debug, warn};
use crate::error::Error;
use super::value::{entries_of, resolve, ObjectPath, Step};

/// One edge of the traversal: a container, the step into it, and the resolved child
#[derive(Debug, Clone)]
pub struct Visit<'a> {
    /// The (resolved) container holding the child
    pub container: &'a Object,
    pub container_path: ObjectPath,
    pub step: Step,
    /// The child after following references
    pub value: &'a Object,
    /// Address of `value`
    pub path: ObjectPath,
    /// Nesting depth of `value` below the start object
    pub depth: usize,
}

type Children<'a> = Box<dyn Iterator<Item = (Step, &'a Object)> + 'a>;

struct Frame<'a> {
    container: &'a Object,
    path: ObjectPath,
    depth: usize,
    children: Children<'a>,
}

fn children(object: &Object) -> Option<Children<'_>> {
    if let Object::Array(items) = object {
        return Some(Box::new(
            items.iter().enumerate().map(|(index, item)| (Step::Index(index), item)),
        ));
    }
    entries_of(object).map(|dict| {
        Box::new(dict.iter().map(|(key, value)| (Step::Key(key.clone()), value))) as Children<'_>
    })
}

/// Lazy depth-first walk producing `(container, step, resolved child)` visits
///
/// Each indirect object is expanded at most once per visited-set: later
/// encounters of an id already in the set are skipped. Direct arrays and
/// dictionaries are walked structurally every time they are reached, bounded by
/// `max_depth`. The walker never mutates the document; build a fresh visited-set
/// for every pass.
pub struct ObjectGraphWalker<'a, 'v> {
    doc: &'a Document,
    visited: &'v mut HashSet<ObjectId>,
    stack: Vec<Frame<'a>>,
    max_depth: usize,
}

impl<'a, 'v> ObjectGraphWalker<'a, 'v> {
    /// Start a walk at the indirect object `start`
    pub fn new(
        doc: &'a Document,
        start: ObjectId,
        visited: &'v mut HashSet<ObjectId>,
        max_depth: usize,
    ) -> Self {
        let mut walker = ObjectGraphWalker {
            doc,
            visited,
            stack: Vec::new(),
            max_depth,
        };

        if !walker.visited.insert(start) {
            return walker;
        }

        let Some(object) = doc.objects.get(&start) else {
            debug!(object = ?start, "walk start is not in the document");
            return walker;
        };

        match resolve(doc, object, max_depth) {
            Ok(resolved) => {
                let path = match resolved.id {
                    Some(id) => {
                        walker.visited.insert(id);
                        ObjectPath::root(id)
                    }
                    None => ObjectPath::root(start),
                };
                if let Some(children) = children(resolved.value) {
                    walker.stack.push(Frame {
                        container: resolved.value,
                        path,
                        depth: 0,
                        children,
                    });
                }
            }
            Err(e) => warn!(object = ?start, error = %e, "cannot resolve walk start"),
        }

        walker
    }
}

impl<'a, 'v> Iterator for ObjectGraphWalker<'a, 'v> {
    type Item = Visit<'a>;

    fn next(&mut self) -> Option<Visit<'a>> {
        loop {
            let frame = self.stack.last_mut()?;
            let Some((step, child)) = frame.children.next() else {
                self.stack.pop();
                continue;
            };
            let container = frame.container;
            let container_path = frame.path.clone();
            let depth = frame.depth + 1;

            let resolved = match resolve(self.doc, child, self.max_depth) {
                Ok(resolved) => resolved,
                Err(e @ Error::DepthExceeded { .. }) => {
                    warn!(at = %container_path, %step, error = %e, "skipping reference chain");
                    continue;
                }
                Err(e) => {
                    debug!(at = %container_path, %step, error = %e, "skipping branch");
                    continue;
                }
            };

            if let Some(id) = resolved.id {
                if !self.visited.insert(id) {
                    continue;
                }
            }

            let path = container_path.descend(step.clone(), &resolved);
            if let Some(grandchildren) = children(resolved.value) {
                if depth >= self.max_depth {
                    warn!(at = %path, limit = self.max_depth, "nesting too deep, not descending");
                } else {
                    self.stack.push(Frame {
                        container: resolved.value,
                        path: path.clone(),
                        depth,
                        children: grandchildren,
                    });
                }
            }

            return Some(Visit {
                container,
                container_path,
                step,
                value: resolved.value,
                path,
                depth,
            });
        }
    }
}
