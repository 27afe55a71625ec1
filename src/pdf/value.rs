//! Value model over the lopdf object graph
//!
//! lopdf's `Object` is already a closed tagged variant, so this module only adds
//! what the scanner needs on top of it: a kind tag, downcasts, bounded resolution
//! of indirect references, and arena-style addressing of nested containers.

use std::fmt;
use lopdf::{Dictionary, Document, Object, ObjectId};
use crate::error::{Error, Result};

/// Default bound for reference chains and container nesting
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// The value kinds the scanner distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Null,
    Boolean,
    Number,
    String,
    Name,
    Array,
    Dictionary,
    Stream,
    Reference,
}

/// Classify an object by kind
pub fn kind(object: &Object) -> ValueKind {
    match object {
        Object::Null => ValueKind::Null,
        Object::Boolean(_) => ValueKind::Boolean,
        Object::Integer(_) | Object::Real(_) => ValueKind::Number,
        Object::String(..) => ValueKind::String,
        Object::Name(_) => ValueKind::Name,
        Object::Array(_) => ValueKind::Array,
        Object::Dictionary(_) => ValueKind::Dictionary,
        Object::Stream(_) => ValueKind::Stream,
        Object::Reference(_) => ValueKind::Reference,
    }
}

/// Downcast to a plain dictionary (stream dictionaries excluded)
pub fn as_dict(object: &Object) -> Option<&Dictionary> {
    match object {
        Object::Dictionary(dict) => Some(dict),
        _ => None,
    }
}

/// Downcast to an array
pub fn as_array(object: &Object) -> Option<&Vec<Object>> {
    match object {
        Object::Array(items) => Some(items),
        _ => None,
    }
}

/// Dictionary entries of a container, including the dictionary of a stream
pub fn entries_of(object: &Object) -> Option<&Dictionary> {
    match object {
        Object::Dictionary(dict) => Some(dict),
        Object::Stream(stream) => Some(&stream.dict),
        _ => None,
    }
}

/// A value after following indirect references
#[derive(Debug, Clone, Copy)]
pub struct Resolved<'a> {
    /// Id of the last indirect object followed, if any
    pub id: Option<ObjectId>,
    pub value: &'a Object,
}

/// Follow indirect references until a direct value is reached
///
/// Fails with `UnresolvedReference` if an id is missing from the document and
/// with `DepthExceeded` if more than `max_depth` references are chained, which
/// is how a cycle made purely of references shows up.
pub fn resolve<'a>(doc: &'a Document, object: &'a Object, max_depth: usize) -> Result<Resolved<'a>> {
    let mut current = object;
    let mut id = None;
    let mut hops = 0;

    while let Object::Reference(target) = current {
        if hops >= max_depth {
            return Err(Error::DepthExceeded { limit: max_depth });
        }
        current = doc
            .objects
            .get(target)
            .ok_or(Error::UnresolvedReference(*target))?;
        id = Some(*target);
        hops += 1;
    }

    Ok(Resolved { id, value: current })
}

/// One step from a container to a directly nested value
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Step {
    Key(Vec<u8>),
    Index(usize),
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Key(key) => write!(f, "/{}", String::from_utf8_lossy(key)),
            Step::Index(index) => write!(f, "[{}]", index),
        }
    }
}

/// Address of a value: the enclosing indirect object plus the direct steps into it
///
/// Objects are owned by the document's table, so the scanner never holds on to
/// borrowed containers across a mutation. Paths are looked up again when needed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectPath {
    pub root: ObjectId,
    pub steps: Vec<Step>,
}

impl ObjectPath {
    /// Path of an indirect object itself
    pub fn root(id: ObjectId) -> Self {
        ObjectPath { root: id, steps: Vec::new() }
    }

    /// Path of a directly nested value
    pub fn child(&self, step: Step) -> Self {
        let mut steps = self.steps.clone();
        steps.push(step);
        ObjectPath { root: self.root, steps }
    }

    /// Path of the value stored at `step`, given how it resolved
    ///
    /// A value reached through a reference starts a fresh path at its target.
    pub fn descend(&self, step: Step, resolved: &Resolved<'_>) -> Self {
        match resolved.id {
            Some(id) => ObjectPath::root(id),
            None => self.child(step),
        }
    }

    /// Look up the addressed value without following references
    pub fn locate<'a>(&self, doc: &'a Document) -> Option<&'a Object> {
        let mut current = doc.objects.get(&self.root)?;
        for step in &self.steps {
            current = match (step, current) {
                (Step::Key(key), Object::Dictionary(dict)) => dict.get(key).ok()?,
                (Step::Key(key), Object::Stream(stream)) => stream.dict.get(key).ok()?,
                (Step::Index(index), Object::Array(items)) => items.get(*index)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Mutable counterpart of [`ObjectPath::locate`]
    pub fn locate_mut<'a>(&self, doc: &'a mut Document) -> Option<&'a mut Object> {
        let mut current = doc.objects.get_mut(&self.root)?;
        for step in &self.steps {
            current = match (step, current) {
                (Step::Key(key), Object::Dictionary(dict)) => dict.get_mut(key).ok()?,
                (Step::Key(key), Object::Stream(stream)) => stream.dict.get_mut(key).ok()?,
                (Step::Index(index), Object::Array(items)) => items.get_mut(*index)?,
                _ => return None,
            };
        }
        Some(current)
    }
}

impl fmt::Display for ObjectPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} R", self.root.0, self.root.1)?;
        for step in &self.steps {
            write!(f, "{}", step)?;
        }
        Ok(())
    }
}
