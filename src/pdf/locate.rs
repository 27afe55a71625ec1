//! Locating JavaScript actions at the places a PDF can attach them
//!
//! Scans run in a fixed order so reports are reproducible:
//!
//! 1. the catalog's `/OpenAction`
//! 2. additional-actions maps (`/AA`) of the catalog, every page and every annotation
//! 3. direct actions (`/A`) of every annotation and outline item
//! 4. the `/Names` → `/JavaScript` name tree
//! 5. a sweep over everything reachable from the catalog, for anything the
//!    anchor scans did not reach (form fields, orphaned widgets, ...)
//!
//! Action chains (`/Next`) hanging off any non-JavaScript action are followed
//! as part of whichever scan reached the action.

use std::collections::HashSet;
use std::fmt;
use lopdf::{Dictionary, Document, Object, ObjectId};
use tracing::{debug, warn};
use crate::error::{Error, Result};
use super::classify::{is_javascript_action, is_javascript_name_tree_entry, ACTION_TYPE_KEY};
use super::value::{as_array, as_dict, entries_of, resolve, ObjectPath, Resolved, Step};
use super::walker::ObjectGraphWalker;

/// Where a JavaScript action was attached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnchorKind {
    /// Catalog `/OpenAction`
    OpenAction,
    /// Entry of an `/AA` map
    AdditionalActions,
    /// `/A` of an annotation, outline item or field
    DirectAction,
    /// Entry of the JavaScript name tree
    NameTree,
    /// `/Next` of another action
    ActionChain,
}

impl fmt::Display for AnchorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AnchorKind::OpenAction => "OpenAction",
            AnchorKind::AdditionalActions => "additional action",
            AnchorKind::DirectAction => "action",
            AnchorKind::NameTree => "name tree entry",
            AnchorKind::ActionChain => "chained action",
        };
        f.write_str(label)
    }
}

/// The document object a finding belongs to, for reporting
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    Catalog,
    Page { number: u32 },
    Annotation { page: u32, index: usize },
    OutlineItem { index: usize },
    NameTree { name: String },
    Object { id: ObjectId },
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Catalog => write!(f, "document catalog"),
            Scope::Page { number } => write!(f, "page {}", number),
            Scope::Annotation { page, index } => write!(f, "page {} annotation {}", page, index),
            Scope::OutlineItem { index } => write!(f, "outline item {}", index),
            Scope::NameTree { name } => write!(f, "JavaScript name tree ({})", name),
            Scope::Object { id } => write!(f, "object {} {} R", id.0, id.1),
        }
    }
}

/// What to delete inside the container
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Target {
    /// A dictionary key
    Key(Vec<u8>),
    /// An array element
    Index(usize),
    /// A name/value pair of a name-tree `/Names` array, starting at this index
    NamePair(usize),
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Key(key) => write!(f, "/{}", String::from_utf8_lossy(key)),
            Target::Index(index) => write!(f, "[{}]", index),
            Target::NamePair(index) => write!(f, "[{}..={}]", index, index + 1),
        }
    }
}

/// A located JavaScript action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub kind: AnchorKind,
    pub scope: Scope,
    /// The dictionary or array holding the action
    pub container: ObjectPath,
    pub target: Target,
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} on {} at {}{}", self.kind, self.scope, self.container, self.target)
    }
}

/// Id of the document catalog
pub fn catalog_id(doc: &Document) -> Result<ObjectId> {
    match doc.trailer.get(b"Root") {
        Ok(Object::Reference(id)) => Ok(*id),
        _ => Err(Error::MissingCatalog),
    }
}

/// Run every scan and return the findings in scan order
///
/// Structural problems inside the document are logged and skipped; only a
/// missing catalog is an error.
pub fn locate_javascript(doc: &Document, max_depth: usize) -> Result<Vec<Finding>> {
    let mut locator = ActionLocator::new(doc, max_depth);
    locator.run()?;
    Ok(locator.findings)
}

struct Annotation<'a> {
    page: u32,
    index: usize,
    path: ObjectPath,
    dict: &'a Dictionary,
}

struct ActionLocator<'a> {
    doc: &'a Document,
    max_depth: usize,
    findings: Vec<Finding>,
    reported: HashSet<(ObjectPath, Target)>,
    chained: HashSet<ObjectId>,
}

impl<'a> ActionLocator<'a> {
    fn new(doc: &'a Document, max_depth: usize) -> Self {
        ActionLocator {
            doc,
            max_depth,
            findings: Vec::new(),
            reported: HashSet::new(),
            chained: HashSet::new(),
        }
    }

    fn run(&mut self) -> Result<()> {
        let doc = self.doc;
        let root = catalog_id(doc)?;
        let catalog_path = ObjectPath::root(root);
        let catalog = doc
            .objects
            .get(&root)
            .and_then(|object| self.resolve_logged(object, &catalog_path))
            .and_then(|resolved| as_dict(resolved.value))
            .ok_or(Error::MissingCatalog)?;

        let pages = self.pages(&catalog_path, catalog);
        let annotations: Vec<Annotation<'a>> = pages
            .iter()
            .flat_map(|(number, path, page)| self.annotations(*number, path, *page))
            .collect();

        // 1. OpenAction
        self.inspect_slot(&catalog_path, catalog, b"OpenAction", AnchorKind::OpenAction, &Scope::Catalog, 0);

        // 2. Additional-actions maps
        self.inspect_additional_actions(&catalog_path, catalog, &Scope::Catalog);
        for (number, path, page) in &pages {
            self.inspect_additional_actions(path, *page, &Scope::Page { number: *number });
            for annot in annotations.iter().filter(|annot| annot.page == *number) {
                let scope = Scope::Annotation { page: annot.page, index: annot.index };
                self.inspect_additional_actions(&annot.path, annot.dict, &scope);
            }
        }

        // 3. Direct actions
        for annot in &annotations {
            let scope = Scope::Annotation { page: annot.page, index: annot.index };
            self.inspect_slot(&annot.path, annot.dict, b"A", AnchorKind::DirectAction, &scope, 0);
        }
        for (index, path, item) in self.outline_items(&catalog_path, catalog) {
            let scope = Scope::OutlineItem { index };
            self.inspect_slot(&path, item, b"A", AnchorKind::DirectAction, &scope, 0);
        }

        // 4. Name trees
        self.scan_name_trees(&catalog_path, catalog);

        // 5. Everything else reachable from the catalog
        self.sweep(root, catalog);

        Ok(())
    }

    fn resolve_logged(&self, value: &'a Object, at: &ObjectPath) -> Option<Resolved<'a>> {
        match resolve(self.doc, value, self.max_depth) {
            Ok(resolved) => Some(resolved),
            Err(e @ Error::DepthExceeded { .. }) => {
                warn!(%at, error = %e, "skipping reference chain");
                None
            }
            Err(e) => {
                debug!(%at, error = %e, "skipping branch");
                None
            }
        }
    }

    /// Resolve `dict[key]`, returning the value and its path
    fn entry(&self, path: &ObjectPath, dict: &'a Dictionary, key: &[u8]) -> Option<(ObjectPath, &'a Object)> {
        let value = dict.get(key).ok()?;
        let at = path.child(Step::Key(key.to_vec()));
        let resolved = self.resolve_logged(value, &at)?;
        Some((path.descend(Step::Key(key.to_vec()), &resolved), resolved.value))
    }

    fn report(&mut self, kind: AnchorKind, scope: &Scope, container: &ObjectPath, target: Target) {
        if !self.reported.insert((container.clone(), target.clone())) {
            return;
        }
        let finding = Finding {
            kind,
            scope: scope.clone(),
            container: container.clone(),
            target,
        };
        debug!(%finding, "found JavaScript action");
        self.findings.push(finding);
    }

    /// Inspect an action slot: a JavaScript action there is a finding, an array
    /// of actions is checked element by element, and other actions have their
    /// `/Next` chain followed
    fn inspect_slot(
        &mut self,
        path: &ObjectPath,
        dict: &'a Dictionary,
        key: &[u8],
        kind: AnchorKind,
        scope: &Scope,
        depth: usize,
    ) {
        let Ok(value) = dict.get(key) else {
            return;
        };
        let at = path.child(Step::Key(key.to_vec()));
        let Some(resolved) = self.resolve_logged(value, &at) else {
            return;
        };
        let value_path = path.descend(Step::Key(key.to_vec()), &resolved);

        if let Some(action) = as_dict(resolved.value) {
            if is_javascript_action(action) {
                self.report(kind, scope, path, Target::Key(key.to_vec()));
            } else {
                self.follow_chain(&value_path, resolved.id, action, scope, depth);
            }
        } else if let Some(items) = as_array(resolved.value) {
            for (index, item) in items.iter().enumerate() {
                let at = value_path.child(Step::Index(index));
                let Some(item_resolved) = self.resolve_logged(item, &at) else {
                    continue;
                };
                let Some(action) = as_dict(item_resolved.value) else {
                    continue;
                };
                if is_javascript_action(action) {
                    self.report(kind, scope, &value_path, Target::Index(index));
                } else {
                    let item_path = value_path.descend(Step::Index(index), &item_resolved);
                    self.follow_chain(&item_path, item_resolved.id, action, scope, depth);
                }
            }
        }
    }

    fn follow_chain(
        &mut self,
        path: &ObjectPath,
        id: Option<ObjectId>,
        action: &'a Dictionary,
        scope: &Scope,
        depth: usize,
    ) {
        if !action.has(ACTION_TYPE_KEY) {
            return;
        }
        if let Some(id) = id {
            if !self.chained.insert(id) {
                return;
            }
        }
        if depth >= self.max_depth {
            warn!(at = %path, limit = self.max_depth, "action chain too long, not following");
            return;
        }
        self.inspect_slot(path, action, b"Next", AnchorKind::ActionChain, scope, depth + 1);
    }

    fn inspect_additional_actions(&mut self, path: &ObjectPath, owner: &'a Dictionary, scope: &Scope) {
        let Some((map_path, map)) = self.entry(path, owner, b"AA") else {
            return;
        };
        let Some(map) = as_dict(map) else {
            debug!(at = %map_path, "/AA is not a dictionary");
            return;
        };
        for (trigger, _) in map.iter() {
            self.inspect_slot(&map_path, map, trigger, AnchorKind::AdditionalActions, scope, 0);
        }
    }

    /// Leaf pages in document order, cycle-guarded
    fn pages(&self, catalog_path: &ObjectPath, catalog: &'a Dictionary) -> Vec<(u32, ObjectPath, &'a Dictionary)> {
        let mut pages = Vec::new();
        let Some((root_path, root)) = self.entry(catalog_path, catalog, b"Pages") else {
            warn!("catalog has no usable /Pages");
            return pages;
        };

        let mut visited = HashSet::new();
        visited.insert(root_path.root);
        let mut stack = vec![(root_path, root, 0usize)];

        while let Some((path, node, depth)) = stack.pop() {
            let Some(node) = as_dict(node) else {
                continue;
            };
            let Some((kids_path, kids)) = self.entry(&path, node, b"Kids") else {
                pages.push((pages.len() as u32 + 1, path, node));
                continue;
            };
            if depth >= self.max_depth {
                warn!(at = %path, "page tree too deep, not descending");
                continue;
            }
            let Some(kids) = as_array(kids) else {
                continue;
            };
            // Reverse so the first kid is popped first
            for (index, kid) in kids.iter().enumerate().rev() {
                let at = kids_path.child(Step::Index(index));
                let Some(resolved) = self.resolve_logged(kid, &at) else {
                    continue;
                };
                if let Some(id) = resolved.id {
                    if !visited.insert(id) {
                        warn!(%at, "page tree cycle");
                        continue;
                    }
                }
                stack.push((kids_path.descend(Step::Index(index), &resolved), resolved.value, depth + 1));
            }
        }

        pages
    }

    fn annotations(&self, page: u32, path: &ObjectPath, dict: &'a Dictionary) -> Vec<Annotation<'a>> {
        let Some((annots_path, annots)) = self.entry(path, dict, b"Annots") else {
            return Vec::new();
        };
        let Some(items) = as_array(annots) else {
            warn!(page, at = %annots_path, "/Annots is not an array, skipping");
            return Vec::new();
        };

        items
            .iter()
            .enumerate()
            .filter_map(|(index, item)| {
                let resolved = self.resolve_logged(item, &annots_path.child(Step::Index(index)))?;
                let dict = as_dict(resolved.value)?;
                Some(Annotation {
                    page,
                    index: index + 1,
                    path: annots_path.descend(Step::Index(index), &resolved),
                    dict,
                })
            })
            .collect()
    }

    /// Outline items in pre-order, cycle-guarded
    fn outline_items(&self, catalog_path: &ObjectPath, catalog: &'a Dictionary) -> Vec<(usize, ObjectPath, &'a Dictionary)> {
        let mut items = Vec::new();
        let Some((outlines_path, outlines)) = self.entry(catalog_path, catalog, b"Outlines") else {
            return items;
        };
        let Some(outlines) = as_dict(outlines) else {
            return items;
        };

        let mut visited = HashSet::new();
        visited.insert(outlines_path.root);
        let mut stack = Vec::new();
        if let Some(first) = self.entry(&outlines_path, outlines, b"First") {
            stack.push(first);
        }

        while let Some((path, item)) = stack.pop() {
            if path.steps.is_empty() && !visited.insert(path.root) {
                debug!(at = %path, "outline item already visited");
                continue;
            }
            let Some(item) = as_dict(item) else {
                continue;
            };
            items.push((items.len() + 1, path.clone(), item));

            // Children before siblings
            if let Some(next) = self.entry(&path, item, b"Next") {
                stack.push(next);
            }
            if let Some(first) = self.entry(&path, item, b"First") {
                stack.push(first);
            }
        }

        items
    }

    /// Walk every tree under the catalog's `/Names`; only entries of the
    /// `/JavaScript` tree are reported
    fn scan_name_trees(&mut self, catalog_path: &ObjectPath, catalog: &'a Dictionary) {
        let Some((names_path, names)) = self.entry(catalog_path, catalog, b"Names") else {
            return;
        };
        let Some(names) = as_dict(names) else {
            return;
        };
        for (tree_key, _) in names.iter() {
            if let Some((tree_path, tree)) = self.entry(&names_path, names, tree_key) {
                self.scan_name_tree(tree_path, tree_key, tree);
            }
        }
    }

    fn scan_name_tree(&mut self, tree_path: ObjectPath, tree_key: &[u8], tree: &'a Object) {
        let mut visited = HashSet::new();
        if tree_path.steps.is_empty() {
            visited.insert(tree_path.root);
        }
        let mut stack = vec![(tree_path, tree, 0usize)];

        while let Some((path, node, depth)) = stack.pop() {
            let Some(node) = as_dict(node) else {
                continue;
            };

            if let Some((pairs_path, pairs)) = self.entry(&path, node, b"Names") {
                if let Some(pairs) = as_array(pairs) {
                    self.scan_name_pairs(&pairs_path, tree_key, pairs);
                }
            }

            let Some((kids_path, kids)) = self.entry(&path, node, b"Kids") else {
                continue;
            };
            let Some(kids) = as_array(kids) else {
                continue;
            };
            if depth >= self.max_depth {
                warn!(at = %path, limit = self.max_depth, "name tree too deep, not descending");
                continue;
            }
            for (index, kid) in kids.iter().enumerate().rev() {
                let at = kids_path.child(Step::Index(index));
                let Some(resolved) = self.resolve_logged(kid, &at) else {
                    continue;
                };
                if let Some(id) = resolved.id {
                    if !visited.insert(id) {
                        debug!(%at, "name tree node already visited");
                        continue;
                    }
                }
                stack.push((kids_path.descend(Step::Index(index), &resolved), resolved.value, depth + 1));
            }
        }
    }

    fn scan_name_pairs(&mut self, path: &ObjectPath, tree_key: &[u8], pairs: &'a [Object]) {
        for (index, pair) in pairs.chunks(2).enumerate() {
            let [name, value] = pair else {
                debug!(at = %path, "odd-length /Names array");
                continue;
            };
            let label = match name {
                Object::String(bytes, _) => String::from_utf8_lossy(bytes).into_owned(),
                other => format!("{:?}", other),
            };
            let scope = Scope::NameTree { name: label };
            if is_javascript_name_tree_entry(self.doc, tree_key, value, self.max_depth) {
                self.report(AnchorKind::NameTree, &scope, path, Target::NamePair(index * 2));
            } else if let Some(resolved) = self.resolve_logged(value, &path.child(Step::Index(index * 2 + 1))) {
                if let Some(action) = as_dict(resolved.value) {
                    let value_path = path.descend(Step::Index(index * 2 + 1), &resolved);
                    self.follow_chain(&value_path, resolved.id, action, &scope, 0);
                }
            }
        }
    }

    /// Check the action slots of every dictionary reachable from the catalog
    fn sweep(&mut self, root: ObjectId, catalog: &'a Dictionary) {
        let doc = self.doc;
        let mut visited = HashSet::new();
        let mut owners = vec![(ObjectPath::root(root), catalog)];
        owners.extend(
            ObjectGraphWalker::new(doc, root, &mut visited, self.max_depth)
                .filter(|visit| !as_dict(visit.container).is_some_and(is_javascript_action))
                .filter_map(|visit| entries_of(visit.value).map(|dict| (visit.path, dict))),
        );

        for (path, dict) in owners {
            if is_javascript_action(dict) {
                continue;
            }
            let scope = Scope::Object { id: path.root };
            self.inspect_slot(&path, dict, b"OpenAction", AnchorKind::OpenAction, &scope, 0);
            self.inspect_slot(&path, dict, b"A", AnchorKind::DirectAction, &scope, 0);
            self.inspect_additional_actions(&path, dict, &scope);
            if dict.has(ACTION_TYPE_KEY) {
                self.inspect_slot(&path, dict, b"Next", AnchorKind::ActionChain, &scope, 0);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::value::DEFAULT_MAX_DEPTH;

    fn name(value: &str) -> Object {
        Object::Name(value.as_bytes().to_vec())
    }

    fn js_action(script: &str) -> Dictionary {
        let mut action = Dictionary::new();
        action.set("S", name("JavaScript"));
        action.set("JS", Object::string_literal(script));
        action
    }

    fn uri_action() -> Dictionary {
        let mut action = Dictionary::new();
        action.set("S", name("URI"));
        action.set("URI", Object::string_literal("https://example.com"));
        action
    }

    /// Catalog with one empty page; returns (doc, catalog id, page id)
    fn skeleton() -> (Document, ObjectId, ObjectId) {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let mut page = Dictionary::new();
        page.set("Type", name("Page"));
        page.set("Parent", Object::Reference(pages_id));
        let page_id = doc.add_object(Object::Dictionary(page));

        let mut pages = Dictionary::new();
        pages.set("Type", name("Pages"));
        pages.set("Kids", Object::Array(vec![Object::Reference(page_id)]));
        pages.set("Count", Object::Integer(1));
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let mut catalog = Dictionary::new();
        catalog.set("Type", name("Catalog"));
        catalog.set("Pages", Object::Reference(pages_id));
        let catalog_id = doc.add_object(Object::Dictionary(catalog));
        doc.trailer.set("Root", Object::Reference(catalog_id));

        (doc, catalog_id, page_id)
    }

    fn dict_mut(doc: &mut Document, id: ObjectId) -> &mut Dictionary {
        match doc.objects.get_mut(&id) {
            Some(Object::Dictionary(dict)) => dict,
            _ => panic!("object {:?} is not a dictionary", id),
        }
    }

    #[test]
    fn test_clean_document_has_no_findings() {
        let (doc, _, _) = skeleton();
        assert!(locate_javascript(&doc, DEFAULT_MAX_DEPTH).unwrap().is_empty());
    }

    #[test]
    fn test_missing_catalog_is_an_error() {
        let doc = Document::with_version("1.5");
        assert!(matches!(locate_javascript(&doc, DEFAULT_MAX_DEPTH), Err(Error::MissingCatalog)));
    }

    #[test]
    fn test_open_action_found_once() {
        let (mut doc, catalog_id, _) = skeleton();
        let action_id = doc.add_object(Object::Dictionary(js_action("app.alert(1)")));
        dict_mut(&mut doc, catalog_id).set("OpenAction", Object::Reference(action_id));

        let findings = locate_javascript(&doc, DEFAULT_MAX_DEPTH).unwrap();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].kind, AnchorKind::OpenAction);
        assert_eq!(findings[0].scope, Scope::Catalog);
        assert_eq!(findings[0].container, ObjectPath::root(catalog_id));
        assert_eq!(findings[0].target, Target::Key(b"OpenAction".to_vec()));
    }

    #[test]
    fn test_open_action_destination_is_not_a_finding() {
        let (mut doc, catalog_id, page_id) = skeleton();
        dict_mut(&mut doc, catalog_id).set(
            "OpenAction",
            Object::Array(vec![Object::Reference(page_id), name("Fit")]),
        );
        assert!(locate_javascript(&doc, DEFAULT_MAX_DEPTH).unwrap().is_empty());
    }

    #[test]
    fn test_page_additional_action_found() {
        let (mut doc, _, page_id) = skeleton();
        let mut aa = Dictionary::new();
        aa.set("O", Object::Dictionary(js_action("open")));
        aa.set("C", Object::Dictionary(uri_action()));
        dict_mut(&mut doc, page_id).set("AA", Object::Dictionary(aa));

        let findings = locate_javascript(&doc, DEFAULT_MAX_DEPTH).unwrap();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].kind, AnchorKind::AdditionalActions);
        assert_eq!(findings[0].scope, Scope::Page { number: 1 });
        assert_eq!(findings[0].container, ObjectPath::root(page_id).child(Step::Key(b"AA".to_vec())));
        assert_eq!(findings[0].target, Target::Key(b"O".to_vec()));
    }

    #[test]
    fn test_inline_annotation_action_found() {
        let (mut doc, _, page_id) = skeleton();
        let mut annot = Dictionary::new();
        annot.set("Subtype", name("Link"));
        annot.set("A", Object::Dictionary(js_action("go")));
        dict_mut(&mut doc, page_id).set("Annots", Object::Array(vec![Object::Dictionary(annot)]));

        let findings = locate_javascript(&doc, DEFAULT_MAX_DEPTH).unwrap();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].kind, AnchorKind::DirectAction);
        assert_eq!(findings[0].scope, Scope::Annotation { page: 1, index: 1 });
        assert_eq!(findings[0].to_string(), format!("action on page 1 annotation 1 at {} 0 R/Annots[0]/A", page_id.0));
    }

    #[test]
    fn test_outline_item_action_found() {
        let (mut doc, catalog_id, _) = skeleton();
        let outlines_id = doc.new_object_id();
        let second_id = doc.new_object_id();
        let mut first = Dictionary::new();
        first.set("Title", Object::string_literal("Intro"));
        first.set("Parent", Object::Reference(outlines_id));
        first.set("Next", Object::Reference(second_id));
        let first_id = doc.add_object(Object::Dictionary(first));

        let mut second = Dictionary::new();
        second.set("Title", Object::string_literal("Run"));
        second.set("Parent", Object::Reference(outlines_id));
        second.set("Prev", Object::Reference(first_id));
        second.set("A", Object::Dictionary(js_action("run()")));
        doc.objects.insert(second_id, Object::Dictionary(second));

        let mut outlines = Dictionary::new();
        outlines.set("First", Object::Reference(first_id));
        outlines.set("Last", Object::Reference(second_id));
        doc.objects.insert(outlines_id, Object::Dictionary(outlines));
        dict_mut(&mut doc, catalog_id).set("Outlines", Object::Reference(outlines_id));

        let findings = locate_javascript(&doc, DEFAULT_MAX_DEPTH).unwrap();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].scope, Scope::OutlineItem { index: 2 });
        assert_eq!(findings[0].container, ObjectPath::root(second_id));
    }

    #[test]
    fn test_chained_action_found() {
        let (mut doc, catalog_id, _) = skeleton();
        let mut first = uri_action();
        first.set("Next", Object::Array(vec![
            Object::Dictionary(uri_action()),
            Object::Dictionary(js_action("chained")),
        ]));
        let first_id = doc.add_object(Object::Dictionary(first));
        dict_mut(&mut doc, catalog_id).set("OpenAction", Object::Reference(first_id));

        let findings = locate_javascript(&doc, DEFAULT_MAX_DEPTH).unwrap();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].kind, AnchorKind::ActionChain);
        assert_eq!(findings[0].container, ObjectPath::root(first_id).child(Step::Key(b"Next".to_vec())));
        assert_eq!(findings[0].target, Target::Index(1));
    }

    #[test]
    fn test_sweep_finds_form_field_action() {
        let (mut doc, catalog_id, _) = skeleton();
        let mut aa = Dictionary::new();
        aa.set("K", Object::Dictionary(js_action("keystroke")));
        let mut field = Dictionary::new();
        field.set("FT", name("Tx"));
        field.set("AA", Object::Dictionary(aa));
        let field_id = doc.add_object(Object::Dictionary(field));
        let mut acroform = Dictionary::new();
        acroform.set("Fields", Object::Array(vec![Object::Reference(field_id)]));
        dict_mut(&mut doc, catalog_id).set("AcroForm", Object::Dictionary(acroform));

        let findings = locate_javascript(&doc, DEFAULT_MAX_DEPTH).unwrap();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].kind, AnchorKind::AdditionalActions);
        assert_eq!(findings[0].scope, Scope::Object { id: field_id });
    }

    #[test]
    fn test_name_tree_with_kids_cycle_terminates() {
        let (mut doc, catalog_id, _) = skeleton();
        let root_id = doc.new_object_id();

        let mut leaf = Dictionary::new();
        leaf.set("Names", Object::Array(vec![
            Object::string_literal("init"),
            Object::Dictionary(js_action("init()")),
        ]));
        // Malformed: the leaf points back at the root
        leaf.set("Kids", Object::Array(vec![Object::Reference(root_id)]));
        let leaf_id = doc.add_object(Object::Dictionary(leaf));

        let mut tree = Dictionary::new();
        tree.set("Kids", Object::Array(vec![Object::Reference(leaf_id)]));
        doc.objects.insert(root_id, Object::Dictionary(tree));

        let mut names = Dictionary::new();
        names.set("JavaScript", Object::Reference(root_id));
        dict_mut(&mut doc, catalog_id).set("Names", Object::Dictionary(names));

        let findings = locate_javascript(&doc, DEFAULT_MAX_DEPTH).unwrap();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].kind, AnchorKind::NameTree);
        assert_eq!(findings[0].scope, Scope::NameTree { name: "init".to_string() });
        assert_eq!(findings[0].container, ObjectPath::root(leaf_id).child(Step::Key(b"Names".to_vec())));
        assert_eq!(findings[0].target, Target::NamePair(0));
    }

    #[test]
    fn test_only_javascript_name_tree_entries_reported() {
        let (mut doc, catalog_id, _) = skeleton();

        let mut files = Dictionary::new();
        files.set("Names", Object::Array(vec![
            Object::string_literal("attachment"),
            Object::Dictionary(js_action("not a document script")),
        ]));
        let mut scripts = Dictionary::new();
        scripts.set("Names", Object::Array(vec![
            Object::string_literal("startup"),
            Object::Dictionary(js_action("startup()")),
        ]));
        let scripts_id = doc.add_object(Object::Dictionary(scripts));

        let mut names = Dictionary::new();
        names.set("EmbeddedFiles", Object::Dictionary(files));
        names.set("JavaScript", Object::Reference(scripts_id));
        dict_mut(&mut doc, catalog_id).set("Names", Object::Dictionary(names));

        let findings = locate_javascript(&doc, DEFAULT_MAX_DEPTH).unwrap();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].scope, Scope::NameTree { name: "startup".to_string() });
        assert_eq!(findings[0].container, ObjectPath::root(scripts_id).child(Step::Key(b"Names".to_vec())));
    }

    #[test]
    fn test_scan_order_is_deterministic() {
        let (mut doc, catalog_id, page_id) = skeleton();
        let mut aa = Dictionary::new();
        aa.set("WC", Object::Dictionary(js_action("close")));
        let catalog = dict_mut(&mut doc, catalog_id);
        catalog.set("AA", Object::Dictionary(aa));
        catalog.set("OpenAction", Object::Dictionary(js_action("open")));
        let mut annot = Dictionary::new();
        annot.set("A", Object::Dictionary(js_action("click")));
        dict_mut(&mut doc, page_id).set("Annots", Object::Array(vec![Object::Dictionary(annot)]));

        let kinds: Vec<_> = locate_javascript(&doc, DEFAULT_MAX_DEPTH)
            .unwrap()
            .into_iter()
            .map(|finding| finding.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![AnchorKind::OpenAction, AnchorKind::AdditionalActions, AnchorKind::DirectAction]
        );
    }
}
