//! Node structures for XML tree representation.
//!
//! A document is a tree of [`Node`]s, one per element. Nodes are shared
//! through [`NodeRef`] (`Rc<RefCell<Node>>`); children are owned by their
//! parent and each child keeps a weak back-reference to it, so a tree never
//! forms a strong reference cycle.
//!
//! A node carries two unrelated notions of prefix:
//!
//! - [`Node::prefix`] is split off the raw name given at construction. The
//!   decoder sets it from qualified element names.
//! - [`Node::namespace`] is assigned explicitly and is the only thing the
//!   encoder looks at when rendering tags.
//!
//! The two are never reconciled. A decoded tree therefore has no namespaces
//! and cannot be encoded until [`Node::assign_namespace`] (or
//! [`Node::set_namespace`]) gives every node one.

mod attributes;
mod markup;
pub mod namespace;

pub use namespace::{split_qname, Namespace};

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

use crate::error::{Error, Result};

/// A reference-counted pointer to a node.
pub type NodeRef = Rc<RefCell<Node>>;

/// A weak reference to a node, used for parent links.
pub type WeakNodeRef = Weak<RefCell<Node>>;

/// Wraps a node into a [`NodeRef`].
pub fn new_node_ref(node: Node) -> NodeRef {
    Rc::new(RefCell::new(node))
}

/// One XML element.
#[derive(Debug, Default)]
pub struct Node {
    /// Local name, never containing the qualifier separator split off at construction.
    name: String,
    /// Prefix split off the raw name.
    prefix: Option<String>,
    /// Attributes in their stored (placeholder-escaped) form.
    attributes: BTreeMap<String, String>,
    /// Character data of the element.
    text_value: Option<String>,
    /// Child elements in document order.
    children: Vec<NodeRef>,
    /// Weak reference to parent node.
    parent: WeakNodeRef,
    /// Namespace used when encoding.
    namespace: Option<Namespace>,
    /// File the node was decoded from.
    source_file: Option<String>,
    /// 1-based line the node was decoded from.
    source_line: Option<usize>,
}

impl Node {
    /// Creates a node from a raw, possibly qualified, name.
    pub fn new(raw_name: &str) -> Self {
        let (prefix, name) = split_qname(raw_name);
        Node {
            name: name.to_string(),
            prefix: prefix.map(str::to_string),
            ..Default::default()
        }
    }

    /// Creates a node tagged with where it was decoded from.
    pub fn with_source(raw_name: &str, source_file: &str, source_line: Option<usize>) -> Self {
        Node {
            source_file: Some(source_file.to_string()),
            source_line,
            ..Node::new(raw_name)
        }
    }

    /// Creates a node that will be encoded with the given namespace.
    pub fn with_namespace(raw_name: &str, namespace: Namespace) -> Self {
        Node {
            namespace: Some(namespace),
            ..Node::new(raw_name)
        }
    }

    /// Returns the local name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the prefix split off the raw name, if any.
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// Returns the namespace used for encoding, if assigned.
    pub fn namespace(&self) -> Option<&Namespace> {
        self.namespace.as_ref()
    }

    /// Sets the namespace used for encoding.
    pub fn set_namespace(&mut self, namespace: Option<Namespace>) {
        self.namespace = namespace;
    }

    /// Returns the file this node was decoded from.
    pub fn source_file(&self) -> Option<&str> {
        self.source_file.as_deref()
    }

    /// Returns the line this node was decoded from.
    pub fn source_line(&self) -> Option<usize> {
        self.source_line
    }

    /// Returns the text value.
    pub fn text_value(&self) -> Option<&str> {
        self.text_value.as_deref()
    }

    /// Replaces the text value.
    pub fn set_text_value(&mut self, value: Option<String>) {
        self.text_value = value;
    }

    /// Appends character data to the text value, creating it if needed.
    pub fn append_text(&mut self, text: &str) {
        match &mut self.text_value {
            Some(existing) => existing.push_str(text),
            None => self.text_value = Some(text.to_string()),
        }
    }

    /// Returns true if the node has a text value.
    pub fn has_text_value(&self) -> bool {
        self.text_value.is_some()
    }

    /// Returns the children as a slice.
    pub fn children(&self) -> &[NodeRef] {
        &self.children
    }

    /// Returns the number of children.
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Returns true if the node has at least one child.
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Returns the parent, or None for a root node.
    pub fn parent(&self) -> Option<NodeRef> {
        self.parent.upgrade()
    }

    /// Returns true if this node has no parent.
    pub fn is_root(&self) -> bool {
        self.parent.upgrade().is_none()
    }

    /// Returns the first direct child whose name matches case-insensitively.
    pub fn find_child(&self, name: &str) -> Option<NodeRef> {
        self.children
            .iter()
            .find(|child| names_match(child.borrow().name(), name))
            .cloned()
    }

    /// Like [`find_child`](Self::find_child) but fails when nothing matches.
    pub fn get_child(&self, name: &str) -> Result<NodeRef> {
        self.find_child(name).ok_or_else(|| Error::MissingChild {
            name: name.to_string(),
        })
    }

    /// Returns the text value of the named child.
    pub fn child_text_value(&self, name: &str) -> Option<String> {
        self.find_child(name)
            .and_then(|child| child.borrow().text_value().map(str::to_string))
    }

    /// Returns `"<parent>.<name>"` in lowercase, or None for a root node.
    pub fn xml_ref(&self) -> Option<String> {
        let parent = self.parent.upgrade()?;
        let parent = parent.borrow();
        Some(format!("{}.{}", parent.name(), self.name).to_lowercase())
    }
}

/// Helper functions that work with NodeRef.
impl Node {
    /// Appends `child` to `parent` and points the child back at it.
    ///
    /// The caller must not create cycles; a node added below one of its own
    /// descendants would never be freed.
    pub fn add_child(parent: &NodeRef, child: NodeRef) {
        child.borrow_mut().parent = Rc::downgrade(parent);
        parent.borrow_mut().children.push(child);
    }

    /// Gives every node in the subtree that has no namespace the given one.
    pub fn assign_namespace(root: &NodeRef, namespace: &Namespace) {
        let mut stack = vec![Rc::clone(root)];
        while let Some(node) = stack.pop() {
            let mut node = node.borrow_mut();
            if node.namespace.is_none() {
                node.namespace = Some(namespace.clone());
            }
            stack.extend(node.children.iter().cloned());
        }
    }

    /// Counts the nodes of a subtree, including its root.
    pub fn subtree_size(root: &NodeRef) -> usize {
        let node = root.borrow();
        1 + node.children.iter().map(Node::subtree_size).sum::<usize>()
    }
}

/// Case-insensitive name comparison used by child lookups.
fn names_match(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}
