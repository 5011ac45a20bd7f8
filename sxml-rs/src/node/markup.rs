//! XML tag fragments for a single node.
//!
//! Tags are always rendered as `prefix:name` with the prefix taken from the
//! node's [`Namespace`], never from the prefix split off the raw name.

use std::collections::BTreeSet;

use super::{Namespace, Node, NodeRef};
use crate::error::{Error, Result};

impl Node {
    fn qualified_name(&self) -> Result<String> {
        let namespace = self.namespace.as_ref().ok_or_else(|| Error::MissingNamespace {
            name: self.name.clone(),
        })?;
        Ok(format!("{}:{}", namespace.prefix(), self.name))
    }

    /// Returns `<prefix:name attrs>`.
    pub fn start_xml_name(&self) -> Result<String> {
        Ok(format!(
            "<{}{}>",
            self.qualified_name()?,
            self.attributes_as_string()
        ))
    }

    /// Returns `</prefix:name>`.
    pub fn end_xml_name(&self) -> Result<String> {
        Ok(format!("</{}>", self.qualified_name()?))
    }

    /// Returns `<prefix:name attrs/>`.
    pub fn empty_xml_name(&self) -> Result<String> {
        Ok(format!(
            "<{}{}/>",
            self.qualified_name()?,
            self.attributes_as_string()
        ))
    }

    /// Returns the start tag of `node` followed by one `xmlns:` declaration
    /// for every distinct namespace in its subtree, in sorted order.
    pub fn start_xml_name_with_declarations(node: &NodeRef) -> Result<String> {
        let namespaces = Node::collect_namespaces(node);
        let node = node.borrow();
        let mut tag = format!("<{}{}", node.qualified_name()?, node.attributes_as_string());
        for namespace in &namespaces {
            tag.push_str(&namespace.declaration());
        }
        tag.push('>');
        Ok(tag)
    }

    /// Collects the namespaces of a subtree, its root included, depth first.
    pub fn collect_namespaces(root: &NodeRef) -> BTreeSet<Namespace> {
        let mut found = BTreeSet::new();
        collect_into(root, &mut found);
        found
    }
}

fn collect_into(node: &NodeRef, found: &mut BTreeSet<Namespace>) {
    let node = node.borrow();
    if let Some(namespace) = &node.namespace {
        found.insert(namespace.clone());
    }
    for child in &node.children {
        collect_into(child, found);
    }
}
