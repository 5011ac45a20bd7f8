//! End-to-end tests that encode programmatically built trees, decode the
//! output again and compare the two trees.

use std::collections::BTreeMap;

use pretty_assertions::assert_eq;
use sxml::{new_node_ref, ErrorKind, Namespace, Node, NodeRef, TreeCodec};

/// A comparable snapshot of a tree: name, attributes, leaf text, children.
#[derive(Debug, PartialEq)]
struct Shape {
    prefix: Option<String>,
    name: String,
    attributes: BTreeMap<String, String>,
    text: Option<String>,
    children: Vec<Shape>,
}

/// Snapshot of a tree built for encoding; prefixes come from namespaces.
fn encoded_shape(node: &NodeRef) -> Shape {
    let node = node.borrow();
    Shape {
        prefix: node.namespace().map(|ns| ns.prefix().to_string()),
        name: node.name().to_string(),
        attributes: node.attributes().clone(),
        text: leaf_text(&node),
        children: node.children().iter().map(encoded_shape).collect(),
    }
}

/// Snapshot of a decoded tree; namespace declarations are not attributes.
fn decoded_shape(node: &NodeRef) -> Shape {
    let node = node.borrow();
    Shape {
        prefix: node.prefix().map(str::to_string),
        name: node.name().to_string(),
        attributes: node
            .attributes()
            .iter()
            .filter(|(key, _)| !key.starts_with("xmlns:"))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect(),
        text: leaf_text(&node),
        children: node.children().iter().map(decoded_shape).collect(),
    }
}

/// Text only counts for childless nodes.
fn leaf_text(node: &Node) -> Option<String> {
    if node.has_children() {
        None
    } else {
        node.text_value().map(str::to_string)
    }
}

fn element(name: &str, ns: &Namespace) -> NodeRef {
    new_node_ref(Node::with_namespace(name, ns.clone()))
}

fn catalog() -> NodeRef {
    let lib = Namespace::new("lib", "urn:example:library");
    let meta = Namespace::new("meta", "urn:example:meta");

    let root = element("catalog", &lib);
    root.borrow_mut().add_attribute_string("owner", "City Library");

    for (idx, title) in ["Dune", "Solaris"].into_iter().enumerate() {
        let book = element("book", &lib);
        {
            let mut book = book.borrow_mut();
            book.add_attribute_integer("id", idx as i64 + 1);
            book.add_attribute_double("rating", 4.5);
            book.add_attribute_boolean("available", idx == 0);
        }
        let title_node = element("title", &lib);
        title_node
            .borrow_mut()
            .set_text_value(Some(title.to_string()));
        Node::add_child(&book, title_node);
        Node::add_child(&book, element("cover", &meta));
        Node::add_child(&root, book);
    }

    let note = element("note", &meta);
    note.borrow_mut()
        .add_attribute_string("quote", r#"He said "read""#);
    Node::add_child(&root, note);
    root
}

#[test]
fn compact_round_trip() {
    let tree = catalog();
    let xml = TreeCodec::encode_to_string(&tree, false).unwrap();
    let decoded = TreeCodec::decode_str(&xml, Some("catalog.xml")).unwrap();

    assert_eq!(decoded_shape(&decoded), encoded_shape(&tree));
}

#[test]
fn pretty_round_trip() {
    let tree = catalog();
    let xml = TreeCodec::encode_to_string(&tree, true).unwrap();
    let decoded = TreeCodec::decode_str(&xml, None).unwrap();

    assert_eq!(decoded_shape(&decoded), encoded_shape(&tree));
    // Indentation shows up as character data on the parents only
    let root = decoded.borrow();
    assert!(root.text_value().is_some_and(|t| t.trim().is_empty()));
}

#[test]
fn quoted_attribute_survives_round_trip() {
    let tree = catalog();
    let xml = TreeCodec::encode_to_string(&tree, false).unwrap();
    assert!(xml.contains(r#"quote="He said {inch}read{inch}""#));

    let decoded = TreeCodec::decode_str(&xml, None).unwrap();
    let note = decoded.borrow().get_child("NOTE").unwrap();
    assert_eq!(
        note.borrow().attribute_string("quote").as_deref(),
        Some(r#"He said "read""#)
    );
}

#[test]
fn typed_attributes_after_decode() {
    let xml = TreeCodec::encode_to_string(&catalog(), false).unwrap();
    let decoded = TreeCodec::decode_str(&xml, None).unwrap();
    let root = decoded.borrow();
    let book = root.get_child("book").unwrap();
    let book = book.borrow();

    assert_eq!(book.attribute_integer("id").unwrap(), 1);
    assert_eq!(book.attribute_double("rating").unwrap(), 4.5);
    assert!(book.attribute_boolean("available"));
    assert_eq!(book.child_text_value("title"), Some("Dune".to_string()));
    assert_eq!(book.xml_ref(), Some("catalog.book".to_string()));
}

#[test]
fn namespaces_declared_once_on_root() {
    let xml = TreeCodec::encode_to_string(&catalog(), true).unwrap();
    let first_line = xml.lines().next().unwrap();

    assert_eq!(
        first_line,
        r#"<lib:catalog owner="City Library" xmlns:lib="urn:example:library" xmlns:meta="urn:example:meta">"#
    );
    assert_eq!(xml.matches("xmlns:").count(), 2);
}

#[test]
fn decode_then_reencode_with_assigned_namespace() {
    let decoded = TreeCodec::decode_str(r#"<a><b x="1">hi</b></a>"#, None).unwrap();
    {
        let a = decoded.borrow();
        assert_eq!(a.name(), "a");
        assert_eq!(a.child_count(), 1);
        let b = a.get_child("b").unwrap();
        assert_eq!(b.borrow().attribute_string("x").as_deref(), Some("1"));
        assert_eq!(b.borrow().text_value(), Some("hi"));
    }

    // Decoded trees carry no namespaces
    let err = TreeCodec::encode_to_string(&decoded, false).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Encode);

    Node::assign_namespace(&decoded, &Namespace::new("a", "urn:x"));
    assert_eq!(
        TreeCodec::encode_to_string(&decoded, false).unwrap(),
        r#"<a:a xmlns:a="urn:x"><a:b x="1">hi</a:b></a:a>"#
    );
}

#[test]
fn malformed_input_reports_line() {
    let err = TreeCodec::decode_str("<a><b></a>", Some("broken.xml")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parse);
    assert!(err.line().is_some_and(|line| line >= 1));
    assert_eq!(
        err.to_string(),
        format!(
            "Parse error in XML document. Line: {} in file broken.xml",
            err.line().unwrap()
        )
    );
}

#[test]
fn file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.xml");

    let tree = catalog();
    TreeCodec::encode_to_file(&tree, &path).unwrap();
    let decoded = TreeCodec::decode_file(&path).unwrap();

    assert_eq!(decoded_shape(&decoded), encoded_shape(&tree));
    let label = path.display().to_string();
    assert_eq!(decoded.borrow().source_file(), Some(label.as_str()));
    assert_eq!(decoded.borrow().source_line(), Some(1));
}
