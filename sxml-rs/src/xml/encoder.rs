//! XML encoder that writes node trees as text.
//!
//! The walk is depth first and pre-order. The entry node gets its start tag
//! with every namespace of the tree declared on it; all other start tags are
//! plain. Text values and attribute values are written verbatim: no entity
//! escaping happens here, so `<`, `&` or a raw `"` in content end up in the
//! output unchanged.

use std::io::Write;

use tracing::debug;

use crate::constants::DEFAULT_INDENT_WIDTH;
use crate::error::{Error, Result};
use crate::node::{Node, NodeRef};

/// Options for XML encoding.
#[derive(Debug, Clone)]
pub struct EncodeOptions {
    /// Whether to put every tag on its own, indented line.
    pub pretty_print: bool,
    /// Spaces per depth level when pretty printing.
    pub indent_width: usize,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        EncodeOptions {
            pretty_print: false,
            indent_width: DEFAULT_INDENT_WIDTH,
        }
    }
}

impl EncodeOptions {
    /// Options for pretty printed output with the default indent.
    pub fn pretty() -> Self {
        EncodeOptions {
            pretty_print: true,
            ..Default::default()
        }
    }
}

/// Encodes node trees into XML text.
#[derive(Debug, Default)]
pub struct TreeEncoder {
    options: EncodeOptions,
    out: String,
    /// Current indentation prefix.
    indent: String,
}

impl TreeEncoder {
    /// Creates an encoder with the given options.
    pub fn with_options(options: EncodeOptions) -> Self {
        TreeEncoder {
            options,
            out: String::new(),
            indent: String::new(),
        }
    }

    /// Encodes the tree rooted at `root` into a string.
    ///
    /// Every node must have a namespace.
    pub fn encode(mut self, root: &NodeRef) -> Result<String> {
        self.encode_node(root, true)?;
        debug!("Encoded {} bytes of XML", self.out.len());
        Ok(self.out)
    }

    /// Encodes the tree and writes it to `writer` as UTF-8.
    pub fn encode_to_writer<W: Write>(self, root: &NodeRef, mut writer: W) -> Result<()> {
        let text = self.encode(root)?;
        writer.write_all(text.as_bytes()).map_err(Error::Encode)?;
        writer.flush().map_err(Error::Encode)
    }

    fn encode_node(&mut self, node: &NodeRef, is_root: bool) -> Result<()> {
        self.out.push_str(&self.indent);
        let current = node.borrow();

        if current.has_children() {
            let start = if is_root {
                Node::start_xml_name_with_declarations(node)?
            } else {
                current.start_xml_name()?
            };
            self.out.push_str(&start);
            self.newline();

            self.push_indent();
            for child in current.children() {
                self.encode_node(child, false)?;
            }
            self.pop_indent();

            self.out.push_str(&self.indent);
            self.out.push_str(&current.end_xml_name()?);
        } else if let Some(text) = current.text_value() {
            self.out.push_str(&current.start_xml_name()?);
            self.out.push_str(text);
            self.out.push_str(&current.end_xml_name()?);
        } else {
            self.out.push_str(&current.empty_xml_name()?);
        }
        self.newline();
        Ok(())
    }

    fn newline(&mut self) {
        if self.options.pretty_print {
            self.out.push('\n');
        }
    }

    fn push_indent(&mut self) {
        if self.options.pretty_print {
            self.indent
                .extend(std::iter::repeat(' ').take(self.options.indent_width));
        }
    }

    fn pop_indent(&mut self) {
        if self.options.pretty_print {
            let len = self.indent.len().saturating_sub(self.options.indent_width);
            self.indent.truncate(len);
        }
    }
}

/// Encodes a tree to a string, optionally pretty printed.
pub fn encode_to_string(root: &NodeRef, pretty: bool) -> Result<String> {
    let options = EncodeOptions {
        pretty_print: pretty,
        ..Default::default()
    };
    TreeEncoder::with_options(options).encode(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::node::{new_node_ref, Namespace};
    use pretty_assertions::assert_eq;

    fn element(name: &str, ns: &Namespace) -> NodeRef {
        new_node_ref(Node::with_namespace(name, ns.clone()))
    }

    fn sample() -> NodeRef {
        let p = Namespace::new("p", "urn:p");
        let root = element("root", &p);
        let item = element("item", &p);
        item.borrow_mut().add_attribute_integer("id", 1);
        item.borrow_mut().set_text_value(Some("hi".to_string()));
        let group = element("group", &p);
        Node::add_child(&group, element("leaf", &p));
        Node::add_child(&root, item);
        Node::add_child(&root, group);
        root
    }

    #[test]
    fn test_compact() {
        assert_eq!(
            encode_to_string(&sample(), false).unwrap(),
            r#"<p:root xmlns:p="urn:p"><p:item id="1">hi</p:item><p:group><p:leaf/></p:group></p:root>"#
        );
    }

    #[test]
    fn test_pretty() {
        let expected = concat!(
            "<p:root xmlns:p=\"urn:p\">\n",
            "   <p:item id=\"1\">hi</p:item>\n",
            "   <p:group>\n",
            "      <p:leaf/>\n",
            "   </p:group>\n",
            "</p:root>\n",
        );
        assert_eq!(encode_to_string(&sample(), true).unwrap(), expected);
    }

    #[test]
    fn test_custom_indent_width() {
        let options = EncodeOptions {
            pretty_print: true,
            indent_width: 1,
        };
        let out = TreeEncoder::with_options(options).encode(&sample()).unwrap();
        assert!(out.contains("\n  <p:leaf/>\n"));
    }

    #[test]
    fn test_single_node() {
        let p = Namespace::new("p", "urn:p");
        assert_eq!(
            encode_to_string(&element("only", &p), false).unwrap(),
            "<p:only/>"
        );

        let text = element("only", &p);
        text.borrow_mut().set_text_value(Some("x".to_string()));
        assert_eq!(encode_to_string(&text, true).unwrap(), "<p:only>x</p:only>\n");
    }

    #[test]
    fn test_text_ignored_when_children_present() {
        let root = sample();
        root.borrow_mut().set_text_value(Some("\n   ".to_string()));
        assert_eq!(
            encode_to_string(&root, false).unwrap(),
            encode_to_string(&sample(), false).unwrap()
        );
    }

    #[test]
    fn test_no_escaping() {
        let p = Namespace::new("p", "urn:p");
        let node = element("t", &p);
        node.borrow_mut()
            .set_text_value(Some("a < b & c".to_string()));
        node.borrow_mut().add_attribute_string("q", r#"say "x""#);
        assert_eq!(
            encode_to_string(&node, false).unwrap(),
            r#"<p:t q="say {inch}x{inch}">a < b & c</p:t>"#
        );
    }

    #[test]
    fn test_namespace_declared_once() {
        let a = Namespace::new("a", "urn:a");
        let z = Namespace::new("z", "urn:z");
        let root = element("root", &a);
        let one = element("one", &z);
        let two = element("two", &z);
        let three = element("three", &z);
        Node::add_child(&root, one.clone());
        Node::add_child(&one, two.clone());
        Node::add_child(&two, three);

        let out = encode_to_string(&root, false).unwrap();
        assert_eq!(out.matches("xmlns:z=").count(), 1);
        assert!(out.starts_with(r#"<a:root xmlns:a="urn:a" xmlns:z="urn:z">"#));
    }

    #[test]
    fn test_missing_namespace() {
        let root = sample();
        Node::add_child(&root, new_node_ref(Node::new("bare")));
        let err = encode_to_string(&root, false).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Encode);
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("sink closed"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_writer_failure() {
        let err = TreeEncoder::with_options(EncodeOptions::pretty())
            .encode_to_writer(&sample(), FailingWriter)
            .unwrap_err();
        assert!(matches!(err, Error::Encode(_)));
        assert_eq!(err.to_string(), "Failed to encode node to stream.");
    }
}
