//! XML decoding and encoding.
//!
//! [`TreeCodec`] bundles the stateless entry points. Decoding produces a
//! tree without namespaces; encoding needs a namespace on every node. See
//! [`crate::node`] for why a decoded tree is not directly re-encodable.

mod decoder;
mod encoder;

pub use decoder::{decode_str, TreeDecoder};
pub use encoder::{encode_to_string, EncodeOptions, TreeEncoder};

use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use crate::error::{Error, ParseCause, Result};
use crate::node::NodeRef;

/// Stateless encode and decode operations on node trees.
pub struct TreeCodec;

impl TreeCodec {
    /// Encodes a tree to text.
    pub fn encode_to_string(node: &NodeRef, pretty: bool) -> Result<String> {
        encode_to_string(node, pretty)
    }

    /// Encodes a tree, pretty printed, and writes it to `sink` as UTF-8.
    pub fn encode_to_writer<W: Write>(node: &NodeRef, sink: W) -> Result<()> {
        TreeEncoder::with_options(EncodeOptions::pretty()).encode_to_writer(node, sink)
    }

    /// Encodes a tree, pretty printed, into a file.
    pub fn encode_to_file<P: AsRef<Path>>(node: &NodeRef, path: P) -> Result<()> {
        let file = File::create(path).map_err(Error::Encode)?;
        Self::encode_to_writer(node, BufWriter::new(file))
    }

    /// Decodes a document from a string. `file_name` labels nodes and errors.
    pub fn decode_str(xml: &str, file_name: Option<&str>) -> Result<NodeRef> {
        Self::decoder(file_name).decode_str(xml)
    }

    /// Decodes a document from UTF-8 bytes.
    pub fn decode_bytes(bytes: &[u8], file_name: Option<&str>) -> Result<NodeRef> {
        Self::decoder(file_name).decode_bytes(bytes)
    }

    /// Decodes a document from a byte stream.
    pub fn decode_reader<R: Read>(reader: R, file_name: Option<&str>) -> Result<NodeRef> {
        Self::decoder(file_name).decode_reader(reader)
    }

    /// Decodes a file, labelling nodes and errors with its path.
    pub fn decode_file<P: AsRef<Path>>(path: P) -> Result<NodeRef> {
        let path = path.as_ref();
        let decoder = TreeDecoder::new(path.display().to_string());
        let file = File::open(path).map_err(|e| Error::Parse {
            line: None,
            file: decoder.file_name().to_string(),
            cause: ParseCause::Io(e),
        })?;
        decoder.decode_reader(file)
    }

    fn decoder(file_name: Option<&str>) -> TreeDecoder {
        file_name.map(TreeDecoder::new).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::node::{Namespace, Node};

    #[test]
    fn test_decode_labels() {
        let named = TreeCodec::decode_str("<a/>", Some("a.xml")).unwrap();
        assert_eq!(named.borrow().source_file(), Some("a.xml"));

        let unnamed = TreeCodec::decode_bytes(b"<a/>", None).unwrap();
        assert_eq!(unnamed.borrow().source_file(), Some("Unknown"));
    }

    #[test]
    fn test_decode_missing_file() {
        let err = TreeCodec::decode_file("/nonexistent/sxml/input.xml").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
        assert_eq!(err.line(), None);
    }

    #[test]
    fn test_encode_to_writer_is_pretty() {
        let root = TreeCodec::decode_str("<a><b>x</b></a>", None).unwrap();
        Node::assign_namespace(&root, &Namespace::new("n", "urn:n"));

        let mut sink = Vec::new();
        TreeCodec::encode_to_writer(&root, &mut sink).unwrap();
        assert_eq!(
            String::from_utf8(sink).unwrap(),
            "<n:a xmlns:n=\"urn:n\">\n   <n:b>x</n:b>\n</n:a>\n"
        );
    }
}
