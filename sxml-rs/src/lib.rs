//! sxml - a small XML document model
//!
//! This library keeps an XML document as a tree of [`Node`]s with typed
//! attribute accessors, and converts between such trees and XML text.
//!
//! # Overview
//!
//! - [`Node`] is one element: local name, attributes, optional text value,
//!   ordered children, a weak link to its parent, an optional [`Namespace`]
//!   and, for decoded nodes, the file and line it came from.
//! - [`TreeCodec::decode_str`] and friends build a tree from XML text.
//! - [`TreeCodec::encode_to_string`] writes a tree back out, declaring every
//!   namespace used in the tree on the root start tag.
//!
//! Decoding and encoding are deliberately asymmetric: the decoder records
//! qualified-name prefixes but never assigns namespaces, while the encoder
//! renders tags only from namespaces. Assign them with
//! [`Node::assign_namespace`] before re-encoding a decoded tree.
//!
//! # Example
//!
//! ```
//! use sxml::{new_node_ref, Namespace, Node, TreeCodec};
//!
//! let ns = Namespace::new("cfg", "urn:example:config");
//! let root = new_node_ref(Node::with_namespace("settings", ns.clone()));
//! let entry = new_node_ref(Node::with_namespace("entry", ns));
//! entry.borrow_mut().add_attribute_integer("retries", 3);
//! Node::add_child(&root, entry);
//!
//! let xml = TreeCodec::encode_to_string(&root, false).unwrap();
//! assert_eq!(
//!     xml,
//!     r#"<cfg:settings xmlns:cfg="urn:example:config"><cfg:entry retries="3"/></cfg:settings>"#
//! );
//!
//! let decoded = TreeCodec::decode_str(&xml, Some("settings.xml")).unwrap();
//! let entry = decoded.borrow().get_child("entry").unwrap();
//! assert_eq!(entry.borrow().attribute_integer("retries").unwrap(), 3);
//! ```

pub mod constants;
pub mod error;
pub mod node;
pub mod xml;

// Re-export commonly used types
pub use constants::*;
pub use error::{Error, ErrorKind, ParseCause, Result};
pub use node::{new_node_ref, split_qname, Namespace, Node, NodeRef, WeakNodeRef};
pub use xml::{EncodeOptions, TreeCodec, TreeDecoder, TreeEncoder};
