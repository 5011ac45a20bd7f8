//! Namespace tags for encoded elements.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::constants::QUALIFIER_SEPARATOR;

/// An opaque `(prefix, tag)` pair rendered as `xmlns:prefix="tag"`.
///
/// The tag is never resolved against anything; it is written out verbatim.
/// Ordering, equality and hashing all use the concatenation `prefix + tag`,
/// so two namespaces whose concatenations coincide are treated as the same
/// declaration.
#[derive(Debug, Clone)]
pub struct Namespace {
    prefix: String,
    tag: String,
}

impl Namespace {
    /// Creates a new namespace.
    pub fn new(prefix: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            tag: tag.into(),
        }
    }

    /// Returns the prefix used on element names.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns the tag written as the declaration value.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    fn key(&self) -> impl Iterator<Item = u8> + '_ {
        self.prefix.bytes().chain(self.tag.bytes())
    }

    /// Renders the ` xmlns:prefix="tag"` declaration, including the leading space.
    pub fn declaration(&self) -> String {
        format!(" xmlns:{}=\"{}\"", self.prefix, self.tag)
    }
}

impl Ord for Namespace {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(other.key())
    }
}

impl PartialOrd for Namespace {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Namespace {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Namespace {}

impl Hash for Namespace {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for b in self.key() {
            state.write_u8(b);
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.prefix, self.tag)
    }
}

/// Splits a qualified name into prefix and local name.
///
/// Returns (Some(prefix), local) for "prefix:local"
/// Returns (None, name) for "name" without prefix, and for names that start
/// with the separator.
pub fn split_qname(qname: &str) -> (Option<&str>, &str) {
    match qname.find(QUALIFIER_SEPARATOR) {
        Some(pos) if pos > 0 => (Some(&qname[..pos]), &qname[pos + 1..]),
        _ => (None, qname),
    }
}
