//! Error types for sxml.

use thiserror::Error;

/// Result type alias for sxml operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Broad classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input document.
    Parse,
    /// A required child or attribute is missing.
    Lookup,
    /// An attribute value does not parse as the requested type.
    Format,
    /// The tree could not be written out.
    Encode,
}

/// Errors that can occur while building, reading, decoding or encoding trees.
#[derive(Error, Debug)]
pub enum Error {
    /// The XML document could not be decoded.
    #[error(
        "Parse error in XML document. Line: {} in file {file}",
        .line.map_or(-1, |l| l as i64)
    )]
    Parse {
        /// Best known 1-based line of the failure.
        line: Option<usize>,
        /// File label supplied to the decoder.
        file: String,
        /// What went wrong.
        #[source]
        cause: ParseCause,
    },

    /// A strict child lookup found nothing.
    #[error("Failed to find child {name}")]
    MissingChild { name: String },

    /// A strict attribute read found nothing.
    #[error("Failed to find attribute {key}")]
    MissingAttribute { key: String },

    /// An attribute value is not of the requested type.
    #[error("Attribute {key}=\"{value}\" is not a valid {expected}")]
    InvalidAttribute {
        key: String,
        value: String,
        expected: &'static str,
    },

    /// Writing the encoded tree to the sink failed.
    #[error("Failed to encode node to stream.")]
    Encode(#[source] std::io::Error),

    /// A node reached the encoder without a namespace to render its tag.
    #[error("Node {name} has no namespace and cannot be encoded")]
    MissingNamespace { name: String },
}

impl Error {
    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Parse { .. } => ErrorKind::Parse,
            Error::MissingChild { .. } | Error::MissingAttribute { .. } => ErrorKind::Lookup,
            Error::InvalidAttribute { .. } => ErrorKind::Format,
            Error::Encode(_) | Error::MissingNamespace { .. } => ErrorKind::Encode,
        }
    }

    /// Returns the line attached to a parse error.
    pub fn line(&self) -> Option<usize> {
        match self {
            Error::Parse { line, .. } => *line,
            _ => None,
        }
    }
}

/// Underlying reason of a [`Error::Parse`].
#[derive(Error, Debug)]
pub enum ParseCause {
    /// Error reported by quick-xml.
    #[error("XML error")]
    Xml(#[from] quick_xml::Error),

    /// The input could not be read.
    #[error("I/O error")]
    Io(#[from] std::io::Error),

    /// The input is not valid UTF-8.
    #[error("invalid UTF-8")]
    Utf8(#[from] std::str::Utf8Error),

    /// The event sequence does not form a single element tree.
    #[error("{0}")]
    Structure(String),
}
