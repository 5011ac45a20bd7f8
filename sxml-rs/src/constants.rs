//! Constants used throughout sxml.

/// Token stored in place of `"` inside attribute values.
pub const ATTRIBUTE_QUOTE_PLACEHOLDER: &str = "{inch}";

/// Separator between a prefix and a local name.
pub const QUALIFIER_SEPARATOR: char = ':';

/// Spaces added per depth level when pretty printing.
pub const DEFAULT_INDENT_WIDTH: usize = 3;

/// File label used when the decoder is not given one.
pub const DEFAULT_FILE_NAME: &str = "Unknown";
