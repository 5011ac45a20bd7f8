//! Typed attribute accessors.
//!
//! Attributes are stored as strings. A `"` inside a value is stored as
//! [`ATTRIBUTE_QUOTE_PLACEHOLDER`] so the stored text can be dropped between
//! the double quotes of a start tag as-is; the string reader turns the
//! placeholder back into `"`. The other typed accessors go through the string
//! accessors.

use std::collections::BTreeMap;
use std::str::FromStr;

use super::Node;
use crate::constants::ATTRIBUTE_QUOTE_PLACEHOLDER;
use crate::error::{Error, Result};

impl Node {
    /// Returns the attributes in their stored form.
    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }

    /// Returns a mutable reference to the stored attributes.
    ///
    /// Values written here bypass the quote placeholder.
    pub fn attributes_mut(&mut self) -> &mut BTreeMap<String, String> {
        &mut self.attributes
    }

    /// Returns the attribute keys.
    pub fn attribute_keys(&self) -> impl Iterator<Item = &str> {
        self.attributes.keys().map(String::as_str)
    }

    /// Returns true if the attribute is set.
    pub fn has_attribute(&self, key: &str) -> bool {
        self.attributes.contains_key(key)
    }

    /// Returns true if any attribute is set.
    pub fn has_attributes(&self) -> bool {
        !self.attributes.is_empty()
    }

    // string

    /// Stores a string attribute.
    pub fn add_attribute_string(&mut self, key: &str, value: &str) {
        self.attributes.insert(
            key.to_string(),
            value.replace('"', ATTRIBUTE_QUOTE_PLACEHOLDER),
        );
    }

    /// Reads a string attribute.
    pub fn attribute_string(&self, key: &str) -> Option<String> {
        self.attributes
            .get(key)
            .map(|value| value.replace(ATTRIBUTE_QUOTE_PLACEHOLDER, "\""))
    }

    /// Reads a string attribute, falling back to `default` when it is absent.
    pub fn attribute_string_or(&self, key: &str, default: &str) -> String {
        self.attribute_string(key)
            .unwrap_or_else(|| default.to_string())
    }

    // integer

    /// Stores an integer attribute.
    pub fn add_attribute_integer(&mut self, key: &str, value: i64) {
        self.add_attribute_string(key, &value.to_string());
    }

    /// Stores an integer attribute unless it equals `default`.
    pub fn add_attribute_integer_unless_default(&mut self, key: &str, value: i64, default: i64) {
        if value != default {
            self.add_attribute_integer(key, value);
        }
    }

    /// Reads an integer attribute.
    pub fn attribute_integer(&self, key: &str) -> Result<i64> {
        self.parse_required(key, "integer")
    }

    /// Reads an integer attribute, falling back to `default` when it is absent.
    pub fn attribute_integer_or(&self, key: &str, default: i64) -> Result<i64> {
        if self.has_attribute(key) {
            self.attribute_integer(key)
        } else {
            Ok(default)
        }
    }

    // double

    /// Stores a floating point attribute.
    ///
    /// Whole numbers keep a `.0` and large or tiny magnitudes use exponent
    /// notation, e.g. `1.0` and `1e300`.
    pub fn add_attribute_double(&mut self, key: &str, value: f64) {
        self.add_attribute_string(key, &format!("{:?}", value));
    }

    /// Reads a floating point attribute.
    pub fn attribute_double(&self, key: &str) -> Result<f64> {
        self.parse_required(key, "double")
    }

    /// Reads a floating point attribute, falling back to `default` when it is absent.
    pub fn attribute_double_or(&self, key: &str, default: f64) -> Result<f64> {
        if self.has_attribute(key) {
            self.attribute_double(key)
        } else {
            Ok(default)
        }
    }

    // boolean

    /// Stores a boolean attribute as `true` or `false`.
    pub fn add_attribute_boolean(&mut self, key: &str, value: bool) {
        self.add_attribute_string(key, if value { "true" } else { "false" });
    }

    /// Reads a boolean attribute. Anything but a case-insensitive `true`,
    /// including a missing attribute, reads as false.
    pub fn attribute_boolean(&self, key: &str) -> bool {
        self.attribute_string(key)
            .is_some_and(|value| value.eq_ignore_ascii_case("true"))
    }

    /// Reads a boolean attribute, falling back to `default` when it is absent.
    pub fn attribute_boolean_or(&self, key: &str, default: bool) -> bool {
        if self.has_attribute(key) {
            self.attribute_boolean(key)
        } else {
            default
        }
    }

    fn parse_required<T: FromStr>(&self, key: &str, expected: &'static str) -> Result<T> {
        let value = self
            .attribute_string(key)
            .ok_or_else(|| Error::MissingAttribute {
                key: key.to_string(),
            })?;
        value.parse().map_err(|_| Error::InvalidAttribute {
            key: key.to_string(),
            value,
            expected,
        })
    }

    /// Renders the stored attributes as ` key="value"` pairs for a start tag.
    pub fn attributes_as_string(&self) -> String {
        let mut out = String::new();
        for (key, value) in &self.attributes {
            out.push(' ');
            out.push_str(key);
            out.push_str("=\"");
            out.push_str(value);
            out.push('"');
        }
        out
    }
}
