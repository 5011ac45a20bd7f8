//! XML decoder that builds node trees.
//!
//! quick-xml's streaming reader delivers start, text and end events; a
//! tree builder turns them into a tree with a single "current node"
//! cursor. Every node is tagged with the decoder's file label and the line
//! its start tag ends on.

use std::borrow::Cow;
use std::io::Read;

use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::{debug, trace};

use crate::constants::DEFAULT_FILE_NAME;
use crate::error::{Error, ParseCause, Result};
use crate::node::{new_node_ref, Node, NodeRef};

/// Decodes XML text into a [`Node`] tree.
#[derive(Debug, Clone)]
pub struct TreeDecoder {
    file_name: String,
}

impl Default for TreeDecoder {
    fn default() -> Self {
        Self::new(DEFAULT_FILE_NAME)
    }
}

impl TreeDecoder {
    /// Creates a decoder that labels nodes and errors with `file_name`.
    pub fn new(file_name: impl Into<String>) -> Self {
        TreeDecoder {
            file_name: file_name.into(),
        }
    }

    /// Returns the file label.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Decodes a complete document from a byte stream assumed to be UTF-8.
    pub fn decode_reader<R: Read>(&self, mut reader: R) -> Result<NodeRef> {
        let mut bytes = Vec::new();
        reader
            .read_to_end(&mut bytes)
            .map_err(|e| self.error(None, e.into()))?;
        self.decode_bytes(&bytes)
    }

    /// Decodes a complete document from UTF-8 bytes.
    pub fn decode_bytes(&self, bytes: &[u8]) -> Result<NodeRef> {
        let xml = std::str::from_utf8(bytes).map_err(|e| self.error(None, e.into()))?;
        self.decode_str(xml)
    }

    /// Decodes a complete document from a string.
    pub fn decode_str(&self, xml: &str) -> Result<NodeRef> {
        debug!("Decoding XML from {}", self.file_name);
        let xml = xml.strip_prefix('\u{feff}').unwrap_or(xml);

        let mut reader = Reader::from_str(xml);
        // Keep all character data; callers see exactly what the document holds
        reader.config_mut().trim_text_start = false;
        reader.config_mut().trim_text_end = false;

        let mut lines = LineTracker::new(xml.as_bytes());
        let mut builder = TreeBuilder::new(&self.file_name);

        loop {
            let event = match reader.read_event() {
                Ok(event) => event,
                Err(e) => {
                    let line = lines.line_at(reader.error_position() as usize);
                    return Err(self.error(Some(line), e.into()));
                }
            };
            let line = lines.line_at(reader.buffer_position() as usize);

            let step = match event {
                Event::Start(ref e) => read_element(e, &reader)
                    .and_then(|(name, attrs)| builder.start_element(&name, attrs, line)),
                Event::Empty(ref e) => read_element(e, &reader)
                    .and_then(|(name, attrs)| builder.start_element(&name, attrs, line))
                    .and_then(|()| builder.end_element()),
                Event::End(_) => builder.end_element(),
                Event::Text(ref e) => e
                    .xml10_content()
                    .map_err(quick_xml::Error::from)
                    .and_then(|raw| Ok(unescape(&raw)?.into_owned()))
                    .map_err(ParseCause::from)
                    .and_then(|text| builder.characters(&text)),
                Event::CData(ref e) => e
                    .xml10_content()
                    .map_err(|e| ParseCause::Xml(e.into()))
                    .and_then(|text| builder.characters(&text)),
                Event::GeneralRef(ref e) => reader
                    .decoder()
                    .decode(e)
                    .map_err(quick_xml::Error::from)
                    .and_then(|name| resolve_reference(&name))
                    .map_err(ParseCause::from)
                    .and_then(|text| builder.characters(&text)),
                Event::Eof => break,
                // Comments, processing instructions, the declaration and DTDs carry no tree data
                Event::Comment(_) | Event::PI(_) | Event::Decl(_) | Event::DocType(_) => Ok(()),
            };
            step.map_err(|cause| self.error(Some(line), cause))?;
        }

        let line = lines.line_at(xml.len());
        let root = builder
            .finish()
            .map_err(|cause| self.error(Some(line), cause))?;
        debug!(
            "Decoded {} elements from {}",
            Node::subtree_size(&root),
            self.file_name
        );
        Ok(root)
    }

    fn error(&self, line: Option<usize>, cause: ParseCause) -> Error {
        Error::Parse {
            line,
            file: self.file_name.clone(),
            cause,
        }
    }
}

/// Reads an element's qualified name and its attributes in document order.
fn read_element(
    e: &BytesStart,
    reader: &Reader<&[u8]>,
) -> std::result::Result<(String, Vec<(String, String)>), ParseCause> {
    let name = reader
        .decoder()
        .decode(e.name().as_ref())
        .map_err(quick_xml::Error::from)?
        .into_owned();

    let mut attributes = Vec::new();
    for attr_result in e.attributes() {
        let attr = attr_result.map_err(quick_xml::Error::from)?;
        let key = reader
            .decoder()
            .decode(attr.key.as_ref())
            .map_err(quick_xml::Error::from)?
            .into_owned();
        let raw = reader
            .decoder()
            .decode(&attr.value)
            .map_err(quick_xml::Error::from)?;
        let value = unescape(&normalize_attribute_value(&raw))
            .map_err(quick_xml::Error::from)?
            .into_owned();
        attributes.push((key, value));
    }

    Ok((name, attributes))
}

/// Replaces literal line breaks and tabs in a raw attribute value with spaces.
///
/// A `\r\n` pair becomes a single space. Runs before entity expansion, so
/// characters written as references are kept.
fn normalize_attribute_value(raw: &str) -> Cow<'_, str> {
    if !raw.contains(['\t', '\n', '\r']) {
        return Cow::Borrowed(raw);
    }
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                chars.next_if_eq(&'\n');
                out.push(' ');
            }
            '\t' | '\n' => out.push(' '),
            other => out.push(other),
        }
    }
    Cow::Owned(out)
}

/// Resolves a character reference or one of the predefined entities.
fn resolve_reference(name: &str) -> std::result::Result<String, quick_xml::Error> {
    let reference = format!("&{};", name);
    Ok(unescape(&reference)?.into_owned())
}

/// Incremental tree construction from start, text and end events.
#[derive(Debug)]
struct TreeBuilder<'a> {
    file_name: &'a str,
    root: Option<NodeRef>,
    current: Option<NodeRef>,
}

impl<'a> TreeBuilder<'a> {
    fn new(file_name: &'a str) -> Self {
        TreeBuilder {
            file_name,
            root: None,
            current: None,
        }
    }

    fn start_element(
        &mut self,
        qname: &str,
        attributes: Vec<(String, String)>,
        line: usize,
    ) -> std::result::Result<(), ParseCause> {
        trace!("start {} at line {}", qname, line);
        let mut node = Node::with_source(qname, self.file_name, Some(line));
        // Raw copy: the quote placeholder is only applied by the string accessors
        node.attributes_mut().extend(attributes);
        let node = new_node_ref(node);

        match &self.current {
            Some(current) => Node::add_child(current, node.clone()),
            None if self.root.is_some() => {
                return Err(ParseCause::Structure(format!(
                    "element {} follows the root element",
                    qname
                )));
            }
            None => self.root = Some(node.clone()),
        }
        self.current = Some(node);
        Ok(())
    }

    fn characters(&mut self, text: &str) -> std::result::Result<(), ParseCause> {
        match &self.current {
            Some(current) => {
                current.borrow_mut().append_text(text);
                Ok(())
            }
            None if text.trim().is_empty() => Ok(()),
            None => Err(ParseCause::Structure(
                "character data outside the root element".to_string(),
            )),
        }
    }

    fn end_element(&mut self) -> std::result::Result<(), ParseCause> {
        let current = self.current.take().ok_or_else(|| {
            ParseCause::Structure("end tag without a matching start tag".to_string())
        })?;
        self.current = current.borrow().parent();
        Ok(())
    }

    fn finish(self) -> std::result::Result<NodeRef, ParseCause> {
        if let Some(open) = self.current {
            let name = open.borrow().name().to_string();
            return Err(ParseCause::Structure(format!("unclosed element {}", name)));
        }
        self.root
            .ok_or_else(|| ParseCause::Structure("document has no root element".to_string()))
    }
}

/// Maps byte offsets to 1-based line numbers, scanning forward only.
#[derive(Debug)]
struct LineTracker<'a> {
    input: &'a [u8],
    offset: usize,
    line: usize,
}

impl<'a> LineTracker<'a> {
    fn new(input: &'a [u8]) -> Self {
        LineTracker {
            input,
            offset: 0,
            line: 1,
        }
    }

    /// Returns the line containing `pos`.
    ///
    /// Offsets behind the last one asked for are answered by a fresh scan.
    fn line_at(&mut self, pos: usize) -> usize {
        let pos = pos.min(self.input.len());
        if pos < self.offset {
            return 1 + count_newlines(&self.input[..pos]);
        }
        self.line += count_newlines(&self.input[self.offset..pos]);
        self.offset = pos;
        self.line
    }
}

fn count_newlines(bytes: &[u8]) -> usize {
    bytes.iter().filter(|&&b| b == b'\n').count()
}

/// Decodes XML from a string using the default file label.
pub fn decode_str(xml: &str) -> Result<NodeRef> {
    TreeDecoder::default().decode_str(xml)
}
