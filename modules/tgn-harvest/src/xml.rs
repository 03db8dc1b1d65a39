// RDF/XML snapshot parsing.
//
// Only the shape Getty CONSTRUCT results have is modelled: an `rdf:RDF` root
// holding `rdf:Description` records, each a flat list of property tags.
// Property tags keep their qualified names (`gvp:term`), as do attributes
// (`rdf:resource`). Anything nested below a property tag is ignored.

use std::collections::BTreeMap;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

const RDF_ROOT: &str = "rdf:RDF";
const RDF_DESCRIPTION: &str = "rdf:Description";

const ROOT_DEPTH: usize = 1;
const RECORD_DEPTH: usize = 2;
const TAG_DEPTH: usize = 3;

#[derive(Debug, thiserror::Error)]
pub enum XmlError {
    #[error("XML syntax error at byte {position}: {message}")]
    Syntax { position: u64, message: String },

    #[error("expected <rdf:RDF> root, found <{0}>")]
    UnexpectedRoot(String),

    #[error("document has no root element")]
    NoRoot,

    #[error("document ended inside an open element")]
    Truncated,
}

/// One occurrence of a property tag.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Node {
    /// Unescaped character data as received. `None` when empty or whitespace-only.
    pub text: Option<String>,
    pub attributes: BTreeMap<String, String>,
}

impl Node {
    pub fn with_text(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_attribute(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

/// One `rdf:Description` record: tag name to its nodes in document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    tags: BTreeMap<String, Vec<Node>>,
}

impl Element {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, tag: &str, node: Node) {
        self.tags.entry(tag.to_string()).or_default().push(node);
    }

    pub fn with(mut self, tag: &str, node: Node) -> Self {
        self.push(tag, node);
        self
    }

    pub fn tag(&self, name: &str) -> Option<&[Node]> {
        self.tags.get(name).map(Vec::as_slice)
    }
}

/// Parse a snapshot body into its records, in document order.
pub fn parse_snapshot(body: &str) -> Result<Vec<Element>, XmlError> {
    let mut reader = Reader::from_str(body);

    let mut builder = RecordBuilder::default();
    let mut depth = 0usize;

    loop {
        let event = reader.read_event().map_err(|e| XmlError::Syntax {
            position: reader.buffer_position() as u64,
            message: e.to_string(),
        })?;

        match event {
            Event::Start(start) => {
                depth += 1;
                builder.open(&start, depth, reader.buffer_position() as u64)?;
            }
            Event::Empty(start) => {
                builder.open(&start, depth + 1, reader.buffer_position() as u64)?;
                builder.close(depth + 1);
            }
            Event::End(_) => {
                builder.close(depth);
                depth = depth.saturating_sub(1);
            }
            Event::Text(text) => {
                let text = text.unescape().map_err(|e| XmlError::Syntax {
                    position: reader.buffer_position() as u64,
                    message: e.to_string(),
                })?;
                builder.text(depth, &text, false);
            }
            Event::CData(data) => {
                let text = String::from_utf8_lossy(&data);
                builder.text(depth, &text, true);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if depth != 0 {
        return Err(XmlError::Truncated);
    }
    builder.finish()
}

#[derive(Default)]
struct RecordBuilder {
    root_seen: bool,
    elements: Vec<Element>,
    record: Option<Element>,
    tag: Option<OpenTag>,
}

/// Property tag being read. Its text is kept exactly as received.
struct OpenTag {
    name: String,
    node: Node,
    has_cdata: bool,
}

impl RecordBuilder {
    fn open(
        &mut self,
        start: &BytesStart<'_>,
        depth: usize,
        position: u64,
    ) -> Result<(), XmlError> {
        match depth {
            ROOT_DEPTH => {
                let name = qualified_name(start);
                if name != RDF_ROOT {
                    return Err(XmlError::UnexpectedRoot(name));
                }
                self.root_seen = true;
            }
            RECORD_DEPTH if qualified_name(start) == RDF_DESCRIPTION => {
                self.record = Some(Element::new());
            }
            TAG_DEPTH if self.record.is_some() => {
                self.tag = Some(OpenTag {
                    name: qualified_name(start),
                    node: Node {
                        text: None,
                        attributes: attributes(start, position)?,
                    },
                    has_cdata: false,
                });
            }
            _ => {}
        }
        Ok(())
    }

    fn close(&mut self, depth: usize) {
        match depth {
            RECORD_DEPTH => {
                if let Some(record) = self.record.take() {
                    self.elements.push(record);
                }
            }
            TAG_DEPTH => {
                if let (Some(record), Some(tag)) = (self.record.as_mut(), self.tag.take()) {
                    let mut node = tag.node;
                    // Whitespace-only text counts as no text, unless it came from CDATA.
                    let blank = node.text.as_deref().map_or(true, |t| t.trim().is_empty());
                    if blank && !tag.has_cdata {
                        node.text = None;
                    }
                    record.push(&tag.name, node);
                }
            }
            _ => {}
        }
    }

    fn text(&mut self, depth: usize, text: &str, cdata: bool) {
        if depth != TAG_DEPTH {
            return;
        }
        if let Some(tag) = self.tag.as_mut() {
            tag.has_cdata |= cdata;
            tag.node.text.get_or_insert_with(String::new).push_str(text);
        }
    }

    fn finish(self) -> Result<Vec<Element>, XmlError> {
        if !self.root_seen {
            return Err(XmlError::NoRoot);
        }
        Ok(self.elements)
    }
}

fn qualified_name(start: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(start.name().as_ref()).into_owned()
}

fn attributes(
    start: &BytesStart<'_>,
    position: u64,
) -> Result<BTreeMap<String, String>, XmlError> {
    let mut attrs = BTreeMap::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| XmlError::Syntax {
            position,
            message: e.to_string(),
        })?;
        let value = attr.unescape_value().map_err(|e| XmlError::Syntax {
            position,
            message: e.to_string(),
        })?;
        attrs.insert(
            String::from_utf8_lossy(attr.key.as_ref()).into_owned(),
            value.into_owned(),
        );
    }
    Ok(attrs)
}
