// Record transformer: Getty RDF records to PITs and relations.
//
// Values are forwarded as found. Nothing here deduplicates, validates or
// normalizes dates; `estStart`/`estEnd` stay raw strings.

use std::fmt;

use tracing::{debug, info};

use tgn_common::{
    Geometry, GraphObject, Pit, PitData, QueryKind, RelationEdge, Result, StageDirs, TgnConfig,
    TgnError,
};
use tgn_graph::GraphWriter;

use crate::xml::{parse_snapshot, Element, Node};

pub mod tags {
    pub const TYPE_TERM: &str = "tgn:typeTerm";
    pub const SOURCE: &str = "dct:source";
    pub const TERM: &str = "gvp:term";
    pub const LONGITUDE: &str = "wgs:long";
    pub const LATITUDE: &str = "wgs:lat";
    pub const COMMENT: &str = "rdfs:comment";
    pub const EST_START: &str = "gvp:estStart";
    pub const EST_END: &str = "gvp:estEnd";
    pub const BROADER_PREFERRED: &str = "gvp:broaderPreferred";
    pub const SUBJECT: &str = "rdf:subject";

    pub const RESOURCE: &str = "rdf:resource";
}

// ---------------------------------------------------------------------------
// Tag extraction
// ---------------------------------------------------------------------------

/// Value of the first node of a tag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TagValue<'a> {
    /// The node's inner text.
    Text(&'a str),
    /// The node itself, when it carries no text.
    Raw(&'a Node),
}

impl<'a> TagValue<'a> {
    pub fn text(self) -> Option<&'a str> {
        match self {
            TagValue::Text(text) => Some(text),
            TagValue::Raw(_) => None,
        }
    }

    /// Whether the value counts as set. A bare empty tag does not; an
    /// attribute-only tag does, though it has no text.
    pub fn is_present(self) -> bool {
        match self {
            TagValue::Text(_) => true,
            TagValue::Raw(node) => !node.attributes.is_empty(),
        }
    }
}

/// Text of the tag's first node, else the first node itself; `None` when
/// the tag is missing or has no nodes.
pub fn tag_value<'a>(element: &'a Element, tag: &str) -> Option<TagValue<'a>> {
    let first = element.tag(tag)?.first()?;
    match first.text.as_deref() {
        Some(text) if !text.is_empty() => Some(TagValue::Text(text)),
        _ => Some(TagValue::Raw(first)),
    }
}

/// Named attribute of the tag's first node.
pub fn tag_attribute<'a>(element: &'a Element, tag: &str, attribute: &str) -> Option<&'a str> {
    element
        .tag(tag)?
        .first()?
        .attribute(attribute)
        .filter(|value| !value.is_empty())
}

fn tag_text(element: &Element, tag: &str) -> Option<String> {
    tag_value(element, tag)
        .and_then(TagValue::text)
        .map(str::to_string)
}

/// Malformed text becomes NaN rather than an error.
fn coordinate(value: TagValue<'_>) -> f64 {
    value.text().and_then(leading_float).unwrap_or(f64::NAN)
}

/// The number at the start of `text`, after leading whitespace; trailing
/// characters are ignored (`"4.9 E"` is 4.9).
fn leading_float(text: &str) -> Option<f64> {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let digits = |from: usize| {
        bytes[from..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count()
    };

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let int_digits = digits(end);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = digits(end + 1);
        if int_digits + frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits + frac_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_digits = digits(exp);
        if exp_digits > 0 {
            end = exp + exp_digits;
        }
    }

    text[..end].parse().ok()
}

fn geometry(element: &Element) -> Option<Geometry> {
    let long = tag_value(element, tags::LONGITUDE).filter(|v| v.is_present())?;
    let lat = tag_value(element, tags::LATITUDE).filter(|v| v.is_present())?;
    Some(Geometry::point(coordinate(long), coordinate(lat)))
}

// ---------------------------------------------------------------------------
// Element → batch
// ---------------------------------------------------------------------------

/// The ordered batch for one record: `[pit, liesIn?, equivalence?]`, or
/// empty when the record's type term is not in the type map.
pub fn transform_element(config: &TgnConfig, element: &Element) -> Vec<GraphObject> {
    let Some(type_term) = tag_value(element, tags::TYPE_TERM).and_then(TagValue::text) else {
        return Vec::new();
    };
    let Some(pit_type) = config.type_for(type_term).filter(|t| !t.is_empty()) else {
        return Vec::new();
    };

    let uri = tag_attribute(element, tags::SOURCE, tags::RESOURCE).map(str::to_string);

    let pit = Pit {
        uri: uri.clone(),
        name: tag_text(element, tags::TERM),
        pit_type: pit_type.to_string(),
        data: PitData {
            type_term: type_term.to_string(),
            comment: tag_text(element, tags::COMMENT),
        },
        geometry: geometry(element),
        valid_since: tag_text(element, tags::EST_START),
        valid_until: tag_text(element, tags::EST_END),
    };

    let mut batch = vec![GraphObject::Pit(pit)];

    // The record lies in its preferred broader place.
    if let Some(broader) = tag_attribute(element, tags::BROADER_PREFERRED, tags::RESOURCE) {
        batch.push(GraphObject::Relation(RelationEdge {
            from: uri.clone(),
            to: broader.to_string(),
            relation: config.relations.lies_in.clone(),
        }));
    }

    // The subject is another identity of the same place.
    if let Some(subject) = tag_attribute(element, tags::SUBJECT, tags::RESOURCE) {
        batch.push(GraphObject::Relation(RelationEdge {
            from: uri,
            to: subject.to_string(),
            relation: config.relations.equivalence.clone(),
        }));
    }

    batch
}

// ---------------------------------------------------------------------------
// Stage
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Clone, PartialEq)]
pub struct TransformStats {
    pub snapshots: usize,
    pub elements: usize,
    pub skipped: usize,
    pub pits: usize,
    pub relations: usize,
}

impl fmt::Display for TransformStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "snapshots={} elements={} skipped={} pits={} relations={}",
            self.snapshots, self.elements, self.skipped, self.pits, self.relations
        )
    }
}

/// Read every (kind, root) snapshot from `dirs.previous` and write each
/// record's batch, one awaited batch at a time, in document order.
/// The first read, parse or write failure ends the run.
pub async fn transform(
    config: &TgnConfig,
    dirs: &StageDirs,
    writer: &dyn GraphWriter,
) -> Result<TransformStats> {
    let mut stats = TransformStats::default();

    for kind in QueryKind::ALL {
        for root in &config.parents {
            let path = dirs.snapshot_read_path(kind, root);
            let body = tokio::fs::read_to_string(&path)
                .await
                .map_err(|e| TgnError::io(&path, e))?;

            let elements = parse_snapshot(&body).map_err(|e| TgnError::Xml {
                path: path.clone(),
                message: e.to_string(),
            })?;
            info!(kind = %kind, root = %root, elements = elements.len(), "Transforming snapshot");

            for element in &elements {
                stats.elements += 1;

                let batch = transform_element(config, element);
                if batch.is_empty() {
                    stats.skipped += 1;
                    continue;
                }

                writer.write_objects(&batch).await?;

                stats.pits += 1;
                stats.relations += batch.len() - 1;
            }

            stats.snapshots += 1;
            debug!(path = %path.display(), "Snapshot done");
        }
    }

    Ok(stats)
}
