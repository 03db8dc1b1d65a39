use std::fmt;

use serde::{Deserialize, Serialize};

/// Prefix of every TGN identifier, e.g. `tgn:7000003`.
pub const AUTHORITY_PREFIX: &str = "tgn:";

// ---------------------------------------------------------------------------
// Query kinds and root terms
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKind {
    Parents,
    Places,
    Terms,
}

impl QueryKind {
    /// Harvest and transform both walk the kinds in this order.
    pub const ALL: [QueryKind; 3] = [QueryKind::Parents, QueryKind::Places, QueryKind::Terms];

    pub fn name(self) -> &'static str {
        match self {
            QueryKind::Parents => "tgn-parents",
            QueryKind::Places => "tgn-places",
            QueryKind::Terms => "tgn-terms",
        }
    }
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A configured starting point in the TGN hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RootTerm(pub String);

impl RootTerm {
    pub fn new(term: impl Into<String>) -> Self {
        Self(term.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The term without its authority prefix, safe for file names.
    pub fn sanitized(&self) -> &str {
        self.0.strip_prefix(AUTHORITY_PREFIX).unwrap_or(&self.0)
    }
}

impl fmt::Display for RootTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Emitted graph objects
// ---------------------------------------------------------------------------

/// GeoJSON geometry. Coordinates are `[longitude, latitude]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point { coordinates: [f64; 2] },
}

impl Geometry {
    pub fn point(lon: f64, lat: f64) -> Self {
        Geometry::Point {
            coordinates: [lon, lat],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PitData {
    /// Raw TGN type term the PIT type was mapped from.
    #[serde(rename = "type")]
    pub type_term: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Place-in-Time: one place identity with its attributes.
///
/// `uri` and `name` are forwarded as found; a record without them still
/// produces a PIT with nulls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pit {
    pub uri: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub pit_type: String,
    pub data: PitData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Geometry>,
    /// Raw estimate string, not parsed as a date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_since: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_until: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationEdge {
    pub from: Option<String>,
    pub to: String,
    #[serde(rename = "type")]
    pub relation: String,
}

/// One entry of a write batch: `{"type": "pit", "obj": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "obj", rename_all = "lowercase")]
pub enum GraphObject {
    Pit(Pit),
    Relation(RelationEdge),
}

impl GraphObject {
    pub fn as_pit(&self) -> Option<&Pit> {
        match self {
            GraphObject::Pit(p) => Some(p),
            GraphObject::Relation(_) => None,
        }
    }

    pub fn as_relation(&self) -> Option<&RelationEdge> {
        match self {
            GraphObject::Relation(r) => Some(r),
            GraphObject::Pit(_) => None,
        }
    }
}
