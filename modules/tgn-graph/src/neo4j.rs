use async_trait::async_trait;
use neo4rs::{query, Query};
use tracing::{debug, warn};

use tgn_common::{Geometry, GraphObject, Pit, RelationEdge, Result, TgnError};

use crate::client::GraphClient;
use crate::writer::GraphWriter;

/// Writes batches into Neo4j, one transaction per batch.
///
/// PITs are merged on `uri`, so re-emitting the same place updates it in
/// place. Objects without a `uri` cannot be merged and are skipped.
pub struct Neo4jWriter {
    client: GraphClient,
}

impl Neo4jWriter {
    pub fn new(client: GraphClient) -> Self {
        Self { client }
    }

    /// Unique constraint on `Pit.uri`; safe to run repeatedly.
    pub async fn ensure_schema(&self) -> Result<()> {
        self.client
            .graph
            .run(query(
                "CREATE CONSTRAINT pit_uri IF NOT EXISTS FOR (p:Pit) REQUIRE p.uri IS UNIQUE",
            ))
            .await
            .map_err(write_error)
    }
}

#[async_trait]
impl GraphWriter for Neo4jWriter {
    async fn write_objects(&self, batch: &[GraphObject]) -> Result<()> {
        let queries: Vec<Query> = batch
            .iter()
            .filter_map(|object| match object {
                GraphObject::Pit(pit) => pit_query(pit),
                GraphObject::Relation(edge) => relation_query(edge),
            })
            .collect();

        if queries.is_empty() {
            return Ok(());
        }
        let count = queries.len();

        let mut txn = self.client.graph.start_txn().await.map_err(write_error)?;
        for q in queries {
            txn.run(q).await.map_err(write_error)?;
        }
        txn.commit().await.map_err(write_error)?;

        debug!(statements = count, "neo4j: batch committed");
        Ok(())
    }
}

fn write_error(e: neo4rs::Error) -> TgnError {
    TgnError::Write(e.to_string())
}

pub(crate) fn pit_query(pit: &Pit) -> Option<Query> {
    let Some(uri) = pit.uri.as_deref() else {
        warn!(name = ?pit.name, "Skipping PIT without uri");
        return None;
    };

    let (has_geometry, lon, lat) = match pit.geometry {
        Some(Geometry::Point { coordinates: [lon, lat] }) => (true, lon, lat),
        None => (false, 0.0, 0.0),
    };

    let q = query(
        "MERGE (p:Pit {uri: $uri})
         SET p.name = CASE WHEN $name = '' THEN null ELSE $name END,
             p.type = $type,
             p.type_term = $type_term,
             p.comment = CASE WHEN $comment = '' THEN null ELSE $comment END,
             p.lon = CASE WHEN $has_geometry THEN $lon ELSE null END,
             p.lat = CASE WHEN $has_geometry THEN $lat ELSE null END,
             p.valid_since = CASE WHEN $valid_since = '' THEN null ELSE $valid_since END,
             p.valid_until = CASE WHEN $valid_until = '' THEN null ELSE $valid_until END",
    )
    .param("uri", uri)
    .param("name", pit.name.as_deref().unwrap_or(""))
    .param("type", pit.pit_type.as_str())
    .param("type_term", pit.data.type_term.as_str())
    .param("comment", pit.data.comment.as_deref().unwrap_or(""))
    .param("has_geometry", has_geometry)
    .param("lon", lon)
    .param("lat", lat)
    .param("valid_since", pit.valid_since.as_deref().unwrap_or(""))
    .param("valid_until", pit.valid_until.as_deref().unwrap_or(""));

    Some(q)
}

pub(crate) fn relation_query(edge: &RelationEdge) -> Option<Query> {
    let Some(from) = edge.from.as_deref() else {
        warn!(to = %edge.to, relation = %edge.relation, "Skipping relation without source uri");
        return None;
    };

    // Relationship types cannot be parameterized.
    let cypher = format!(
        "MERGE (a:Pit {{uri: $from}})
         MERGE (b:Pit {{uri: $to}})
         MERGE (a)-[:{}]->(b)",
        relationship_type(&edge.relation)
    );

    Some(query(&cypher).param("from", from).param("to", edge.to.as_str()))
}

/// Backtick-quoted relationship type, e.g. `` `hg:liesIn` ``.
fn relationship_type(label: &str) -> String {
    format!("`{}`", label.replace('`', "``"))
}
