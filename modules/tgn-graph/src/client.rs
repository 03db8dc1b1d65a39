use std::fmt;

use neo4rs::{ConfigBuilder, Graph};
use tracing::info;

use tgn_common::{Result, TgnError};

/// Bolt connection details for the Neo4j writer.
#[derive(Clone)]
pub struct Neo4jSettings {
    pub uri: String,
    pub user: String,
    pub password: String,
}

impl fmt::Debug for Neo4jSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Neo4jSettings")
            .field("uri", &self.uri)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Connection to the graph database that PIT batches are merged into.
#[derive(Clone)]
pub struct GraphClient {
    pub(crate) graph: Graph,
}

impl GraphClient {
    /// Opens a small pool; batches are written sequentially, so a few
    /// connections are plenty.
    pub async fn connect(settings: &Neo4jSettings) -> Result<Self> {
        let config = ConfigBuilder::default()
            .uri(settings.uri.as_str())
            .user(settings.user.as_str())
            .password(settings.password.as_str())
            .max_connections(4)
            .build()
            .map_err(|e| TgnError::Config(format!("Neo4j settings for {}: {e}", settings.uri)))?;

        let graph = Graph::connect(config)
            .await
            .map_err(|e| TgnError::Write(format!("connect to {}: {e}", settings.uri)))?;

        info!(uri = %settings.uri, user = %settings.user, "Connected to Neo4j");
        Ok(Self { graph })
    }

    /// For ad-hoc Cypher outside the writer, e.g. assertions in tests.
    pub fn graph(&self) -> &Graph {
        &self.graph
    }
}
