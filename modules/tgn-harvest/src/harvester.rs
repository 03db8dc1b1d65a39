use std::fmt;

use async_trait::async_trait;
use sparql_client::SparqlClient;
use tracing::info;

use tgn_common::{QueryKind, Result, StageDirs, TgnConfig, TgnError};

use crate::templates::TemplateStore;

/// Executes one query and returns the raw response body.
#[async_trait]
pub trait QueryService: Send + Sync {
    async fn query(&self, sparql: &str) -> Result<String>;
}

#[async_trait]
impl QueryService for SparqlClient {
    async fn query(&self, sparql: &str) -> Result<String> {
        SparqlClient::query(self, sparql)
            .await
            .map_err(|e| TgnError::Query(e.to_string()))
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct HarvestStats {
    pub snapshots: usize,
    pub bytes: usize,
}

impl fmt::Display for HarvestStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "snapshots={} bytes={}", self.snapshots, self.bytes)
    }
}

/// Run every (kind, root) query once, in order, writing each response to
/// `dirs.current`. Stops at the first failure; snapshots already written stay.
pub async fn download(
    config: &TgnConfig,
    dirs: &StageDirs,
    templates: &TemplateStore,
    service: &dyn QueryService,
) -> Result<HarvestStats> {
    let mut stats = HarvestStats::default();

    for kind in QueryKind::ALL {
        for root in &config.parents {
            let sparql = templates.render(kind, root);
            info!(kind = %kind, root = %root, "Querying");

            let body = service.query(&sparql).await?;

            let path = dirs.snapshot_write_path(kind, root);
            tokio::fs::write(&path, &body)
                .await
                .map_err(|e| TgnError::io(&path, e))?;

            info!(path = %path.display(), bytes = body.len(), "Snapshot written");
            stats.snapshots += 1;
            stats.bytes += body.len();
        }
    }

    Ok(stats)
}
