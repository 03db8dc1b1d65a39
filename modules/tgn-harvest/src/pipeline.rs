// Stage runner. Steps run in a fixed order; each gets its own directory
// under the data dir and reads the directory of the step before it, so a
// transform can be re-run against the last download without querying again.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::info;

use tgn_common::{Result, StageDirs, TgnConfig, TgnError};
use tgn_graph::{GraphClient, GraphWriter, NdjsonWriter, Neo4jWriter};

use crate::harvester::{self, QueryService};
use crate::templates::TemplateStore;
use crate::transformer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Download,
    Transform,
}

impl Step {
    pub const ALL: [Step; 2] = [Step::Download, Step::Transform];

    pub fn name(self) -> &'static str {
        match self {
            Step::Download => "download",
            Step::Transform => "transform",
        }
    }

    pub fn previous(self) -> Option<Step> {
        match self {
            Step::Download => None,
            Step::Transform => Some(Step::Download),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// `current = <data_dir>/<step>`, `previous = <data_dir>/<previous step>`.
/// The first step's previous dir is the data dir itself.
pub fn stage_dirs(data_dir: &Path, step: Step) -> StageDirs {
    let previous = match step.previous() {
        Some(prev) => data_dir.join(prev.name()),
        None => data_dir.to_path_buf(),
    };
    StageDirs::new(previous, data_dir.join(step.name()))
}

/// Where the transform step sends its output.
pub enum WriterTarget {
    /// `pits.ndjson` and `relations.ndjson` in the transform directory.
    Ndjson,
    Neo4j(GraphClient),
    /// A caller-owned writer.
    Shared(Arc<dyn GraphWriter>),
}

pub struct Pipeline<'a> {
    pub config: &'a TgnConfig,
    pub data_dir: PathBuf,
    pub templates: &'a TemplateStore,
    pub query_service: &'a dyn QueryService,
    pub writer: WriterTarget,
}

impl Pipeline<'_> {
    /// Run `steps` in the given order, stopping at the first failure.
    pub async fn run(&self, steps: &[Step]) -> Result<()> {
        for &step in steps {
            let dirs = stage_dirs(&self.data_dir, step);
            tokio::fs::create_dir_all(&dirs.current)
                .await
                .map_err(|e| TgnError::io(&dirs.current, e))?;

            info!(step = %step, current = %dirs.current.display(), "Starting step");

            match step {
                Step::Download => {
                    let stats = harvester::download(
                        self.config,
                        &dirs,
                        self.templates,
                        self.query_service,
                    )
                    .await?;
                    info!("Download complete. {stats}");
                }
                Step::Transform => {
                    let writer = self.open_writer(&dirs).await?;
                    let stats = transformer::transform(self.config, &dirs, &*writer).await?;
                    info!("Transform complete. {stats}");
                }
            }
        }
        Ok(())
    }

    async fn open_writer(&self, dirs: &StageDirs) -> Result<Arc<dyn GraphWriter>> {
        let writer: Arc<dyn GraphWriter> = match &self.writer {
            WriterTarget::Ndjson => Arc::new(NdjsonWriter::create(&dirs.current).await?),
            WriterTarget::Neo4j(client) => {
                let writer = Neo4jWriter::new(client.clone());
                writer.ensure_schema().await?;
                Arc::new(writer)
            }
            WriterTarget::Shared(writer) => Arc::clone(writer),
        };
        Ok(writer)
    }
}
