// Newline-delimited JSON output, the layout histograph imports from:
// `pits.ndjson` and `relations.ndjson` in the step's current directory.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use tgn_common::{GraphObject, Result, TgnError};

use crate::writer::GraphWriter;

pub const PITS_FILE: &str = "pits.ndjson";
pub const RELATIONS_FILE: &str = "relations.ndjson";

pub struct NdjsonWriter {
    pits_path: PathBuf,
    relations_path: PathBuf,
}

impl NdjsonWriter {
    /// Create (or truncate) both output files in `dir`, so a re-run
    /// replaces the previous output instead of appending to it.
    pub async fn create(dir: &Path) -> Result<Self> {
        let pits_path = dir.join(PITS_FILE);
        let relations_path = dir.join(RELATIONS_FILE);

        for path in [&pits_path, &relations_path] {
            tokio::fs::write(path, b"")
                .await
                .map_err(|e| TgnError::io(path, e))?;
        }

        Ok(Self {
            pits_path,
            relations_path,
        })
    }

    pub fn pits_path(&self) -> &Path {
        &self.pits_path
    }

    pub fn relations_path(&self) -> &Path {
        &self.relations_path
    }
}

#[async_trait]
impl GraphWriter for NdjsonWriter {
    async fn write_objects(&self, batch: &[GraphObject]) -> Result<()> {
        let mut pits = String::new();
        let mut relations = String::new();

        for object in batch {
            let (buf, line) = match object {
                GraphObject::Pit(pit) => (&mut pits, serde_json::to_string(pit)),
                GraphObject::Relation(edge) => (&mut relations, serde_json::to_string(edge)),
            };
            buf.push_str(&line.map_err(|e| TgnError::Write(e.to_string()))?);
            buf.push('\n');
        }

        append(&self.pits_path, &pits).await?;
        append(&self.relations_path, &relations).await?;

        debug!(objects = batch.len(), "ndjson: batch written");
        Ok(())
    }
}

async fn append(path: &Path, lines: &str) -> Result<()> {
    if lines.is_empty() {
        return Ok(());
    }

    let mut file = OpenOptions::new()
        .append(true)
        .open(path)
        .await
        .map_err(|e| TgnError::io(path, e))?;
    file.write_all(lines.as_bytes())
        .await
        .map_err(|e| TgnError::io(path, e))?;
    file.flush().await.map_err(|e| TgnError::io(path, e))
}
