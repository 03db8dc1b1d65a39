use std::path::{Path, PathBuf};

use crate::types::{QueryKind, RootTerm};

/// `<kind>.<sanitized root>.xml`, e.g. `tgn-places.7000003.xml`.
pub fn snapshot_file_name(kind: QueryKind, root: &RootTerm) -> String {
    format!("{}.{}.xml", kind.name(), root.sanitized())
}

/// Directories handed to a pipeline step: it reads from `previous`
/// (output of the step before) and writes into `current`.
#[derive(Debug, Clone)]
pub struct StageDirs {
    pub previous: PathBuf,
    pub current: PathBuf,
}

impl StageDirs {
    pub fn new(previous: impl Into<PathBuf>, current: impl Into<PathBuf>) -> Self {
        Self {
            previous: previous.into(),
            current: current.into(),
        }
    }

    pub fn snapshot_read_path(&self, kind: QueryKind, root: &RootTerm) -> PathBuf {
        snapshot_path(&self.previous, kind, root)
    }

    pub fn snapshot_write_path(&self, kind: QueryKind, root: &RootTerm) -> PathBuf {
        snapshot_path(&self.current, kind, root)
    }
}

fn snapshot_path(dir: &Path, kind: QueryKind, root: &RootTerm) -> PathBuf {
    dir.join(snapshot_file_name(kind, root))
}
