use async_trait::async_trait;

use tgn_common::{GraphObject, Result};

/// Sink for transformed objects.
///
/// A batch is the output of one source record (PIT first, then its edges) and
/// succeeds or fails as a whole from the caller's point of view. Callers await
/// each batch before submitting the next.
#[async_trait]
pub trait GraphWriter: Send + Sync {
    async fn write_objects(&self, batch: &[GraphObject]) -> Result<()>;
}
