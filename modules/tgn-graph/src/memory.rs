use std::sync::Mutex;

use async_trait::async_trait;

use tgn_common::{GraphObject, Result, TgnError};

use crate::writer::GraphWriter;

/// In-memory writer that records every batch in arrival order.
/// Can be armed to fail on the Nth batch (0-based) to exercise abort paths.
#[derive(Default)]
pub struct MemoryWriter {
    batches: Mutex<Vec<Vec<GraphObject>>>,
    fail_on: Option<usize>,
    attempts: Mutex<usize>,
}

impl MemoryWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(batch_index: usize) -> Self {
        Self {
            fail_on: Some(batch_index),
            ..Self::default()
        }
    }

    /// Successfully written batches.
    pub fn batches(&self) -> Vec<Vec<GraphObject>> {
        self.batches.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// All written objects, flattened.
    pub fn objects(&self) -> Vec<GraphObject> {
        self.batches().into_iter().flatten().collect()
    }

    /// Number of write calls received, including the failed one.
    pub fn attempts(&self) -> usize {
        *self.attempts.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl GraphWriter for MemoryWriter {
    async fn write_objects(&self, batch: &[GraphObject]) -> Result<()> {
        let attempt = {
            let mut attempts = self.attempts.lock().unwrap_or_else(|e| e.into_inner());
            *attempts += 1;
            *attempts - 1
        };

        if self.fail_on == Some(attempt) {
            return Err(TgnError::Write(format!(
                "MemoryWriter: injected failure on batch {attempt}"
            )));
        }

        self.batches
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(batch.to_vec());
        Ok(())
    }
}
