pub mod client;
pub mod memory;
pub mod ndjson;
pub mod neo4j;
#[cfg(feature = "test-utils")]
pub mod testutil;
pub mod writer;

pub use client::{GraphClient, Neo4jSettings};
pub use memory::MemoryWriter;
pub use ndjson::NdjsonWriter;
pub use neo4j::Neo4jWriter;
pub use writer::GraphWriter;
