pub mod config;
pub mod error;
pub mod stage;
pub mod types;

pub use config::{Relations, TgnConfig, TypeMap};
pub use error::{Result, TgnError};
pub use stage::{snapshot_file_name, StageDirs};
pub use types::*;
