//! Configuration and pipeline behind the `generate_adjacencies` tool.
//!
//! The tool reads a JSON atlas configuration naming a label volume and a
//! models directory, scans the volume and writes the adjacency list into the
//! models directory. The list is written to a temporary file first and only
//! moved into place once complete.

mod config;
mod error;
mod run;

pub use config::{AtlasConfig, DEFAULT_ADJACENCIES_FILE};
pub use error::ToolError;
pub use run::{RunSummary, generate_adjacencies};
