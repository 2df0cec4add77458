//! Umbrella crate for the `label-adjacency` workspace.
//!
//! Re-exports the slice primitives, the volume readers and the adjacency
//! scan so that downstream code needs a single dependency.

pub use la_adjacency::*;
pub use la_core::*;
pub use la_volume::*;
