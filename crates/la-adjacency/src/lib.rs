//! 6-connected label adjacency from labeled 3D volumes.
//!
//! The scan keeps exactly two slices in memory, `previous` and `current`,
//! and compares every voxel of `current` with three neighbors:
//! - below: the same position in `previous`,
//! - up: `(x, y - 1)` in `current`,
//! - left: `(x - 1, y)` in `current`.
//!
//! The remaining three directions are mirrors of these and are found when
//! the neighbor is visited as the center. Pairs of distinct non-background
//! labels are collected in a symmetric [`AdjacencyRegistry`].
//!
//! Slice 0 is only ever a `previous` slice, so pairs that touch exclusively
//! inside slice 0 are not reported unless
//! [`ScanConfig::include_first_slice`] is set.
//!
//! With the `parallel` feature, [`ScanConfig::parallel`] folds each slice's
//! rows into per-worker registries that are merged afterwards.

mod registry;
mod scan;
mod write;

pub use registry::AdjacencyRegistry;
pub use scan::{
    FIRST_SLICE_OFFSETS, NEIGHBOR_OFFSETS, NeighborOffset, Plane, ScanConfig, ScanOutput,
    ScanStats, SlidingWindow, compare_and_register, scan_volume,
};
pub use write::{
    ParseError, WriteOptions, WriteSummary, format_line, read_adjacency_list,
    write_adjacency_list,
};
