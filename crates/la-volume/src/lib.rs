//! Slice providers for labeled 3D volumes.
//!
//! A volume is exposed as an ordered sequence of 2D label slices, indexed
//! `0..depth`. Sources hand out one owned slice per call so that callers can
//! keep a bounded window of slices in memory instead of the whole volume.
//!
//! Supported sources:
//! - [`MemoryVolume`]: a dense in-memory volume, mostly for tests and demos.
//! - [`NrrdVolume`]: raw-encoded NRRD files (`.nrrd` or detached `.nhdr`),
//!   read on demand one slice at a time.
//! - [`PngStack`]: a directory of 8- or 16-bit grayscale PNG slices.

mod error;
mod memory;
mod nrrd;
mod png_stack;
mod source;

pub use error::VolumeError;
pub use memory::MemoryVolume;
pub use nrrd::{Endian, NrrdHeader, NrrdVolume, SampleType};
pub use png_stack::PngStack;
pub use source::{SliceSource, VolumeDims, open_volume};
