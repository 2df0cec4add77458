//! Foundational primitives for label-volume adjacency analysis.
//!
//! ## Slices
//! A label slice is a dense 2D grid stored row-major. [`ImageView`] borrows
//! one without copying.
//!
//! ## Labels
//! Label values are unsigned integers. Zero is the background label and
//! never takes part in adjacency.
//!
//! ## Boundary Faces
//! [`boundary_faces`] splits a slice extent into an interior region, where
//! every neighbor offset within the radius is in bounds, and border faces,
//! where lookups go through [`ImageView::get_offset`].

mod border;
mod error;
mod image;
mod label;

pub use border::{FaceList, Region, boundary_faces};
pub use error::Error;
pub use image::{Image, ImageView};
pub use label::Label;
