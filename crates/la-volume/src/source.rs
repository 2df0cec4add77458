use std::path::Path;

use la_core::{Image, Label};

use crate::{NrrdVolume, PngStack, VolumeError};

/// Extent of a volume: `width x height` slices, `depth` of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VolumeDims {
    pub width: usize,
    pub height: usize,
    pub depth: usize,
}

impl VolumeDims {
    pub fn new(width: usize, height: usize, depth: usize) -> Self {
        Self {
            width,
            height,
            depth,
        }
    }

    pub fn slice_len(&self) -> usize {
        self.width * self.height
    }

    pub fn voxel_count(&self) -> usize {
        self.slice_len() * self.depth
    }
}

/// Ordered sequence of 2D label slices.
pub trait SliceSource {
    type Label: Label;

    fn dims(&self) -> VolumeDims;

    /// Reads slice `z` as an owned `width x height` image.
    fn read_slice(&mut self, z: usize) -> Result<Image<Self::Label>, VolumeError>;
}

/// Opens a volume by path: directories are PNG stacks, `.nrrd` / `.nhdr`
/// files are NRRD volumes.
pub fn open_volume(path: &Path) -> Result<Box<dyn SliceSource<Label = u32>>, VolumeError> {
    if path.is_dir() {
        return Ok(Box::new(PngStack::open(path)?));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match ext.as_deref() {
        Some("nrrd" | "nhdr") => Ok(Box::new(NrrdVolume::open(path)?)),
        _ => {
            if !path.exists() {
                return Err(VolumeError::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("volume not found: {}", path.display()),
                )));
            }
            Err(VolumeError::UnknownFormat(path.to_path_buf()))
        }
    }
}

pub(crate) fn check_slice_index(z: usize, dims: VolumeDims) -> Result<(), VolumeError> {
    if z >= dims.depth {
        return Err(VolumeError::SliceOutOfRange {
            index: z,
            depth: dims.depth,
        });
    }
    Ok(())
}
