use la_core::{Image, Label};

use crate::source::check_slice_index;
use crate::{SliceSource, VolumeDims, VolumeError};

/// Dense in-memory volume, x fastest, then y, then z.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryVolume<L> {
    dims: VolumeDims,
    data: Vec<L>,
}

impl<L: Label> MemoryVolume<L> {
    pub fn from_vec(
        width: usize,
        height: usize,
        depth: usize,
        data: Vec<L>,
    ) -> Result<Self, la_core::Error> {
        let expected = width
            .checked_mul(height)
            .and_then(|v| v.checked_mul(depth))
            .ok_or(la_core::Error::SizeMismatch {
                expected: usize::MAX,
                actual: data.len(),
            })?;

        if data.len() != expected {
            return Err(la_core::Error::SizeMismatch {
                expected,
                actual: data.len(),
            });
        }

        Ok(Self {
            dims: VolumeDims::new(width, height, depth),
            data,
        })
    }

    /// Stacks equally sized slices into a volume.
    pub fn from_slices(slices: Vec<Image<L>>) -> Result<Self, VolumeError> {
        let (width, height) = slices
            .first()
            .map(|s| (s.width(), s.height()))
            .unwrap_or((0, 0));

        let depth = slices.len();
        let mut data = Vec::with_capacity(width * height * depth);
        for (index, slice) in slices.into_iter().enumerate() {
            if slice.width() != width || slice.height() != height {
                return Err(VolumeError::SliceShape {
                    index,
                    width: slice.width(),
                    height: slice.height(),
                    expected_width: width,
                    expected_height: height,
                });
            }
            data.extend(slice.into_vec());
        }

        Ok(Self {
            dims: VolumeDims::new(width, height, depth),
            data,
        })
    }

    pub fn new_fill(width: usize, height: usize, depth: usize, value: L) -> Self {
        let len = width
            .checked_mul(height)
            .and_then(|v| v.checked_mul(depth))
            .expect("volume size overflow");
        Self {
            dims: VolumeDims::new(width, height, depth),
            data: vec![value; len],
        }
    }

    pub fn data(&self) -> &[L] {
        &self.data
    }
}

impl<L: Label> SliceSource for MemoryVolume<L> {
    type Label = L;

    fn dims(&self) -> VolumeDims {
        self.dims
    }

    fn read_slice(&mut self, z: usize) -> Result<Image<L>, VolumeError> {
        check_slice_index(z, self.dims)?;
        let len = self.dims.slice_len();
        let start = z * len;
        let data = self.data[start..start + len].to_vec();
        Ok(Image::from_vec(self.dims.width, self.dims.height, data)?)
    }
}
