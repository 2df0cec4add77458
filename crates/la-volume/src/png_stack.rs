use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageReader};
use la_core::Image;
use log::debug;

use crate::source::check_slice_index;
use crate::{SliceSource, VolumeDims, VolumeError};

/// Directory of grayscale PNG slices, ordered by file name.
///
/// Names compare by their text prefix, then by the numeric suffix of the
/// stem, so `slice_2.png` comes before `slice_10.png` with or without zero
/// padding.
///
/// Only 8- and 16-bit single-channel images are accepted; label values are
/// taken verbatim, never rescaled.
#[derive(Debug, Clone)]
pub struct PngStack {
    files: Vec<PathBuf>,
    dims: VolumeDims,
}

impl PngStack {
    pub fn open(dir: &Path) -> Result<Self, VolumeError> {
        let mut files = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            let is_png = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("png"));
            if is_png && path.is_file() {
                files.push(path);
            }
        }
        files.sort_by_cached_key(|p| slice_order_key(p));

        let Some(first) = files.first() else {
            return Err(VolumeError::EmptyStack(dir.to_path_buf()));
        };
        let first = decode_labels(first)?;
        let dims = VolumeDims::new(first.width(), first.height(), files.len());
        debug!(
            "opened PNG stack {} ({}x{}x{})",
            dir.display(),
            dims.width,
            dims.height,
            dims.depth
        );

        Ok(Self { files, dims })
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }
}

fn slice_order_key(path: &Path) -> (String, Option<u128>, PathBuf) {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let prefix = stem.trim_end_matches(|c: char| c.is_ascii_digit());
    let number = stem[prefix.len()..].parse().ok();
    (prefix.to_string(), number, path.to_path_buf())
}

fn decode_labels(path: &Path) -> Result<Image<u32>, VolumeError> {
    let decoded = ImageReader::open(path)?.decode()?;
    let (width, height) = (decoded.width() as usize, decoded.height() as usize);

    let labels: Vec<u32> = match decoded {
        DynamicImage::ImageLuma8(img) => img.into_raw().into_iter().map(u32::from).collect(),
        DynamicImage::ImageLuma16(img) => img.into_raw().into_iter().map(u32::from).collect(),
        other => {
            return Err(VolumeError::UnsupportedPixelFormat {
                path: path.to_path_buf(),
                format: format!("{:?}", other.color()),
            });
        }
    };

    Ok(Image::from_vec(width, height, labels)?)
}

impl SliceSource for PngStack {
    type Label = u32;

    fn dims(&self) -> VolumeDims {
        self.dims
    }

    fn read_slice(&mut self, z: usize) -> Result<Image<u32>, VolumeError> {
        check_slice_index(z, self.dims)?;
        let slice = decode_labels(&self.files[z])?;

        if slice.width() != self.dims.width || slice.height() != self.dims.height {
            return Err(VolumeError::SliceShape {
                index: z,
                width: slice.width(),
                height: slice.height(),
                expected_width: self.dims.width,
                expected_height: self.dims.height,
            });
        }
        Ok(slice)
    }
}
