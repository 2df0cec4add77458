use la_core::{Image, ImageView, Label, Region, boundary_faces};
use la_volume::{SliceSource, VolumeError};
use log::{debug, info};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[cfg(not(feature = "parallel"))]
use log::warn;

use crate::registry::AdjacencyRegistry;

/// Slice a neighbor offset is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Plane {
    /// The slice below the one being scanned.
    Previous,
    Current,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NeighborOffset {
    pub dx: isize,
    pub dy: isize,
    pub plane: Plane,
}

const BELOW: NeighborOffset = NeighborOffset {
    dx: 0,
    dy: 0,
    plane: Plane::Previous,
};
const UP: NeighborOffset = NeighborOffset {
    dx: 0,
    dy: -1,
    plane: Plane::Current,
};
const LEFT: NeighborOffset = NeighborOffset {
    dx: -1,
    dy: 0,
    plane: Plane::Current,
};

/// Below, up and left. The other three 6-connected directions are the
/// mirror images, covered when the neighbor itself is the center.
pub const NEIGHBOR_OFFSETS: [NeighborOffset; 3] = [BELOW, UP, LEFT];

/// Offsets used for slice 0, which has no slice below it.
pub const FIRST_SLICE_OFFSETS: [NeighborOffset; 2] = [UP, LEFT];

/// Neighbor radius of every offset above.
const RADIUS: usize = 1;

/// Registers `(center, neighbor)` when both are labelled and distinct.
#[inline]
pub fn compare_and_register<L: Label>(
    center: L,
    neighbor: L,
    registry: &mut AdjacencyRegistry<L>,
) -> bool {
    if center == neighbor || center.is_background() || neighbor.is_background() {
        return false;
    }
    registry.register(center, neighbor);
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScanConfig {
    /// Also pair up/left neighbors inside slice 0. Off by default, which
    /// leaves pairs that only touch within slice 0 undiscovered.
    pub include_first_slice: bool,
    /// Split each slice's rows across rayon workers (needs the `parallel`
    /// feature; otherwise the scan stays sequential).
    pub parallel: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScanStats {
    pub slices: usize,
    pub voxels_visited: usize,
    /// In-bounds neighbor lookups.
    pub comparisons: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScanOutput<L> {
    pub registry: AdjacencyRegistry<L>,
    pub stats: ScanStats,
}

/// Two-slice window over a volume.
///
/// Slices are pushed in z order with [`SlidingWindow::advance`]; each new
/// slice is compared against itself and the one retained before it, which
/// is dropped once the comparison is done.
#[derive(Debug)]
pub struct SlidingWindow<L> {
    cfg: ScanConfig,
    previous: Option<Image<L>>,
    registry: AdjacencyRegistry<L>,
    stats: ScanStats,
}

impl<L: Label> SlidingWindow<L> {
    pub fn new(cfg: ScanConfig) -> Self {
        Self {
            cfg,
            previous: None,
            registry: AdjacencyRegistry::new(),
            stats: ScanStats::default(),
        }
    }

    pub fn registry(&self) -> &AdjacencyRegistry<L> {
        &self.registry
    }

    pub fn stats(&self) -> ScanStats {
        self.stats
    }

    pub fn advance(&mut self, current: Image<L>) -> Result<(), la_core::Error> {
        if let Some(prev) = &self.previous
            && (prev.width() != current.width() || prev.height() != current.height())
        {
            return Err(la_core::Error::SizeMismatch {
                expected: prev.width() * prev.height(),
                actual: current.width() * current.height(),
            });
        }

        let parallel = self.cfg.parallel;
        let scanned = match &self.previous {
            Some(prev) => Some(scan_pair(Some(&prev.as_view()), &current.as_view(), parallel)),
            None if self.cfg.include_first_slice => {
                Some(scan_pair(None, &current.as_view(), parallel))
            }
            None => None,
        };

        if let Some((registry, stats)) = scanned {
            self.registry.merge(registry);
            self.stats.voxels_visited += stats.voxels_visited;
            self.stats.comparisons += stats.comparisons;
        }

        self.stats.slices += 1;
        self.previous = Some(current);
        Ok(())
    }

    pub fn finish(self) -> ScanOutput<L> {
        ScanOutput {
            registry: self.registry,
            stats: self.stats,
        }
    }
}

/// Scans every voxel of `cur` against its up/left neighbors and, when `prev`
/// is given, the voxel below it.
fn scan_pair<L: Label>(
    prev: Option<&ImageView<'_, L>>,
    cur: &ImageView<'_, L>,
    parallel: bool,
) -> (AdjacencyRegistry<L>, ScanStats) {
    let offsets: &[NeighborOffset] = match prev {
        Some(_) => &NEIGHBOR_OFFSETS,
        None => &FIRST_SLICE_OFFSETS,
    };

    let mut registry = AdjacencyRegistry::new();
    let mut stats = ScanStats::default();
    let faces = boundary_faces(cur.width(), cur.height(), RADIUS);

    if let Some(interior) = faces.interior() {
        stats.comparisons +=
            scan_region(prev, cur, interior, offsets, true, parallel, &mut registry);
        stats.voxels_visited += interior.area();
    }
    for &face in faces.faces() {
        stats.comparisons +=
            scan_region(prev, cur, face, offsets, false, parallel, &mut registry);
        stats.voxels_visited += face.area();
    }

    (registry, stats)
}

fn scan_region<L: Label>(
    prev: Option<&ImageView<'_, L>>,
    cur: &ImageView<'_, L>,
    region: Region,
    offsets: &[NeighborOffset],
    interior: bool,
    parallel: bool,
    registry: &mut AdjacencyRegistry<L>,
) -> usize {
    if parallel {
        #[cfg(feature = "parallel")]
        return scan_region_par(prev, cur, region, offsets, interior, registry);
    }

    region
        .rows()
        .map(|y| scan_row(prev, cur, region, y, offsets, interior, registry))
        .sum()
}

#[cfg(feature = "parallel")]
fn scan_region_par<L: Label>(
    prev: Option<&ImageView<'_, L>>,
    cur: &ImageView<'_, L>,
    region: Region,
    offsets: &[NeighborOffset],
    interior: bool,
    registry: &mut AdjacencyRegistry<L>,
) -> usize {
    let (partial, comparisons) = region
        .rows()
        .into_par_iter()
        .fold(
            || (AdjacencyRegistry::new(), 0usize),
            |(mut acc, n), y| {
                let m = scan_row(prev, cur, region, y, offsets, interior, &mut acc);
                (acc, n + m)
            },
        )
        .reduce(
            || (AdjacencyRegistry::new(), 0usize),
            |(mut a, n), (b, m)| {
                a.merge(b);
                (a, n + m)
            },
        );

    registry.merge(partial);
    comparisons
}

/// Scans row `y` of `region`, returning the number of neighbor lookups.
///
/// Interior rows index the neighbor rows directly; face rows go through
/// bounds-checked lookups and skip offsets that leave the slice.
fn scan_row<L: Label>(
    prev: Option<&ImageView<'_, L>>,
    cur: &ImageView<'_, L>,
    region: Region,
    y: usize,
    offsets: &[NeighborOffset],
    interior: bool,
    registry: &mut AdjacencyRegistry<L>,
) -> usize {
    let center_row = cur.row(y);
    let mut comparisons = 0;

    for off in offsets {
        let plane = match off.plane {
            Plane::Current => cur,
            Plane::Previous => match prev {
                Some(p) => p,
                None => continue,
            },
        };

        if interior {
            let ny = y.wrapping_add_signed(off.dy);
            let neighbor_row = plane.row(ny);
            for x in region.cols() {
                let nx = x.wrapping_add_signed(off.dx);
                compare_and_register(center_row[x], neighbor_row[nx], registry);
            }
            comparisons += region.width;
        } else {
            for x in region.cols() {
                let Some(neighbor) = plane.get_offset(x, y, off.dx, off.dy) else {
                    continue;
                };
                compare_and_register(center_row[x], neighbor, registry);
                comparisons += 1;
            }
        }
    }

    comparisons
}

/// Streams `source` through a [`SlidingWindow`] and returns the registry.
///
/// The first failing slice read aborts the scan.
pub fn scan_volume<S>(
    source: &mut S,
    cfg: &ScanConfig,
) -> Result<ScanOutput<S::Label>, VolumeError>
where
    S: SliceSource + ?Sized,
{
    let dims = source.dims();
    info!(
        "processing {} slices of {}x{}",
        dims.depth, dims.width, dims.height
    );

    #[cfg(not(feature = "parallel"))]
    if cfg.parallel {
        warn!("parallel scan requested without the `parallel` feature; scanning sequentially");
    }

    let mut window = SlidingWindow::new(*cfg);
    for z in 0..dims.depth {
        let slice = source.read_slice(z)?;
        if slice.width() != dims.width || slice.height() != dims.height {
            return Err(VolumeError::SliceShape {
                index: z,
                width: slice.width(),
                height: slice.height(),
                expected_width: dims.width,
                expected_height: dims.height,
            });
        }

        window.advance(slice)?;
        debug!(
            "slice {z}: {} labels with neighbors so far",
            window.registry().len()
        );
    }

    let out = window.finish();
    info!(
        "scanned {} slices, {} voxels, {} comparisons: {} labels, {} adjacent pairs",
        out.stats.slices,
        out.stats.voxels_visited,
        out.stats.comparisons,
        out.registry.len(),
        out.registry.pair_count()
    );
    Ok(out)
}
