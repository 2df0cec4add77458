/// Axis-aligned rectangle of slice positions, `[x, x + width) x [y, y + height)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Region {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl Region {
    pub fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn area(&self) -> usize {
        self.width * self.height
    }

    pub fn contains(&self, x: usize, y: usize) -> bool {
        x >= self.x && y >= self.y && x - self.x < self.width && y - self.y < self.height
    }

    pub fn rows(&self) -> core::ops::Range<usize> {
        self.y..self.y + self.height
    }

    pub fn cols(&self) -> core::ops::Range<usize> {
        self.x..self.x + self.width
    }

    /// Row-major iterator over all positions in the region.
    pub fn positions(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.rows()
            .flat_map(move |y| self.cols().map(move |x| (x, y)))
    }
}

/// Interior region plus the border faces of a slice extent.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FaceList {
    interior: Option<Region>,
    faces: Vec<Region>,
}

impl FaceList {
    /// Region where every offset within the radius is in bounds.
    pub fn interior(&self) -> Option<Region> {
        self.interior
    }

    /// Border regions; lookups there must be bounds-checked.
    pub fn faces(&self) -> &[Region] {
        &self.faces
    }

    /// Interior first, then faces.
    pub fn iter(&self) -> impl Iterator<Item = Region> + '_ {
        self.interior.into_iter().chain(self.faces.iter().copied())
    }
}

/// Partitions a `width x height` extent into disjoint regions.
///
/// The interior is `[radius, width - radius) x [radius, height - radius)`.
/// Faces are the top rows, bottom rows, and the left and right columns
/// between them. Empty regions are omitted, so a degenerate extent may
/// produce faces only, or nothing at all.
pub fn boundary_faces(width: usize, height: usize, radius: usize) -> FaceList {
    if width == 0 || height == 0 {
        return FaceList::default();
    }

    let top_h = radius.min(height);
    let bottom_y = top_h.max(height.saturating_sub(radius));
    let mid_h = bottom_y - top_h;

    let left_w = radius.min(width);
    let right_x = left_w.max(width.saturating_sub(radius));
    let mid_w = right_x - left_w;

    let interior = Region::new(left_w, top_h, mid_w, mid_h);
    let candidates = [
        Region::new(0, 0, width, top_h),
        Region::new(0, bottom_y, width, height - bottom_y),
        Region::new(0, top_h, left_w, mid_h),
        Region::new(right_x, top_h, width - right_x, mid_h),
    ];

    FaceList {
        interior: (!interior.is_empty()).then_some(interior),
        faces: candidates.into_iter().filter(|r| !r.is_empty()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::{Region, boundary_faces};

    fn coverage(width: usize, height: usize, radius: usize) -> Vec<u8> {
        let mut hits = vec![0u8; width * height];
        for region in boundary_faces(width, height, radius).iter() {
            for (x, y) in region.positions() {
                hits[y * width + x] += 1;
            }
        }
        hits
    }

    #[test]
    fn faces_cover_extent_exactly_once() {
        for (w, h) in [(1, 1), (2, 2), (3, 3), (5, 4), (1, 7), (9, 1), (16, 11)] {
            for radius in 0..=2 {
                let hits = coverage(w, h, radius);
                assert!(
                    hits.iter().all(|&n| n == 1),
                    "{w}x{h} radius {radius}: {hits:?}"
                );
                assert_eq!(boundary_faces(w, h, radius).iter().map(|r| r.area()).sum::<usize>(), w * h);
            }
        }
    }

    #[test]
    fn interior_keeps_offsets_in_bounds() {
        let faces = boundary_faces(6, 5, 1);
        let interior = faces.interior().expect("interior exists");

        assert_eq!(interior, Region::new(1, 1, 4, 3));
        for (x, y) in interior.positions() {
            assert!(x >= 1 && y >= 1 && x + 1 < 6 && y + 1 < 5);
        }
        assert_eq!(faces.faces().len(), 4);
    }

    #[test]
    fn narrow_extents_have_no_interior() {
        let faces = boundary_faces(2, 2, 1);
        assert!(faces.interior().is_none());
        assert_eq!(faces.faces().len(), 2);

        assert!(boundary_faces(0, 4, 1).is_empty());
        assert_eq!(boundary_faces(4, 4, 0).faces().len(), 0);
    }

    #[test]
    fn region_contains_and_positions() {
        let r = Region::new(2, 1, 2, 2);
        assert!(r.contains(2, 1));
        assert!(r.contains(3, 2));
        assert!(!r.contains(4, 2));
        assert!(!r.contains(1, 1));

        let pts: Vec<_> = r.positions().collect();
        assert_eq!(pts, vec![(2, 1), (3, 1), (2, 2), (3, 2)]);
    }
}
