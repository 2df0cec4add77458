//! Property tests for the sliding-window scan.
//!
//! Random small volumes are scanned and checked against a brute-force
//! reference that walks every 6-connected voxel pair.
//!
//! Run with: cargo test -p la-adjacency -- properties

use std::collections::BTreeSet;

use la_adjacency::{AdjacencyRegistry, ScanConfig, scan_volume};
use la_volume::MemoryVolume;
use proptest::prelude::*;

#[derive(Debug, Clone)]
struct Volume {
    width: usize,
    height: usize,
    depth: usize,
    data: Vec<u16>,
}

impl Volume {
    fn at(&self, x: usize, y: usize, z: usize) -> u16 {
        self.data[(z * self.height + y) * self.width + x]
    }

    fn memory(&self) -> MemoryVolume<u16> {
        MemoryVolume::from_vec(self.width, self.height, self.depth, self.data.clone())
            .expect("valid volume")
    }
}

fn volume_strategy() -> impl Strategy<Value = Volume> {
    (1usize..7, 1usize..7, 0usize..5, 1u16..6).prop_flat_map(|(w, h, d, max_label)| {
        prop::collection::vec(0..=max_label, w * h * d).prop_map(move |data| Volume {
            width: w,
            height: h,
            depth: d,
            data,
        })
    })
}

/// Unordered pairs of distinct non-zero labels over 6-connected voxels.
/// In-slice pairs of slice 0 are included only when `first_slice` is set.
fn reference_pairs(v: &Volume, first_slice: bool) -> BTreeSet<(u16, u16)> {
    let mut pairs = BTreeSet::new();
    let mut add = |a: u16, b: u16| {
        if a != b && a != 0 && b != 0 {
            pairs.insert((a.min(b), a.max(b)));
        }
    };

    for z in 0..v.depth {
        for y in 0..v.height {
            for x in 0..v.width {
                let c = v.at(x, y, z);
                if z > 0 {
                    add(c, v.at(x, y, z - 1));
                }
                if z > 0 || first_slice {
                    if x + 1 < v.width {
                        add(c, v.at(x + 1, y, z));
                    }
                    if y + 1 < v.height {
                        add(c, v.at(x, y + 1, z));
                    }
                }
            }
        }
    }
    pairs
}

fn registry_pairs(reg: &AdjacencyRegistry<u16>) -> BTreeSet<(u16, u16)> {
    reg.iter()
        .flat_map(|(a, set)| set.iter().map(move |&b| (a.min(b), a.max(b))))
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn properties_scan_matches_reference(v in volume_strategy(), first_slice in any::<bool>()) {
        let cfg = ScanConfig { include_first_slice: first_slice, ..ScanConfig::default() };
        let out = scan_volume(&mut v.memory(), &cfg).expect("in-memory scan");

        prop_assert_eq!(registry_pairs(&out.registry), reference_pairs(&v, first_slice));
    }

    #[test]
    fn properties_registry_invariants(v in volume_strategy()) {
        let out = scan_volume(&mut v.memory(), &ScanConfig::default()).expect("in-memory scan");
        let reg = &out.registry;

        prop_assert!(reg.neighbors(0).is_none());
        for (label, set) in reg.iter() {
            prop_assert!(label != 0);
            prop_assert!(!set.is_empty());
            prop_assert!(!set.contains(&label));
            prop_assert!(!set.contains(&0));
            for &n in set {
                prop_assert!(reg.contains(n, label));
            }
        }
    }

    #[test]
    fn properties_registration_is_idempotent(
        pairs in prop::collection::vec((1u16..20, 1u16..20), 0..40),
        repeats in 1usize..4,
    ) {
        let mut once = AdjacencyRegistry::new();
        let mut many = AdjacencyRegistry::new();
        for &(a, b) in pairs.iter().filter(|(a, b)| a != b) {
            once.register(a, b);
            for _ in 0..repeats {
                many.register(a, b);
                many.register(b, a);
            }
        }
        prop_assert_eq!(once, many);
    }

    #[test]
    fn properties_parallel_matches_sequential(v in volume_strategy()) {
        let seq = scan_volume(&mut v.memory(), &ScanConfig::default()).expect("scan");
        let par_cfg = ScanConfig { parallel: true, ..ScanConfig::default() };
        let par = scan_volume(&mut v.memory(), &par_cfg).expect("scan");

        prop_assert_eq!(seq.registry, par.registry);
        prop_assert_eq!(seq.stats, par.stats);
    }
}
