use std::collections::{BTreeMap, BTreeSet};

use la_core::Label;

/// Symmetric label -> neighbor-set mapping.
///
/// Invariants: no entry for the background label, no label in its own
/// neighbor set, and `b` is a neighbor of `a` iff `a` is a neighbor of `b`.
/// Labels without neighbors are never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjacencyRegistry<L> {
    map: BTreeMap<L, BTreeSet<L>>,
}

impl<L: Label> Default for AdjacencyRegistry<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: Label> AdjacencyRegistry<L> {
    pub fn new() -> Self {
        Self {
            map: BTreeMap::new(),
        }
    }

    /// Records that `a` and `b` touch. Idempotent.
    ///
    /// Callers must not pass the background label or `a == b`.
    pub fn register(&mut self, a: L, b: L) {
        debug_assert!(a != b, "self adjacency for label {a}");
        debug_assert!(
            !a.is_background() && !b.is_background(),
            "background label in pair ({a}, {b})"
        );

        self.map.entry(a).or_default().insert(b);
        self.map.entry(b).or_default().insert(a);
    }

    pub fn contains(&self, a: L, b: L) -> bool {
        self.map.get(&a).is_some_and(|set| set.contains(&b))
    }

    pub fn neighbors(&self, label: L) -> Option<&BTreeSet<L>> {
        self.map.get(&label)
    }

    /// Number of labels with at least one neighbor.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Number of distinct undirected pairs.
    pub fn pair_count(&self) -> usize {
        self.map.values().map(BTreeSet::len).sum::<usize>() / 2
    }

    pub fn labels(&self) -> impl Iterator<Item = L> + '_ {
        self.map.keys().copied()
    }

    /// Ascending `(label, ascending neighbor set)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (L, &BTreeSet<L>)> + '_ {
        self.map.iter().map(|(&label, set)| (label, set))
    }

    pub fn for_each_label_ascending(&self, mut visit: impl FnMut(L, &BTreeSet<L>)) {
        for (label, set) in self.iter() {
            visit(label, set);
        }
    }

    /// Folds `other` into `self`; the union keeps all invariants.
    pub fn merge(&mut self, other: Self) {
        if self.map.is_empty() {
            self.map = other.map;
            return;
        }

        for (label, set) in other.map {
            match self.map.get_mut(&label) {
                Some(existing) => existing.extend(set),
                None => {
                    self.map.insert(label, set);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::AdjacencyRegistry;

    #[test]
    fn register_is_symmetric_and_idempotent() {
        let mut reg = AdjacencyRegistry::<u16>::new();
        reg.register(3, 1);
        reg.register(3, 1);
        reg.register(1, 3);

        assert!(reg.contains(1, 3));
        assert!(reg.contains(3, 1));
        assert_eq!(reg.len(), 2);
        assert_eq!(reg.pair_count(), 1);
        assert_eq!(reg.neighbors(1).map(|s| s.len()), Some(1));
        assert!(reg.neighbors(2).is_none());
    }

    #[test]
    fn iteration_is_ascending_and_restartable() {
        let mut reg = AdjacencyRegistry::<u32>::new();
        reg.register(9, 2);
        reg.register(2, 7);
        reg.register(7, 9);
        reg.register(1, 9);

        let collect = |reg: &AdjacencyRegistry<u32>| -> Vec<(u32, Vec<u32>)> {
            reg.iter()
                .map(|(l, set)| (l, set.iter().copied().collect()))
                .collect()
        };

        let expected = vec![
            (1, vec![9]),
            (2, vec![7, 9]),
            (7, vec![2, 9]),
            (9, vec![1, 2, 7]),
        ];
        assert_eq!(collect(&reg), expected);
        assert_eq!(collect(&reg), expected);

        let mut visited = Vec::new();
        reg.for_each_label_ascending(|l, set| visited.push((l, set.len())));
        assert_eq!(visited, vec![(1, 1), (2, 2), (7, 2), (9, 3)]);
    }

    #[test]
    fn merge_is_union() {
        let mut a = AdjacencyRegistry::<u8>::new();
        a.register(1, 2);
        let mut b = AdjacencyRegistry::<u8>::new();
        b.register(2, 3);
        b.register(1, 2);

        a.merge(b);
        assert_eq!(a.pair_count(), 2);
        assert!(a.contains(3, 2));
        assert_eq!(a.labels().collect::<Vec<_>>(), vec![1, 2, 3]);

        let mut empty = AdjacencyRegistry::<u8>::new();
        empty.merge(a.clone());
        assert_eq!(empty, a);
    }
}
