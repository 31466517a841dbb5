//! The logical-to-physical qubit `Mapping` permutation.

use std::hash::{Hash, Hasher};

/// A bijection between logical and physical qubit indices.
///
/// `l2p[logical] = physical` and `p2l[physical] = logical` are kept as
/// inverse arrays, so both directions are O(1). Mappings are immutable:
/// `swap` returns a fresh `Mapping` rather than mutating in place. The one
/// exception is `swap_in_place`, used exclusively during free-swap
/// back-propagation (§4.5) after the search has finished.
#[derive(Debug, Clone)]
pub struct Mapping {
    l2p: Vec<usize>,
    p2l: Vec<usize>,
}

impl Mapping {
    /// Creates the identity mapping over `qubit_count` qubits.
    pub fn identity(qubit_count: usize) -> Self {
        let ids: Vec<usize> = (0..qubit_count).collect();
        Self {
            l2p: ids.clone(),
            p2l: ids,
        }
    }

    /// Builds a mapping from an explicit logical-to-physical array, deriving
    /// the inverse. Panics if `l2p` is not a permutation of `0..l2p.len()`.
    pub fn from_l2p(l2p: Vec<usize>) -> Self {
        let n = l2p.len();
        let mut p2l = vec![0usize; n];
        let mut seen = vec![false; n];
        for (logical, &physical) in l2p.iter().enumerate() {
            assert!(physical < n, "physical index out of range");
            assert!(!seen[physical], "l2p is not a permutation");
            seen[physical] = true;
            p2l[physical] = logical;
        }
        Self { l2p, p2l }
    }

    pub fn qubit_count(&self) -> usize {
        self.l2p.len()
    }

    pub fn l2p(&self) -> &[usize] {
        &self.l2p
    }

    pub fn p2l(&self) -> &[usize] {
        &self.p2l
    }

    pub fn logical_to_physical(&self, logical: usize) -> usize {
        self.l2p[logical]
    }

    pub fn physical_to_logical(&self, physical: usize) -> usize {
        self.p2l[physical]
    }

    /// Returns a fresh mapping with logical qubits `q1` and `q2` swapped.
    pub fn swap(&self, q1: usize, q2: usize) -> Mapping {
        let mut next = self.clone();
        next.swap_in_place(q1, q2);
        next
    }

    /// Swaps logical qubits `q1` and `q2` in place. Used only by
    /// free-swap back-propagation (§4.5).
    pub fn swap_in_place(&mut self, q1: usize, q2: usize) {
        self.l2p.swap(q1, q2);
        let p1 = self.l2p[q1];
        let p2 = self.l2p[q2];
        self.p2l[p1] = q1;
        self.p2l[p2] = q2;
    }

    /// Returns true iff `l2p`/`p2l` are genuinely inverse permutations
    /// (§4.5 and §8's "Mapping is always a permutation" invariant).
    pub fn is_valid_permutation(&self) -> bool {
        let n = self.l2p.len();
        if self.p2l.len() != n {
            return false;
        }
        (0..n).all(|i| self.p2l[self.l2p[i]] == i)
    }
}

impl PartialEq for Mapping {
    fn eq(&self, other: &Self) -> bool {
        self.l2p == other.l2p
    }
}
impl Eq for Mapping {}

impl Hash for Mapping {
    /// Hashes the canonical byte encoding of `l2p`, per the state-identity
    /// design note (§9): mappings are immutable permutations, so `l2p` alone
    /// is a canonical fingerprint.
    fn hash<H: Hasher>(&self, state: &mut H) {
        for &p in &self.l2p {
            state.write_usize(p);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_is_valid() {
        let m = Mapping::identity(4);
        assert!(m.is_valid_permutation());
        assert_eq!(m.logical_to_physical(2), 2);
    }

    #[test]
    fn swap_is_pure_and_inverse_consistent() {
        let m = Mapping::identity(3);
        let swapped = m.swap(0, 1);
        assert_eq!(m.logical_to_physical(0), 0, "original unaffected");
        assert_eq!(swapped.logical_to_physical(0), 1);
        assert_eq!(swapped.logical_to_physical(1), 0);
        assert!(swapped.is_valid_permutation());
    }

    #[test]
    fn swap_in_place_mutates() {
        let mut m = Mapping::identity(3);
        m.swap_in_place(0, 2);
        assert_eq!(m.logical_to_physical(0), 2);
        assert_eq!(m.physical_to_logical(2), 0);
        assert!(m.is_valid_permutation());
    }

    #[test]
    fn equality_by_l2p() {
        let a = Mapping::identity(3).swap(0, 1);
        let b = Mapping::from_l2p(vec![1, 0, 2]);
        assert_eq!(a, b);
    }

    proptest::proptest! {
        #[test]
        fn random_swap_sequences_stay_permutations(ops in proptest::collection::vec((0usize..5, 0usize..5), 0..30)) {
            let mut m = Mapping::identity(5);
            for (a, b) in ops {
                m.swap_in_place(a, b);
            }
            proptest::prop_assert!(m.is_valid_permutation());
        }
    }
}
