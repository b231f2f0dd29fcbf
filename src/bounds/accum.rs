use std::collections::HashSet;

/// Angular decision made for a 1-4 path, consumed again when composing
/// 1-5 bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Path14Kind {
    Cis,
    Trans,
    Other,
}

#[derive(Debug, Clone, Copy)]
pub struct Path14 {
    pub bid1: usize,
    pub bid2: usize,
    pub bid3: usize,
    pub kind: Path14Kind,
}

/// Lower-triangle-packed symmetric table keyed by two bond indices.
#[derive(Debug, Clone)]
pub(crate) struct SymmetricMatrix<T> {
    data: Vec<T>,
}

impl<T: Copy> SymmetricMatrix<T> {
    pub fn new(n: usize, fill: T) -> Self {
        Self {
            data: vec![fill; n * (n + 1) / 2],
        }
    }

    #[inline]
    fn index(i: usize, j: usize) -> usize {
        let (lo, hi) = if i <= j { (i, j) } else { (j, i) };
        hi * (hi + 1) / 2 + lo
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> T {
        self.data[Self::index(i, j)]
    }

    #[inline]
    pub fn set(&mut self, i: usize, j: usize, value: T) {
        self.data[Self::index(i, j)] = value;
    }
}

/// State accumulated across the pipeline passes for one invocation. Owned
/// by the orchestrator; each pass takes exclusive access and fills the
/// fields later passes read.
#[derive(Debug, Clone)]
pub(crate) struct Accumulator {
    num_atoms: usize,
    num_bonds: usize,
    /// Equilibrium length per bond, filled by pass 1.
    pub bond_lengths: Vec<f64>,
    /// Angle in radians assigned between two bonds sharing an atom,
    /// filled by pass 2.
    pub bond_angles: SymmetricMatrix<Option<f64>>,
    /// Shared atom of two adjacent bonds, filled by pass 2.
    pub bond_adjacency: SymmetricMatrix<Option<usize>>,
    /// 1-4 path decisions, filled by pass 3.
    pub paths14: Vec<Path14>,
    pub cis_paths: HashSet<u64>,
    pub trans_paths: HashSet<u64>,
    /// Atom pairs already bounded by the 1-5 pass.
    pub set15_atoms: Vec<bool>,
}

impl Accumulator {
    pub fn new(num_atoms: usize, num_bonds: usize) -> Self {
        Self {
            num_atoms,
            num_bonds,
            bond_lengths: vec![0.0; num_bonds],
            bond_angles: SymmetricMatrix::new(num_bonds, None),
            bond_adjacency: SymmetricMatrix::new(num_bonds, None),
            paths14: Vec::new(),
            cis_paths: HashSet::new(),
            trans_paths: HashSet::new(),
            set15_atoms: vec![false; num_atoms * num_atoms],
        }
    }

    /// Packs an ordered bond triple into one key. The orchestrator's bond
    /// count check keeps `nb^3` inside `u64`.
    #[inline]
    pub fn encode_path(&self, b1: usize, b2: usize, b3: usize) -> u64 {
        let nb = self.num_bonds as u64;
        (b1 as u64) * nb * nb + (b2 as u64) * nb + b3 as u64
    }

    pub fn record_cis(&mut self, b1: usize, b2: usize, b3: usize) {
        let forward = self.encode_path(b1, b2, b3);
        let reverse = self.encode_path(b3, b2, b1);
        self.cis_paths.insert(forward);
        self.cis_paths.insert(reverse);
    }

    pub fn record_trans(&mut self, b1: usize, b2: usize, b3: usize) {
        let forward = self.encode_path(b1, b2, b3);
        let reverse = self.encode_path(b3, b2, b1);
        self.trans_paths.insert(forward);
        self.trans_paths.insert(reverse);
    }

    #[inline]
    pub fn mark_set15_pair(&mut self, a: usize, b: usize) {
        self.set15_atoms[a * self.num_atoms + b] = true;
        self.set15_atoms[b * self.num_atoms + a] = true;
    }

    #[inline]
    pub fn is_set15_pair(&self, a: usize, b: usize) -> bool {
        self.set15_atoms[a * self.num_atoms + b] || self.set15_atoms[b * self.num_atoms + a]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symmetric_matrix_round_trip() {
        let mut m: SymmetricMatrix<Option<f64>> = SymmetricMatrix::new(4, None);
        m.set(1, 3, Some(1.5));
        assert_eq!(m.get(3, 1), Some(1.5));
        assert_eq!(m.get(1, 1), None);
        assert_eq!(m.get(0, 3), None);
    }

    #[test]
    fn path_encoding_is_direction_sensitive() {
        let accum = Accumulator::new(4, 10);
        assert_ne!(accum.encode_path(1, 2, 3), accum.encode_path(3, 2, 1));
        assert_eq!(accum.encode_path(0, 0, 7), 7);
    }

    #[test]
    fn cis_recording_covers_both_directions() {
        let mut accum = Accumulator::new(4, 10);
        accum.record_cis(1, 2, 3);
        assert!(accum.cis_paths.contains(&accum.encode_path(1, 2, 3)));
        assert!(accum.cis_paths.contains(&accum.encode_path(3, 2, 1)));
        assert!(!accum.trans_paths.contains(&accum.encode_path(1, 2, 3)));
    }

    #[test]
    fn set15_pairs_are_symmetric() {
        let mut accum = Accumulator::new(3, 2);
        accum.mark_set15_pair(0, 2);
        assert!(accum.is_set15_pair(2, 0));
        assert!(!accum.is_set15_pair(0, 1));
    }
}
