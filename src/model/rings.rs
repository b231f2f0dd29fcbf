use std::collections::VecDeque;

use super::molecule::Molecule;

/// Smallest-set-of-smallest-rings perception. Candidate cycles come from a
/// Horton-style enumeration (one shortest cycle through every edge/vertex
/// combination); an independent subset is selected greedily by GF(2)
/// elimination over edge incidence vectors.
#[derive(Debug, Clone)]
pub struct RingInfo {
    atom_rings: Vec<Vec<usize>>,
    bond_rings: Vec<Vec<usize>>,
    atom_ring_count: Vec<u32>,
    bond_ring_count: Vec<u32>,
}

impl RingInfo {
    pub(crate) fn perceive(mol: &Molecule) -> Self {
        let num_expected = expected_ring_count(mol);
        let atom_rings = if num_expected == 0 {
            Vec::new()
        } else {
            let candidates = horton_candidates(mol);
            select_independent_rings(&candidates, num_expected, mol.num_bonds(), mol)
        };

        let bond_rings: Vec<Vec<usize>> = atom_rings
            .iter()
            .map(|ring| {
                let len = ring.len();
                (0..len)
                    .map(|i| {
                        mol.bond_between(ring[i], ring[(i + 1) % len])
                            .expect("consecutive ring atoms are bonded")
                    })
                    .collect()
            })
            .collect();

        let mut atom_ring_count = vec![0u32; mol.num_atoms()];
        for ring in &atom_rings {
            for &aid in ring {
                atom_ring_count[aid] += 1;
            }
        }
        let mut bond_ring_count = vec![0u32; mol.num_bonds()];
        for ring in &bond_rings {
            for &bid in ring {
                bond_ring_count[bid] += 1;
            }
        }

        Self {
            atom_rings,
            bond_rings,
            atom_ring_count,
            bond_ring_count,
        }
    }

    #[inline]
    pub fn num_rings(&self) -> usize {
        self.atom_rings.len()
    }

    /// Rings as atom index walks; `bond_rings()[k][i]` joins
    /// `atom_rings()[k][i]` and the next atom in the walk.
    #[inline]
    pub fn atom_rings(&self) -> &[Vec<usize>] {
        &self.atom_rings
    }

    #[inline]
    pub fn bond_rings(&self) -> &[Vec<usize>] {
        &self.bond_rings
    }

    #[inline]
    pub fn num_atom_rings(&self, aid: usize) -> usize {
        self.atom_ring_count[aid] as usize
    }

    #[inline]
    pub fn num_bond_rings(&self, bid: usize) -> usize {
        self.bond_ring_count[bid] as usize
    }

    pub fn is_atom_in_ring_of_size(&self, aid: usize, size: usize) -> bool {
        self.atom_rings
            .iter()
            .any(|ring| ring.len() == size && ring.contains(&aid))
    }

    pub fn is_bond_in_ring_of_size(&self, bid: usize, size: usize) -> bool {
        self.bond_rings
            .iter()
            .any(|ring| ring.len() == size && ring.contains(&bid))
    }
}

/// Cyclomatic number: edges + components - vertices.
fn expected_ring_count(mol: &Molecule) -> usize {
    let v = mol.num_atoms();
    let e = mol.num_bonds();
    (e + connected_components(mol)).saturating_sub(v)
}

fn connected_components(mol: &Molecule) -> usize {
    let n = mol.num_atoms();
    let mut seen = vec![false; n];
    let mut components = 0;
    for start in 0..n {
        if seen[start] {
            continue;
        }
        components += 1;
        seen[start] = true;
        let mut queue = VecDeque::from([start]);
        while let Some(cur) = queue.pop_front() {
            for &(nbr, _) in mol.atom_bonds(cur) {
                if !seen[nbr] {
                    seen[nbr] = true;
                    queue.push_back(nbr);
                }
            }
        }
    }
    components
}

fn horton_candidates(mol: &Molecule) -> Vec<Vec<usize>> {
    let n = mol.num_atoms();
    let dist = mol.bonds_distance_matrix();
    let pred = all_pairs_predecessors(mol, n, dist);

    let mut candidates: Vec<Vec<usize>> = Vec::new();

    for bond in mol.bonds() {
        let (u, v) = (bond.begin, bond.end);
        for w in 0..n {
            let du = dist[w * n + u];
            let dv = dist[w * n + v];
            if du == u32::MAX || dv == u32::MAX {
                continue;
            }
            let ring_size = du as usize + dv as usize + 1;
            if ring_size < 3 {
                continue;
            }
            let path_u = reconstruct_path(&pred, n, w, u);
            let path_v = reconstruct_path(&pred, n, w, v);
            if paths_share_internal_node(&path_u, &path_v) {
                continue;
            }
            let mut ring = path_u;
            for &node in path_v[1..].iter().rev() {
                ring.push(node);
            }
            candidates.push(ring);
        }
    }

    candidates.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));
    candidates.dedup();
    candidates
}

fn all_pairs_predecessors(mol: &Molecule, n: usize, dist: &[u32]) -> Vec<Option<usize>> {
    let mut pred = vec![None; n * n];
    for src in 0..n {
        let mut queue = VecDeque::from([src]);
        let mut visited = vec![false; n];
        visited[src] = true;
        while let Some(cur) = queue.pop_front() {
            for &(nbr, _) in mol.atom_bonds(cur) {
                if !visited[nbr] && dist[src * n + nbr] == dist[src * n + cur] + 1 {
                    visited[nbr] = true;
                    pred[src * n + nbr] = Some(cur);
                    queue.push_back(nbr);
                }
            }
        }
    }
    pred
}

fn reconstruct_path(pred: &[Option<usize>], n: usize, src: usize, dst: usize) -> Vec<usize> {
    let mut path = vec![dst];
    let mut cur = dst;
    while cur != src {
        match pred[src * n + cur] {
            Some(p) => {
                path.push(p);
                cur = p;
            }
            None => return vec![],
        }
    }
    path.reverse();
    path
}

fn paths_share_internal_node(path_u: &[usize], path_v: &[usize]) -> bool {
    if path_u.len() < 2 || path_v.len() < 2 {
        return false;
    }
    path_u[1..].iter().any(|node| path_v[1..].contains(node))
}

fn ring_to_edge_bitvector(ring: &[usize], num_edges: usize, mol: &Molecule) -> Vec<u64> {
    let num_words = num_edges.div_ceil(64);
    let mut bv = vec![0u64; num_words];
    let len = ring.len();
    for i in 0..len {
        if let Some(bid) = mol.bond_between(ring[i], ring[(i + 1) % len]) {
            bv[bid / 64] |= 1u64 << (bid % 64);
        }
    }
    bv
}

fn select_independent_rings(
    candidates: &[Vec<usize>],
    num_needed: usize,
    num_edges: usize,
    mol: &Molecule,
) -> Vec<Vec<usize>> {
    let mut result = Vec::with_capacity(num_needed);
    let mut basis: Vec<Vec<u64>> = Vec::with_capacity(num_needed);

    for ring in candidates {
        if result.len() >= num_needed {
            break;
        }
        let bv = ring_to_edge_bitvector(ring, num_edges, mol);
        if bv.iter().all(|&w| w == 0) {
            continue;
        }
        if try_add_to_basis(&mut basis, bv) {
            result.push(normalize_ring(ring));
        }
    }

    result.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));
    result
}

fn try_add_to_basis(basis: &mut Vec<Vec<u64>>, candidate: Vec<u64>) -> bool {
    let mut v = candidate;
    for row in basis.iter() {
        if let Some(p) = leading_bit(row) {
            if v[p / 64] & (1u64 << (p % 64)) != 0 {
                xor_into(&mut v, row);
            }
        }
    }
    if v.iter().all(|&w| w == 0) {
        return false;
    }
    basis.push(v);
    true
}

fn leading_bit(bv: &[u64]) -> Option<usize> {
    bv.iter()
        .enumerate()
        .find(|(_, &word)| word != 0)
        .map(|(i, word)| i * 64 + word.trailing_zeros() as usize)
}

fn xor_into(a: &mut [u64], b: &[u64]) {
    for (aw, bw) in a.iter_mut().zip(b.iter()) {
        *aw ^= *bw;
    }
}

/// Rotate the walk to start at the smallest atom index, orienting toward
/// the smaller of its two ring neighbors.
fn normalize_ring(ring: &[usize]) -> Vec<usize> {
    if ring.is_empty() {
        return vec![];
    }
    let min_pos = ring
        .iter()
        .enumerate()
        .min_by_key(|&(_, idx)| idx)
        .map(|(i, _)| i)
        .unwrap();

    let len = ring.len();
    let mut normalized = Vec::with_capacity(len);
    for i in 0..len {
        normalized.push(ring[(min_pos + i) % len]);
    }

    if len > 2 && normalized[1] > normalized[len - 1] {
        normalized[1..].reverse();
    }

    normalized
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::atom::Atom;
    use crate::model::types::{BondOrder, Element, Hybridization};

    fn carbon_ring(size: usize) -> Molecule {
        let mut mol = Molecule::new();
        for _ in 0..size {
            mol.add_atom(Atom::new(Element::C, Hybridization::SP3));
        }
        for i in 0..size {
            mol.add_bond(i, (i + 1) % size, BondOrder::Single).unwrap();
        }
        mol
    }

    #[test]
    fn cyclohexane() {
        let mol = carbon_ring(6);
        let ri = mol.ring_info();
        assert_eq!(ri.num_rings(), 1);
        assert_eq!(ri.atom_rings()[0].len(), 6);
        assert_eq!(ri.bond_rings()[0].len(), 6);
    }

    #[test]
    fn cyclopropane() {
        let mol = carbon_ring(3);
        let ri = mol.ring_info();
        assert_eq!(ri.num_rings(), 1);
        assert!(ri.is_atom_in_ring_of_size(0, 3));
        assert!(!ri.is_atom_in_ring_of_size(0, 4));
    }

    #[test]
    fn acyclic_chain() {
        let mut mol = Molecule::new();
        for _ in 0..4 {
            mol.add_atom(Atom::new(Element::C, Hybridization::SP3));
        }
        for i in 1..4 {
            mol.add_bond(i - 1, i, BondOrder::Single).unwrap();
        }
        assert_eq!(mol.ring_info().num_rings(), 0);
        assert_eq!(mol.ring_info().num_atom_rings(1), 0);
    }

    #[test]
    fn naphthalene_two_fused_six_rings() {
        // two hexagons sharing the 0-1 bond
        let mut mol = Molecule::new();
        for _ in 0..10 {
            mol.add_atom(Atom::new(Element::C, Hybridization::SP2));
        }
        let ring1 = [0usize, 2, 3, 4, 5, 1];
        let ring2 = [0usize, 6, 7, 8, 9, 1];
        for w in [&ring1, &ring2] {
            for i in 0..6 {
                let (a, b) = (w[i], w[(i + 1) % 6]);
                if mol.bond_between(a, b).is_none() {
                    mol.add_bond(a, b, BondOrder::Aromatic).unwrap();
                }
            }
        }
        let ri = mol.ring_info();
        assert_eq!(ri.num_rings(), 2);
        for ring in ri.atom_rings() {
            assert_eq!(ring.len(), 6);
        }
        let fused_bond = mol.bond_between(0, 1).unwrap();
        assert_eq!(ri.num_bond_rings(fused_bond), 2);
        assert_eq!(ri.num_atom_rings(0), 2);
        assert_eq!(ri.num_atom_rings(2), 1);
    }

    #[test]
    fn norbornane_bridged() {
        // bicyclo[2.2.1]heptane: bridgeheads 0 and 3
        let mut mol = Molecule::new();
        for _ in 0..7 {
            mol.add_atom(Atom::new(Element::C, Hybridization::SP3));
        }
        for (a, b) in [(0, 1), (1, 2), (2, 3), (3, 4), (4, 5), (5, 0), (0, 6), (6, 3)] {
            mol.add_bond(a, b, BondOrder::Single).unwrap();
        }
        let ri = mol.ring_info();
        assert_eq!(ri.num_rings(), 2);
        let mut sizes: Vec<usize> = ri.atom_rings().iter().map(|r| r.len()).collect();
        sizes.sort();
        assert_eq!(sizes, vec![5, 5]);
        assert_eq!(ri.num_atom_rings(0), 2);
    }

    #[test]
    fn spiro_shares_one_atom() {
        // two 4-rings joined at atom 0
        let mut mol = Molecule::new();
        for _ in 0..7 {
            mol.add_atom(Atom::new(Element::C, Hybridization::SP3));
        }
        for (a, b) in [(0, 1), (1, 2), (2, 3), (3, 0), (0, 4), (4, 5), (5, 6), (6, 0)] {
            mol.add_bond(a, b, BondOrder::Single).unwrap();
        }
        let ri = mol.ring_info();
        assert_eq!(ri.num_rings(), 2);
        assert_eq!(ri.num_atom_rings(0), 2);
        assert_eq!(ri.num_atom_rings(1), 1);
    }

    #[test]
    fn rings_sorted_by_size() {
        // a 3-ring and a 5-ring sharing atom 0
        let mut mol = Molecule::new();
        for _ in 0..7 {
            mol.add_atom(Atom::new(Element::C, Hybridization::SP3));
        }
        for (a, b) in [(0, 1), (1, 2), (2, 0), (0, 3), (3, 4), (4, 5), (5, 6), (6, 0)] {
            mol.add_bond(a, b, BondOrder::Single).unwrap();
        }
        let ri = mol.ring_info();
        assert_eq!(ri.num_rings(), 2);
        assert_eq!(ri.atom_rings()[0].len(), 3);
        assert_eq!(ri.atom_rings()[1].len(), 5);
    }

    #[test]
    fn bond_ring_walk_matches_atom_ring_walk() {
        let mol = carbon_ring(5);
        let ri = mol.ring_info();
        let atoms = &ri.atom_rings()[0];
        let bonds = &ri.bond_rings()[0];
        for i in 0..5 {
            let (a, b) = (atoms[i], atoms[(i + 1) % 5]);
            assert_eq!(mol.bond_between(a, b), Some(bonds[i]));
        }
    }
}
