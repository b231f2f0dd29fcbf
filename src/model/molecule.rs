use std::collections::VecDeque;
use std::sync::OnceLock;

use thiserror::Error;

use super::atom::Atom;
use super::rings::RingInfo;
use super::types::{BondOrder, BondStereo, Element};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid bond between atoms {0} and {1}: {2}")]
pub struct InvalidBondError(pub usize, pub usize, pub &'static str);

#[derive(Debug, Clone, PartialEq)]
pub struct Bond {
    pub begin: usize,
    pub end: usize,
    pub order: BondOrder,
    pub conjugated: bool,
    pub stereo: BondStereo,
    /// Reference atoms anchoring a `Z`/`E` or `Cis`/`Trans` assignment:
    /// one neighbor of `begin` and one neighbor of `end`.
    pub stereo_atoms: Option<(usize, usize)>,
}

impl Bond {
    pub fn new(begin: usize, end: usize, order: BondOrder) -> Self {
        Self {
            begin,
            end,
            order,
            conjugated: false,
            stereo: BondStereo::None,
            stereo_atoms: None,
        }
    }

    /// The endpoint that is not `aid`. `aid` must be one of the endpoints.
    #[inline]
    pub fn other_atom(&self, aid: usize) -> usize {
        debug_assert!(aid == self.begin || aid == self.end);
        if aid == self.begin { self.end } else { self.begin }
    }
}

/// A molecular graph: atoms, bonds, adjacency, and two one-shot caches
/// (ring perception and the all-pairs path-length-in-bonds matrix) that
/// fill lazily on first use and reset on any connectivity change.
#[derive(Debug, Clone, Default)]
pub struct Molecule {
    atoms: Vec<Atom>,
    bonds: Vec<Bond>,
    adjacency: Vec<Vec<(usize, usize)>>,
    ring_info: OnceLock<RingInfo>,
    bond_dist: OnceLock<Vec<u32>>,
}

impl Molecule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_atom(&mut self, atom: Atom) -> usize {
        self.invalidate_caches();
        self.atoms.push(atom);
        self.adjacency.push(Vec::new());
        self.atoms.len() - 1
    }

    pub fn add_bond(
        &mut self,
        begin: usize,
        end: usize,
        order: BondOrder,
    ) -> Result<usize, InvalidBondError> {
        let n = self.atoms.len();
        if begin >= n || end >= n {
            return Err(InvalidBondError(begin, end, "atom index out of bounds"));
        }
        if begin == end {
            return Err(InvalidBondError(begin, end, "self bond"));
        }
        if self.bond_between(begin, end).is_some() {
            return Err(InvalidBondError(begin, end, "duplicate bond"));
        }
        self.invalidate_caches();
        let idx = self.bonds.len();
        self.bonds.push(Bond::new(begin, end, order));
        self.adjacency[begin].push((end, idx));
        self.adjacency[end].push((begin, idx));
        Ok(idx)
    }

    fn invalidate_caches(&mut self) {
        self.ring_info.take();
        self.bond_dist.take();
    }

    #[inline]
    pub fn num_atoms(&self) -> usize {
        self.atoms.len()
    }

    #[inline]
    pub fn num_bonds(&self) -> usize {
        self.bonds.len()
    }

    #[inline]
    pub fn atom(&self, aid: usize) -> &Atom {
        &self.atoms[aid]
    }

    #[inline]
    pub fn atom_mut(&mut self, aid: usize) -> &mut Atom {
        &mut self.atoms[aid]
    }

    #[inline]
    pub fn bond(&self, bid: usize) -> &Bond {
        &self.bonds[bid]
    }

    #[inline]
    pub fn bond_mut(&mut self, bid: usize) -> &mut Bond {
        &mut self.bonds[bid]
    }

    #[inline]
    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    #[inline]
    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    /// `(neighbor atom, bond index)` pairs incident on `aid`.
    #[inline]
    pub fn atom_bonds(&self, aid: usize) -> &[(usize, usize)] {
        &self.adjacency[aid]
    }

    /// Number of explicit neighbors (implicit hydrogens not counted).
    #[inline]
    pub fn degree(&self, aid: usize) -> usize {
        self.adjacency[aid].len()
    }

    /// Implicit hydrogens plus explicit hydrogen neighbors.
    pub fn total_num_hs(&self, aid: usize) -> usize {
        let explicit = self.adjacency[aid]
            .iter()
            .filter(|&&(nbr, _)| self.atoms[nbr].element == Element::H)
            .count();
        self.atoms[aid].implicit_hs as usize + explicit
    }

    pub fn bond_between(&self, a: usize, b: usize) -> Option<usize> {
        self.adjacency
            .get(a)?
            .iter()
            .find(|&&(nbr, _)| nbr == b)
            .map(|&(_, bid)| bid)
    }

    /// Ring perception, computed on first use.
    pub fn ring_info(&self) -> &RingInfo {
        self.ring_info.get_or_init(|| RingInfo::perceive(self))
    }

    /// Row-major N x N matrix of shortest path lengths counted in bonds;
    /// `u32::MAX` for disconnected pairs. Computed on first use.
    pub fn bonds_distance_matrix(&self) -> &[u32] {
        self.bond_dist.get_or_init(|| {
            let n = self.atoms.len();
            let mut dist = vec![u32::MAX; n * n];
            for src in 0..n {
                let row = &mut dist[src * n..(src + 1) * n];
                row[src] = 0;
                let mut queue = VecDeque::new();
                queue.push_back(src);
                while let Some(cur) = queue.pop_front() {
                    let d = row[cur];
                    for &(nbr, _) in &self.adjacency[cur] {
                        if row[nbr] == u32::MAX {
                            row[nbr] = d + 1;
                            queue.push_back(nbr);
                        }
                    }
                }
            }
            dist
        })
    }

    /// Shortest path length in bonds between two atoms.
    #[inline]
    pub fn bonds_distance(&self, a: usize, b: usize) -> u32 {
        self.bonds_distance_matrix()[a * self.atoms.len() + b]
    }

    /// Idealized angle in degrees between two ligands of a center with an
    /// explicit coordination geometry, from the geometry's canonical site
    /// vectors. Ligands occupy sites in adjacency order, rotated by the
    /// center's permutation offset.
    pub fn ideal_ligand_angle(&self, center: usize, lig1: usize, lig2: usize) -> f64 {
        let atom = &self.atoms[center];
        let sites = atom.geometry.site_vectors();
        if sites.is_empty() {
            return 109.471;
        }
        let offset = atom.geometry_permutation.unwrap_or(0) as usize;
        let site_of = |lig: usize| -> Option<&[f64; 3]> {
            let pos = self.adjacency[center]
                .iter()
                .position(|&(nbr, _)| nbr == lig)?;
            Some(&sites[(pos + offset) % sites.len()])
        };
        match (site_of(lig1), site_of(lig2)) {
            (Some(v1), Some(v2)) => {
                let dot = v1[0] * v2[0] + v1[1] * v2[1] + v1[2] * v2[2];
                dot.clamp(-1.0, 1.0).acos().to_degrees()
            }
            _ => 109.471,
        }
    }
}
