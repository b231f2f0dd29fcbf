use std::f64::consts::PI;

use super::accum::Accumulator;
use super::error::Error;
use super::geometry::compute_13_dist;
use super::matrix::BoundsMatrix;
use super::DIST13_TOL;
use crate::model::molecule::Molecule;
use crate::model::types::Hybridization;

/// Interior angle assumed for a ring atom, from its hybridization and the
/// ring size. Assumes all angles in a ring are equal, which is not always
/// true for heteroaromatics; the tolerance scaling below absorbs that.
fn ring_interior_angle(hyb: Hybridization, ring_size: usize) -> f64 {
    if (hyb == Hybridization::SP2 && ring_size <= 8) || ring_size == 3 || ring_size == 4 {
        PI * (1.0 - 2.0 / ring_size as f64)
    } else if hyb == Hybridization::SP3 {
        if ring_size == 5 {
            104.0 * PI / 180.0
        } else {
            109.5 * PI / 180.0
        }
    } else if hyb == Hybridization::SP3D {
        105.0 * PI / 180.0
    } else if hyb == Hybridization::SP3D2 {
        90.0 * PI / 180.0
    } else {
        120.0 * PI / 180.0
    }
}

/// Heavier sp2 ring atoms sit further from ideal geometry, so their 1-3
/// tolerances double per such atom on the path.
fn is_larger_sp2_ring_atom(mol: &Molecule, aid: usize) -> bool {
    mol.atom(aid).atomic_number() > 13
        && mol.atom(aid).hybridization == Hybridization::SP2
        && mol.ring_info().num_atom_rings(aid) > 0
}

fn set_13_bound(
    aid1: usize,
    aid2: usize,
    aid3: usize,
    angle: f64,
    accum: &Accumulator,
    mat: &mut BoundsMatrix,
    mol: &Molecule,
) -> Result<(), Error> {
    let bid1 = mol
        .bond_between(aid1, aid2)
        .ok_or_else(|| Error::inconsistent(format!("no bond between atoms {aid1} and {aid2}")))?;
    let bid2 = mol
        .bond_between(aid2, aid3)
        .ok_or_else(|| Error::inconsistent(format!("no bond between atoms {aid2} and {aid3}")))?;
    let dist = compute_13_dist(accum.bond_lengths[bid1], accum.bond_lengths[bid2], angle);
    let mut tol = DIST13_TOL;
    for aid in [aid1, aid2, aid3] {
        if is_larger_sp2_ring_atom(mol, aid) {
            tol *= 2.0;
        }
    }
    mat.check_and_set(aid1, aid3, dist - tol, dist + tol)
}

/// Pass 2: 1-3 bounds. Ring interiors first (smallest rings first, one
/// visit per distinct bond pair so bridged atoms are not double-counted),
/// then leftover pairs at ring atoms, then purely acyclic centers.
pub(crate) fn set_13_bounds(
    mol: &Molecule,
    mat: &mut BoundsMatrix,
    accum: &mut Accumulator,
) -> Result<(), Error> {
    let npt = mol.num_atoms();
    let nb = mol.num_bonds();
    let rinfo = mol.ring_info();

    let mut atom_rings: Vec<&Vec<usize>> = rinfo.atom_rings().iter().collect();
    atom_rings.sort_by_key(|ring| ring.len());

    let mut visited = vec![0u32; npt];
    let mut angle_taken = vec![0.0f64; npt];
    let mut done_pairs = vec![false; nb * nb];

    for ring in &atom_rings {
        let rsize = ring.len();
        let mut aid1 = ring[rsize - 1];
        for i in 0..rsize {
            let aid2 = ring[i];
            let aid3 = ring[(i + 1) % rsize];
            let bid1 = mol.bond_between(aid1, aid2).ok_or_else(|| {
                Error::inconsistent(format!("ring atoms {aid1} and {aid2} not bonded"))
            })?;
            let bid2 = mol.bond_between(aid2, aid3).ok_or_else(|| {
                Error::inconsistent(format!("ring atoms {aid2} and {aid3} not bonded"))
            })?;
            if !done_pairs[nb * bid1 + bid2] && !done_pairs[nb * bid2 + bid1] {
                let angle = ring_interior_angle(mol.atom(aid2).hybridization, rsize);
                set_13_bound(aid1, aid2, aid3, angle, accum, mat, mol)?;
                accum.bond_angles.set(bid1, bid2, Some(angle));
                accum.bond_adjacency.set(bid1, bid2, Some(aid2));
                visited[aid2] += 1;
                angle_taken[aid2] += angle;
                done_pairs[nb * bid1 + bid2] = true;
                done_pairs[nb * bid2 + bid1] = true;
            }
            aid1 = aid2;
        }
    }

    for aid2 in 0..npt {
        let deg = mol.degree(aid2);
        let n13 = deg * (deg - 1) / 2;
        if n13 == visited[aid2] as usize {
            continue;
        }
        let atom = mol.atom(aid2);
        let ahyb = atom.hybridization;
        let adj = mol.atom_bonds(aid2);

        if visited[aid2] >= 1 {
            // ring atom with leftover pairs: non-ring neighbors, or ring
            // neighbors from different rings of a fused system
            for (k, &(aid1, bid1)) in adj.iter().enumerate() {
                for &(aid3, bid2) in &adj[..k] {
                    if accum.bond_angles.get(bid1, bid2).is_some() {
                        continue;
                    }
                    let angle = if ahyb == Hybridization::SP2 {
                        // planar center: divide the remaining angle among
                        // the remaining pairs
                        (2.0 * PI - angle_taken[aid2]) / (n13 as f64 - visited[aid2] as f64)
                    } else if ahyb == Hybridization::SP3 {
                        if rinfo.is_atom_in_ring_of_size(aid2, 3) {
                            116.0 * PI / 180.0
                        } else if rinfo.is_atom_in_ring_of_size(aid2, 4) {
                            112.0 * PI / 180.0
                        } else {
                            109.5 * PI / 180.0
                        }
                    } else if atom.has_non_tetrahedral_stereo() {
                        mol.ideal_ligand_angle(aid2, aid1, aid3).to_radians()
                    } else {
                        match deg {
                            5 => 105.0 * PI / 180.0,
                            6 => 135.0 * PI / 180.0,
                            _ => 120.0 * PI / 180.0,
                        }
                    };
                    set_13_bound(aid1, aid2, aid3, angle, accum, mat, mol)?;
                    accum.bond_angles.set(bid1, bid2, Some(angle));
                    accum.bond_adjacency.set(bid1, bid2, Some(aid2));
                    angle_taken[aid2] += angle;
                    visited[aid2] += 1;
                }
            }
        } else {
            // acyclic center: angles follow hybridization alone
            for (k, &(aid1, bid1)) in adj.iter().enumerate() {
                for &(aid3, bid2) in &adj[..k] {
                    let angle = if atom.has_non_tetrahedral_stereo() {
                        mol.ideal_ligand_angle(aid2, aid1, aid3).to_radians()
                    } else {
                        match ahyb {
                            Hybridization::SP => PI,
                            Hybridization::SP2 => 2.0 * PI / 3.0,
                            Hybridization::SP3 => 109.5 * PI / 180.0,
                            Hybridization::SP3D => 105.0 * PI / 180.0,
                            Hybridization::SP3D2 => 135.0 * PI / 180.0,
                            Hybridization::Other => 120.0 * PI / 180.0,
                        }
                    };
                    if deg <= 4
                        || (atom.has_non_tetrahedral_stereo()
                            && atom.geometry_permutation.is_some())
                    {
                        set_13_bound(aid1, aid2, aid3, angle, accum, mat, mol)?;
                    } else {
                        // hypercoordinate center without explicit geometry:
                        // only a crude range is defensible
                        let dmax = accum.bond_lengths[bid1] + accum.bond_lengths[bid2];
                        mat.check_and_set(aid1, aid3, 1.0, 1.2 * dmax)?;
                    }
                    accum.bond_angles.set(bid1, bid2, Some(angle));
                    accum.bond_adjacency.set(bid1, bid2, Some(aid2));
                    angle_taken[aid2] += angle;
                    visited[aid2] += 1;
                }
            }
        }
    }
    Ok(())
}
