use super::accum::{Accumulator, Path14Kind};
use super::error::Error;
use super::geometry::{
    compute_15_dists_cis_cis, compute_15_dists_cis_trans, compute_15_dists_trans_cis,
    compute_15_dists_trans_trans,
};
use super::matrix::BoundsMatrix;
use super::{DIST12_TOL, DIST15_TOL, MAX_UPPER, VDW_SCALE_15};
use crate::model::molecule::Molecule;

/// Pass 4: 1-5 bounds. Every recorded 1-4 path is extended by one bond at
/// either end; the 1-4 tag and the cis/trans membership of the trailing
/// three bonds select which planar composite applies.
pub(crate) fn set_15_bounds(
    mol: &Molecule,
    mat: &mut BoundsMatrix,
    accum: &mut Accumulator,
) -> Result<(), Error> {
    for k in 0..accum.paths14.len() {
        let path = accum.paths14[k];
        extend_path(mol, path.bid1, path.bid2, path.bid3, path.kind, accum, mat)?;
        extend_path(mol, path.bid3, path.bid2, path.bid1, path.kind, accum, mat)?;
    }
    Ok(())
}

fn extend_path(
    mol: &Molecule,
    bid1: usize,
    bid2: usize,
    bid3: usize,
    kind: Path14Kind,
    accum: &mut Accumulator,
    mat: &mut BoundsMatrix,
) -> Result<(), Error> {
    let aid2 = accum
        .bond_adjacency
        .get(bid1, bid2)
        .ok_or_else(|| Error::inconsistent(format!("bonds {bid1} and {bid2} share no atom")))?;
    let aid1 = mol.bond(bid1).other_atom(aid2);
    let aid3 = accum
        .bond_adjacency
        .get(bid2, bid3)
        .ok_or_else(|| Error::inconsistent(format!("bonds {bid2} and {bid3} share no atom")))?;
    let aid4 = mol.bond(bid3).other_atom(aid3);

    let d1 = accum.bond_lengths[bid1];
    let d2 = accum.bond_lengths[bid2];
    let d3 = accum.bond_lengths[bid3];
    let ang12 = accum
        .bond_angles
        .get(bid1, bid2)
        .ok_or_else(|| Error::inconsistent(format!("no angle for bonds {bid1}, {bid2}")))?;
    let ang23 = accum
        .bond_angles
        .get(bid2, bid3)
        .ok_or_else(|| Error::inconsistent(format!("no angle for bonds {bid2}, {bid3}")))?;

    for bid4 in 0..mol.num_bonds() {
        if accum.bond_adjacency.get(bid3, bid4) != Some(aid4) {
            continue;
        }
        let aid5 = mol.bond(bid4).other_atom(aid4);
        // four-membered rings can walk back onto the first atom, and
        // shorter topological paths may already constrain the pair
        if mol.bonds_distance(aid1.max(aid5), aid1.min(aid5)) < 4 {
            continue;
        }
        if aid1 == aid5 {
            continue;
        }
        if mat.lower_bound(aid1, aid5) >= DIST12_TOL && !accum.is_set15_pair(aid1, aid5) {
            continue;
        }

        let d4 = accum.bond_lengths[bid4];
        let ang34 = accum
            .bond_angles
            .get(bid3, bid4)
            .ok_or_else(|| Error::inconsistent(format!("no angle for bonds {bid3}, {bid4}")))?;
        let tail = accum.encode_path(bid2, bid3, bid4);
        let tail_cis = accum.cis_paths.contains(&tail);
        let tail_trans = accum.trans_paths.contains(&tail);

        let mut dl;
        let mut du = -1.0;
        match kind {
            Path14Kind::Cis => {
                if tail_cis {
                    dl = compute_15_dists_cis_cis(d1, d2, d3, d4, ang12, ang23, ang34);
                    du = dl + DIST15_TOL;
                    dl -= DIST15_TOL;
                } else if tail_trans {
                    dl = compute_15_dists_cis_trans(d1, d2, d3, d4, ang12, ang23, ang34);
                    du = dl + DIST15_TOL;
                    dl -= DIST15_TOL;
                } else {
                    dl = compute_15_dists_cis_cis(d1, d2, d3, d4, ang12, ang23, ang34) - DIST15_TOL;
                    du = compute_15_dists_cis_trans(d1, d2, d3, d4, ang12, ang23, ang34)
                        + DIST15_TOL;
                }
            }
            Path14Kind::Trans => {
                if tail_cis {
                    dl = compute_15_dists_trans_cis(d1, d2, d3, d4, ang12, ang23, ang34);
                    du = dl + DIST15_TOL;
                    dl -= DIST15_TOL;
                } else if tail_trans {
                    dl = compute_15_dists_trans_trans(d1, d2, d3, d4, ang12, ang23, ang34);
                    du = dl + DIST15_TOL;
                    dl -= DIST15_TOL;
                } else {
                    dl = compute_15_dists_trans_cis(d1, d2, d3, d4, ang12, ang23, ang34)
                        - DIST15_TOL;
                    du = compute_15_dists_trans_trans(d1, d2, d3, d4, ang12, ang23, ang34)
                        + DIST15_TOL;
                }
            }
            Path14Kind::Other => {
                // only the trailing half is pinned; bracket it walking the
                // path backwards
                if tail_cis {
                    dl = compute_15_dists_cis_cis(d4, d3, d2, d1, ang34, ang23, ang12) - DIST15_TOL;
                    du = compute_15_dists_cis_trans(d4, d3, d2, d1, ang34, ang23, ang12)
                        + DIST15_TOL;
                } else if tail_trans {
                    dl = compute_15_dists_trans_cis(d4, d3, d2, d1, ang34, ang23, ang12)
                        - DIST15_TOL;
                    du = compute_15_dists_trans_trans(d4, d3, d2, d1, ang34, ang23, ang12)
                        + DIST15_TOL;
                } else {
                    // nothing is pinned: keep atoms apart with a scaled
                    // van der Waals floor
                    dl = VDW_SCALE_15
                        * (mol.atom(aid1).element.rvdw() + mol.atom(aid5).element.rvdw());
                }
            }
        }
        if du < 0.0 {
            du = MAX_UPPER;
        }
        mat.check_and_set(aid1, aid5, dl, du)?;
        accum.mark_set15_pair(aid1, aid5);
    }
    Ok(())
}
