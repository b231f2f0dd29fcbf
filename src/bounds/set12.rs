use super::accum::Accumulator;
use super::error::Error;
use super::matrix::BoundsMatrix;
use super::params::{self, StretchParams};
use super::DIST12_TOL;
use crate::model::molecule::Molecule;

/// Extra slack for bonds touching larger heteroatoms in conjugated
/// 5-rings, which need room to pucker.
const HETERO_5RING_SQUISH: f64 = 0.2;

/// Pass 1: install 1-2 bounds from equilibrium bond lengths and record the
/// lengths for the later passes.
pub(crate) fn set_12_bounds(
    mol: &Molecule,
    mat: &mut BoundsMatrix,
    accum: &mut Accumulator,
    params: &StretchParams,
) -> Result<(), Error> {
    let (atom_params, _found_all) = params::get_atom_types(mol, params);
    let rinfo = mol.ring_info();

    let mut squish = vec![false; mol.num_atoms()];
    for (bid, bond) in mol.bonds().iter().enumerate() {
        if bond.conjugated
            && (mol.atom(bond.begin).atomic_number() > 10
                || mol.atom(bond.end).atomic_number() > 10)
            && rinfo.is_bond_in_ring_of_size(bid, 5)
        {
            squish[bond.begin] = true;
            squish[bond.end] = true;
        }
    }

    for (bid, bond) in mol.bonds().iter().enumerate() {
        let order = bond.order.value();
        match (atom_params[bond.begin], atom_params[bond.end]) {
            (Some(p1), Some(p2)) if order > 0.0 => {
                let bl = params::rest_bond_length(order, &p1, &p2, params.global.lambda);
                let extra = if squish[bond.begin] || squish[bond.end] {
                    HETERO_5RING_SQUISH
                } else {
                    0.0
                };
                accum.bond_lengths[bid] = bl;
                mat.check_and_set(
                    bond.begin,
                    bond.end,
                    bl - extra - DIST12_TOL,
                    bl + extra + DIST12_TOL,
                )?;
            }
            _ => {
                // no parameters for one of the atoms, fall back to crude
                // bounds from the van der Waals radii
                let vw1 = mol.atom(bond.begin).element.rvdw();
                let vw2 = mol.atom(bond.end).element.rvdw();
                let bl = (vw1 + vw2) / 2.0;
                accum.bond_lengths[bid] = bl;
                mat.check_and_set(bond.begin, bond.end, 0.5 * bl, 1.5 * bl)?;
            }
        }
    }
    Ok(())
}
