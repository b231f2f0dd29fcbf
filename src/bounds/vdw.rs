use super::matrix::BoundsMatrix;
use super::{DIST12_TOL, VDW_SCALE_15};
use crate::model::molecule::Molecule;

/// Pass 5: van der Waals lower bounds for every pair no earlier pass
/// reached. With topological scaling, pairs 4 or 5 bonds apart may come
/// closer than the full radii sum (0.7x and 0.85x respectively).
pub(crate) fn set_vdw_lower_bounds(mol: &Molecule, mat: &mut BoundsMatrix, scale: bool) {
    let npt = mat.num_rows();
    for i in 1..npt {
        let vw1 = mol.atom(i).element.rvdw();
        for j in 0..i {
            if mat.lower_bound(i, j) >= DIST12_TOL {
                continue;
            }
            let v = vw1 + mol.atom(j).element.rvdw();
            let lb = if scale {
                match mol.bonds_distance(i, j) {
                    4 => VDW_SCALE_15 * v,
                    5 => (VDW_SCALE_15 + 0.5 * (1.0 - VDW_SCALE_15)) * v,
                    _ => v,
                }
            } else {
                v
            };
            mat.set_lower_bound(i, j, lb);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounds::{init_bounds_mat, MAX_UPPER};
    use crate::model::atom::Atom;
    use crate::model::types::{BondOrder, Element, Hybridization};

    fn chain(len: usize) -> Molecule {
        let mut mol = Molecule::new();
        for _ in 0..len {
            mol.add_atom(Atom::new(Element::C, Hybridization::SP3));
        }
        for i in 1..len {
            mol.add_bond(i - 1, i, BondOrder::Single).unwrap();
        }
        mol
    }

    #[test]
    fn scaling_by_topological_distance() {
        let mol = chain(8);
        let mut mat = BoundsMatrix::new(8);
        init_bounds_mat(&mut mat, 0.0, MAX_UPPER);
        set_vdw_lower_bounds(&mol, &mut mat, true);
        let v = 2.0 * Element::C.rvdw();
        assert!((mat.lower_bound(0, 4) - VDW_SCALE_15 * v).abs() < 1e-12);
        assert!((mat.lower_bound(0, 5) - 0.85 * v).abs() < 1e-12);
        assert!((mat.lower_bound(0, 6) - v).abs() < 1e-12);
        assert!((mat.lower_bound(0, 7) - v).abs() < 1e-12);
    }

    #[test]
    fn unscaled_uses_full_radii_sum() {
        let mol = chain(6);
        let mut mat = BoundsMatrix::new(6);
        init_bounds_mat(&mut mat, 0.0, MAX_UPPER);
        set_vdw_lower_bounds(&mol, &mut mat, false);
        let v = 2.0 * Element::C.rvdw();
        assert!((mat.lower_bound(0, 4) - v).abs() < 1e-12);
        assert!((mat.lower_bound(0, 5) - v).abs() < 1e-12);
    }

    #[test]
    fn existing_lower_bounds_survive() {
        let mol = chain(6);
        let mut mat = BoundsMatrix::new(6);
        init_bounds_mat(&mut mat, 0.0, MAX_UPPER);
        mat.set_lower_bound(0, 5, 1.23);
        set_vdw_lower_bounds(&mol, &mut mat, true);
        assert!((mat.lower_bound(0, 5) - 1.23).abs() < 1e-12);
    }

    #[test]
    fn disconnected_pairs_get_full_sum() {
        let mut mol = chain(2);
        mol.add_atom(Atom::new(Element::O, Hybridization::SP3));
        let mut mat = BoundsMatrix::new(3);
        init_bounds_mat(&mut mat, 0.0, MAX_UPPER);
        set_vdw_lower_bounds(&mol, &mut mat, true);
        let v = Element::C.rvdw() + Element::O.rvdw();
        assert!((mat.lower_bound(0, 2) - v).abs() < 1e-12);
    }
}
