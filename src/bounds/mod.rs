//! Topological distance-bounds pipeline.
//!
//! Five ordered passes over a molecular graph fill a symmetric bounds
//! matrix for downstream distance-geometry embedding: 1-2 bounds from
//! equilibrium bond lengths, 1-3 bounds from bond angles, 1-4 bounds from
//! torsion case analysis, optional 1-5 bounds composed from adjacent 1-4
//! paths, and van der Waals lower bounds for everything else. State shared
//! between passes lives in an accumulator owned by one invocation of
//! [`set_topol_bounds`].

mod accum;
mod error;
pub mod geometry;
mod matrix;
mod params;
mod set12;
mod set13;
mod set14;
mod set15;
mod vdw;

pub use accum::{Path14, Path14Kind};
pub use error::Error;
pub use matrix::BoundsMatrix;
pub use params::{AtomTypeParams, GlobalParams, StretchParams};

use crate::model::molecule::Molecule;
use crate::model::types::BondOrder;

/// Tolerance applied to 1-2 bounds; also the threshold below which a
/// lower bound counts as unset.
pub(crate) const DIST12_TOL: f64 = 0.01;
/// Tolerance applied to 1-3 bounds.
pub(crate) const DIST13_TOL: f64 = 0.04;
/// General tolerance for pinned 1-4 distances.
pub(crate) const GEN_DIST_TOL: f64 = 0.06;
/// Tolerance applied to 1-5 bounds.
pub(crate) const DIST15_TOL: f64 = 0.08;
/// Scale on the radii sum for pairs exactly four bonds apart.
pub(crate) const VDW_SCALE_15: f64 = 0.7;
/// Sentinel above which an upper bound counts as unset.
pub(crate) const MAX_UPPER: f64 = 1000.0;
/// Rings at least this large take the macrocycle 1-4 rules.
pub(crate) const MIN_MACROCYCLE_RING_SIZE: usize = 9;

/// Options for [`set_topol_bounds`].
#[derive(Debug, Clone)]
pub struct BoundsOptions {
    /// Run the 1-5 pass.
    pub set15: bool,
    /// Scale van der Waals lower bounds down for pairs 4 or 5 bonds apart.
    pub scale_vdw: bool,
    /// Use the widened macrocycle rules for rings of nine or more atoms.
    pub use_macrocycle14: bool,
    /// Pin amide/ester 1-4 paths instead of letting them roam cis-trans.
    pub force_trans_amides: bool,
    /// In macrocycles, hold the 1-5 amide partner cis as if the amide
    /// itself were pinned trans.
    pub macrocycle_trans_amide_15: bool,
    /// Custom bond-stretch parameter table (TOML); `None` uses the
    /// embedded defaults.
    pub params: Option<String>,
}

impl Default for BoundsOptions {
    fn default() -> Self {
        Self {
            set15: true,
            scale_vdw: true,
            use_macrocycle14: false,
            force_trans_amides: true,
            macrocycle_trans_amide_15: false,
            params: None,
        }
    }
}

/// A pair of bonds sharing an atom, reported by
/// [`collect_bonds_and_angles`]: the walk `a1-a2-a3` with `a2` shared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AngleRecord {
    pub a1: usize,
    pub a2: usize,
    pub a3: usize,
    /// True when the angle is held near linear: either bond is triple, or
    /// both are double around a two-coordinate center.
    pub linear: bool,
}

/// Fill every off-diagonal entry with the unset sentinels.
pub fn init_bounds_mat(mat: &mut BoundsMatrix, default_min: f64, default_max: f64) {
    let npt = mat.num_rows();
    for i in 1..npt {
        for j in 0..i {
            mat.set_upper_bound(i, j, default_max);
            mat.set_lower_bound(i, j, default_min);
        }
    }
}

fn validate(mol: &Molecule, mat: &BoundsMatrix) -> Result<(), Error> {
    if mol.num_atoms() == 0 {
        return Err(Error::EmptyMolecule);
    }
    let max_bonds = (u64::MAX as f64).cbrt() as usize;
    if mol.num_bonds() >= max_bonds {
        return Err(Error::TooManyBonds(mol.num_bonds()));
    }
    if mat.num_rows() != mol.num_atoms() {
        return Err(Error::size_mismatch(mat.num_rows(), mol.num_atoms()));
    }
    Ok(())
}

/// Run the full pipeline, writing bounds for every atom pair into `mat`.
///
/// `mat` must be initialized with [`init_bounds_mat`]. On error the matrix
/// may hold a partial result and must not be consumed.
pub fn set_topol_bounds(
    mol: &Molecule,
    mat: &mut BoundsMatrix,
    options: &BoundsOptions,
) -> Result<(), Error> {
    validate(mol, mat)?;
    let params = params::load_parameters(options.params.as_deref())?;
    let mut accum = accum::Accumulator::new(mol.num_atoms(), mol.num_bonds());

    set12::set_12_bounds(mol, mat, &mut accum, params)?;
    set13::set_13_bounds(mol, mat, &mut accum)?;
    set14::set_14_bounds(mol, mat, &mut accum, options)?;
    if options.set15 {
        set15::set_15_bounds(mol, mat, &mut accum)?;
    }
    vdw::set_vdw_lower_bounds(mol, mat, options.scale_vdw);
    Ok(())
}

/// Like [`set_topol_bounds`], additionally returning the bonded atom pairs
/// and the bond-angle walks, for callers that feed both the bounds and the
/// topology to an embedder.
pub fn set_topol_bounds_with_topology(
    mol: &Molecule,
    mat: &mut BoundsMatrix,
    options: &BoundsOptions,
) -> Result<(Vec<(usize, usize)>, Vec<AngleRecord>), Error> {
    set_topol_bounds(mol, mat, options)?;
    Ok(collect_bonds_and_angles(mol))
}

/// Enumerate bonded atom pairs and all bond-pair walks `a1-a2-a3`,
/// flagging walks held near linear by triple or cumulated double bonds.
pub fn collect_bonds_and_angles(mol: &Molecule) -> (Vec<(usize, usize)>, Vec<AngleRecord>) {
    let mut bonds = Vec::with_capacity(mol.num_bonds());
    let mut angles = Vec::new();
    for (i, bond_i) in mol.bonds().iter().enumerate() {
        bonds.push((bond_i.begin, bond_i.end));
        for bond_j in &mol.bonds()[i + 1..] {
            let (a11, a12) = (bond_i.begin, bond_i.end);
            let (a21, a22) = (bond_j.begin, bond_j.end);
            let walk = if a12 == a21 {
                Some((a11, a12, a22))
            } else if a12 == a22 {
                Some((a11, a12, a21))
            } else if a11 == a21 {
                Some((a12, a11, a22))
            } else if a11 == a22 {
                Some((a12, a11, a21))
            } else {
                None
            };
            let Some((a1, a2, a3)) = walk else { continue };
            let linear = bond_i.order == BondOrder::Triple
                || bond_j.order == BondOrder::Triple
                || (bond_i.order == BondOrder::Double
                    && bond_j.order == BondOrder::Double
                    && mol.degree(a2) == 2);
            angles.push(AngleRecord { a1, a2, a3, linear });
        }
    }
    (bonds, angles)
}

#[cfg(test)]
mod tests {
    use super::geometry::{compute_14_dist_3d, compute_14_dist_cis, compute_14_dist_trans};
    use super::*;
    use crate::model::atom::Atom;
    use crate::model::types::{Element, Hybridization};
    use std::f64::consts::PI;

    const TET: f64 = 109.5 * PI / 180.0;

    fn fresh_matrix(mol: &Molecule) -> BoundsMatrix {
        let mut mat = BoundsMatrix::new(mol.num_atoms());
        init_bounds_mat(&mut mat, 0.0, MAX_UPPER);
        mat
    }

    fn bounds_for(mol: &Molecule, options: &BoundsOptions) -> BoundsMatrix {
        let mut mat = fresh_matrix(mol);
        set_topol_bounds(mol, &mut mat, options).unwrap();
        mat
    }

    fn assert_well_formed(mol: &Molecule, mat: &BoundsMatrix) {
        for i in 0..mol.num_atoms() {
            for j in 0..i {
                let l = mat.lower_bound(i, j);
                let u = mat.upper_bound(i, j);
                assert!(l > 0.0, "pair ({i}, {j}): lower {l} not positive");
                assert!(l <= u, "pair ({i}, {j}): lower {l} above upper {u}");
            }
        }
    }

    fn carbon_chain(len: usize) -> Molecule {
        let mut mol = Molecule::new();
        for _ in 0..len {
            mol.add_atom(Atom::new(Element::C, Hybridization::SP3));
        }
        for i in 1..len {
            mol.add_bond(i - 1, i, BondOrder::Single).unwrap();
        }
        mol
    }

    fn benzene() -> Molecule {
        let mut mol = Molecule::new();
        for _ in 0..6 {
            mol.add_atom(Atom::new(Element::C, Hybridization::SP2));
        }
        for i in 0..6 {
            let bid = mol.add_bond(i, (i + 1) % 6, BondOrder::Aromatic).unwrap();
            mol.bond_mut(bid).conjugated = true;
        }
        mol
    }

    #[test]
    fn empty_molecule_is_rejected() {
        let mol = Molecule::new();
        let mut mat = BoundsMatrix::new(0);
        assert!(matches!(
            set_topol_bounds(&mol, &mut mat, &BoundsOptions::default()),
            Err(Error::EmptyMolecule)
        ));
    }

    #[test]
    fn matrix_size_must_match() {
        let mol = carbon_chain(3);
        let mut mat = BoundsMatrix::new(5);
        init_bounds_mat(&mut mat, 0.0, MAX_UPPER);
        assert!(matches!(
            set_topol_bounds(&mol, &mut mat, &BoundsOptions::default()),
            Err(Error::SizeMismatch { got: 5, expected: 3 })
        ));
    }

    #[test]
    fn butane_end_to_end() {
        let mol = carbon_chain(4);
        let mat = bounds_for(&mol, &BoundsOptions::default());
        assert_well_formed(&mol, &mat);

        // terminal pair brackets the cis..trans torsion range
        let bl = 2.0 * 0.757;
        let cis = compute_14_dist_cis(bl, bl, bl, TET, TET);
        let trans = compute_14_dist_trans(bl, bl, bl, TET, TET);
        assert!(mat.upper_bound(0, 3) <= trans + DIST12_TOL);
        assert!(mat.lower_bound(0, 3) >= cis - DIST12_TOL);
    }

    #[test]
    fn benzene_end_to_end() {
        let mol = benzene();
        let mat = bounds_for(&mol, &BoundsOptions::default());
        assert_well_formed(&mol, &mat);
        // para distance is pinned to the planar value within the cis
        // tolerance window
        assert!(mat.upper_bound(0, 3) - mat.lower_bound(0, 3) <= 0.12 + 1e-9);
    }

    #[test]
    fn hexafluoroethane_end_to_end() {
        // FC(F)(F)C(F)(F)F
        let mut mol = Molecule::new();
        mol.add_atom(Atom::new(Element::C, Hybridization::SP3));
        mol.add_atom(Atom::new(Element::C, Hybridization::SP3));
        mol.add_bond(0, 1, BondOrder::Single).unwrap();
        for c in [0usize, 1] {
            for _ in 0..3 {
                let f = mol.add_atom(Atom::new(Element::F, Hybridization::Other));
                mol.add_bond(c, f, BondOrder::Single).unwrap();
            }
        }
        let mat = bounds_for(&mol, &BoundsOptions::default());
        assert_well_formed(&mol, &mat);
        // every F pair carries both finite bounds or a vdw floor
        for i in 2..8 {
            for j in 2..i {
                assert!(mat.lower_bound(i, j) > DIST12_TOL);
            }
        }
    }

    #[test]
    fn dimethyl_disulfide_end_to_end() {
        let mut mol = Molecule::new();
        mol.add_atom(Atom::new(Element::C, Hybridization::SP3));
        mol.add_atom(Atom::new(Element::S, Hybridization::SP3));
        mol.add_atom(Atom::new(Element::S, Hybridization::SP3));
        mol.add_atom(Atom::new(Element::C, Hybridization::SP3));
        for i in 1..4 {
            mol.add_bond(i - 1, i, BondOrder::Single).unwrap();
        }
        let mat = bounds_for(&mol, &BoundsOptions::default());
        assert_well_formed(&mol, &mat);
        let width = mat.upper_bound(0, 3) - mat.lower_bound(0, 3);
        assert!((width - 0.12).abs() < 1e-9);
        let bl_cs = 0.757 + 1.064
            - 0.757 * 1.064 * (5.343_f64.sqrt() - 6.928_f64.sqrt()).powi(2)
                / (5.343 * 0.757 + 6.928 * 1.064);
        let bl_ss = 2.0 * 1.064;
        let expected = compute_14_dist_3d(bl_cs, bl_ss, bl_cs, TET, TET, PI / 2.0);
        let mid = (mat.lower_bound(0, 3) + mat.upper_bound(0, 3)) / 2.0;
        assert!((mid - expected).abs() < 1e-6);
    }

    #[test]
    fn running_twice_is_idempotent() {
        let mol = benzene();
        let mut mat = fresh_matrix(&mol);
        let options = BoundsOptions::default();
        set_topol_bounds(&mol, &mut mat, &options).unwrap();
        let first = mat.clone();
        set_topol_bounds(&mol, &mut mat, &options).unwrap();
        assert_eq!(first, mat);
    }

    #[test]
    fn skipping_set15_leaves_15_pairs_to_vdw() {
        let mol = carbon_chain(5);
        let with15 = bounds_for(&mol, &BoundsOptions::default());
        let without15 = bounds_for(
            &mol,
            &BoundsOptions {
                set15: false,
                ..Default::default()
            },
        );
        // both give the scaled vdw floor here (the 1-5 walk of pentane is
        // unpinned), and neither writes an upper bound
        let floor = VDW_SCALE_15 * 2.0 * Element::C.rvdw();
        assert!((with15.lower_bound(0, 4) - floor).abs() < 1e-9);
        assert!((without15.lower_bound(0, 4) - floor).abs() < 1e-9);
        assert!(without15.upper_bound(0, 4) >= MAX_UPPER);
    }

    #[test]
    fn macrocycle_option_changes_ring_bounds() {
        // 9-ring lactam: the amide triple gets the trans pin plus slack
        // only under the macrocycle rules
        let mut mol = Molecule::new();
        mol.add_atom(Atom::new(Element::N, Hybridization::SP2));
        mol.add_atom(Atom::new(Element::C, Hybridization::SP2));
        for _ in 2..9 {
            mol.add_atom(Atom::new(Element::C, Hybridization::SP3).with_implicit_hs(2));
        }
        for i in 0..9 {
            mol.add_bond(i, (i + 1) % 9, BondOrder::Single).unwrap();
        }
        let o = mol.add_atom(Atom::new(Element::O, Hybridization::SP2));
        mol.add_bond(1, o, BondOrder::Double).unwrap();
        let h = mol.add_atom(Atom::new(Element::H, Hybridization::Other));
        mol.add_bond(0, h, BondOrder::Single).unwrap();

        let plain = bounds_for(&mol, &BoundsOptions::default());
        let macro14 = bounds_for(
            &mol,
            &BoundsOptions {
                use_macrocycle14: true,
                ..Default::default()
            },
        );
        assert_well_formed(&mol, &plain);
        assert_well_formed(&mol, &macro14);
        // the in-ring amide 1-4 pair (8, 2) narrows to the trans pin
        let plain_width = plain.upper_bound(8, 2) - plain.lower_bound(8, 2);
        let macro_width = macro14.upper_bound(8, 2) - macro14.lower_bound(8, 2);
        assert!(macro_width < plain_width);
        assert!((macro_width - 0.12).abs() < 1e-9);
        assert!(macro14.upper_bound(8, 2) > plain.upper_bound(8, 2));
    }

    #[test]
    fn collect_topology_records() {
        // 2-butyne: CH3-C#C-CH3
        let mut mol = Molecule::new();
        mol.add_atom(Atom::new(Element::C, Hybridization::SP3));
        mol.add_atom(Atom::new(Element::C, Hybridization::SP));
        mol.add_atom(Atom::new(Element::C, Hybridization::SP));
        mol.add_atom(Atom::new(Element::C, Hybridization::SP3));
        mol.add_bond(0, 1, BondOrder::Single).unwrap();
        mol.add_bond(1, 2, BondOrder::Triple).unwrap();
        mol.add_bond(2, 3, BondOrder::Single).unwrap();

        let (bonds, angles) = collect_bonds_and_angles(&mol);
        assert_eq!(bonds, vec![(0, 1), (1, 2), (2, 3)]);
        assert_eq!(angles.len(), 2);
        for rec in &angles {
            assert!(rec.linear, "angles at a triple bond are linear");
        }
        assert!(angles.contains(&AngleRecord {
            a1: 0,
            a2: 1,
            a3: 2,
            linear: true
        }));
    }

    #[test]
    fn cumulated_double_bonds_flag_linear() {
        // butatriene backbone
        let mut mol = Molecule::new();
        mol.add_atom(Atom::new(Element::C, Hybridization::SP2));
        mol.add_atom(Atom::new(Element::C, Hybridization::SP));
        mol.add_atom(Atom::new(Element::C, Hybridization::SP));
        mol.add_atom(Atom::new(Element::C, Hybridization::SP2));
        for i in 1..4 {
            mol.add_bond(i - 1, i, BondOrder::Double).unwrap();
        }
        let (_, angles) = collect_bonds_and_angles(&mol);
        assert!(angles.iter().all(|rec| rec.linear));
    }

    #[test]
    fn single_bond_angles_are_not_linear() {
        let mol = carbon_chain(3);
        let (_, angles) = collect_bonds_and_angles(&mol);
        assert_eq!(angles.len(), 1);
        assert!(!angles[0].linear);
    }

    #[test]
    fn with_topology_entry_point() {
        let mol = carbon_chain(4);
        let mut mat = fresh_matrix(&mol);
        let (bonds, angles) =
            set_topol_bounds_with_topology(&mol, &mut mat, &BoundsOptions::default()).unwrap();
        assert_eq!(bonds.len(), 3);
        assert_eq!(angles.len(), 2);
        assert_well_formed(&mol, &mat);
    }

    #[test]
    fn custom_parameters_flow_through() {
        let mol = carbon_chain(2);
        let options = BoundsOptions {
            params: Some(
                "[atoms.C_3]\nr1 = 0.9\nchi = 5.343\n".to_string(),
            ),
            ..Default::default()
        };
        let mat = bounds_for(&mol, &options);
        let mid = (mat.lower_bound(0, 1) + mat.upper_bound(0, 1)) / 2.0;
        assert!((mid - 1.8).abs() < 1e-9);
    }

    #[test]
    fn bad_custom_parameters_error() {
        let mol = carbon_chain(2);
        let mut mat = fresh_matrix(&mol);
        let options = BoundsOptions {
            params: Some("not [[ valid".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            set_topol_bounds(&mol, &mut mat, &options),
            Err(Error::ParameterParse(_))
        ));
    }
}
