use std::collections::HashMap;
use std::sync::OnceLock;

use serde::Deserialize;

use super::error::Error;
use crate::model::molecule::Molecule;
use crate::model::types::{BondOrder, Element, Hybridization};

const DEFAULT_PARAMS_TOML: &str = include_str!("../../resources/default.params.toml");

static DEFAULT_PARAMS: OnceLock<StretchParams> = OnceLock::new();

/// Bond-stretch parameter table: a natural bond radius and a GMP
/// electronegativity per atom type.
#[derive(Debug, Clone, Deserialize)]
pub struct StretchParams {
    #[serde(default)]
    pub global: GlobalParams,
    #[serde(default)]
    pub atoms: HashMap<String, AtomTypeParams>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GlobalParams {
    /// Pauling-style bond order correction factor.
    #[serde(default = "default_lambda")]
    pub lambda: f64,
}

fn default_lambda() -> f64 {
    0.1332
}

impl Default for GlobalParams {
    fn default() -> Self {
        Self {
            lambda: default_lambda(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct AtomTypeParams {
    /// Natural bond radius in angstroms.
    pub r1: f64,
    /// GMP electronegativity.
    pub chi: f64,
}

pub fn load_parameters(custom_toml: Option<&str>) -> Result<&'static StretchParams, Error> {
    match custom_toml {
        Some(toml) => {
            let params: StretchParams = toml::from_str(toml)?;
            Ok(Box::leak(Box::new(params)))
        }
        None => Ok(default_parameters()),
    }
}

pub fn default_parameters() -> &'static StretchParams {
    DEFAULT_PARAMS.get_or_init(|| {
        toml::from_str(DEFAULT_PARAMS_TOML)
            .expect("Failed to parse embedded default parameters. This is a library bug.")
    })
}

/// Type key for the parameter table. Monovalent elements use their bare
/// symbol; everything else is suffixed by aromaticity or hybridization.
fn atom_type_name(element: Element, hybridization: Hybridization, aromatic: bool) -> String {
    match element {
        Element::H | Element::F | Element::Cl | Element::Br | Element::I | Element::At => {
            element.symbol().to_string()
        }
        _ => {
            let suffix = if aromatic {
                "R"
            } else {
                match hybridization {
                    Hybridization::SP => "1",
                    Hybridization::SP2 => "2",
                    Hybridization::SP3 => "3",
                    Hybridization::SP3D => "5",
                    Hybridization::SP3D2 => "6",
                    Hybridization::Other => "0",
                }
            };
            format!("{}_{}", element.symbol(), suffix)
        }
    }
}

/// Looks up stretch parameters for every atom. The second return value is
/// false when at least one atom has no table entry; bounds for its bonds
/// fall back to crude van-der-Waals estimates.
pub fn get_atom_types(
    mol: &Molecule,
    params: &StretchParams,
) -> (Vec<Option<AtomTypeParams>>, bool) {
    let mut found_all = true;
    let types = (0..mol.num_atoms())
        .map(|aid| {
            let aromatic = mol
                .atom_bonds(aid)
                .iter()
                .any(|&(_, bid)| mol.bond(bid).order == BondOrder::Aromatic);
            let atom = mol.atom(aid);
            let key = atom_type_name(atom.element, atom.hybridization, aromatic);
            let entry = params.atoms.get(&key).copied();
            found_all &= entry.is_some();
            entry
        })
        .collect();
    (types, found_all)
}

/// Natural rest length for a bond: sum of the radii, shortened by the
/// bond-order term and the electronegativity correction.
pub fn rest_bond_length(
    order: f64,
    p1: &AtomTypeParams,
    p2: &AtomTypeParams,
    lambda: f64,
) -> f64 {
    let r12 = p1.r1 + p2.r1;
    let r_bo = -lambda * r12 * order.ln();
    let sq = p1.chi.sqrt() - p2.chi.sqrt();
    let r_en = p1.r1 * p2.r1 * sq * sq / (p1.chi * p1.r1 + p2.chi * p2.r1);
    r12 + r_bo - r_en
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::atom::Atom;

    fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() <= eps
    }

    #[test]
    fn default_table_parses() {
        let params = default_parameters();
        assert!(approx_eq(params.global.lambda, 0.1332, 1e-12));
        assert!(params.atoms.contains_key("C_3"));
        assert!(params.atoms.contains_key("H"));
    }

    #[test]
    fn custom_table_overrides() {
        let custom = r#"
            [atoms.C_3]
            r1 = 0.8
            chi = 5.0
        "#;
        let params = load_parameters(Some(custom)).unwrap();
        assert!(approx_eq(params.atoms["C_3"].r1, 0.8, 1e-12));
        assert!(approx_eq(params.global.lambda, 0.1332, 1e-12));
    }

    #[test]
    fn invalid_custom_table_errors() {
        let result = load_parameters(Some("not valid [[[ toml"));
        assert!(matches!(result, Err(Error::ParameterParse(_))));
    }

    #[test]
    fn cc_single_bond_rest_length() {
        let params = default_parameters();
        let c3 = params.atoms["C_3"];
        let bl = rest_bond_length(1.0, &c3, &c3, params.global.lambda);
        // identical electronegativities, no bond order shortening
        assert!(approx_eq(bl, 2.0 * c3.r1, 1e-12));
    }

    #[test]
    fn higher_order_bonds_are_shorter() {
        let params = default_parameters();
        let c2 = params.atoms["C_2"];
        let single = rest_bond_length(1.0, &c2, &c2, params.global.lambda);
        let double = rest_bond_length(2.0, &c2, &c2, params.global.lambda);
        assert!(double < single);
    }

    #[test]
    fn electronegativity_correction_shortens() {
        let params = default_parameters();
        let c3 = params.atoms["C_3"];
        let o3 = params.atoms["O_3"];
        let bl = rest_bond_length(1.0, &c3, &o3, params.global.lambda);
        assert!(bl < c3.r1 + o3.r1);
    }

    #[test]
    fn atom_typing_by_hybridization_and_aromaticity() {
        let mut mol = Molecule::new();
        for _ in 0..6 {
            mol.add_atom(Atom::new(Element::C, Hybridization::SP2));
        }
        for i in 0..6 {
            mol.add_bond(i, (i + 1) % 6, BondOrder::Aromatic).unwrap();
        }
        let params = default_parameters();
        let (types, found_all) = get_atom_types(&mol, params);
        assert!(found_all);
        assert!(approx_eq(types[0].unwrap().r1, params.atoms["C_R"].r1, 1e-12));
    }

    #[test]
    fn unknown_elements_report_missing() {
        let mut mol = Molecule::new();
        mol.add_atom(Atom::new(Element::C, Hybridization::SP3));
        mol.add_atom(Atom::new(Element::Xe, Hybridization::Other));
        mol.add_bond(0, 1, BondOrder::Single).unwrap();
        let (types, found_all) = get_atom_types(&mol, default_parameters());
        assert!(!found_all);
        assert!(types[0].is_some());
        assert!(types[1].is_none());
    }
}
