mod bounds;
mod model;

pub use model::atom::Atom;
pub use model::molecule::{Bond, InvalidBondError, Molecule};
pub use model::rings::RingInfo;
pub use model::types::{AtomGeometry, BondOrder, BondStereo, Element, Hybridization};

pub use bounds::geometry;
pub use bounds::{
    collect_bonds_and_angles, init_bounds_mat, set_topol_bounds, set_topol_bounds_with_topology,
    AngleRecord, AtomTypeParams, BoundsMatrix, BoundsOptions, GlobalParams, StretchParams,
};

pub use bounds::Error as BoundsError;
