//! Molecular graph data structures consumed by the bounds pipeline.
//!
//! - [`types`] – Periodic table elements, bond orders, hybridizations and
//!   stereo descriptors.
//! - [`atom`] – Per-atom record: element, hybridization, implicit hydrogens,
//!   coordination geometry.
//! - [`molecule`] – The molecular graph with adjacency lists and the two
//!   lazily-filled caches (ring perception, path-length-in-bonds matrix).
//! - [`rings`] – Smallest-set-of-smallest-rings perception with atom-ring
//!   and bond-ring views.
//!
//! The graph is read-only from the perspective of the bounds pipeline: it
//! borrows the molecule, fills its own accumulator, and writes only into
//! the caller's bounds matrix.

pub mod atom;
pub mod molecule;
pub mod rings;
pub mod types;
