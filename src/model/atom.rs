use super::types::{AtomGeometry, Element, Hybridization};

#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    pub element: Element,
    pub hybridization: Hybridization,
    /// Hydrogens not present as explicit neighbor atoms.
    pub implicit_hs: u8,
    pub geometry: AtomGeometry,
    /// Site permutation for `geometry`; ligands occupy the canonical sites
    /// rotated by this offset.
    pub geometry_permutation: Option<u8>,
}

impl Atom {
    pub fn new(element: Element, hybridization: Hybridization) -> Self {
        Self {
            element,
            hybridization,
            implicit_hs: 0,
            geometry: AtomGeometry::None,
            geometry_permutation: None,
        }
    }

    pub fn with_implicit_hs(mut self, n: u8) -> Self {
        self.implicit_hs = n;
        self
    }

    pub fn with_geometry(mut self, geometry: AtomGeometry) -> Self {
        self.geometry = geometry;
        self
    }

    pub fn with_geometry_permutation(mut self, permutation: u8) -> Self {
        self.geometry_permutation = Some(permutation);
        self
    }

    #[inline]
    pub fn atomic_number(&self) -> u8 {
        self.element.atomic_number()
    }

    /// True for centers carrying an explicit non-tetrahedral geometry
    /// (square planar, trigonal bipyramidal, octahedral).
    #[inline]
    pub fn has_non_tetrahedral_stereo(&self) -> bool {
        self.geometry != AtomGeometry::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let a = Atom::new(Element::C, Hybridization::SP3);
        assert_eq!(a.implicit_hs, 0);
        assert_eq!(a.geometry, AtomGeometry::None);
        assert!(!a.has_non_tetrahedral_stereo());
    }

    #[test]
    fn builder_helpers() {
        let a = Atom::new(Element::Pt, Hybridization::Other)
            .with_geometry(AtomGeometry::SquarePlanar)
            .with_geometry_permutation(1)
            .with_implicit_hs(0);
        assert!(a.has_non_tetrahedral_stereo());
        assert_eq!(a.geometry_permutation, Some(1));
    }
}
