use super::error::Error;
use super::{DIST12_TOL, MAX_UPPER};

/// Symmetric pair-distance bounds for N points, packed into one N x N
/// table: the upper triangle holds upper bounds, the lower triangle holds
/// lower bounds. Freshly constructed matrices are zero-filled; use
/// [`crate::bounds::init_bounds_mat`] to install the unset sentinels.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundsMatrix {
    n: usize,
    data: Vec<f64>,
}

impl BoundsMatrix {
    pub fn new(n: usize) -> Self {
        Self {
            n,
            data: vec![0.0; n * n],
        }
    }

    #[inline]
    pub fn num_rows(&self) -> usize {
        self.n
    }

    #[inline]
    pub fn upper_bound(&self, i: usize, j: usize) -> f64 {
        debug_assert!(i != j);
        let (lo, hi) = if i < j { (i, j) } else { (j, i) };
        self.data[lo * self.n + hi]
    }

    #[inline]
    pub fn lower_bound(&self, i: usize, j: usize) -> f64 {
        debug_assert!(i != j);
        let (lo, hi) = if i < j { (i, j) } else { (j, i) };
        self.data[hi * self.n + lo]
    }

    #[inline]
    pub fn set_upper_bound(&mut self, i: usize, j: usize, value: f64) {
        debug_assert!(i != j);
        let (lo, hi) = if i < j { (i, j) } else { (j, i) };
        self.data[lo * self.n + hi] = value;
    }

    #[inline]
    pub fn set_lower_bound(&mut self, i: usize, j: usize, value: f64) {
        debug_assert!(i != j);
        let (lo, hi) = if i < j { (i, j) } else { (j, i) };
        self.data[hi * self.n + lo] = value;
    }

    /// The single entry point for bound updates after initialization.
    /// The first write installs the pair; later writes only tighten:
    /// the lower bound never decreases and the upper bound never
    /// increases. An entry counts as unset while its lower bound is at
    /// most [`DIST12_TOL`] (lower) or at least [`MAX_UPPER`] (upper).
    pub fn check_and_set(&mut self, i: usize, j: usize, lb: f64, ub: f64) -> Result<(), Error> {
        let clb = self.lower_bound(i, j);
        let cub = self.upper_bound(i, j);

        if ub <= lb {
            return Err(Error::BoundInversion {
                i,
                j,
                lower: lb,
                upper: ub,
            });
        }
        if lb <= DIST12_TOL && clb <= DIST12_TOL {
            return Err(Error::BadLowerBound { i, j });
        }

        if clb <= DIST12_TOL || (lb > clb && lb > DIST12_TOL) {
            self.set_lower_bound(i, j, lb);
        }
        if cub >= MAX_UPPER || (ub < cub && ub < MAX_UPPER) {
            self.set_upper_bound(i, j, ub);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounds::init_bounds_mat;

    fn fresh(n: usize) -> BoundsMatrix {
        let mut mat = BoundsMatrix::new(n);
        init_bounds_mat(&mut mat, 0.0, MAX_UPPER);
        mat
    }

    #[test]
    fn triangles_are_independent_and_symmetric() {
        let mut mat = fresh(3);
        mat.set_lower_bound(2, 0, 1.0);
        mat.set_upper_bound(0, 2, 4.0);
        assert_eq!(mat.lower_bound(0, 2), 1.0);
        assert_eq!(mat.lower_bound(2, 0), 1.0);
        assert_eq!(mat.upper_bound(2, 0), 4.0);
        assert_eq!(mat.lower_bound(0, 1), 0.0);
    }

    #[test]
    fn first_write_installs() {
        let mut mat = fresh(2);
        mat.check_and_set(0, 1, 1.5, 2.5).unwrap();
        assert_eq!(mat.lower_bound(0, 1), 1.5);
        assert_eq!(mat.upper_bound(0, 1), 2.5);
    }

    #[test]
    fn later_writes_only_tighten() {
        let mut mat = fresh(2);
        mat.check_and_set(0, 1, 1.5, 2.5).unwrap();
        // looser bounds are ignored
        mat.check_and_set(0, 1, 1.0, 3.0).unwrap();
        assert_eq!(mat.lower_bound(0, 1), 1.5);
        assert_eq!(mat.upper_bound(0, 1), 2.5);
        // tighter bounds stick
        mat.check_and_set(0, 1, 1.8, 2.2).unwrap();
        assert_eq!(mat.lower_bound(0, 1), 1.8);
        assert_eq!(mat.upper_bound(0, 1), 2.2);
    }

    #[test]
    fn rejects_inverted_bounds() {
        let mut mat = fresh(2);
        assert!(matches!(
            mat.check_and_set(0, 1, 2.0, 1.0),
            Err(Error::BoundInversion { .. })
        ));
    }

    #[test]
    fn rejects_unusable_lower_bound() {
        let mut mat = fresh(2);
        assert!(matches!(
            mat.check_and_set(0, 1, 0.0, 1.0),
            Err(Error::BadLowerBound { .. })
        ));
        // fine once a real lower bound exists
        mat.check_and_set(0, 1, 1.0, 2.0).unwrap();
        mat.check_and_set(0, 1, 0.005, 1.8).unwrap();
        assert_eq!(mat.lower_bound(0, 1), 1.0);
        assert_eq!(mat.upper_bound(0, 1), 1.8);
    }
}
