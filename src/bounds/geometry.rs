//! Distance formulas for short topological paths: law-of-cosines 1-3
//! distances, planar and out-of-plane 1-4 distances, and 1-5 distances
//! composed from two adjacent planar torsions.

/// Distance across a bond angle: `sqrt(d1^2 + d2^2 - 2 d1 d2 cos angle)`.
pub fn compute_13_dist(d1: f64, d2: f64, angle: f64) -> f64 {
    (d1 * d1 + d2 * d2 - 2.0 * d1 * d2 * angle.cos()).sqrt()
}

/// 1-4 distance at torsion 0 (syn-planar).
pub fn compute_14_dist_cis(d1: f64, d2: f64, d3: f64, ang12: f64, ang23: f64) -> f64 {
    let dx = d2 - d3 * ang23.cos() - d1 * ang12.cos();
    let dy = d3 * ang23.sin() - d1 * ang12.sin();
    (dx * dx + dy * dy).sqrt()
}

/// 1-4 distance at torsion pi (anti-planar).
pub fn compute_14_dist_trans(d1: f64, d2: f64, d3: f64, ang12: f64, ang23: f64) -> f64 {
    let dx = d2 - d3 * ang23.cos() - d1 * ang12.cos();
    let dy = d3 * ang23.sin() + d1 * ang12.sin();
    (dx * dx + dy * dy).sqrt()
}

/// 1-4 distance at an arbitrary torsion around the middle bond.
pub fn compute_14_dist_3d(
    d1: f64,
    d2: f64,
    d3: f64,
    ang12: f64,
    ang23: f64,
    torsion: f64,
) -> f64 {
    let dx = d2 - d3 * ang23.cos() - d1 * ang12.cos();
    let dy = d3 * ang23.sin() * torsion.cos() - d1 * ang12.sin();
    let dz = d3 * ang23.sin() * torsion.sin();
    (dx * dx + dy * dy + dz * dz).sqrt()
}

/// Shared construction for the four planar 1-5 composites: build the 1-4
/// vector for the first torsion, recover the 1-4-3 angle, then apply the
/// law of cosines across the 3-4-5 angle opened (second torsion trans) or
/// closed (second torsion cis) by it.
fn compose_15(
    d1: f64,
    d2: f64,
    d3: f64,
    d4: f64,
    ang12: f64,
    ang23: f64,
    ang34: f64,
    first_cis: bool,
    second_cis: bool,
) -> f64 {
    let dx14 = d2 - d3 * ang23.cos() - d1 * ang12.cos();
    let dy14 = if first_cis {
        d3 * ang23.sin() - d1 * ang12.sin()
    } else {
        d3 * ang23.sin() + d1 * ang12.sin()
    };
    let d14 = (dx14 * dx14 + dy14 * dy14).sqrt();
    let folded = if first_cis {
        (ang12 + ang23).cos()
    } else {
        (ang12 - ang23).cos()
    };
    let cval = ((d3 - d2 * ang23.cos() + d1 * folded) / d14).clamp(-1.0, 1.0);
    let ang143 = cval.acos();
    let ang145 = if second_cis {
        ang34 - ang143
    } else {
        ang34 + ang143
    };
    compute_13_dist(d14, d4, ang145)
}

/// 1-5 distance with both torsions at 0.
pub fn compute_15_dists_cis_cis(
    d1: f64,
    d2: f64,
    d3: f64,
    d4: f64,
    ang12: f64,
    ang23: f64,
    ang34: f64,
) -> f64 {
    compose_15(d1, d2, d3, d4, ang12, ang23, ang34, true, true)
}

/// 1-5 distance with the first torsion at 0 and the second at pi.
pub fn compute_15_dists_cis_trans(
    d1: f64,
    d2: f64,
    d3: f64,
    d4: f64,
    ang12: f64,
    ang23: f64,
    ang34: f64,
) -> f64 {
    compose_15(d1, d2, d3, d4, ang12, ang23, ang34, true, false)
}

/// 1-5 distance with the first torsion at pi and the second at 0.
pub fn compute_15_dists_trans_cis(
    d1: f64,
    d2: f64,
    d3: f64,
    d4: f64,
    ang12: f64,
    ang23: f64,
    ang34: f64,
) -> f64 {
    compose_15(d1, d2, d3, d4, ang12, ang23, ang34, false, true)
}

/// 1-5 distance with both torsions at pi.
pub fn compute_15_dists_trans_trans(
    d1: f64,
    d2: f64,
    d3: f64,
    d4: f64,
    ang12: f64,
    ang23: f64,
    ang34: f64,
) -> f64 {
    compose_15(d1, d2, d3, d4, ang12, ang23, ang34, false, false)
}
