use std::collections::HashSet;
use std::f64::consts::PI;

use super::accum::{Accumulator, Path14, Path14Kind};
use super::error::Error;
use super::geometry::{compute_14_dist_3d, compute_14_dist_cis, compute_14_dist_trans};
use super::matrix::BoundsMatrix;
use super::{BoundsOptions, DIST12_TOL, GEN_DIST_TOL, MIN_MACROCYCLE_RING_SIZE};
use crate::model::molecule::{Bond, Molecule};
use crate::model::types::{BondOrder, BondStereo, Element, Hybridization};

/// Slack added on top of the trans distance for amides inside macrocycle
/// rings; the plain trans maximum samples too tightly there.
const MACROCYCLE_AMIDE_SLACK: f64 = 0.1;

/// Everything the per-path rules need about a three-bond path, pulled from
/// the accumulator filled by the earlier passes.
struct PathContext {
    aid1: usize,
    aid2: usize,
    aid3: usize,
    aid4: usize,
    cis: f64,
    trans: f64,
    bl: [f64; 3],
    ba12: f64,
    ba23: f64,
}

fn path_context(
    mol: &Molecule,
    accum: &Accumulator,
    bid1: usize,
    bid2: usize,
    bid3: usize,
) -> Result<PathContext, Error> {
    let aid2 = accum
        .bond_adjacency
        .get(bid1, bid2)
        .ok_or_else(|| Error::inconsistent(format!("bonds {bid1} and {bid2} share no atom")))?;
    let aid3 = accum
        .bond_adjacency
        .get(bid2, bid3)
        .ok_or_else(|| Error::inconsistent(format!("bonds {bid2} and {bid3} share no atom")))?;
    let aid1 = mol.bond(bid1).other_atom(aid2);
    let aid4 = mol.bond(bid3).other_atom(aid3);
    let bl = [
        accum.bond_lengths[bid1],
        accum.bond_lengths[bid2],
        accum.bond_lengths[bid3],
    ];
    let ba12 = accum
        .bond_angles
        .get(bid1, bid2)
        .ok_or_else(|| Error::inconsistent(format!("no angle for bonds {bid1}, {bid2}")))?;
    let ba23 = accum
        .bond_angles
        .get(bid2, bid3)
        .ok_or_else(|| Error::inconsistent(format!("no angle for bonds {bid2}, {bid3}")))?;
    Ok(PathContext {
        aid1,
        aid2,
        aid3,
        aid4,
        cis: compute_14_dist_cis(bl[0], bl[1], bl[2], ba12, ba23),
        trans: compute_14_dist_trans(bl[0], bl[1], bl[2], ba12, ba23),
        bl,
        ba12,
        ba23,
    })
}

/// Terminal atoms closer than three bonds are not a true 1-4 contact
/// (small fused rings produce such paths).
fn too_close_for_14(mol: &Molecule, a: usize, b: usize) -> bool {
    mol.bonds_distance(a.max(b), a.min(b)) < 3
}

/// Stereo of the middle bond as seen from the path ends: flips when the
/// stored anchor atoms disagree with the observed terminals on exactly
/// one side.
fn effective_stereo(bond: &Bond, aid1: usize, aid4: usize) -> BondStereo {
    let stype = bond.stereo;
    if stype.is_definite() {
        if let Some((s1, s2)) = bond.stereo_atoms {
            if (s1 != aid1) ^ (s2 != aid4) {
                return stype.flipped();
            }
        }
    }
    stype
}

fn write_path(
    mat: &mut BoundsMatrix,
    accum: &mut Accumulator,
    ctx: &PathContext,
    bid1: usize,
    bid2: usize,
    bid3: usize,
    dl: f64,
    du: f64,
    kind: Path14Kind,
) -> Result<(), Error> {
    mat.check_and_set(ctx.aid1, ctx.aid4, dl, du)?;
    accum.paths14.push(Path14 {
        bid1,
        bid2,
        bid3,
        kind,
    });
    Ok(())
}

/// Widen near-degenerate brackets so the writer always sees `du > dl`.
fn spread_if_flat(dl: &mut f64, du: &mut f64) {
    if (*du - *dl).abs() < DIST12_TOL {
        *dl -= GEN_DIST_TOL;
        *du += GEN_DIST_TOL;
    }
}

/// All three bonds lie in one ring of `ring_size` atoms (`ring_size` 0
/// means the rule is reused for paths spanning different rings, which
/// disables the small-ring cis preference).
fn set_in_ring_14(
    mol: &Molecule,
    bid1: usize,
    bid2: usize,
    bid3: usize,
    accum: &mut Accumulator,
    mat: &mut BoundsMatrix,
    ring_size: usize,
) -> Result<(), Error> {
    let ctx = path_context(mol, accum, bid1, bid2, bid3)?;
    if too_close_for_14(mol, ctx.aid1, ctx.aid4) {
        return Ok(());
    }
    let ahyb2 = mol.atom(ctx.aid2).hybridization;
    let ahyb3 = mol.atom(ctx.aid3).hybridization;
    let stype = effective_stereo(mol.bond(bid2), ctx.aid1, ctx.aid4);
    let rinfo = mol.ring_info();

    let mut prefer_cis = false;
    let mut prefer_trans = false;
    if ring_size != 0
        && ring_size <= 8
        && ahyb2 == Hybridization::SP2
        && ahyb3 == Hybridization::SP2
        && stype != BondStereo::E
        && stype != BondStereo::Trans
    {
        // nothing suggests cis in bigger rings; and when the middle bond
        // is fused the planar face is the single ring carrying both outer
        // bonds, if there is one
        if rinfo.num_bond_rings(bid2) > 1 {
            if rinfo.num_bond_rings(bid1) == 1 && rinfo.num_bond_rings(bid3) == 1 {
                for ring in rinfo.bond_rings() {
                    if ring.contains(&bid1) {
                        if ring.contains(&bid3) {
                            prefer_cis = true;
                        }
                        break;
                    }
                }
            }
        } else {
            prefer_cis = true;
        }
    } else if stype == BondStereo::Z || stype == BondStereo::Cis {
        prefer_cis = true;
    } else if stype == BondStereo::E || stype == BondStereo::Trans {
        prefer_trans = true;
    }

    let (dl, du, kind) = if prefer_cis {
        accum.record_cis(bid1, bid2, bid3);
        let dl = ctx.cis - GEN_DIST_TOL;
        (dl, dl + 2.0 * GEN_DIST_TOL, Path14Kind::Cis)
    } else if prefer_trans {
        accum.record_trans(bid1, bid2, bid3);
        let dl = ctx.trans - GEN_DIST_TOL;
        (dl, dl + 2.0 * GEN_DIST_TOL, Path14Kind::Trans)
    } else {
        let (mut dl, mut du) = (ctx.cis, ctx.trans);
        if du < dl {
            std::mem::swap(&mut dl, &mut du);
        }
        spread_if_flat(&mut dl, &mut du);
        (dl, du, Path14Kind::Other)
    };
    write_path(mat, accum, &ctx, bid1, bid2, bid3, dl, du, kind)
}

/// The two halves of the path share a ring through one of the bond pairs.
fn set_two_in_same_ring_14(
    mol: &Molecule,
    bid1: usize,
    bid2: usize,
    bid3: usize,
    accum: &mut Accumulator,
    mat: &mut BoundsMatrix,
) -> Result<(), Error> {
    let ctx = path_context(mol, accum, bid1, bid2, bid3)?;
    if too_close_for_14(mol, ctx.aid1, ctx.aid4) {
        return Ok(());
    }
    // fused rings can fold the path back onto a direct bond
    if mol.bond_between(ctx.aid1, ctx.aid3).is_some()
        || mol.bond_between(ctx.aid4, ctx.aid2).is_some()
    {
        return Ok(());
    }

    let sp2_pair = mol.atom(ctx.aid2).hybridization == Hybridization::SP2
        && mol.atom(ctx.aid3).hybridization == Hybridization::SP2;
    let (dl, du, kind) = if sp2_pair {
        // flat ring with an external substituent
        accum.record_trans(bid1, bid2, bid3);
        (
            ctx.trans - GEN_DIST_TOL,
            ctx.trans + GEN_DIST_TOL,
            Path14Kind::Trans,
        )
    } else {
        let (mut dl, mut du) = (ctx.cis, ctx.trans);
        // in highly strained situations these can get mixed up
        if du < dl {
            std::mem::swap(&mut dl, &mut du);
        }
        spread_if_flat(&mut dl, &mut du);
        (dl, du, Path14Kind::Other)
    };
    write_path(mat, accum, &ctx, bid1, bid2, bid3, dl, du, kind)
}

/// Amide/ester core: `atm2(O or NH)-atm3(C)=O|N` with the path entering
/// through a single bond.
fn is_amide_ester_14(
    mol: &Molecule,
    bid1: usize,
    bid3: usize,
    aid2: usize,
    aid3: usize,
    aid4: usize,
) -> bool {
    let a2 = mol.atom(aid2).element;
    mol.atom(aid3).element == Element::C
        && mol.bond(bid3).order == BondOrder::Double
        && matches!(mol.atom(aid4).element, Element::O | Element::N)
        && mol.bond(bid1).order == BondOrder::Single
        && (a2 == Element::O || (a2 == Element::N && mol.total_num_hs(aid2) == 1))
}

/// The 1-5 flavor: the path leaves the carbonyl carbon through its single
/// bonds, so atom 4 of the pattern sits one bond further.
fn is_amide_ester_15(mol: &Molecule, bid1: usize, bid3: usize, aid2: usize, aid3: usize) -> bool {
    let a2 = mol.atom(aid2).element;
    (a2 == Element::O || (a2 == Element::N && mol.total_num_hs(aid2) == 1))
        && mol.bond(bid1).order == BondOrder::Single
        && mol.atom(aid3).element == Element::C
        && mol.bond(bid3).order == BondOrder::Single
        && is_carbonyl(mol, aid3)
}

fn is_carbonyl(mol: &Molecule, aid: usize) -> bool {
    mol.atom(aid).element == Element::C
        && mol.degree(aid) > 2
        && mol.atom_bonds(aid).iter().any(|&(nbr, bid)| {
            matches!(mol.atom(nbr).element, Element::O | Element::N)
                && mol.bond(bid).order == BondOrder::Double
        })
}

/// The hydrogen of a secondary amide nitrogen.
fn is_secondary_amide_h(mol: &Molecule, aid_h: usize, aid_n: usize) -> bool {
    mol.atom(aid_h).element == Element::H
        && mol.atom(aid_n).element == Element::N
        && mol.degree(aid_n) == 3
        && mol.total_num_hs(aid_n) == 1
}

/// Middle bond is acyclic: cumulenes, stereo double bonds, disulfides,
/// amides/esters, and the plain cis-trans bracket.
fn set_chain_14(
    mol: &Molecule,
    bid1: usize,
    bid2: usize,
    bid3: usize,
    accum: &mut Accumulator,
    mat: &mut BoundsMatrix,
    force_trans_amides: bool,
) -> Result<(), Error> {
    let ctx = path_context(mol, accum, bid1, bid2, bid3)?;
    let mut dl: f64;
    let mut du: f64;
    let kind: Path14Kind;

    match mol.bond(bid2).order {
        BondOrder::Double => {
            if mol.bond(bid1).order == BondOrder::Double
                || mol.bond(bid3).order == BondOrder::Double
            {
                // cumulene CC=C=C, torsion pinned at zero
                accum.record_cis(bid1, bid2, bid3);
                dl = ctx.cis - GEN_DIST_TOL;
                du = dl + 2.0 * GEN_DIST_TOL;
                kind = Path14Kind::Cis;
            } else if mol.bond(bid2).stereo.is_definite() {
                match effective_stereo(mol.bond(bid2), ctx.aid1, ctx.aid4) {
                    BondStereo::Z | BondStereo::Cis => {
                        accum.record_cis(bid1, bid2, bid3);
                        dl = ctx.cis - GEN_DIST_TOL;
                        du = dl + 2.0 * GEN_DIST_TOL;
                        kind = Path14Kind::Cis;
                    }
                    _ => {
                        accum.record_trans(bid1, bid2, bid3);
                        dl = ctx.trans - GEN_DIST_TOL;
                        du = ctx.trans + GEN_DIST_TOL;
                        kind = Path14Kind::Trans;
                    }
                }
            } else {
                // unconstrained double bond can sit at 0 or 180
                dl = ctx.cis;
                du = ctx.trans;
                kind = Path14Kind::Other;
            }
        }
        BondOrder::Single => {
            if mol.atom(ctx.aid2).element == Element::S && mol.atom(ctx.aid3).element == Element::S
            {
                // disulfide dihedral sits near 90 degrees
                dl = compute_14_dist_3d(ctx.bl[0], ctx.bl[1], ctx.bl[2], ctx.ba12, ctx.ba23, PI / 2.0)
                    - GEN_DIST_TOL;
                du = dl + 2.0 * GEN_DIST_TOL;
                kind = Path14Kind::Other;
            } else if is_amide_ester_14(mol, bid1, bid3, ctx.aid2, ctx.aid3, ctx.aid4)
                || is_amide_ester_14(mol, bid3, bid1, ctx.aid3, ctx.aid2, ctx.aid1)
            {
                if force_trans_amides {
                    if is_secondary_amide_h(mol, ctx.aid1, ctx.aid2)
                        || is_secondary_amide_h(mol, ctx.aid4, ctx.aid3)
                    {
                        // the amide H sits trans to the carbonyl O
                        accum.record_trans(bid1, bid2, bid3);
                        dl = ctx.trans;
                        kind = Path14Kind::Trans;
                    } else {
                        accum.record_cis(bid1, bid2, bid3);
                        dl = ctx.cis;
                        kind = Path14Kind::Cis;
                    }
                    du = dl + GEN_DIST_TOL;
                    dl -= GEN_DIST_TOL;
                } else {
                    dl = ctx.cis;
                    du = ctx.trans;
                    kind = Path14Kind::Other;
                }
            } else if is_amide_ester_15(mol, bid1, bid3, ctx.aid2, ctx.aid3)
                || is_amide_ester_15(mol, bid3, bid1, ctx.aid3, ctx.aid2)
            {
                // the partner substituent of the carbonyl carbon, one bond
                // past the 1-4 pattern handled above
                if force_trans_amides {
                    if is_secondary_amide_h(mol, ctx.aid1, ctx.aid2)
                        || is_secondary_amide_h(mol, ctx.aid4, ctx.aid3)
                    {
                        accum.record_cis(bid1, bid2, bid3);
                        dl = ctx.cis;
                        kind = Path14Kind::Cis;
                    } else {
                        accum.record_trans(bid1, bid2, bid3);
                        dl = ctx.trans;
                        kind = Path14Kind::Trans;
                    }
                    du = dl + GEN_DIST_TOL;
                    dl -= GEN_DIST_TOL;
                } else {
                    dl = ctx.cis;
                    du = ctx.trans;
                    kind = Path14Kind::Other;
                }
            } else {
                dl = ctx.cis;
                du = ctx.trans;
                kind = Path14Kind::Other;
            }
        }
        _ => {
            dl = ctx.cis;
            du = ctx.trans;
            kind = Path14Kind::Other;
        }
    }

    spread_if_flat(&mut dl, &mut du);
    write_path(mat, accum, &ctx, bid1, bid2, bid3, dl, du, kind)
}

/// Ring triple too short to constrain (size <= 5): the ring's own 1-3
/// bounds pin the geometry, so only the path decision is recorded.
fn record_ring_path(
    mol: &Molecule,
    bid1: usize,
    bid2: usize,
    bid3: usize,
    accum: &mut Accumulator,
) -> Result<(), Error> {
    let aid2 = accum
        .bond_adjacency
        .get(bid1, bid2)
        .ok_or_else(|| Error::inconsistent(format!("bonds {bid1} and {bid2} share no atom")))?;
    let aid3 = accum
        .bond_adjacency
        .get(bid2, bid3)
        .ok_or_else(|| Error::inconsistent(format!("bonds {bid2} and {bid3} share no atom")))?;
    let kind = if mol.atom(aid2).hybridization == Hybridization::SP2
        && mol.atom(aid3).hybridization == Hybridization::SP2
    {
        accum.record_cis(bid1, bid2, bid3);
        Path14Kind::Cis
    } else {
        Path14Kind::Other
    };
    accum.paths14.push(Path14 {
        bid1,
        bid2,
        bid3,
        kind,
    });
    Ok(())
}

/// Macrocycle amide pattern with the whole path inside the ring. More
/// permissive than [`is_amide_ester_14`]: no hydrogen-count requirement on
/// the nitrogen, so methylated amides match too.
fn is_macro_all_ring_amide(
    mol: &Molecule,
    aid1: usize,
    aid2: usize,
    aid3: usize,
    aid4: usize,
) -> bool {
    let a2 = mol.atom(aid2).element;
    if mol.atom(aid3).element != Element::C {
        return false;
    }
    if !matches!(a2, Element::N | Element::O) {
        return false;
    }
    if mol.degree(aid2) != 3 || mol.degree(aid3) != 3 {
        return false;
    }
    // the remaining substituent on atom 2 must be a carbon or hydrogen on
    // a single bond (a plain or methylated amide)
    if let Some(&(nbr, bid)) = mol
        .atom_bonds(aid2)
        .iter()
        .find(|&&(nbr, _)| nbr != aid1 && nbr != aid3)
    {
        if !matches!(mol.atom(nbr).element, Element::C | Element::H)
            || mol.bond(bid).order != BondOrder::Single
        {
            return false;
        }
    }
    // and atom 3 must carry the carbonyl oxygen
    if let Some(&(nbr, bid)) = mol
        .atom_bonds(aid3)
        .iter()
        .find(|&&(nbr, _)| nbr != aid2 && nbr != aid4)
    {
        if mol.atom(nbr).element != Element::O || mol.bond(bid).order != BondOrder::Double {
            return false;
        }
    }
    true
}

/// Macrocycle amide pattern for paths with only two bonds in the ring:
/// like [`is_amide_ester_14`] but without the nitrogen hydrogen count, and
/// the entering atom must be a heavy atom.
fn is_macro_two_ring_amide(
    mol: &Molecule,
    bid1: usize,
    bid3: usize,
    aid1: usize,
    aid2: usize,
    aid3: usize,
    aid4: usize,
) -> bool {
    mol.atom(aid1).element != Element::H
        && mol.atom(aid3).element == Element::C
        && mol.bond(bid3).order == BondOrder::Double
        && matches!(mol.atom(aid4).element, Element::O | Element::N)
        && mol.bond(bid1).order == BondOrder::Single
        && matches!(mol.atom(aid2).element, Element::O | Element::N)
}

/// Chain rule variant for paths lying entirely inside a macrocycle ring:
/// ring amides are forced trans with extra slack.
fn set_macrocycle_all_in_same_ring_14(
    mol: &Molecule,
    bid1: usize,
    bid2: usize,
    bid3: usize,
    accum: &mut Accumulator,
    mat: &mut BoundsMatrix,
    trans_amide_15: bool,
) -> Result<(), Error> {
    let ctx = path_context(mol, accum, bid1, bid2, bid3)?;
    let mut dl: f64;
    let mut du: f64;
    let kind: Path14Kind;

    match mol.bond(bid2).order {
        BondOrder::Double => {
            if mol.bond(bid1).order == BondOrder::Double
                || mol.bond(bid3).order == BondOrder::Double
            {
                accum.record_cis(bid1, bid2, bid3);
                dl = ctx.cis - GEN_DIST_TOL;
                du = dl + 2.0 * GEN_DIST_TOL;
                kind = Path14Kind::Cis;
            } else if mol.bond(bid2).stereo.is_definite() {
                match effective_stereo(mol.bond(bid2), ctx.aid1, ctx.aid4) {
                    BondStereo::Z | BondStereo::Cis => {
                        accum.record_cis(bid1, bid2, bid3);
                        dl = ctx.cis - GEN_DIST_TOL;
                        du = dl + 2.0 * GEN_DIST_TOL;
                        kind = Path14Kind::Cis;
                    }
                    _ => {
                        accum.record_trans(bid1, bid2, bid3);
                        dl = ctx.trans - GEN_DIST_TOL;
                        du = ctx.trans + GEN_DIST_TOL;
                        kind = Path14Kind::Trans;
                    }
                }
            } else {
                dl = ctx.cis;
                du = ctx.trans;
                kind = Path14Kind::Other;
            }
        }
        BondOrder::Single => {
            if mol.atom(ctx.aid2).element == Element::S && mol.atom(ctx.aid3).element == Element::S
            {
                dl = compute_14_dist_3d(ctx.bl[0], ctx.bl[1], ctx.bl[2], ctx.ba12, ctx.ba23, PI / 2.0)
                    - GEN_DIST_TOL;
                du = dl + 2.0 * GEN_DIST_TOL;
                kind = Path14Kind::Other;
            } else if is_macro_all_ring_amide(mol, ctx.aid1, ctx.aid2, ctx.aid3, ctx.aid4)
                || is_macro_all_ring_amide(mol, ctx.aid4, ctx.aid3, ctx.aid2, ctx.aid1)
            {
                accum.record_trans(bid1, bid2, bid3);
                dl = ctx.trans + MACROCYCLE_AMIDE_SLACK;
                du = dl + GEN_DIST_TOL;
                dl -= GEN_DIST_TOL;
                kind = Path14Kind::Trans;
            } else if is_amide_ester_15(mol, bid1, bid3, ctx.aid2, ctx.aid3)
                || is_amide_ester_15(mol, bid3, bid1, ctx.aid3, ctx.aid2)
            {
                if trans_amide_15 {
                    // the amide itself is held trans, so this partner is cis
                    accum.record_cis(bid1, bid2, bid3);
                    dl = ctx.cis;
                    kind = Path14Kind::Cis;
                } else if is_secondary_amide_h(mol, ctx.aid1, ctx.aid2) {
                    // leave the amide hydrogen unconstrained here
                    return Ok(());
                } else {
                    accum.record_trans(bid1, bid2, bid3);
                    dl = ctx.trans;
                    kind = Path14Kind::Trans;
                }
                du = dl + GEN_DIST_TOL;
                dl -= GEN_DIST_TOL;
            } else {
                dl = ctx.cis;
                du = ctx.trans;
                kind = Path14Kind::Other;
            }
        }
        _ => {
            dl = ctx.cis;
            du = ctx.trans;
            kind = Path14Kind::Other;
        }
    }

    spread_if_flat(&mut dl, &mut du);
    write_path(mat, accum, &ctx, bid1, bid2, bid3, dl, du, kind)
}

/// Two-in-same-ring variant used when the middle bond belongs to a
/// macrocycle: extended ring amides are taken cis.
fn set_macrocycle_two_in_same_ring_14(
    mol: &Molecule,
    bid1: usize,
    bid2: usize,
    bid3: usize,
    accum: &mut Accumulator,
    mat: &mut BoundsMatrix,
) -> Result<(), Error> {
    let ctx = path_context(mol, accum, bid1, bid2, bid3)?;
    if too_close_for_14(mol, ctx.aid1, ctx.aid4) {
        return Ok(());
    }
    if mol.bond_between(ctx.aid1, ctx.aid3).is_some()
        || mol.bond_between(ctx.aid4, ctx.aid2).is_some()
    {
        return Ok(());
    }

    let amide = is_macro_two_ring_amide(mol, bid1, bid3, ctx.aid1, ctx.aid2, ctx.aid3, ctx.aid4)
        || is_macro_two_ring_amide(mol, bid3, bid1, ctx.aid4, ctx.aid3, ctx.aid2, ctx.aid1);
    let (dl, du, kind) = if amide {
        accum.record_cis(bid1, bid2, bid3);
        (
            ctx.cis - GEN_DIST_TOL,
            ctx.cis + GEN_DIST_TOL,
            Path14Kind::Cis,
        )
    } else {
        let (mut dl, mut du) = (ctx.cis, ctx.trans);
        if du < dl {
            std::mem::swap(&mut dl, &mut du);
        }
        spread_if_flat(&mut dl, &mut du);
        (dl, du, Path14Kind::Other)
    };
    write_path(mat, accum, &ctx, bid1, bid2, bid3, dl, du, kind)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PathClass {
    TwoInSameRing,
    MacrocycleTwoInSameRing,
    TwoInDiffRing,
    ShareRingBond,
    Chain,
}

/// Pass 3: 1-4 bounds. Ring triples are walked first (macrocycles get
/// their own rules); every remaining three-bond path is classified by how
/// its bonds sit in rings and dispatched.
pub(crate) fn set_14_bounds(
    mol: &Molecule,
    mat: &mut BoundsMatrix,
    accum: &mut Accumulator,
    options: &BoundsOptions,
) -> Result<(), Error> {
    let nb = mol.num_bonds() as u64;
    let rinfo = mol.ring_info();
    let pair_key = |b1: usize, b2: usize| (b1 as u64) * nb + b2 as u64;

    let mut ring_bond_pairs: HashSet<u64> = HashSet::new();
    let mut done_paths: HashSet<u64> = HashSet::new();
    let mut macrocycle_middles: HashSet<usize> = HashSet::new();

    for bring in rinfo.bond_rings() {
        let rsize = bring.len();
        if rsize < 3 {
            continue;
        }
        let mut bid1 = bring[rsize - 1];
        for i in 0..rsize {
            let bid2 = bring[i];
            let bid3 = bring[(i + 1) % rsize];
            ring_bond_pairs.insert(pair_key(bid1, bid2));
            ring_bond_pairs.insert(pair_key(bid2, bid1));
            done_paths.insert(accum.encode_path(bid1, bid2, bid3));
            done_paths.insert(accum.encode_path(bid3, bid2, bid1));

            if rsize > 5 {
                if options.use_macrocycle14 && rsize >= MIN_MACROCYCLE_RING_SIZE {
                    set_macrocycle_all_in_same_ring_14(
                        mol,
                        bid1,
                        bid2,
                        bid3,
                        accum,
                        mat,
                        options.macrocycle_trans_amide_15,
                    )?;
                    macrocycle_middles.insert(bid2);
                } else {
                    set_in_ring_14(mol, bid1, bid2, bid3, accum, mat, rsize)?;
                }
            } else {
                record_ring_path(mol, bid1, bid2, bid3, accum)?;
            }
            bid1 = bid2;
        }
    }

    for (bid2, bond) in mol.bonds().iter().enumerate() {
        let (aid2, aid3) = (bond.begin, bond.end);
        for &(_, bid1) in mol.atom_bonds(aid2) {
            if bid1 == bid2 {
                continue;
            }
            for &(_, bid3) in mol.atom_bonds(aid3) {
                if bid3 == bid2 {
                    continue;
                }
                if done_paths.contains(&accum.encode_path(bid1, bid2, bid3))
                    || done_paths.contains(&accum.encode_path(bid3, bid2, bid1))
                {
                    continue;
                }

                let shares_ring_pair = [
                    pair_key(bid1, bid2),
                    pair_key(bid2, bid1),
                    pair_key(bid2, bid3),
                    pair_key(bid3, bid2),
                ]
                .iter()
                .any(|key| ring_bond_pairs.contains(key));

                let class = if shares_ring_pair {
                    if options.use_macrocycle14 && macrocycle_middles.contains(&bid2) {
                        PathClass::MacrocycleTwoInSameRing
                    } else {
                        PathClass::TwoInSameRing
                    }
                } else if (rinfo.num_bond_rings(bid1) > 0 && rinfo.num_bond_rings(bid2) > 0)
                    || (rinfo.num_bond_rings(bid2) > 0 && rinfo.num_bond_rings(bid3) > 0)
                {
                    PathClass::TwoInDiffRing
                } else if rinfo.num_bond_rings(bid2) > 0 {
                    PathClass::ShareRingBond
                } else {
                    PathClass::Chain
                };

                match class {
                    PathClass::TwoInSameRing => {
                        set_two_in_same_ring_14(mol, bid1, bid2, bid3, accum, mat)?
                    }
                    PathClass::MacrocycleTwoInSameRing => {
                        set_macrocycle_two_in_same_ring_14(mol, bid1, bid2, bid3, accum, mat)?
                    }
                    // both reduce to the in-ring rule with the small-ring
                    // cis preference switched off
                    PathClass::TwoInDiffRing | PathClass::ShareRingBond => {
                        set_in_ring_14(mol, bid1, bid2, bid3, accum, mat, 0)?
                    }
                    PathClass::Chain => set_chain_14(
                        mol,
                        bid1,
                        bid2,
                        bid3,
                        accum,
                        mat,
                        options.force_trans_amides,
                    )?,
                }
            }
        }
    }
    Ok(())
}
