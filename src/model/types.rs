use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Element {
    H = 1,
    He,
    Li,
    Be,
    B,
    C,
    N,
    O,
    F,
    Ne,
    Na,
    Mg,
    Al,
    Si,
    P,
    S,
    Cl,
    Ar,
    K,
    Ca,
    Sc,
    Ti,
    V,
    Cr,
    Mn,
    Fe,
    Co,
    Ni,
    Cu,
    Zn,
    Ga,
    Ge,
    As,
    Se,
    Br,
    Kr,
    Rb,
    Sr,
    Y,
    Zr,
    Nb,
    Mo,
    Tc,
    Ru,
    Rh,
    Pd,
    Ag,
    Cd,
    In,
    Sn,
    Sb,
    Te,
    I,
    Xe,
    Cs,
    Ba,
    La,
    Ce,
    Pr,
    Nd,
    Pm,
    Sm,
    Eu,
    Gd,
    Tb,
    Dy,
    Ho,
    Er,
    Tm,
    Yb,
    Lu,
    Hf,
    Ta,
    W,
    Re,
    Os,
    Ir,
    Pt,
    Au,
    Hg,
    Tl,
    Pb,
    Bi,
    Po,
    At,
    Rn,
    Fr,
    Ra,
    Ac,
    Th,
    Pa,
    U,
    Np,
    Pu,
    Am,
    Cm,
    Bk,
    Cf,
    Es,
    Fm,
    Md,
    No,
    Lr,
    Rf,
    Db,
    Sg,
    Bh,
    Hs,
    Mt,
    Ds,
    Rg,
    Cn,
    Nh,
    Fl,
    Mc,
    Lv,
    Ts,
    Og = 118,
}

impl Element {
    #[inline]
    pub fn atomic_number(&self) -> u8 {
        *self as u8
    }

    /// Van der Waals radius in angstroms. Bondi-style values where
    /// published, row defaults elsewhere.
    pub fn rvdw(&self) -> f64 {
        use Element::*;
        match self {
            H => 1.20,
            He => 1.40,
            Li => 1.81,
            Be => 1.53,
            B => 1.92,
            C => 1.70,
            N => 1.55,
            O => 1.52,
            F => 1.47,
            Ne => 1.54,
            Na => 2.27,
            Mg => 1.73,
            Al => 1.84,
            Si => 2.10,
            P => 1.80,
            S => 1.80,
            Cl => 1.75,
            Ar => 1.88,
            K => 2.75,
            Ca => 2.31,
            Ga => 1.87,
            Ge => 2.11,
            As => 1.85,
            Se => 1.90,
            Br => 1.85,
            Kr => 2.02,
            Rb => 3.03,
            Sr => 2.49,
            In => 1.93,
            Sn => 2.17,
            Sb => 2.06,
            Te => 2.06,
            I => 1.98,
            Xe => 2.16,
            Cs => 3.43,
            Ba => 2.68,
            Tl => 1.96,
            Pb => 2.02,
            Bi => 2.07,
            Po => 1.97,
            At => 2.02,
            Rn => 2.20,
            Fr => 3.48,
            Ra => 2.83,
            Sc | Ti | V | Cr | Mn | Fe | Co | Ni | Cu | Zn => 2.05,
            Y | Zr | Nb | Mo | Tc | Ru | Rh | Pd | Ag | Cd => 2.10,
            La | Ce | Pr | Nd | Pm | Sm | Eu | Gd | Tb | Dy | Ho | Er | Tm | Yb | Lu => 2.35,
            Hf | Ta | W | Re | Os | Ir | Pt | Au | Hg => 2.15,
            _ => 2.40,
        }
    }

    pub fn symbol(&self) -> &'static str {
        use Element::*;
        match self {
            H => "H",
            He => "He",
            Li => "Li",
            Be => "Be",
            B => "B",
            C => "C",
            N => "N",
            O => "O",
            F => "F",
            Ne => "Ne",
            Na => "Na",
            Mg => "Mg",
            Al => "Al",
            Si => "Si",
            P => "P",
            S => "S",
            Cl => "Cl",
            Ar => "Ar",
            K => "K",
            Ca => "Ca",
            Sc => "Sc",
            Ti => "Ti",
            V => "V",
            Cr => "Cr",
            Mn => "Mn",
            Fe => "Fe",
            Co => "Co",
            Ni => "Ni",
            Cu => "Cu",
            Zn => "Zn",
            Ga => "Ga",
            Ge => "Ge",
            As => "As",
            Se => "Se",
            Br => "Br",
            Kr => "Kr",
            Rb => "Rb",
            Sr => "Sr",
            Y => "Y",
            Zr => "Zr",
            Nb => "Nb",
            Mo => "Mo",
            Tc => "Tc",
            Ru => "Ru",
            Rh => "Rh",
            Pd => "Pd",
            Ag => "Ag",
            Cd => "Cd",
            In => "In",
            Sn => "Sn",
            Sb => "Sb",
            Te => "Te",
            I => "I",
            Xe => "Xe",
            Cs => "Cs",
            Ba => "Ba",
            La => "La",
            Ce => "Ce",
            Pr => "Pr",
            Nd => "Nd",
            Pm => "Pm",
            Sm => "Sm",
            Eu => "Eu",
            Gd => "Gd",
            Tb => "Tb",
            Dy => "Dy",
            Ho => "Ho",
            Er => "Er",
            Tm => "Tm",
            Yb => "Yb",
            Lu => "Lu",
            Hf => "Hf",
            Ta => "Ta",
            W => "W",
            Re => "Re",
            Os => "Os",
            Ir => "Ir",
            Pt => "Pt",
            Au => "Au",
            Hg => "Hg",
            Tl => "Tl",
            Pb => "Pb",
            Bi => "Bi",
            Po => "Po",
            At => "At",
            Rn => "Rn",
            Fr => "Fr",
            Ra => "Ra",
            Ac => "Ac",
            Th => "Th",
            Pa => "Pa",
            U => "U",
            Np => "Np",
            Pu => "Pu",
            Am => "Am",
            Cm => "Cm",
            Bk => "Bk",
            Cf => "Cf",
            Es => "Es",
            Fm => "Fm",
            Md => "Md",
            No => "No",
            Lr => "Lr",
            Rf => "Rf",
            Db => "Db",
            Sg => "Sg",
            Bh => "Bh",
            Hs => "Hs",
            Mt => "Mt",
            Ds => "Ds",
            Rg => "Rg",
            Cn => "Cn",
            Nh => "Nh",
            Fl => "Fl",
            Mc => "Mc",
            Lv => "Lv",
            Ts => "Ts",
            Og => "Og",
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BondOrder {
    Single,
    Double,
    Triple,
    Aromatic,
}

impl BondOrder {
    pub fn value(&self) -> f64 {
        match self {
            BondOrder::Single => 1.0,
            BondOrder::Double => 2.0,
            BondOrder::Triple => 3.0,
            BondOrder::Aromatic => 1.5,
        }
    }
}

impl fmt::Display for BondOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BondOrder::Single => write!(f, "Single"),
            BondOrder::Double => write!(f, "Double"),
            BondOrder::Triple => write!(f, "Triple"),
            BondOrder::Aromatic => write!(f, "Aromatic"),
        }
    }
}

/// Orbital hybridization of an atom, as assigned by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Hybridization {
    SP,
    SP2,
    #[default]
    SP3,
    SP3D,
    SP3D2,
    Other,
}

/// Double-bond stereochemistry. `Z`/`E` and `Cis`/`Trans` are anchored by
/// the bond's stereo atoms; when the observed path ends differ from the
/// anchors the effective label flips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BondStereo {
    #[default]
    None,
    Any,
    Cis,
    Trans,
    Z,
    E,
}

impl BondStereo {
    /// True when a definite cis/trans assignment (beyond `Any`) is present.
    #[inline]
    pub fn is_definite(&self) -> bool {
        !matches!(self, BondStereo::None | BondStereo::Any)
    }

    /// The opposite assignment; `None`/`Any` are their own flips.
    pub fn flipped(&self) -> BondStereo {
        match self {
            BondStereo::Z => BondStereo::E,
            BondStereo::E => BondStereo::Z,
            BondStereo::Cis => BondStereo::Trans,
            BondStereo::Trans => BondStereo::Cis,
            other => *other,
        }
    }
}

/// Explicit coordination geometry for centers that are not tetrahedral.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AtomGeometry {
    #[default]
    None,
    SquarePlanar,
    TrigonalBipyramidal,
    Octahedral,
}

impl AtomGeometry {
    /// Canonical unit vectors for the ligand sites of this geometry.
    pub(crate) fn site_vectors(&self) -> &'static [[f64; 3]] {
        const SQP: [[f64; 3]; 4] = [
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [-1.0, 0.0, 0.0],
            [0.0, -1.0, 0.0],
        ];
        const TBP: [[f64; 3]; 5] = [
            [0.0, 0.0, 1.0],
            [1.0, 0.0, 0.0],
            [-0.5, 0.866_025_403_784_438_6, 0.0],
            [-0.5, -0.866_025_403_784_438_6, 0.0],
            [0.0, 0.0, -1.0],
        ];
        const OCT: [[f64; 3]; 6] = [
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [-1.0, 0.0, 0.0],
            [0.0, -1.0, 0.0],
            [0.0, 0.0, 1.0],
            [0.0, 0.0, -1.0],
        ];
        match self {
            AtomGeometry::None => &[],
            AtomGeometry::SquarePlanar => &SQP,
            AtomGeometry::TrigonalBipyramidal => &TBP,
            AtomGeometry::Octahedral => &OCT,
        }
    }
}
