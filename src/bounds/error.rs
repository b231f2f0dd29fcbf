use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("molecule has no atoms")]
    EmptyMolecule,

    #[error("too many bonds ({0}): 1-4 path encoding would overflow")]
    TooManyBonds(usize),

    #[error("bounds matrix has {got} rows but the molecule has {expected} atoms")]
    SizeMismatch { got: usize, expected: usize },

    #[error("upper bound {upper} not greater than lower bound {lower} for pair ({i}, {j})")]
    BoundInversion {
        i: usize,
        j: usize,
        lower: f64,
        upper: f64,
    },

    #[error("no usable lower bound for pair ({i}, {j})")]
    BadLowerBound { i: usize, j: usize },

    #[error("inconsistent molecular graph: {0}")]
    Inconsistent(String),

    #[error("failed to parse bond stretch parameters: {0}")]
    ParameterParse(#[from] toml::de::Error),
}

impl Error {
    pub fn size_mismatch(got: usize, expected: usize) -> Self {
        Self::SizeMismatch { got, expected }
    }

    pub(crate) fn inconsistent(detail: impl Into<String>) -> Self {
        Self::Inconsistent(detail.into())
    }
}
