use thiserror::Error;

/// Reasons an isogeny computation refuses its input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IsogenyError {
    #[error("kernel generator does not lie on the domain curve")]
    NotOnCurve,

    #[error("kernel generator does not have exact order {order}")]
    WrongOrder { order: String },

    #[error("invalid degree factor {ell}^{e}: expected a prime power with e > 0")]
    InvalidFactor { ell: usize, e: usize },

    #[error("split ratio {0} must lie strictly between 0 and 1")]
    InvalidSplit(f64),

    #[error("isogeny degree does not fit in 128 bits")]
    DegreeOverflow,

    #[error("2-isogeny with kernel (0 : 1) has no codomain over the base field")]
    IrrationalTwoIsogeny,
}
