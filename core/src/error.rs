use thiserror::Error;

#[derive(Error, Debug)]
pub enum PricerError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid fee table for '{marketplace}': {reason}")]
    InvalidTable { marketplace: String, reason: String },

    #[error("Stored timestamp '{value}' is not RFC 3339")]
    BadTimestamp { value: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type PricerResult<T> = Result<T, PricerError>;

/// Global input failure. Aborts the whole computation, no per-marketplace
/// entries are produced.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    #[error("{0} is missing")]
    Missing(&'static str),

    #[error("{0} is not a finite number")]
    NonNumeric(&'static str),

    #[error("{0} must not be negative")]
    Negative(&'static str),
}

/// Per-marketplace failure. Isolated to one slot of the result map.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QuoteError {
    #[error("invalid commission ({value})")]
    InvalidCommission { value: f64 },

    #[error("tax + commission >= 100% (denominator {denominator:.6})")]
    Infeasible { denominator: f64 },

    #[error("price out of range (denominator {denominator:.6})")]
    Unpriceable { denominator: f64 },
}
