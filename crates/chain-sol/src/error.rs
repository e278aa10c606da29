use thiserror::Error;

/// Solana primitive errors.
#[derive(Debug, Error)]
pub enum SolError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid seeds: {0}")]
    InvalidSeeds(String),

    #[error("transaction build error: {0}")]
    TransactionBuildError(String),

    #[error("signing error: {0}")]
    SigningError(String),

    #[error("serialization error: {0}")]
    SerializationError(String),
}
