use thiserror::Error;

#[derive(Debug, Error)]
pub enum LockerError {
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Account decode failed: {0}")]
    AccountDecode(String),

    #[error("Instruction encode failed: {0}")]
    InstructionEncode(String),

    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Solana: {0}")]
    Sol(#[from] chain_sol::SolError),
}

impl From<reqwest::Error> for LockerError {
    fn from(e: reqwest::Error) -> Self {
        LockerError::Transport(e.to_string())
    }
}

impl From<serde_json::Error> for LockerError {
    fn from(e: serde_json::Error) -> Self {
        LockerError::Transport(format!("malformed response: {e}"))
    }
}

/// Borsh reads surface as `io::Error`; they only happen while decoding accounts.
impl From<std::io::Error> for LockerError {
    fn from(e: std::io::Error) -> Self {
        LockerError::AccountDecode(e.to_string())
    }
}
