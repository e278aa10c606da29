//! Solana primitives for the locker client.
//!
//! Public keys, keypairs, PDA derivation, System/SPL Token/ATA instructions
//! and the legacy transaction wire format, implemented by hand on top of
//! `ed25519-dalek`, `curve25519-dalek`, `sha2` and `bs58` instead of
//! `solana-sdk`.

pub mod address;
pub mod error;
pub mod keypair;
pub mod pda;
pub mod spl_token;
pub mod transaction;

pub use address::{address_to_bytes, bytes_to_address, validate_address, Pubkey};
pub use error::SolError;
pub use keypair::Keypair;
pub use pda::{create_program_address, find_program_address, is_on_curve};
pub use spl_token::{
    create_associated_token_account, create_associated_token_account_idempotent,
    derive_associated_token_address, sync_native, ASSOCIATED_TOKEN_PROGRAM_ID, NATIVE_MINT,
    TOKEN_2022_PROGRAM_ID, TOKEN_PROGRAM_ID,
};
pub use transaction::{
    compile_message, decode_compact_u16, encode_compact_u16, serialize_message,
    sign_transaction, system_transfer, AccountMeta, CompiledInstruction, Instruction, Message,
    SYSTEM_PROGRAM_ID,
};
