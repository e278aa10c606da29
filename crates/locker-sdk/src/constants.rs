//! Program addresses, PDA seeds and Anchor discriminators of the locker program.

use chain_sol::Pubkey;
use sha2::{Digest, Sha256};

/// Locker program on mainnet-beta: `LocpQgucEQHbqNABEYvBvwoxCPsSbG91A1QaQhQQqjn`
pub const LOCKER_PROGRAM_ID: Pubkey = Pubkey::new([
    0x05, 0x12, 0xbe, 0xf9, 0x7a, 0x8f, 0x5b, 0x71, 0x7d, 0xf3, 0xed, 0xd6, 0xc6, 0xed, 0x42, 0xc0,
    0xe2, 0x4f, 0x12, 0xdf, 0xe5, 0xbe, 0x87, 0xee, 0x3f, 0xec, 0x5e, 0x74, 0x3f, 0x5d, 0x6c, 0xb9,
]);

/// Memo program v2: `MemoSq4gqABAXKb96qnH8TysNcWxMyWCqXgDLGmfcHr`
pub const MEMO_PROGRAM_ID: Pubkey = Pubkey::new([
    0x05, 0x4a, 0x53, 0x5a, 0x99, 0x29, 0x21, 0x06, 0x4d, 0x24, 0xe8, 0x71, 0x60, 0xda, 0x38, 0x7c,
    0x7c, 0x35, 0xb5, 0xdd, 0xbc, 0x92, 0xbb, 0x81, 0xe4, 0x1f, 0xa8, 0x40, 0x41, 0x05, 0x44, 0x8d,
]);

/// Seed constants for PDA derivation
pub mod seeds {
    pub const ESCROW: &[u8] = b"escrow";
    pub const ESCROW_METADATA: &[u8] = b"escrow_metadata";
    pub const EVENT_AUTHORITY: &[u8] = b"__event_authority";
}

/// `sha256("global:create_vesting_escrow_v2")[..8]`
pub const CREATE_VESTING_ESCROW_V2_DISCRIMINATOR: [u8; 8] =
    [0xb5, 0x9b, 0x68, 0xb7, 0xb6, 0x80, 0x23, 0x2f];

/// `sha256("global:create_vesting_escrow_metadata")[..8]`
pub const CREATE_VESTING_ESCROW_METADATA_DISCRIMINATOR: [u8; 8] =
    [0x5d, 0x4e, 0x21, 0x67, 0xad, 0x7d, 0x46, 0x00];

/// `sha256("account:VestingEscrow")[..8]`
pub const VESTING_ESCROW_DISCRIMINATOR: [u8; 8] =
    [0xf4, 0x77, 0xb7, 0x04, 0x49, 0x74, 0x87, 0xc3];

/// `sha256("account:VestingEscrowMetadata")[..8]`
pub const VESTING_ESCROW_METADATA_DISCRIMINATOR: [u8; 8] =
    [0x18, 0xcc, 0xa6, 0x68, 0x57, 0x9e, 0x4c, 0x0d];

/// Anchor discriminator: first 8 bytes of `sha256("{namespace}:{name}")`.
pub fn discriminator(namespace: &str, name: &str) -> [u8; 8] {
    let hash = Sha256::digest(format!("{namespace}:{name}").as_bytes());
    let mut out = [0u8; 8];
    out.copy_from_slice(&hash[..8]);
    out
}
