//! Program Derived Address (PDA) derivation.
//!
//! A PDA is `SHA-256(seed_0 || .. || seed_n || program_id || "ProgramDerivedAddress")`
//! that is NOT a valid Ed25519 point, so no private key can exist for it.
//! `find_program_address` appends a one-byte bump seed and searches from 255
//! downward for the first off-curve result.

use sha2::{Digest, Sha256};

use crate::address::Pubkey;
use crate::error::SolError;

/// Maximum number of seeds, the bump seed included.
pub const MAX_SEEDS: usize = 16;

/// Maximum length of a single seed.
pub const MAX_SEED_LEN: usize = 32;

/// The string appended to PDA derivation: "ProgramDerivedAddress".
const PDA_MARKER: &[u8] = b"ProgramDerivedAddress";

/// Find the canonical PDA and its bump seed for the given seeds and program.
pub fn find_program_address(
    seeds: &[&[u8]],
    program_id: &Pubkey,
) -> Result<(Pubkey, u8), SolError> {
    if seeds.len() >= MAX_SEEDS {
        return Err(SolError::InvalidSeeds(format!(
            "at most {} seeds allowed before the bump, got {}",
            MAX_SEEDS - 1,
            seeds.len()
        )));
    }

    for bump in (0u8..=255).rev() {
        let mut with_bump: Vec<&[u8]> = Vec::with_capacity(seeds.len() + 1);
        with_bump.extend_from_slice(seeds);
        let bump_seed = [bump];
        with_bump.push(&bump_seed);

        match create_program_address(&with_bump, program_id) {
            Ok(address) => return Ok((address, bump)),
            Err(SolError::InvalidAddress(_)) => continue,
            Err(e) => return Err(e),
        }
    }

    Err(SolError::InvalidAddress(
        "could not find valid PDA bump seed".into(),
    ))
}

/// Create a PDA from fully specified seeds (bump included).
///
/// Fails with `InvalidAddress` when the hash lands on the Ed25519 curve.
pub fn create_program_address(
    seeds: &[&[u8]],
    program_id: &Pubkey,
) -> Result<Pubkey, SolError> {
    if seeds.len() > MAX_SEEDS {
        return Err(SolError::InvalidSeeds(format!(
            "at most {MAX_SEEDS} seeds allowed, got {}",
            seeds.len()
        )));
    }
    if let Some(seed) = seeds.iter().find(|s| s.len() > MAX_SEED_LEN) {
        return Err(SolError::InvalidSeeds(format!(
            "seed of {} bytes exceeds {MAX_SEED_LEN}",
            seed.len()
        )));
    }

    let mut hasher = Sha256::new();
    for seed in seeds {
        hasher.update(seed);
    }
    hasher.update(program_id.as_bytes());
    hasher.update(PDA_MARKER);

    let hash: [u8; 32] = hasher.finalize().into();

    if is_on_curve(&hash) {
        return Err(SolError::InvalidAddress(
            "derived address lies on the ed25519 curve".into(),
        ));
    }

    Ok(Pubkey::new(hash))
}

/// Check if 32 bytes represent a valid Ed25519 curve point.
pub fn is_on_curve(bytes: &[u8; 32]) -> bool {
    curve25519_dalek::edwards::CompressedEdwardsY(*bytes)
        .decompress()
        .is_some()
}
