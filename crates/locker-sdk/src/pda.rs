//! Deterministic account addresses of the locker program.

use chain_sol::{find_program_address, Pubkey};

use crate::constants::seeds;
use crate::error::LockerError;

/// Escrow address for a base key: seeds `["escrow", base]`.
pub fn derive_escrow(base: &Pubkey, program_id: &Pubkey) -> Result<(Pubkey, u8), LockerError> {
    Ok(find_program_address(
        &[seeds::ESCROW, base.as_ref()],
        program_id,
    )?)
}

/// Metadata address of an escrow: seeds `["escrow_metadata", escrow]`.
pub fn derive_escrow_metadata(
    escrow: &Pubkey,
    program_id: &Pubkey,
) -> Result<(Pubkey, u8), LockerError> {
    Ok(find_program_address(
        &[seeds::ESCROW_METADATA, escrow.as_ref()],
        program_id,
    )?)
}

/// Anchor event-CPI authority: seeds `["__event_authority"]`.
pub fn derive_event_authority(program_id: &Pubkey) -> Result<(Pubkey, u8), LockerError> {
    Ok(find_program_address(&[seeds::EVENT_AUTHORITY], program_id)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::LOCKER_PROGRAM_ID;

    #[test]
    fn escrow_known_vector() {
        let base = Pubkey::new([1; 32]);
        let (escrow, bump) = derive_escrow(&base, &LOCKER_PROGRAM_ID).unwrap();
        assert_eq!(escrow.to_string(), "2tiLMUV8PsRvjfLAiPUU6rdYyR35xXZ7DwPQGtKr5Jgb");
        assert_eq!(bump, 254);
    }

    #[test]
    fn escrow_metadata_known_vector() {
        let base = Pubkey::new([1; 32]);
        let (escrow, _) = derive_escrow(&base, &LOCKER_PROGRAM_ID).unwrap();
        let (metadata, bump) = derive_escrow_metadata(&escrow, &LOCKER_PROGRAM_ID).unwrap();
        assert_eq!(metadata.to_string(), "vU8uysvKZzgGok711ugUdUZzueMG12unx98j4vqumwQ");
        assert_eq!(bump, 255);
    }

    #[test]
    fn event_authority_known_vector() {
        let (authority, _) = derive_event_authority(&LOCKER_PROGRAM_ID).unwrap();
        assert_eq!(
            authority.to_string(),
            "AqUDk3wybxjZujrNbKmjr2YTUZ8RA1a1nyGgs1zSmvTG"
        );
    }

    #[test]
    fn program_id_changes_escrow() {
        let base = Pubkey::new([1; 32]);
        let other = Pubkey::new([9; 32]);
        assert_ne!(
            derive_escrow(&base, &LOCKER_PROGRAM_ID).unwrap().0,
            derive_escrow(&base, &other).unwrap().0
        );
    }
}
