//! SPL Token and Associated Token Account instructions.
//!
//! Covers what a vesting client needs from the token programs: ATA address
//! derivation, ATA creation, and `SyncNative` for wrapped SOL. Works with
//! both the legacy Token program and Token-2022.

use crate::address::Pubkey;
use crate::error::SolError;
use crate::pda::find_program_address;
use crate::transaction::{AccountMeta, Instruction, SYSTEM_PROGRAM_ID};

// ---------------------------------------------------------------------------
// Well-known program IDs
// ---------------------------------------------------------------------------

/// SPL Token Program ID: `TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA`
pub const TOKEN_PROGRAM_ID: Pubkey = Pubkey::new([
    0x06, 0xdd, 0xf6, 0xe1, 0xd7, 0x65, 0xa1, 0x93, 0xd9, 0xcb, 0xe1, 0x46, 0xce, 0xeb, 0x79, 0xac,
    0x1c, 0xb4, 0x85, 0xed, 0x5f, 0x5b, 0x37, 0x91, 0x3a, 0x8c, 0xf5, 0x85, 0x7e, 0xff, 0x00, 0xa9,
]);

/// Token-2022 Program ID: `TokenzQdBNbLqP5VEhdkAS6EPFLC1PHnBqCXEpPxuEb`
pub const TOKEN_2022_PROGRAM_ID: Pubkey = Pubkey::new([
    0x06, 0xdd, 0xf6, 0xe1, 0xee, 0x75, 0x8f, 0xde, 0x18, 0x42, 0x5d, 0xbc, 0xe4, 0x6c, 0xcd, 0xda,
    0xb6, 0x1a, 0xfc, 0x4d, 0x83, 0xb9, 0x0d, 0x27, 0xfe, 0xbd, 0xf9, 0x28, 0xd8, 0xa1, 0x8b, 0xfc,
]);

/// Associated Token Account Program ID: `ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL`
pub const ASSOCIATED_TOKEN_PROGRAM_ID: Pubkey = Pubkey::new([
    0x8c, 0x97, 0x25, 0x8f, 0x4e, 0x24, 0x89, 0xf1, 0xbb, 0x3d, 0x10, 0x29, 0x14, 0x8e, 0x0d, 0x83,
    0x0b, 0x5a, 0x13, 0x99, 0xda, 0xff, 0x10, 0x84, 0x04, 0x8e, 0x7b, 0xd8, 0xdb, 0xe9, 0xf8, 0x59,
]);

/// Wrapped SOL mint: `So11111111111111111111111111111111111111112`
pub const NATIVE_MINT: Pubkey = Pubkey::new([
    0x06, 0x9b, 0x88, 0x57, 0xfe, 0xab, 0x81, 0x84, 0xfb, 0x68, 0x7f, 0x63, 0x46, 0x18, 0xc0, 0x35,
    0xda, 0xc4, 0x39, 0xdc, 0x1a, 0xeb, 0x3b, 0x55, 0x98, 0xa0, 0xf0, 0x00, 0x00, 0x00, 0x00, 0x01,
]);

/// Token instruction index of `SyncNative`.
const SYNC_NATIVE_IX_INDEX: u8 = 17;

/// ATA program instruction index of `CreateIdempotent`.
const CREATE_IDEMPOTENT_IX_INDEX: u8 = 1;

// ---------------------------------------------------------------------------
// Associated Token Account derivation
// ---------------------------------------------------------------------------

/// Derive the associated token account for an owner + mint pair.
///
/// Seeds: `[owner, token_program_id, mint]` under the ATA program. The owner
/// may itself be a PDA (off-curve), as is the case for escrow vaults.
pub fn derive_associated_token_address(
    owner: &Pubkey,
    mint: &Pubkey,
    token_program: &Pubkey,
) -> Result<Pubkey, SolError> {
    find_program_address(
        &[owner.as_ref(), token_program.as_ref(), mint.as_ref()],
        &ASSOCIATED_TOKEN_PROGRAM_ID,
    )
    .map(|(address, _bump)| address)
}

// ---------------------------------------------------------------------------
// Instructions
// ---------------------------------------------------------------------------

/// `Create` on the ATA program. Fails on-chain if the account exists.
pub fn create_associated_token_account(
    payer: &Pubkey,
    associated_token: &Pubkey,
    owner: &Pubkey,
    mint: &Pubkey,
    token_program: &Pubkey,
) -> Instruction {
    build_ata_instruction(payer, associated_token, owner, mint, token_program, Vec::new())
}

/// `CreateIdempotent` on the ATA program. A no-op if the account exists.
pub fn create_associated_token_account_idempotent(
    payer: &Pubkey,
    associated_token: &Pubkey,
    owner: &Pubkey,
    mint: &Pubkey,
    token_program: &Pubkey,
) -> Instruction {
    build_ata_instruction(
        payer,
        associated_token,
        owner,
        mint,
        token_program,
        vec![CREATE_IDEMPOTENT_IX_INDEX],
    )
}

/// `SyncNative`: refresh a wrapped-SOL account's token amount from its lamports.
pub fn sync_native(account: &Pubkey) -> Instruction {
    Instruction {
        program_id: TOKEN_PROGRAM_ID,
        accounts: vec![AccountMeta::new(*account, false)],
        data: vec![SYNC_NATIVE_IX_INDEX],
    }
}

fn build_ata_instruction(
    payer: &Pubkey,
    associated_token: &Pubkey,
    owner: &Pubkey,
    mint: &Pubkey,
    token_program: &Pubkey,
    data: Vec<u8>,
) -> Instruction {
    Instruction {
        program_id: ASSOCIATED_TOKEN_PROGRAM_ID,
        accounts: vec![
            AccountMeta::new(*payer, true),
            AccountMeta::new(*associated_token, false),
            AccountMeta::new_readonly(*owner, false),
            AccountMeta::new_readonly(*mint, false),
            AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
            AccountMeta::new_readonly(*token_program, false),
        ],
        data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- Constant verification ----------------------------------------------

    #[test]
    fn program_ids_match_base58() {
        assert_eq!(
            TOKEN_PROGRAM_ID.to_string(),
            "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA"
        );
        assert_eq!(
            TOKEN_2022_PROGRAM_ID.to_string(),
            "TokenzQdBNbLqP5VEhdkAS6EPFLC1PHnBqCXEpPxuEb"
        );
        assert_eq!(
            ASSOCIATED_TOKEN_PROGRAM_ID.to_string(),
            "ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL"
        );
        assert_eq!(
            NATIVE_MINT.to_string(),
            "So11111111111111111111111111111111111111112"
        );
    }

    // -- ATA derivation -----------------------------------------------------

    #[test]
    fn derive_ata_known_vector() {
        let usdc: Pubkey = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v".parse().unwrap();
        let wallet = Pubkey::new([0x42; 32]);

        let ata = derive_associated_token_address(&wallet, &usdc, &TOKEN_PROGRAM_ID).unwrap();
        assert_eq!(ata.to_string(), "4pw5VSwn2Sec4SjMhbUSBcVjS51rG34Ho1WuHQgxqVd2");
    }

    #[test]
    fn token_program_changes_ata() {
        let wallet = Pubkey::new([0x11; 32]);
        let mint = Pubkey::new([0x22; 32]);

        let legacy = derive_associated_token_address(&wallet, &mint, &TOKEN_PROGRAM_ID).unwrap();
        let t22 = derive_associated_token_address(&wallet, &mint, &TOKEN_2022_PROGRAM_ID).unwrap();
        assert_ne!(legacy, t22);
    }

    #[test]
    fn off_curve_owner_is_allowed() {
        let (pda, _) = find_program_address(&[b"escrow"], &TOKEN_PROGRAM_ID).unwrap();
        assert!(derive_associated_token_address(&pda, &NATIVE_MINT, &TOKEN_PROGRAM_ID).is_ok());
    }

    // -- Instructions -------------------------------------------------------

    #[test]
    fn create_ata_account_roles() {
        let payer = Pubkey::new([1; 32]);
        let ata = Pubkey::new([2; 32]);
        let owner = Pubkey::new([3; 32]);
        let mint = Pubkey::new([4; 32]);

        let ix = create_associated_token_account(&payer, &ata, &owner, &mint, &TOKEN_PROGRAM_ID);
        assert_eq!(ix.program_id, ASSOCIATED_TOKEN_PROGRAM_ID);
        assert!(ix.data.is_empty());
        assert_eq!(
            ix.accounts,
            vec![
                AccountMeta::new(payer, true),
                AccountMeta::new(ata, false),
                AccountMeta::new_readonly(owner, false),
                AccountMeta::new_readonly(mint, false),
                AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
                AccountMeta::new_readonly(TOKEN_PROGRAM_ID, false),
            ]
        );
    }

    #[test]
    fn create_idempotent_data() {
        let k = Pubkey::new([1; 32]);
        let ix = create_associated_token_account_idempotent(&k, &k, &k, &k, &TOKEN_2022_PROGRAM_ID);
        assert_eq!(ix.data, vec![1]);
        assert_eq!(ix.accounts[5].pubkey, TOKEN_2022_PROGRAM_ID);
    }

    #[test]
    fn sync_native_layout() {
        let account = Pubkey::new([5; 32]);
        let ix = sync_native(&account);
        assert_eq!(ix.program_id, TOKEN_PROGRAM_ID);
        assert_eq!(ix.data, vec![17]);
        assert_eq!(ix.accounts, vec![AccountMeta::new(account, false)]);
    }
}
