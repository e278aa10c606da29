//! Instruction builders for the locker program.
//!
//! Instruction data is the 8-byte Anchor discriminator followed by the
//! Borsh-encoded arguments. Account order matches the program's context
//! structs, with the event-CPI accounts (`event_authority`, `program`) last
//! where the instruction emits events.

use std::io::Write;

use borsh::BorshSerialize;
use chain_sol::{
    derive_associated_token_address, sync_native, system_transfer, AccountMeta, Instruction,
    Pubkey, SYSTEM_PROGRAM_ID,
};
use tracing::debug;

use crate::constants::{
    CREATE_VESTING_ESCROW_METADATA_DISCRIMINATOR, CREATE_VESTING_ESCROW_V2_DISCRIMINATOR,
};
use crate::error::LockerError;
use crate::pda::{derive_escrow, derive_escrow_metadata, derive_event_authority};
use crate::types::{
    CreateVestingEscrowMetadataParameters, CreateVestingEscrowParameters, RemainingAccountsInfo,
};

/// Caller-supplied accounts of `create_vesting_escrow_v2`. The escrow, its
/// token vault and the event authority are derived.
#[derive(Debug, Clone)]
pub struct CreateVestingEscrowAccounts {
    pub base: Pubkey,
    pub token_mint: Pubkey,
    pub sender: Pubkey,
    pub sender_token: Pubkey,
    pub recipient: Pubkey,
    pub token_program: Pubkey,
}

/// Build `create_vesting_escrow_v2`.
///
/// # Accounts
///
/// 0. `[signer, writable]` base
/// 1. `[writable]` escrow PDA
/// 2. `[]` token mint
/// 3. `[writable]` escrow token account (ATA of the escrow)
/// 4. `[signer, writable]` sender
/// 5. `[writable]` sender token account
/// 6. `[]` recipient
/// 7. `[]` token program
/// 8. `[]` system program
/// 9. `[]` event authority
/// 10. `[]` locker program
pub fn create_vesting_escrow_v2(
    program_id: &Pubkey,
    accounts: &CreateVestingEscrowAccounts,
    params: &CreateVestingEscrowParameters,
    remaining_accounts_info: Option<&RemainingAccountsInfo>,
) -> Result<Instruction, LockerError> {
    let (escrow, _) = derive_escrow(&accounts.base, program_id)?;
    let escrow_token =
        derive_associated_token_address(&escrow, &accounts.token_mint, &accounts.token_program)?;
    let (event_authority, _) = derive_event_authority(program_id)?;

    let mut data = CREATE_VESTING_ESCROW_V2_DISCRIMINATOR.to_vec();
    encode_into(params, &mut data)?;
    encode_into(&remaining_accounts_info.cloned(), &mut data)?;

    debug!(%escrow, %escrow_token, data = %hex::encode(&data), "built create_vesting_escrow_v2");

    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(accounts.base, true),
            AccountMeta::new(escrow, false),
            AccountMeta::new_readonly(accounts.token_mint, false),
            AccountMeta::new(escrow_token, false),
            AccountMeta::new(accounts.sender, true),
            AccountMeta::new(accounts.sender_token, false),
            AccountMeta::new_readonly(accounts.recipient, false),
            AccountMeta::new_readonly(accounts.token_program, false),
            AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
            AccountMeta::new_readonly(event_authority, false),
            AccountMeta::new_readonly(*program_id, false),
        ],
        data,
    })
}

/// Build `create_vesting_escrow_metadata`.
///
/// # Accounts
///
/// 0. `[writable]` escrow
/// 1. `[signer]` creator
/// 2. `[writable]` escrow metadata PDA
/// 3. `[signer, writable]` payer
/// 4. `[]` system program
pub fn create_vesting_escrow_metadata(
    program_id: &Pubkey,
    escrow: &Pubkey,
    creator: &Pubkey,
    payer: &Pubkey,
    params: &CreateVestingEscrowMetadataParameters,
) -> Result<Instruction, LockerError> {
    let (escrow_metadata, _) = derive_escrow_metadata(escrow, program_id)?;

    let mut data = CREATE_VESTING_ESCROW_METADATA_DISCRIMINATOR.to_vec();
    encode_into(params, &mut data)?;

    debug!(%escrow, %escrow_metadata, "built create_vesting_escrow_metadata");

    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*escrow, false),
            AccountMeta::new_readonly(*creator, true),
            AccountMeta::new(escrow_metadata, false),
            AccountMeta::new(*payer, true),
            AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
        ],
        data,
    })
}

/// Move `amount` lamports into a wrapped-SOL token account and sync its balance.
pub fn wrap_sol_instructions(from: &Pubkey, to: &Pubkey, amount: u64) -> Vec<Instruction> {
    vec![system_transfer(from, to, amount), sync_native(to)]
}

fn encode_into<T: BorshSerialize, W: Write>(value: &T, out: &mut W) -> Result<(), LockerError> {
    value
        .serialize(out)
        .map_err(|e| LockerError::InstructionEncode(e.to_string()))
}
