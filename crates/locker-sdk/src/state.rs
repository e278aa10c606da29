//! Decoders for the locker program's accounts.
//!
//! `VestingEscrow` is a zero-copy `repr(C)` account whose padding is explicit,
//! so its Borsh encoding is byte-identical to its in-memory layout. Both
//! account types are prefixed with an 8-byte Anchor discriminator.

use borsh::BorshDeserialize;
use chain_sol::Pubkey;
use serde::Serialize;

use crate::constants::{VESTING_ESCROW_DISCRIMINATOR, VESTING_ESCROW_METADATA_DISCRIMINATOR};
use crate::error::LockerError;
use crate::types::{token_program_from_flag, total_deposit, CancelMode, UpdateRecipientMode};

/// Length of the account discriminator prefix.
pub const DISCRIMINATOR_LEN: usize = 8;

/// Byte offset of `recipient` in a raw escrow account.
pub const RECIPIENT_OFFSET: usize = DISCRIMINATOR_LEN;

/// Byte offset of `creator` in a raw escrow account.
pub const CREATOR_OFFSET: usize = DISCRIMINATOR_LEN + 64;

/// Size of a `VestingEscrow` body after the discriminator.
pub const VESTING_ESCROW_SIZE: usize = 288;

/// One vesting schedule.
#[derive(Debug, Clone, PartialEq, Eq, BorshDeserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VestingEscrow {
    pub recipient: Pubkey,
    pub token_mint: Pubkey,
    pub creator: Pubkey,
    pub base: Pubkey,
    pub escrow_bump: u8,
    pub update_recipient_mode: u8,
    pub cancel_mode: u8,
    pub token_program_flag: u8,
    #[serde(skip)]
    pub padding_0: [u8; 4],
    pub cliff_time: u64,
    pub frequency: u64,
    pub cliff_unlock_amount: u64,
    pub amount_per_period: u64,
    pub number_of_period: u64,
    pub total_claimed_amount: u64,
    pub vesting_start_time: u64,
    pub cancelled_at: u64,
    #[serde(skip)]
    pub padding_1: u64,
    #[serde(skip)]
    pub buffer: [u128; 5],
}

impl VestingEscrow {
    /// Decode raw account data, discriminator included.
    pub fn try_from_account_data(data: &[u8]) -> Result<Self, LockerError> {
        let body = strip_discriminator(data, &VESTING_ESCROW_DISCRIMINATOR, "VestingEscrow")?;
        if body.len() < VESTING_ESCROW_SIZE {
            return Err(LockerError::AccountDecode(format!(
                "VestingEscrow body is {} bytes, expected {VESTING_ESCROW_SIZE}",
                body.len()
            )));
        }
        Ok(Self::deserialize(&mut &body[..VESTING_ESCROW_SIZE])?)
    }

    pub fn update_recipient_mode(&self) -> Option<UpdateRecipientMode> {
        UpdateRecipientMode::from_value(self.update_recipient_mode)
    }

    pub fn cancel_mode(&self) -> Option<CancelMode> {
        CancelMode::from_value(self.cancel_mode)
    }

    pub fn token_program(&self) -> Option<Pubkey> {
        token_program_from_flag(self.token_program_flag)
    }

    pub fn total_deposit(&self) -> Result<u64, LockerError> {
        total_deposit(
            self.cliff_unlock_amount,
            self.amount_per_period,
            self.number_of_period,
        )
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled_at != 0
    }
}

/// Descriptive fields attached to an escrow.
#[derive(Debug, Clone, Default, PartialEq, Eq, BorshDeserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VestingEscrowMetadata {
    pub escrow: Pubkey,
    pub name: String,
    pub description: String,
    pub creator_email: String,
    pub recipient_email: String,
}

impl VestingEscrowMetadata {
    /// Decode raw account data, discriminator included. Trailing bytes left
    /// over from the allocated space are ignored.
    pub fn try_from_account_data(data: &[u8]) -> Result<Self, LockerError> {
        let mut body = strip_discriminator(
            data,
            &VESTING_ESCROW_METADATA_DISCRIMINATOR,
            "VestingEscrowMetadata",
        )?;
        Ok(Self::deserialize(&mut body)?)
    }
}

/// An escrow joined with its metadata, as returned by the query helpers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EscrowWithMetadata {
    pub pubkey: Pubkey,
    pub account: VestingEscrow,
    pub escrow_metadata: Option<VestingEscrowMetadata>,
    pub mint: Pubkey,
}

fn strip_discriminator<'a>(
    data: &'a [u8],
    expected: &[u8; 8],
    name: &str,
) -> Result<&'a [u8], LockerError> {
    if data.len() < DISCRIMINATOR_LEN {
        return Err(LockerError::AccountDecode(format!(
            "{name} account is {} bytes, shorter than its discriminator",
            data.len()
        )));
    }
    let (disc, body) = data.split_at(DISCRIMINATOR_LEN);
    if disc != expected {
        return Err(LockerError::AccountDecode(format!(
            "{name} discriminator mismatch: {}",
            hex::encode(disc)
        )));
    }
    Ok(body)
}
