use std::fmt;
use std::str::FromStr;

use borsh::{BorshDeserialize, BorshSerialize};
use chain_sol::{Pubkey, TOKEN_2022_PROGRAM_ID, TOKEN_PROGRAM_ID};
use serde::{Deserialize, Serialize};

use crate::error::LockerError;

/// Who may change an escrow's recipient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UpdateRecipientMode {
    #[default]
    None,
    #[serde(rename = "creator")]
    CreatorOnly,
    #[serde(rename = "recipient")]
    RecipientOnly,
    CreatorRecipient,
}

/// Who may cancel an escrow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CancelMode {
    #[default]
    None,
    #[serde(rename = "creator")]
    CreatorOnly,
    #[serde(rename = "recipient")]
    RecipientOnly,
    CreatorRecipient,
}

macro_rules! authority_mode {
    ($ty:ident) => {
        impl $ty {
            /// Raw value stored on-chain.
            pub fn value(&self) -> u8 {
                match self {
                    $ty::None => 0,
                    $ty::CreatorOnly => 1,
                    $ty::RecipientOnly => 2,
                    $ty::CreatorRecipient => 3,
                }
            }

            /// Decode an on-chain value; anything outside 0..=3 is `None`.
            pub fn from_value(raw: u8) -> Option<Self> {
                match raw {
                    0 => Some($ty::None),
                    1 => Some($ty::CreatorOnly),
                    2 => Some($ty::RecipientOnly),
                    3 => Some($ty::CreatorRecipient),
                    _ => None,
                }
            }

            pub fn as_str(&self) -> &'static str {
                match self {
                    $ty::None => "none",
                    $ty::CreatorOnly => "creator",
                    $ty::RecipientOnly => "recipient",
                    $ty::CreatorRecipient => "creator-recipient",
                }
            }

            /// Whether the creator holds this authority.
            pub fn allows_creator(&self) -> bool {
                matches!(self, $ty::CreatorOnly | $ty::CreatorRecipient)
            }

            /// Whether the recipient holds this authority.
            pub fn allows_recipient(&self) -> bool {
                matches!(self, $ty::RecipientOnly | $ty::CreatorRecipient)
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = LockerError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    "none" => Ok($ty::None),
                    "creator" => Ok($ty::CreatorOnly),
                    "recipient" => Ok($ty::RecipientOnly),
                    "creator-recipient" => Ok($ty::CreatorRecipient),
                    other => Err(LockerError::InvalidParameters(format!(
                        "unknown {}: {other}",
                        stringify!($ty)
                    ))),
                }
            }
        }
    };
}

authority_mode!(UpdateRecipientMode);
authority_mode!(CancelMode);

/// Token program an escrow was created with, as stored in `token_program_flag`.
pub fn token_program_from_flag(flag: u8) -> Option<Pubkey> {
    match flag {
        0 => Some(TOKEN_PROGRAM_ID),
        1 => Some(TOKEN_2022_PROGRAM_ID),
        _ => None,
    }
}

// ─── Instruction arguments (Borsh) ──────────────────────────────────

/// Arguments of `create_vesting_escrow_v2`. Field order is the wire order.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct CreateVestingEscrowParameters {
    pub vesting_start_time: u64,
    pub cliff_time: u64,
    pub frequency: u64,
    pub cliff_unlock_amount: u64,
    pub amount_per_period: u64,
    pub number_of_period: u64,
    pub update_recipient_mode: u8,
    pub cancel_mode: u8,
}

impl CreateVestingEscrowParameters {
    /// Total amount locked: cliff unlock plus every period.
    pub fn total_deposit(&self) -> Result<u64, LockerError> {
        total_deposit(
            self.cliff_unlock_amount,
            self.amount_per_period,
            self.number_of_period,
        )
    }
}

/// Arguments of `create_vesting_escrow_metadata`.
#[derive(Debug, Clone, Default, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct CreateVestingEscrowMetadataParameters {
    pub name: String,
    pub description: String,
    pub creator_email: String,
    pub recipient_email: String,
}

/// Kind of extra accounts appended after the fixed account list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub enum AccountsType {
    TransferHookEscrow,
}

#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct RemainingAccountsSlice {
    pub accounts_type: AccountsType,
    pub length: u8,
}

/// Layout of remaining accounts, used by Token-2022 transfer hooks.
#[derive(Debug, Clone, Default, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct RemainingAccountsInfo {
    pub slices: Vec<RemainingAccountsSlice>,
}

/// `cliff_unlock_amount + amount_per_period * number_of_period`, checked.
pub fn total_deposit(
    cliff_unlock_amount: u64,
    amount_per_period: u64,
    number_of_period: u64,
) -> Result<u64, LockerError> {
    amount_per_period
        .checked_mul(number_of_period)
        .and_then(|periodic| periodic.checked_add(cliff_unlock_amount))
        .ok_or_else(|| LockerError::InvalidParameters("total deposit overflows u64".into()))
}
