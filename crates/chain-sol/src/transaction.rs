//! Legacy Solana transaction wire format and multi-signer signing.
//!
//! ```text
//! Transaction:
//!   num_signatures          compact-u16
//!   signatures              64 bytes * num_signatures
//!   message:
//!     num_required_sigs     u8
//!     num_readonly_signed   u8
//!     num_readonly_unsigned u8
//!     num_accounts          compact-u16
//!     account_keys          32 bytes * num_accounts
//!     recent_blockhash      32 bytes
//!     num_instructions      compact-u16
//!     instructions[]        (see below)
//!
//! Instruction:
//!   program_id_index        u8
//!   num_accounts            compact-u16
//!   account_indices         u8 * num_accounts
//!   data_len                compact-u16
//!   data                    u8 * data_len
//! ```

use crate::address::Pubkey;
use crate::error::SolError;
use crate::keypair::Keypair;

/// The System Program: 32 zero bytes, `11111111111111111111111111111111`.
pub const SYSTEM_PROGRAM_ID: Pubkey = Pubkey::new([0u8; 32]);

/// Maximum serialized transaction size accepted by the network.
pub const PACKET_DATA_SIZE: usize = 1232;

/// System Program `Transfer` instruction index (little-endian u32).
const SYSTEM_TRANSFER_IX_INDEX: u32 = 2;

// ---------------------------------------------------------------------------
// Compact-u16 encoding
// ---------------------------------------------------------------------------

/// Encode a `u16` value in Solana's compact-u16 format.
///
/// - Values 0..0x7f       -> 1 byte
/// - Values 0x80..0x3fff  -> 2 bytes
/// - Values 0x4000..      -> 3 bytes
pub fn encode_compact_u16(value: u16) -> Vec<u8> {
    let mut val = value as u32;
    let mut out = Vec::with_capacity(3);

    loop {
        let mut byte = (val & 0x7f) as u8;
        val >>= 7;
        if val > 0 {
            byte |= 0x80;
        }
        out.push(byte);
        if val == 0 {
            break;
        }
    }

    out
}

/// Decode a compact-u16 value from a byte slice.
///
/// Only the canonical (shortest) encoding is accepted: a continuation byte
/// may not be zero, and the third byte may carry at most two value bits.
///
/// Returns `(value, bytes_consumed)`.
pub fn decode_compact_u16(data: &[u8]) -> Result<(u16, usize), SolError> {
    let mut value: u32 = 0;

    for (i, shift) in [0u32, 7, 14].into_iter().enumerate() {
        let byte = *data.get(i).ok_or_else(|| {
            SolError::SerializationError(
                "unexpected end of data while decoding compact-u16".into(),
            )
        })?;
        if i > 0 && byte == 0 {
            return Err(SolError::SerializationError(
                "non-canonical compact-u16 encoding".into(),
            ));
        }
        if i == 2 && byte > 0x03 {
            return Err(SolError::SerializationError("compact-u16 value overflow".into()));
        }

        value |= ((byte & 0x7f) as u32) << shift;
        if byte & 0x80 == 0 {
            // At most 16 bits were accumulated above.
            return Ok((value as u16, i + 1));
        }
    }

    Err(SolError::SerializationError("compact-u16 value overflow".into()))
}

// ---------------------------------------------------------------------------
// Data structures
// ---------------------------------------------------------------------------

/// A single account reference in an instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountMeta {
    pub pubkey: Pubkey,
    pub is_signer: bool,
    pub is_writable: bool,
}

impl AccountMeta {
    /// A writable account.
    pub fn new(pubkey: Pubkey, is_signer: bool) -> Self {
        Self {
            pubkey,
            is_signer,
            is_writable: true,
        }
    }

    /// A read-only account.
    pub fn new_readonly(pubkey: Pubkey, is_signer: bool) -> Self {
        Self {
            pubkey,
            is_signer,
            is_writable: false,
        }
    }
}

/// An instruction before it is compiled into a transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub program_id: Pubkey,
    pub accounts: Vec<AccountMeta>,
    pub data: Vec<u8>,
}

/// A compiled, unsigned transaction message.
#[derive(Debug, Clone)]
pub struct Message {
    /// Account keys in canonical order:
    ///   1. writable signers (fee payer first)
    ///   2. read-only signers
    ///   3. writable non-signers
    ///   4. read-only non-signers
    pub account_keys: Vec<Pubkey>,
    pub num_required_signatures: u8,
    pub num_readonly_signed: u8,
    pub num_readonly_unsigned: u8,
    pub recent_blockhash: [u8; 32],
    pub instructions: Vec<CompiledInstruction>,
}

/// An instruction whose account references are indices into `account_keys`.
#[derive(Debug, Clone)]
pub struct CompiledInstruction {
    pub program_id_index: u8,
    pub account_indices: Vec<u8>,
    pub data: Vec<u8>,
}

impl Message {
    /// The accounts that must sign, in signature-slot order.
    pub fn signer_keys(&self) -> &[Pubkey] {
        &self.account_keys[..self.num_required_signatures as usize]
    }
}

// ---------------------------------------------------------------------------
// Compilation
// ---------------------------------------------------------------------------

/// Compile instructions into a message paid for by `fee_payer`.
///
/// Duplicate accounts are merged with their permissions OR-ed together.
/// Program ids are added as read-only non-signers.
pub fn compile_message(
    instructions: &[Instruction],
    fee_payer: &Pubkey,
    recent_blockhash: &[u8; 32],
) -> Result<Message, SolError> {
    if instructions.is_empty() {
        return Err(SolError::TransactionBuildError("no instructions".into()));
    }

    struct AccountEntry {
        pubkey: Pubkey,
        is_signer: bool,
        is_writable: bool,
    }

    let mut entries: Vec<AccountEntry> = vec![AccountEntry {
        pubkey: *fee_payer,
        is_signer: true,
        is_writable: true,
    }];

    let mut upsert = |pubkey: Pubkey, signer: bool, writable: bool| {
        if let Some(entry) = entries.iter_mut().find(|e| e.pubkey == pubkey) {
            entry.is_signer |= signer;
            entry.is_writable |= writable;
        } else {
            entries.push(AccountEntry {
                pubkey,
                is_signer: signer,
                is_writable: writable,
            });
        }
    };

    for ix in instructions {
        for meta in &ix.accounts {
            upsert(meta.pubkey, meta.is_signer, meta.is_writable);
        }
        upsert(ix.program_id, false, false);
    }

    // Stable sort keeps the fee payer at index 0 of the writable signers.
    entries.sort_by_key(|e| match (e.is_signer, e.is_writable) {
        (true, true) => 0u8,
        (true, false) => 1,
        (false, true) => 2,
        (false, false) => 3,
    });

    if entries.len() > u8::MAX as usize + 1 {
        return Err(SolError::TransactionBuildError(format!(
            "too many accounts: {}",
            entries.len()
        )));
    }

    let count = |f: fn(&AccountEntry) -> bool| entries.iter().filter(|e| f(e)).count() as u8;
    let num_required_signatures = count(|e| e.is_signer);
    let num_readonly_signed = count(|e| e.is_signer && !e.is_writable);
    let num_readonly_unsigned = count(|e| !e.is_signer && !e.is_writable);

    let account_keys: Vec<Pubkey> = entries.iter().map(|e| e.pubkey).collect();
    let index_of = |key: &Pubkey| -> Result<u8, SolError> {
        account_keys
            .iter()
            .position(|k| k == key)
            .map(|i| i as u8)
            .ok_or_else(|| SolError::TransactionBuildError(format!("{key} not in account keys")))
    };

    let compiled = instructions
        .iter()
        .map(|ix| {
            Ok(CompiledInstruction {
                program_id_index: index_of(&ix.program_id)?,
                account_indices: ix
                    .accounts
                    .iter()
                    .map(|meta| index_of(&meta.pubkey))
                    .collect::<Result<_, _>>()?,
                data: ix.data.clone(),
            })
        })
        .collect::<Result<Vec<_>, SolError>>()?;

    Ok(Message {
        account_keys,
        num_required_signatures,
        num_readonly_signed,
        num_readonly_unsigned,
        recent_blockhash: *recent_blockhash,
        instructions: compiled,
    })
}

/// Serialize the message (the bytes that get signed).
pub fn serialize_message(message: &Message) -> Result<Vec<u8>, SolError> {
    let mut buf = Vec::with_capacity(512);

    buf.push(message.num_required_signatures);
    buf.push(message.num_readonly_signed);
    buf.push(message.num_readonly_unsigned);

    buf.extend_from_slice(&encode_compact_u16(len_u16(message.account_keys.len())?));
    for key in &message.account_keys {
        buf.extend_from_slice(key.as_bytes());
    }

    buf.extend_from_slice(&message.recent_blockhash);

    buf.extend_from_slice(&encode_compact_u16(len_u16(message.instructions.len())?));
    for ix in &message.instructions {
        buf.push(ix.program_id_index);

        buf.extend_from_slice(&encode_compact_u16(len_u16(ix.account_indices.len())?));
        buf.extend_from_slice(&ix.account_indices);

        buf.extend_from_slice(&encode_compact_u16(len_u16(ix.data.len())?));
        buf.extend_from_slice(&ix.data);
    }

    Ok(buf)
}

/// Sign the message with every required signer and serialize the transaction.
///
/// `signers` may be given in any order but must cover every signer key of
/// the message. Extra keypairs are an error.
pub fn sign_transaction(message: &Message, signers: &[&Keypair]) -> Result<Vec<u8>, SolError> {
    let message_bytes = serialize_message(message)?;
    let required = message.signer_keys();

    if let Some(extra) = signers.iter().find(|kp| !required.contains(&kp.pubkey())) {
        return Err(SolError::SigningError(format!(
            "keypair {} is not a signer of this transaction",
            extra.pubkey()
        )));
    }

    let mut wire = Vec::with_capacity(3 + 64 * required.len() + message_bytes.len());
    wire.extend_from_slice(&encode_compact_u16(len_u16(required.len())?));

    for key in required {
        let signer = signers
            .iter()
            .find(|kp| kp.pubkey() == *key)
            .ok_or_else(|| SolError::SigningError(format!("missing signature for {key}")))?;
        wire.extend_from_slice(&signer.sign_message(&message_bytes));
    }

    wire.extend_from_slice(&message_bytes);

    if wire.len() > PACKET_DATA_SIZE {
        return Err(SolError::TransactionBuildError(format!(
            "transaction is {} bytes, limit is {PACKET_DATA_SIZE}",
            wire.len()
        )));
    }

    Ok(wire)
}

/// Build a System Program `Transfer` instruction.
pub fn system_transfer(from: &Pubkey, to: &Pubkey, lamports: u64) -> Instruction {
    // u32 LE instruction index (2 = Transfer) + u64 LE lamports.
    let mut data = Vec::with_capacity(12);
    data.extend_from_slice(&SYSTEM_TRANSFER_IX_INDEX.to_le_bytes());
    data.extend_from_slice(&lamports.to_le_bytes());

    Instruction {
        program_id: SYSTEM_PROGRAM_ID,
        accounts: vec![AccountMeta::new(*from, true), AccountMeta::new(*to, false)],
        data,
    }
}

fn len_u16(len: usize) -> Result<u16, SolError> {
    u16::try_from(len)
        .map_err(|_| SolError::SerializationError(format!("length {len} exceeds u16")))
}
