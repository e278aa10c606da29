//! Ed25519 keypairs used as transaction signers.

use std::fmt;

use ed25519_dalek::{Signer, SigningKey};
use rand_core::OsRng;
use zeroize::Zeroize;

use crate::address::Pubkey;

/// An Ed25519 signing keypair. The secret half is zeroized on drop.
pub struct Keypair {
    signing_key: SigningKey,
}

impl Keypair {
    /// Generate a fresh keypair from the OS random source.
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut OsRng),
        }
    }

    /// Build a keypair from a 32-byte Ed25519 seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        let mut copy = *seed;
        let signing_key = SigningKey::from_bytes(&copy);
        copy.zeroize();
        Self { signing_key }
    }

    pub fn pubkey(&self) -> Pubkey {
        Pubkey::new(self.signing_key.verifying_key().to_bytes())
    }

    /// Sign `message`, returning the 64-byte signature.
    pub fn sign_message(&self, message: &[u8]) -> [u8; 64] {
        self.signing_key.sign(message).to_bytes()
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keypair")
            .field("pubkey", &self.pubkey())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ed25519_dalek::{Signature, Verifier, VerifyingKey};

    #[test]
    fn generated_keys_differ() {
        let a = Keypair::generate();
        let b = Keypair::generate();
        assert_ne!(a.pubkey(), b.pubkey());
    }

    #[test]
    fn generated_pubkey_is_on_curve() {
        assert!(Keypair::generate().pubkey().is_on_curve());
    }

    #[test]
    fn from_seed_is_deterministic() {
        let seed = [0x42u8; 32];
        assert_eq!(
            Keypair::from_seed(&seed).pubkey(),
            Keypair::from_seed(&seed).pubkey()
        );
    }

    #[test]
    fn signature_verifies() {
        let kp = Keypair::from_seed(&[9u8; 32]);
        let sig = kp.sign_message(b"locker");

        let vk = VerifyingKey::from_bytes(kp.pubkey().as_bytes()).unwrap();
        assert!(vk.verify(b"locker", &Signature::from_bytes(&sig)).is_ok());
    }

    #[test]
    fn debug_hides_secret() {
        let kp = Keypair::from_seed(&[1u8; 32]);
        let debug = format!("{kp:?}");
        assert!(debug.contains("pubkey"));
        assert!(!debug.contains("signing_key"));
    }
}
