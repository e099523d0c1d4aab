//! # Conversation Key Agreement
//!
//! Derives the shared symmetric key for a pair of identities:
//!
//! ```text
//! shared_x = X25519( clamp(our scalar), montgomery(their point) )
//! key      = HKDF-SHA256-extract( salt = "murmur-conversation-v1", ikm = shared_x )
//! ```
//!
//! Symmetry is the load-bearing property:
//! `derive(alice_secret, bob_public) == derive(bob_secret, alice_public)`
//! for all valid keypairs — this is what lets two parties agree on a key
//! with no prior exchange.
//!
//! Identity keys are Ed25519; ECDH runs over the Montgomery form of the
//! same curve via the birational map of RFC 7748 §4.1 (Edwards point →
//! Montgomery u-coordinate, signing scalar → clamped X25519 scalar).

use hkdf::Hkdf;
use sha2::Sha256;
use x25519_dalek::x25519;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::crypto::keys::{Keys, PublicKey};
use crate::error::{Error, Result};

/// Size of a conversation key in bytes (256 bits)
pub const CONVERSATION_KEY_SIZE: usize = 32;

/// Fixed HKDF-extract salt; versioned so a future scheme change cannot
/// silently produce colliding keys.
const CONVERSATION_SALT: &[u8] = b"murmur-conversation-v1";

/// A shared symmetric key between two identities
///
/// Zeroized on drop. Never serialized, never logged.
#[derive(ZeroizeOnDrop)]
pub struct ConversationKey([u8; CONVERSATION_KEY_SIZE]);

impl ConversationKey {
    /// Derive the conversation key between `ours` and `theirs`.
    ///
    /// Pure and side-effect free. Fails with `InvalidKey` for malformed,
    /// off-curve, or small-order public keys, and for an all-zero ECDH
    /// output (which a small-order peer point would force).
    pub fn derive(ours: &Keys, theirs: &PublicKey) -> Result<Self> {
        let their_point = theirs.verifying_key()?.to_montgomery();

        let mut shared = x25519(ours.scalar_bytes(), their_point.to_bytes());
        if shared == [0u8; 32] {
            return Err(Error::InvalidKey(
                "ECDH produced the identity point".into(),
            ));
        }

        let (prk, _) = Hkdf::<Sha256>::extract(Some(CONVERSATION_SALT), &shared);
        shared.zeroize();

        Ok(Self(prk.into()))
    }

    /// Get the raw key bytes
    pub(crate) fn as_bytes(&self) -> &[u8; CONVERSATION_KEY_SIZE] {
        &self.0
    }

    /// Build from raw bytes (test vectors only)
    #[cfg(test)]
    pub(crate) fn from_bytes(bytes: [u8; CONVERSATION_KEY_SIZE]) -> Self {
        Self(bytes)
    }
}

impl std::fmt::Debug for ConversationKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ConversationKey(..)")
    }
}

// ============================================================================
// TESTS
// ============================================================================
