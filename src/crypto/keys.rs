//! # Key Management
//!
//! One Ed25519 keypair per identity: a 32-byte secret scalar and its
//! 32-byte public point, hex-encoded on the wire. The same keypair signs
//! events and (via the Montgomery form of the curve) derives conversation
//! keys, so an identity is exactly one 32-byte secret.
//!
//! ## Ownership Model
//!
//! Long-term identity keys are owned by the caller's key store and only
//! borrowed here for the duration of a single call. Ephemeral keys are
//! generated fresh per gift wrap, used once, and dropped — [`Keys`]
//! zeroizes its secret material on drop, so dropping *is* the cleanup.

use ed25519_dalek::{SigningKey, VerifyingKey};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use zeroize::ZeroizeOnDrop;

use crate::error::{Error, Result};

/// Size of a secret key in bytes
pub const SECRET_KEY_SIZE: usize = 32;

/// Size of a public key in bytes
pub const PUBLIC_KEY_SIZE: usize = 32;

/// An identity keypair (Ed25519)
///
/// ## Security
///
/// - The secret is zeroized when this struct is dropped
/// - The secret is never exposed through `Debug`, serde, or accessors;
///   callers that need persistence keep their own copy
#[derive(ZeroizeOnDrop)]
pub struct Keys {
    /// Private signing key (secret)
    #[zeroize(skip)] // ed25519_dalek::SigningKey handles its own zeroization
    secret: SigningKey,
}

impl Keys {
    /// Generate a new random keypair
    ///
    /// Uses the operating system's secure random number generator. This is
    /// also how ephemeral gift-wrap keys are made: one fresh call per
    /// outgoing message, never reused.
    pub fn generate() -> Self {
        Self {
            secret: SigningKey::generate(&mut OsRng),
        }
    }

    /// Create a keypair from a 32-byte secret
    pub fn from_secret_bytes(bytes: &[u8; SECRET_KEY_SIZE]) -> Self {
        Self {
            secret: SigningKey::from_bytes(bytes),
        }
    }

    /// Create a keypair from a hex-encoded secret
    pub fn from_secret_hex(hex_str: &str) -> Result<Self> {
        let bytes = hex::decode(hex_str)
            .map_err(|e| Error::InvalidKey(format!("Invalid secret key hex: {}", e)))?;
        let bytes: [u8; SECRET_KEY_SIZE] = bytes
            .try_into()
            .map_err(|_| Error::InvalidKey("Secret key must be 32 bytes".into()))?;
        Ok(Self::from_secret_bytes(&bytes))
    }

    /// Get the public key
    pub fn public(&self) -> PublicKey {
        PublicKey(self.secret.verifying_key().to_bytes())
    }

    /// Get the clamped ECDH scalar bytes
    ///
    /// Clamping is idempotent, so these bytes can be fed straight into the
    /// X25519 ladder without altering the scalar.
    pub(crate) fn scalar_bytes(&self) -> [u8; 32] {
        self.secret.to_scalar_bytes()
    }

    /// Get reference to the signing key
    pub(crate) fn signing_key(&self) -> &SigningKey {
        &self.secret
    }
}

impl std::fmt::Debug for Keys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print secret material.
        f.debug_struct("Keys").field("public", &self.public()).finish()
    }
}

/// A public identity key (32 bytes, hex on the wire)
///
/// This is public information: it can be serialized, transmitted, and
/// logged without security concerns. Whether a given pubkey appears on a
/// *published* event is a protocol concern, not a key-handling one.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PublicKey(#[serde(with = "hex_bytes")] pub(crate) [u8; PUBLIC_KEY_SIZE]);

impl PublicKey {
    /// Create from raw bytes
    pub fn from_bytes(bytes: [u8; PUBLIC_KEY_SIZE]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes
    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_SIZE] {
        &self.0
    }

    /// Encode as a 64-character hex string
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Decode from a hex string
    pub fn from_hex(hex_str: &str) -> Result<Self> {
        let bytes = hex::decode(hex_str)
            .map_err(|e| Error::InvalidKey(format!("Invalid public key hex: {}", e)))?;
        let bytes: [u8; PUBLIC_KEY_SIZE] = bytes
            .try_into()
            .map_err(|_| Error::InvalidKey("Public key must be 32 bytes".into()))?;
        Ok(Self(bytes))
    }

    /// Decode and validate the underlying curve point
    ///
    /// Fails with `InvalidKey` for non-canonical or off-curve encodings and
    /// for small-order (torsion) points, which would make the ECDH output
    /// predictable.
    pub(crate) fn verifying_key(&self) -> Result<VerifyingKey> {
        let key = VerifyingKey::from_bytes(&self.0)
            .map_err(|e| Error::InvalidKey(format!("Invalid public key point: {}", e)))?;
        if key.is_weak() {
            return Err(Error::InvalidKey("Public key is a small-order point".into()));
        }
        Ok(key)
    }
}

impl std::fmt::Display for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl std::fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PublicKey({})", self.to_hex())
    }
}

/// Serde helper for serializing byte arrays as hex
mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(bytes: &[u8; 32], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<[u8; 32], D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let bytes = hex::decode(&s).map_err(serde::de::Error::custom)?;
        bytes.try_into().map_err(|_| serde::de::Error::custom("Invalid length"))
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keypair_generation() {
        let kp1 = Keys::generate();
        let kp2 = Keys::generate();
        assert_ne!(kp1.public(), kp2.public());
    }

    #[test]
    fn test_keypair_from_secret_deterministic() {
        let secret = [42u8; 32];
        let kp1 = Keys::from_secret_bytes(&secret);
        let kp2 = Keys::from_secret_bytes(&secret);
        assert_eq!(kp1.public(), kp2.public());
    }

    #[test]
    fn test_public_key_hex_roundtrip() {
        let kp = Keys::generate();
        let public = kp.public();
        let restored = PublicKey::from_hex(&public.to_hex()).unwrap();
        assert_eq!(public, restored);
    }

    #[test]
    fn test_public_key_rejects_bad_hex() {
        assert!(matches!(
            PublicKey::from_hex("not hex"),
            Err(Error::InvalidKey(_))
        ));
        assert!(matches!(
            PublicKey::from_hex("abcd"),
            Err(Error::InvalidKey(_))
        ));
    }

    #[test]
    fn test_public_key_rejects_small_order_point() {
        // The identity element is a canonical encoding but torsion-order.
        let mut identity = [0u8; 32];
        identity[0] = 1;
        let pk = PublicKey::from_bytes(identity);
        assert!(matches!(pk.verifying_key(), Err(Error::InvalidKey(_))));
    }

    #[test]
    fn test_debug_never_prints_secret() {
        let secret = [7u8; 32];
        let kp = Keys::from_secret_bytes(&secret);
        let debug = format!("{:?}", kp);
        assert!(!debug.contains(&hex::encode(secret)));
    }

    #[test]
    fn test_public_key_serde_is_hex() {
        let kp = Keys::generate();
        let json = serde_json::to_string(&kp.public()).unwrap();
        assert_eq!(json, format!("\"{}\"", kp.public().to_hex()));
        let restored: PublicKey = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, kp.public());
    }
}
