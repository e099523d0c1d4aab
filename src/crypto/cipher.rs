//! # Symmetric Envelope
//!
//! Authenticated encryption used identically by both protocol layers
//! (seal and gift wrap). The envelope travels base64-encoded inside event
//! `content` fields.
//!
//! ## Wire Format
//!
//! ```text
//! ┌─────────┬────────────┬──────────────────────┬───────────┐
//! │ version │   nonce    │      ciphertext      │    mac    │
//! │ 1 byte  │  32 bytes  │  padded length bytes │ 32 bytes  │
//! └─────────┴────────────┴──────────────────────┴───────────┘
//! ```
//!
//! Per-message keys are expanded from (conversation key, nonce) so a
//! single long-lived conversation key never directly keys the cipher:
//!
//! ```text
//! HKDF-SHA256-expand(prk = conversation_key, info = nonce, 76 bytes)
//!   → ChaCha20 key (32) ‖ ChaCha20 IV (12) ‖ HMAC-SHA256 key (32)
//! ```
//!
//! Plaintext is padded to bucketed sizes (length prefix + zero fill, next
//! power-of-two-ish boundary) before encryption so ciphertext length leaks
//! only the bucket, not the exact message size. The MAC covers
//! `nonce ‖ ciphertext` and is compared in constant time.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use chacha20::cipher::{KeyIvInit, StreamCipher};
use chacha20::ChaCha20;
use hkdf::Hkdf;
use hmac::{Hmac, Mac};
use rand::{rngs::OsRng, RngCore};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::crypto::conversation::ConversationKey;
use crate::error::{Error, Result};

/// Size of the random per-envelope nonce in bytes
pub const NONCE_SIZE: usize = 32;

/// Size of the HMAC-SHA256 tag in bytes
const MAC_SIZE: usize = 32;

/// Envelope format version
const VERSION: u8 = 1;

/// Largest plaintext the u16 length prefix can carry
const MAX_PLAINTEXT_SIZE: usize = u16::MAX as usize;

/// Smallest padded payload (length prefix + minimum bucket)
const MIN_CIPHERTEXT_SIZE: usize = 2 + 32;

/// Smallest well-formed envelope
const MIN_ENVELOPE_SIZE: usize = 1 + NONCE_SIZE + MIN_CIPHERTEXT_SIZE + MAC_SIZE;

type HmacSha256 = Hmac<Sha256>;

/// Per-message key material expanded from (conversation key, nonce)
#[derive(ZeroizeOnDrop)]
struct MessageKeys {
    cipher_key: [u8; 32],
    cipher_iv: [u8; 12],
    mac_key: [u8; 32],
}

impl MessageKeys {
    fn expand(key: &ConversationKey, nonce: &[u8; NONCE_SIZE]) -> Result<Self> {
        let hk = Hkdf::<Sha256>::from_prk(key.as_bytes())
            .map_err(|_| Error::InvalidKey("Conversation key has wrong length".into()))?;

        let mut okm = [0u8; 76];
        hk.expand(nonce, &mut okm)
            .map_err(|_| Error::InvalidKey("Message key expansion failed".into()))?;

        let mut keys = Self {
            cipher_key: [0u8; 32],
            cipher_iv: [0u8; 12],
            mac_key: [0u8; 32],
        };
        keys.cipher_key.copy_from_slice(&okm[0..32]);
        keys.cipher_iv.copy_from_slice(&okm[32..44]);
        keys.mac_key.copy_from_slice(&okm[44..76]);
        okm.zeroize();

        Ok(keys)
    }
}

/// Encrypt `plaintext` under `key`, returning a base64 envelope.
///
/// Generates a fresh random nonce from the OS CSPRNG; consuming that
/// entropy is the only side effect. Fails with `Format` if the plaintext
/// exceeds the u16 length prefix.
pub fn encrypt(plaintext: &[u8], key: &ConversationKey) -> Result<String> {
    if plaintext.len() > MAX_PLAINTEXT_SIZE {
        return Err(Error::Format(format!(
            "Plaintext too large: {} bytes (max {})",
            plaintext.len(),
            MAX_PLAINTEXT_SIZE
        )));
    }

    let mut nonce = [0u8; NONCE_SIZE];
    OsRng.fill_bytes(&mut nonce);

    let keys = MessageKeys::expand(key, &nonce)?;

    let mut buffer = pad(plaintext);
    let mut cipher = ChaCha20::new(&keys.cipher_key.into(), &keys.cipher_iv.into());
    cipher.apply_keystream(&mut buffer);

    let mut mac = HmacSha256::new_from_slice(&keys.mac_key)
        .map_err(|_| Error::InvalidKey("MAC key has wrong length".into()))?;
    mac.update(&nonce);
    mac.update(&buffer);
    let tag = mac.finalize().into_bytes();

    let mut envelope = Vec::with_capacity(1 + NONCE_SIZE + buffer.len() + MAC_SIZE);
    envelope.push(VERSION);
    envelope.extend_from_slice(&nonce);
    envelope.extend_from_slice(&buffer);
    envelope.extend_from_slice(&tag);

    Ok(BASE64.encode(envelope))
}

/// Decrypt a base64 envelope under `key`.
///
/// Failure taxonomy:
/// - `Format`: bad base64, unknown version, or truncated envelope
/// - `Authentication`: MAC mismatch — the dominant failure mode for a
///   wrong key or tampered ciphertext
/// - `Padding`: the MAC verified but the unpad was inconsistent, which
///   indicates a sender-side logic bug rather than tampering
pub fn decrypt(payload: &str, key: &ConversationKey) -> Result<Vec<u8>> {
    let envelope = BASE64
        .decode(payload)
        .map_err(|e| Error::Format(format!("Invalid base64 envelope: {}", e)))?;

    if envelope.len() < MIN_ENVELOPE_SIZE {
        return Err(Error::Format(format!(
            "Envelope too short: {} bytes",
            envelope.len()
        )));
    }
    if envelope[0] != VERSION {
        return Err(Error::Format(format!(
            "Unsupported envelope version {}",
            envelope[0]
        )));
    }

    let mut nonce = [0u8; NONCE_SIZE];
    nonce.copy_from_slice(&envelope[1..1 + NONCE_SIZE]);
    let ciphertext = &envelope[1 + NONCE_SIZE..envelope.len() - MAC_SIZE];
    let received_mac = &envelope[envelope.len() - MAC_SIZE..];

    let keys = MessageKeys::expand(key, &nonce)?;

    let mut mac = HmacSha256::new_from_slice(&keys.mac_key)
        .map_err(|_| Error::InvalidKey("MAC key has wrong length".into()))?;
    mac.update(&nonce);
    mac.update(ciphertext);
    let expected = mac.finalize().into_bytes();

    // Constant-time comparison: the MAC check must not become a timing
    // oracle for how much of the tag matched.
    if !bool::from(expected.as_slice().ct_eq(received_mac)) {
        return Err(Error::Authentication);
    }

    let mut buffer = ciphertext.to_vec();
    let mut cipher = ChaCha20::new(&keys.cipher_key.into(), &keys.cipher_iv.into());
    cipher.apply_keystream(&mut buffer);

    unpad(&buffer)
}

/// Bucketed padded length for a plaintext of `unpadded` bytes.
///
/// Messages up to 32 bytes share one bucket; above that, buckets are
/// multiples of `next_power_of_two(len) / 8` (minimum 32), so ciphertext
/// length reveals the bucket rather than the byte count.
fn padded_len(unpadded: usize) -> usize {
    if unpadded <= 32 {
        return 32;
    }
    let next_power = unpadded.next_power_of_two();
    let chunk = if next_power <= 256 { 32 } else { next_power / 8 };
    chunk * ((unpadded - 1) / chunk + 1)
}

/// u16 big-endian length prefix, then zero fill to the bucket boundary.
fn pad(plaintext: &[u8]) -> Vec<u8> {
    let padded = padded_len(plaintext.len());
    let mut buffer = Vec::with_capacity(2 + padded);
    buffer.extend_from_slice(&(plaintext.len() as u16).to_be_bytes());
    buffer.extend_from_slice(plaintext);
    buffer.resize(2 + padded, 0);
    buffer
}

fn unpad(padded: &[u8]) -> Result<Vec<u8>> {
    if padded.len() < 2 {
        return Err(Error::Padding);
    }
    let unpadded_len = u16::from_be_bytes([padded[0], padded[1]]) as usize;
    if padded.len() != 2 + padded_len(unpadded_len) {
        return Err(Error::Padding);
    }
    Ok(padded[2..2 + unpadded_len].to_vec())
}

// ============================================================================
// TESTS
// ============================================================================
