//! # Cryptography Module
//!
//! This module provides all cryptographic primitives used by Murmur Core.
//!
//! ## Security Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    CRYPTOGRAPHIC ARCHITECTURE                           │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              CONVERSATION KEY AGREEMENT                         │   │
//! │  ├─────────────────────────────────────────────────────────────────┤   │
//! │  │                                                                 │   │
//! │  │  One Ed25519 keypair per identity. The same 32-byte secret     │   │
//! │  │  both signs events and agrees on symmetric keys:               │   │
//! │  │                                                                 │   │
//! │  │  1. Key Exchange: X25519 ECDH over the Montgomery form         │   │
//! │  │     clamp(sender scalar) × montgomery(recipient point)         │   │
//! │  │     = clamp(recipient scalar) × montgomery(sender point)       │   │
//! │  │                                                                 │   │
//! │  │  2. Extraction: HKDF-SHA256-extract, fixed salt                │   │
//! │  │     shared x-coordinate → 32-byte conversation key             │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              SYMMETRIC ENVELOPE                                 │   │
//! │  ├─────────────────────────────────────────────────────────────────┤   │
//! │  │                                                                 │   │
//! │  │  version(1) ‖ nonce(32) ‖ ciphertext ‖ mac(32)                 │   │
//! │  │                                                                 │   │
//! │  │  • Per-message key expansion: HKDF-SHA256-expand(key, nonce)   │   │
//! │  │    → ChaCha20 key, ChaCha20 IV, HMAC-SHA256 key                │   │
//! │  │  • Plaintext padded to bucketed lengths before encryption      │   │
//! │  │    (length-prefix + zero fill) to blunt size fingerprinting    │   │
//! │  │  • MAC over nonce ‖ ciphertext, verified in constant time      │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              SIGNATURES                                         │   │
//! │  ├─────────────────────────────────────────────────────────────────┤   │
//! │  │                                                                 │   │
//! │  │  Ed25519 over the 32-byte canonical event id.                  │   │
//! │  │  64-byte signatures, 32-byte public keys, deterministic.       │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Security Considerations
//!
//! 1. **Key Zeroization**: Secret keys and derived message keys are
//!    zeroized when dropped; ephemeral wrap keys are dropped immediately
//!    after signing.
//! 2. **Constant-Time Operations**: dalek primitives plus `subtle` for the
//!    MAC comparison.
//! 3. **Secure Random**: `rand::rngs::OsRng` for nonces and ephemeral keys.
//! 4. **No Nonce/Key Reuse**: fresh nonce per envelope, fresh ephemeral
//!    keypair per gift wrap.

pub(crate) mod cipher;
mod conversation;
mod keys;
mod signing;

pub use cipher::{decrypt, encrypt, NONCE_SIZE};
pub use conversation::{ConversationKey, CONVERSATION_KEY_SIZE};
pub use keys::{Keys, PublicKey, PUBLIC_KEY_SIZE, SECRET_KEY_SIZE};
pub use signing::{sign, verify, Signature, SIGNATURE_SIZE};
