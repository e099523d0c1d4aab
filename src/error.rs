//! # Error Handling
//!
//! This module provides the error types for Murmur Core.
//!
//! ## Error Hierarchy
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           ERROR HIERARCHY                               │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  Error (top-level)                                                     │
//! │  │                                                                      │
//! │  ├── Key Errors                                                        │
//! │  │   └── InvalidKey           - Malformed/zero/off-curve key material  │
//! │  │                                                                      │
//! │  ├── Envelope Errors                                                   │
//! │  │   ├── Format               - Malformed envelope or serialization    │
//! │  │   ├── Authentication       - MAC mismatch (wrong key or tampering)  │
//! │  │   └── Padding              - Valid MAC but inconsistent unpad       │
//! │  │                                                                      │
//! │  ├── Event Errors                                                      │
//! │  │   ├── Signature            - Invalid event signature (forgery)      │
//! │  │   ├── IdentityMismatch     - Seal/rumor sender binding violated     │
//! │  │   └── NotRecipient         - Routing tag names someone else         │
//! │  │                                                                      │
//! │  └── Receive Coalescing                                                │
//! │      └── Decryption           - Opaque receive failure (see below)     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Oracle Resistance
//!
//! `receive_dm` never returns the inner variants above. Every receive-side
//! failure is coalesced into the single opaque [`Error::Decryption`] so an
//! adversary probing the recipient cannot distinguish *why* an envelope was
//! rejected (signature vs. MAC vs. padding vs. routing) and use the answer
//! as a decryption or membership oracle. Applications must treat every
//! `Decryption` error identically, e.g. by silently discarding the event.
//!
//! `InvalidKey` is the exception on the *send* path: it signals caller
//! misuse rather than adversarial input, and propagates uncaught.

use thiserror::Error;

/// Result type alias for Murmur Core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for Murmur Core
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Key Errors
    // ========================================================================
    /// Key material is malformed, zero, or off-curve.
    ///
    /// This is a programmer error: it is never retried and never coalesced.
    #[error("Invalid key material: {0}")]
    InvalidKey(String),

    // ========================================================================
    // Symmetric Envelope Errors
    // ========================================================================
    /// Envelope or serialized payload could not be parsed.
    #[error("Malformed envelope: {0}")]
    Format(String),

    /// MAC verification failed: wrong key or tampered ciphertext.
    ///
    /// This is the dominant failure mode for traffic that was simply not
    /// addressed to the caller.
    #[error("Envelope authentication failed")]
    Authentication,

    /// The MAC verified but the padding was inconsistent.
    ///
    /// A valid MAC rules out tampering, so this indicates a logic bug on
    /// the sending side rather than an attack.
    #[error("Envelope padding is inconsistent")]
    Padding,

    // ========================================================================
    // Event Errors
    // ========================================================================
    /// Event signature did not verify against its author key.
    ///
    /// The event is treated as forged and discarded.
    #[error("Event signature verification failed")]
    Signature,

    /// The rumor's author does not match the seal's author.
    ///
    /// A relay or intermediary attempted to splice a different claimed
    /// sender into an otherwise validly sealed envelope.
    #[error("Seal author does not match rumor author")]
    IdentityMismatch,

    /// The gift wrap's routing tag does not name the caller.
    ///
    /// Cheap pre-filter rejection, raised before any decryption work.
    #[error("Gift wrap is not addressed to this recipient")]
    NotRecipient,

    /// Event or payload serialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),

    // ========================================================================
    // Receive Coalescing
    // ========================================================================
    /// Opaque receive failure.
    ///
    /// Deliberately carries no detail: see the module docs on oracle
    /// resistance. The discarded cause is logged at `debug` level only.
    #[error("Message could not be decrypted")]
    Decryption,
}
