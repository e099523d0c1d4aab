//! # Seal — the signed middle layer
//!
//! A seal binds a rumor to the real sender without exposing the
//! plaintext: the serialized rumor is encrypted under the conversation
//! key between sender and recipient, and the resulting event is signed by
//! the sender's real identity key. Seals are never published directly;
//! they exist only inside the ciphertext of a gift wrap.
//!
//! The binding check on unseal — decrypted rumor author must equal seal
//! author — is what stops a relay or intermediary from splicing a
//! different claimed sender onto an otherwise validly sealed envelope.

use tracing::warn;

use crate::crypto::{cipher, ConversationKey, Keys, PublicKey};
use crate::dm::rumor::Rumor;
use crate::error::{Error, Result};
use crate::event::{Event, KIND_SEAL};

/// A sealed rumor: kind-13 event, empty tags, signed by the real sender
///
/// Invariants are enforced by construction: the only ways to obtain a
/// `Seal` are [`seal`] and the shape-checked [`Seal::from_event`].
#[derive(Debug, Clone, PartialEq)]
pub struct Seal {
    event: Event,
}

impl Seal {
    /// The claimed sender (verified against the rumor on unseal).
    pub fn author(&self) -> Result<PublicKey> {
        self.event.author()
    }

    /// Event timestamp (equal to the rumor's send time).
    pub fn created_at(&self) -> i64 {
        self.event.created_at
    }

    /// Borrow the wire event form.
    pub fn as_event(&self) -> &Event {
        &self.event
    }

    /// Adopt a wire event as a seal, checking its shape.
    ///
    /// Signature verification is deliberately left to [`unseal`]; this
    /// only rejects events that are not seal-shaped at all.
    pub fn from_event(event: Event) -> Result<Self> {
        if event.kind != KIND_SEAL {
            return Err(Error::Format(format!(
                "Expected seal kind {}, got {}",
                KIND_SEAL, event.kind
            )));
        }
        if !event.tags.is_empty() {
            // A tagged seal would leak routing metadata through the wrap.
            return Err(Error::Format("Seal must carry no tags".into()));
        }
        if event.sig.is_none() {
            return Err(Error::Format("Seal must be signed".into()));
        }
        Ok(Self { event })
    }

    pub(crate) fn to_wire(&self) -> Result<String> {
        self.event.to_json()
    }

    pub(crate) fn from_wire(json: &str) -> Result<Self> {
        Self::from_event(Event::from_json(json)?)
    }
}

/// Encrypt and sign `rumor` for `recipient` under the sender's real
/// identity.
///
/// The seal's timestamp repeats the rumor's send time: the seal never
/// leaves the sending process in the clear, so there is nothing to fuzz
/// at this layer.
pub fn seal(rumor: &Rumor, sender: &Keys, recipient: &PublicKey) -> Result<Seal> {
    if rumor.author != sender.public() {
        // Sealing someone else's rumor would fail the binding check on
        // every receive; reject it at construction instead.
        return Err(Error::IdentityMismatch);
    }

    let key = ConversationKey::derive(sender, recipient)?;
    let content = cipher::encrypt(rumor.to_wire()?.as_bytes(), &key)?;

    let event = Event::new_signed(sender, rumor.sent_at, KIND_SEAL, vec![], content)?;
    Ok(Seal { event })
}

/// Verify, decrypt, and parse a seal back into its rumor.
///
/// Fails with `Signature` on a bad seal signature, propagates
/// `Authentication`/`Format` from the envelope, and fails with
/// `IdentityMismatch` if the rumor claims a different author than the
/// seal was signed by.
pub fn unseal(seal: &Seal, recipient: &Keys) -> Result<Rumor> {
    seal.event.verify()?;
    let author = seal.event.author()?;

    let key = ConversationKey::derive(recipient, &author)?;
    let plaintext = cipher::decrypt(&seal.event.content, &key)?;
    let json = String::from_utf8(plaintext)
        .map_err(|_| Error::Format("Seal payload is not UTF-8".into()))?;

    let rumor = Rumor::from_wire(&json)?;
    if rumor.author != author {
        // Spoofing attempt: log the event id (public data) and nothing else.
        warn!(seal_id = %seal.event.id, "rumor author does not match seal author");
        return Err(Error::IdentityMismatch);
    }

    Ok(rumor)
}

// ============================================================================
// TESTS
// ============================================================================
