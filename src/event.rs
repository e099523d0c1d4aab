//! # Wire Events
//!
//! Every protocol layer serializes to the same canonical event shape:
//!
//! ```text
//! { id, pubkey, created_at, kind, tags, content, sig }
//! ```
//!
//! `id` is the SHA-256 hash of the canonical array form
//! `[0, pubkey, created_at, kind, tags, content]` and `sig` is a 64-byte
//! signature over the raw `id` bytes. A rumor travels *unsigned* (no
//! `sig`) — signing it would bind the plaintext to the true sender.
//!
//! Kinds distinguish the three layers. Only gift-wrap events are ever
//! handed to the relay boundary; rumor and seal events exist solely inside
//! the ciphertext of the layer above them.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::crypto::{sign, verify, Keys, PublicKey, Signature};
use crate::error::{Error, Result};

/// Kind tag for the plaintext inner message (rumor)
pub const KIND_PRIVATE_MESSAGE: u32 = 14;

/// Kind tag for the sealed middle layer
pub const KIND_SEAL: u32 = 13;

/// Kind tag for the outer gift wrap — the only kind ever published
pub const KIND_GIFT_WRAP: u32 = 1059;

/// Canonical wire event
///
/// This is the transport-facing shape; the typed `Rumor`/`Seal`/`GiftWrap`
/// structs convert to and from it at their boundaries and enforce the
/// per-layer invariants the loose shape cannot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Content hash over the canonical array form (hex)
    pub id: String,
    /// Author public key (hex)
    pub pubkey: String,
    /// Unix timestamp in seconds
    pub created_at: i64,
    /// Layer kind
    pub kind: u32,
    /// Tags; `["p", <pubkey>]` is the recipient routing tag
    pub tags: Vec<Vec<String>>,
    /// Payload: plaintext for rumors, base64 envelope for seal/wrap
    pub content: String,
    /// Signature over the id bytes (hex); absent on unsigned rumors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sig: Option<String>,
}

impl Event {
    /// Build an unsigned event (rumor form).
    pub fn new_unsigned(
        author: &PublicKey,
        created_at: i64,
        kind: u32,
        tags: Vec<Vec<String>>,
        content: String,
    ) -> Result<Self> {
        let pubkey = author.to_hex();
        let id = compute_id(&pubkey, created_at, kind, &tags, &content)?;
        Ok(Self {
            id: hex::encode(id),
            pubkey,
            created_at,
            kind,
            tags,
            content,
            sig: None,
        })
    }

    /// Build and sign an event with `keys`.
    pub fn new_signed(
        keys: &Keys,
        created_at: i64,
        kind: u32,
        tags: Vec<Vec<String>>,
        content: String,
    ) -> Result<Self> {
        let pubkey = keys.public().to_hex();
        let id = compute_id(&pubkey, created_at, kind, &tags, &content)?;
        let sig = sign(keys, &id);
        Ok(Self {
            id: hex::encode(id),
            pubkey,
            created_at,
            kind,
            tags,
            content,
            sig: Some(sig.to_hex()),
        })
    }

    /// Verify the event id and signature.
    ///
    /// Recomputes the canonical id from the fields — an event whose id does
    /// not match its own content is treated as forged, the same as a bad
    /// signature.
    pub fn verify(&self) -> Result<()> {
        let expected = compute_id(
            &self.pubkey,
            self.created_at,
            self.kind,
            &self.tags,
            &self.content,
        )?;
        let claimed = hex::decode(&self.id).map_err(|_| Error::Signature)?;
        if claimed != expected {
            return Err(Error::Signature);
        }

        let sig_hex = self.sig.as_deref().ok_or(Error::Signature)?;
        let sig = Signature::from_hex(sig_hex)?;
        verify(&self.author()?, &expected, &sig)
    }

    /// Parse the author public key.
    pub fn author(&self) -> Result<PublicKey> {
        PublicKey::from_hex(&self.pubkey)
    }

    /// First `p` routing tag, if any.
    pub fn tagged_recipient(&self) -> Option<PublicKey> {
        self.tags
            .iter()
            .find(|tag| tag.len() >= 2 && tag[0] == "p")
            .and_then(|tag| PublicKey::from_hex(&tag[1]).ok())
    }

    /// Serialize to canonical JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Parse from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Format(format!("Invalid event JSON: {}", e)))
    }
}

/// Build a `["p", <pubkey>]` recipient routing tag.
pub fn recipient_tag(recipient: &PublicKey) -> Vec<String> {
    vec!["p".to_string(), recipient.to_hex()]
}

/// SHA-256 over the canonical array form `[0, pubkey, created_at, kind,
/// tags, content]`.
fn compute_id(
    pubkey: &str,
    created_at: i64,
    kind: u32,
    tags: &[Vec<String>],
    content: &str,
) -> Result<[u8; 32]> {
    let canonical = serde_json::to_vec(&(0u8, pubkey, created_at, kind, tags, content))
        .map_err(|e| Error::Serialization(e.to_string()))?;
    Ok(Sha256::digest(&canonical).into())
}

// ============================================================================
// TESTS
// ============================================================================
