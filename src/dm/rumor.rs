//! # Rumor — the unsigned inner record
//!
//! A rumor carries the true plaintext and the true send time. It is never
//! signed and never transmitted directly: a signed rumor would bind the
//! plaintext to the real sender, and a published one would leak it. The
//! only place a rumor exists outside the sending process is inside the
//! ciphertext of a seal.

use serde::{Deserialize, Serialize};

use crate::crypto::PublicKey;
use crate::error::{Error, Result};
use crate::event::{recipient_tag, Event, KIND_PRIVATE_MESSAGE};

/// The plaintext inner message record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rumor {
    /// The real sender
    pub author: PublicKey,
    /// True wall-clock send time (Unix seconds) — the only place it
    /// survives, recoverable only by the recipient
    pub sent_at: i64,
    /// Recipient routing tag plus any caller-supplied reply/context tags
    pub tags: Vec<Vec<String>>,
    /// Plaintext message body
    pub content: String,
}

impl Rumor {
    /// Pure construction: recipient routing tag first, then any extra
    /// tags, stamped with `sent_at`. No cryptography happens here; any
    /// content-size policy is the caller's concern.
    pub fn build(
        sender: &PublicKey,
        recipient: &PublicKey,
        content: &str,
        sent_at: i64,
        extra_tags: &[Vec<String>],
    ) -> Self {
        let mut tags = Vec::with_capacity(1 + extra_tags.len());
        tags.push(recipient_tag(recipient));
        tags.extend_from_slice(extra_tags);

        Self {
            author: *sender,
            sent_at,
            tags,
            content: content.to_string(),
        }
    }

    /// Serialize to the unsigned wire event form.
    ///
    /// Field order is canonical (the event id hashes over it), so the
    /// serialization is stable for identical rumors.
    pub(crate) fn to_wire(&self) -> Result<String> {
        Event::new_unsigned(
            &self.author,
            self.sent_at,
            KIND_PRIVATE_MESSAGE,
            self.tags.clone(),
            self.content.clone(),
        )?
        .to_json()
    }

    /// Parse from the unsigned wire event form.
    pub(crate) fn from_wire(json: &str) -> Result<Self> {
        let event = Event::from_json(json)?;
        if event.kind != KIND_PRIVATE_MESSAGE {
            return Err(Error::Format(format!(
                "Expected rumor kind {}, got {}",
                KIND_PRIVATE_MESSAGE, event.kind
            )));
        }
        let author = event
            .author()
            .map_err(|_| Error::Format("Rumor author is not a valid key".into()))?;

        Ok(Self {
            author,
            sent_at: event.created_at,
            tags: event.tags,
            content: event.content,
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::Keys;

    #[test]
    fn test_build_sets_routing_tag_first() {
        let sender = Keys::generate().public();
        let recipient = Keys::generate().public();
        let extra = vec![vec!["e".to_string(), "00".repeat(32)]];

        let rumor = Rumor::build(&sender, &recipient, "hi", 1_700_000_000, &extra);
        assert_eq!(rumor.tags.len(), 2);
        assert_eq!(rumor.tags[0], recipient_tag(&recipient));
        assert_eq!(rumor.tags[1], extra[0]);
        assert_eq!(rumor.author, sender);
        assert_eq!(rumor.sent_at, 1_700_000_000);
    }

    #[test]
    fn test_wire_roundtrip() {
        let sender = Keys::generate().public();
        let recipient = Keys::generate().public();
        let rumor = Rumor::build(&sender, &recipient, "héllo 🎁", 1_700_000_000, &[]);

        let json = rumor.to_wire().unwrap();
        assert_eq!(Rumor::from_wire(&json).unwrap(), rumor);
    }

    #[test]
    fn test_wire_form_is_unsigned() {
        let sender = Keys::generate().public();
        let recipient = Keys::generate().public();
        let rumor = Rumor::build(&sender, &recipient, "hi", 1_700_000_000, &[]);
        assert!(!rumor.to_wire().unwrap().contains("\"sig\""));
    }

    #[test]
    fn test_from_wire_rejects_wrong_kind() {
        let sender = Keys::generate().public();
        let event = Event::new_unsigned(&sender, 1, crate::event::KIND_SEAL, vec![], "x".into())
            .unwrap();
        let json = event.to_json().unwrap();
        assert!(matches!(Rumor::from_wire(&json), Err(Error::Format(_))));
    }
}
