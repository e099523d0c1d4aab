//! # Direct Messages
//!
//! The DM pipeline: three nested layers, each a plain transform with no
//! state between calls.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        SEND (data flows down)                           │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │   plaintext ──► Rumor      unsigned, true sender, true send time       │
//! │                   │                                                     │
//! │                   ▼        encrypt(conversation key: sender ↔ recip)   │
//! │                 Seal       signed by the REAL sender                   │
//! │                   │                                                     │
//! │                   ▼        encrypt(conversation key: ephemeral ↔ recip)│
//! │               GiftWrap     signed by a ONE-TIME key, fuzzed timestamp  │
//! │                   │                                                     │
//! │                   ▼                                                     │
//! │                relay       (the only thing the transport ever sees)    │
//! │                                                                         │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                       RECEIVE (data flows up)                           │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │   GiftWrap ──verify──filter──decrypt──► Seal ──verify──decrypt──►      │
//! │   Rumor ──binding check──► { content, sender, sent_at }                │
//! │                                                                         │
//! │   Any failure, at any stage, surfaces as the single opaque             │
//! │   Error::Decryption. Stage detail goes to debug logs only.             │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! What a relay observer learns from a published wrap: the recipient
//! routing tag, an unlinkable one-time author key, a timestamp within the
//! fuzz window, and a padded ciphertext length bucket. Nothing else.

mod rumor;
mod seal;
mod wrap;

pub use rumor::Rumor;
pub use seal::{seal, unseal, Seal};
pub use wrap::{unwrap, wrap, GiftWrap, WrapPolicy, DEFAULT_FUZZ_WINDOW};

use tracing::debug;

use crate::crypto::{Keys, PublicKey};
use crate::error::{Error, Result};
use crate::time::now_timestamp;

/// A successfully received and authenticated direct message
#[derive(Debug, Clone, PartialEq)]
pub struct ReceivedDm {
    /// Plaintext message body
    pub content: String,
    /// The real, authenticated sender
    pub sender: PublicKey,
    /// True send time from the rumor (Unix seconds)
    pub sent_at: i64,
}

/// Build, seal, and wrap a direct message, returning the gift wrap ready
/// for publication.
///
/// Stamps the rumor with the real current time; the wrap gets a fuzzed
/// one. Every call produces a distinct ephemeral author key and, with
/// overwhelming probability, a distinct fuzzed timestamp, even for
/// identical arguments.
///
/// `InvalidKey` propagates uncaught here: on the send path it signals
/// caller misuse, not adversarial input.
pub fn send_dm(
    content: &str,
    recipient: &PublicKey,
    sender: &Keys,
    extra_tags: &[Vec<String>],
    policy: &WrapPolicy,
) -> Result<GiftWrap> {
    let now = now_timestamp();
    let rumor = Rumor::build(&sender.public(), recipient, content, now, extra_tags);
    let sealed = seal(&rumor, sender, recipient)?;
    wrap(&sealed, recipient, now, policy)
}

/// Unwrap and unseal a received gift wrap.
///
/// Every inner failure — bad signature, wrong recipient, MAC mismatch,
/// malformed payload, padding inconsistency, author splicing — is
/// coalesced into the single opaque [`Error::Decryption`]. This is
/// deliberate: distinguishable failures would give an adversary an oracle
/// to probe for valid recipients or tamper gradually. Treat every
/// `Decryption` error identically (silently discard the event) and never
/// surface stage detail to an untrusted observer.
pub fn receive_dm(gift_wrap: &GiftWrap, recipient: &Keys) -> Result<ReceivedDm> {
    match receive_inner(gift_wrap, recipient) {
        Ok(dm) => Ok(dm),
        Err(cause) => {
            // The only place the stage detail survives. Event id is public
            // data; the cause never reaches the caller.
            debug!(wrap_id = %gift_wrap.id(), %cause, "discarding undecryptable gift wrap");
            Err(Error::Decryption)
        }
    }
}

fn receive_inner(gift_wrap: &GiftWrap, recipient: &Keys) -> Result<ReceivedDm> {
    let sealed = unwrap(gift_wrap, recipient)?;
    let rumor = unseal(&sealed, recipient)?;
    Ok(ReceivedDm {
        content: rumor.content,
        sender: rumor.author,
        sent_at: rumor.sent_at,
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_receive_roundtrip() {
        let alice = Keys::generate();
        let bob = Keys::generate();

        let before = now_timestamp();
        let wrapped = send_dm("Hello Bob!", &bob.public(), &alice, &[], &WrapPolicy::default())
            .unwrap();
        let after = now_timestamp();

        let dm = receive_dm(&wrapped, &bob).unwrap();
        assert_eq!(dm.content, "Hello Bob!");
        assert_eq!(dm.sender, alice.public());
        assert!(dm.sent_at >= before && dm.sent_at <= after);
    }

    #[test]
    fn test_receive_failures_are_opaque() {
        let alice = Keys::generate();
        let bob = Keys::generate();
        let charlie = Keys::generate();

        let wrapped = send_dm("secret", &bob.public(), &alice, &[], &WrapPolicy::default())
            .unwrap();

        // Wrong recipient: opaque, not NotRecipient.
        assert!(matches!(
            receive_dm(&wrapped, &charlie),
            Err(Error::Decryption)
        ));

        // Tampered ciphertext: opaque, not Authentication or Signature.
        let mut event = wrapped.into_event();
        let mut bytes = event.content.into_bytes();
        let mid = bytes.len() / 2;
        bytes[mid] ^= 0x01;
        event.content = String::from_utf8(bytes).unwrap();
        if let Ok(tampered) = GiftWrap::from_event(event) {
            assert!(matches!(receive_dm(&tampered, &bob), Err(Error::Decryption)));
        }
    }

    #[test]
    fn test_extra_tags_survive_into_rumor() {
        let alice = Keys::generate();
        let bob = Keys::generate();
        let reply = vec!["e".to_string(), "11".repeat(32)];

        let wrapped = send_dm(
            "threaded",
            &bob.public(),
            &alice,
            std::slice::from_ref(&reply),
            &WrapPolicy::default(),
        )
        .unwrap();

        let sealed = unwrap(&wrapped, &bob).unwrap();
        let rumor = unseal(&sealed, &bob).unwrap();
        assert!(rumor.tags.contains(&reply));
    }

    #[test]
    fn test_wrap_timestamp_never_exceeds_send_time() {
        let alice = Keys::generate();
        let bob = Keys::generate();

        for _ in 0..20 {
            let wrapped =
                send_dm("tick", &bob.public(), &alice, &[], &WrapPolicy::default()).unwrap();
            let now = now_timestamp();
            assert!(wrapped.created_at() <= now);
            assert!(now - wrapped.created_at() <= DEFAULT_FUZZ_WINDOW + 1);
        }
    }
}
