//! # Gift Wrap — the disposable outer layer
//!
//! The gift wrap is the only structure ever handed to the transport. It
//! is authored by a one-time ephemeral keypair — never the real sender —
//! and carries a fuzzed timestamp, so a relay observing it learns only
//! the recipient routing tag, an unlinkable author key, and a time within
//! the fuzz window.
//!
//! ## Ephemeral Keys
//!
//! One fresh keypair per call, generated from the OS CSPRNG, used to sign
//! exactly one wrap, then dropped (and zeroized on drop). Reuse across
//! calls would let a relay link messages from the same sender; this is a
//! hard invariant, not an optimization.
//!
//! ## Timestamp Fuzzing
//!
//! ```text
//! fuzzed = now - FUZZ_WINDOW + uniform(0, 2 * FUZZ_WINDOW)
//! fuzzed = min(fuzzed, now)                 // never in the future
//! ```
//!
//! The clamp keeps `0 <= now - created_at <= FUZZ_WINDOW`, so a wrap
//! never advertises a time after its actual send time. The true send time
//! survives only inside the rumor, two ciphertext layers down.

use rand::{rngs::OsRng, Rng};

use crate::crypto::{cipher, ConversationKey, Keys, PublicKey};
use crate::dm::seal::Seal;
use crate::error::{Error, Result};
use crate::event::{recipient_tag, Event, KIND_GIFT_WRAP};

/// Default timestamp fuzz window: 2 days, in seconds
pub const DEFAULT_FUZZ_WINDOW: i64 = 172_800;

/// Policy knobs for wrapping
///
/// The only configuration surface of this core. Passed explicitly rather
/// than read from ambient state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WrapPolicy {
    /// Maximum seconds a wrap's advertised timestamp may lag the true
    /// send time
    pub fuzz_window: i64,
}

impl Default for WrapPolicy {
    fn default() -> Self {
        Self {
            fuzz_window: DEFAULT_FUZZ_WINDOW,
        }
    }
}

/// A gift-wrapped seal: kind-1059 event, ephemeral author, one routing tag
#[derive(Debug, Clone, PartialEq)]
pub struct GiftWrap {
    event: Event,
}

impl GiftWrap {
    /// Event id (hex) — public data, safe to log.
    pub fn id(&self) -> &str {
        &self.event.id
    }

    /// The ephemeral author key. Never equal to the real sender.
    pub fn author(&self) -> Result<PublicKey> {
        self.event.author()
    }

    /// The fuzzed, clamped timestamp.
    pub fn created_at(&self) -> i64 {
        self.event.created_at
    }

    /// The recipient named by the routing tag.
    pub fn recipient(&self) -> Option<PublicKey> {
        self.event.tagged_recipient()
    }

    /// Borrow the wire event form.
    pub fn as_event(&self) -> &Event {
        &self.event
    }

    /// Consume into the wire event form, ready to publish.
    pub fn into_event(self) -> Event {
        self.event
    }

    /// Adopt a wire event as a gift wrap, checking its shape.
    pub fn from_event(event: Event) -> Result<Self> {
        if event.kind != KIND_GIFT_WRAP {
            return Err(Error::Format(format!(
                "Expected gift wrap kind {}, got {}",
                KIND_GIFT_WRAP, event.kind
            )));
        }
        if event.sig.is_none() {
            return Err(Error::Format("Gift wrap must be signed".into()));
        }
        if event.tagged_recipient().is_none() {
            return Err(Error::Format("Gift wrap must carry a recipient tag".into()));
        }
        Ok(Self { event })
    }
}

/// Wrap a seal for `recipient` under a fresh ephemeral identity.
///
/// The ephemeral secret signs exactly one event and is dropped before
/// this function returns; dropping zeroizes it.
pub fn wrap(seal: &Seal, recipient: &PublicKey, now: i64, policy: &WrapPolicy) -> Result<GiftWrap> {
    let ephemeral = Keys::generate();

    let key = ConversationKey::derive(&ephemeral, recipient)?;
    let content = cipher::encrypt(seal.to_wire()?.as_bytes(), &key)?;

    let event = Event::new_signed(
        &ephemeral,
        fuzz_timestamp(now, policy.fuzz_window),
        KIND_GIFT_WRAP,
        vec![recipient_tag(recipient)],
        content,
    )?;

    Ok(GiftWrap { event })
}

/// Verify, filter, decrypt, and parse a gift wrap back into its seal.
///
/// Fails with `Signature` on a bad wrap signature and `NotRecipient` if
/// the routing tag names someone else — a cheap rejection raised before
/// any decryption work. Envelope failures propagate as
/// `Authentication`/`Format`.
pub fn unwrap(wrap: &GiftWrap, recipient: &Keys) -> Result<Seal> {
    wrap.event.verify()?;

    let tagged = wrap.event.tagged_recipient().ok_or(Error::NotRecipient)?;
    if tagged != recipient.public() {
        return Err(Error::NotRecipient);
    }

    let key = ConversationKey::derive(recipient, &wrap.event.author()?)?;
    let plaintext = cipher::decrypt(&wrap.event.content, &key)?;
    let json = String::from_utf8(plaintext)
        .map_err(|_| Error::Format("Gift wrap payload is not UTF-8".into()))?;

    Seal::from_wire(&json)
}

fn fuzz_timestamp(now: i64, window: i64) -> i64 {
    let window = window.max(0);
    if window == 0 {
        return now;
    }
    let fuzzed = now - window + OsRng.gen_range(0..=2 * window);
    fuzzed.min(now)
}

// ============================================================================
// TESTS
// ============================================================================
