//! # Murmur Core
//!
//! A layered, metadata-protecting private-messaging core. A message is
//! wrapped in two nested authenticated-encryption envelopes so that, once
//! broadcast over a public untrusted relay network, it reveals neither its
//! plaintext, nor its true sender, nor (beyond a bounded fuzz window) its
//! true send time — to anyone except the intended recipient.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         MURMUR CORE MODULES                             │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  ┌──────────────────────────── dm ─────────────────────────────────┐   │
//! │  │                                                                  │   │
//! │  │   send_dm:     plaintext ─► Rumor ─► Seal ─► GiftWrap ─► relay  │   │
//! │  │   receive_dm:  relay ─► GiftWrap ─► Seal ─► Rumor ─► plaintext  │   │
//! │  │                                                                  │   │
//! │  └──────────────────────────────┬───────────────────────────────────┘   │
//! │                                 │                                       │
//! │  ┌───────────────┐  ┌───────────┴───┐  ┌───────────────────────────┐   │
//! │  │    crypto     │  │     event     │  │          relay            │   │
//! │  │               │  │               │  │                           │   │
//! │  │ - Keys/ECDH   │  │ - canonical   │  │ - publish/subscribe trait │   │
//! │  │ - envelope    │  │   ids + sigs  │  │ - kind/recipient filters  │   │
//! │  │ - signatures  │  │ - wire JSON   │  │   (async boundary only)   │   │
//! │  └───────────────┘  └───────────────┘  └───────────────────────────┘   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Security Model
//!
//! What each observer sees for one published message:
//!
//! | Observer | Learns |
//! |----------|--------|
//! | Relay / network | recipient routing tag, one-time author key, fuzzed timestamp, ciphertext length bucket |
//! | Recipient | plaintext, authenticated real sender, true send time |
//! | Anyone else calling `receive_dm` | one opaque `Decryption` error |
//!
//! Deliberate non-goals: forward secrecy across message history (keys are
//! re-derived from long-term keys per message), recipient anonymity (the
//! routing tag is visible so relays can filter), and resistance to a
//! global passive adversary correlating connection timing.
//!
//! ## Concurrency
//!
//! Every operation is a synchronous, CPU-bound pure transform; no call
//! holds state for the next. Calls are safe to run concurrently from any
//! number of threads — the only shared resource is the OS CSPRNG. Private
//! keys are borrowed for the duration of one call, never copied into
//! longer-lived storage, never logged, and zeroized on drop.
//!
//! ## Example
//!
//! ```no_run
//! use murmur_core::{receive_dm, send_dm, Keys, WrapPolicy};
//!
//! # fn main() -> murmur_core::Result<()> {
//! let alice = Keys::generate();
//! let bob = Keys::generate();
//!
//! let wrap = send_dm("Hello Bob!", &bob.public(), &alice, &[], &WrapPolicy::default())?;
//! // wrap.into_event() is the only thing ever handed to a relay.
//!
//! let dm = receive_dm(&wrap, &bob)?;
//! assert_eq!(dm.content, "Hello Bob!");
//! assert_eq!(dm.sender, alice.public());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

// ============================================================================
// MODULE DECLARATIONS
// ============================================================================

pub mod crypto;
pub mod dm;
pub mod error;
pub mod event;
pub mod relay;
pub mod time;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

pub use crypto::{ConversationKey, Keys, PublicKey, Signature};
pub use dm::{
    receive_dm, seal, send_dm, unseal, unwrap, wrap, GiftWrap, ReceivedDm, Rumor, Seal,
    WrapPolicy, DEFAULT_FUZZ_WINDOW,
};
pub use error::{Error, Result};
pub use event::{Event, KIND_GIFT_WRAP, KIND_PRIVATE_MESSAGE, KIND_SEAL};
pub use relay::{Ack, Filter, Relay};
