//! # Relay Boundary
//!
//! The transport seam. A relay stores and forwards *gift-wrap events
//! only*; this core treats it as an opaque capability and never inspects
//! transport-level metadata. All asynchrony lives here at the boundary —
//! the cryptographic pipeline itself is synchronous.
//!
//! Applications implement [`Relay`] over their transport of choice
//! (websocket, in-process bus, test double); the core only defines the
//! contract and the [`Filter`] shape used to select events.

use async_trait::async_trait;
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};

use crate::crypto::PublicKey;
use crate::error::Result;
use crate::event::{Event, KIND_GIFT_WRAP};

/// Acknowledgement returned by a relay for a published event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ack {
    /// Id of the event the relay acted on
    pub id: String,
    /// Whether the relay accepted the event
    pub accepted: bool,
}

/// Subscription filter
///
/// Selects by kind and by recipient routing tag — the two dimensions a
/// relay can index without seeing inside any envelope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    /// Event kinds to select
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kinds: Option<Vec<u32>>,
    /// Recipient routing tag values (hex pubkeys)
    #[serde(rename = "#p", skip_serializing_if = "Option::is_none")]
    pub recipients: Option<Vec<String>>,
    /// Only events with `created_at >= since`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub since: Option<i64>,
    /// Maximum number of stored events to replay
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

impl Filter {
    /// Filter for all gift wraps addressed to `recipient`.
    ///
    /// Note the `since` caveat: because wrap timestamps are fuzzed up to
    /// the fuzz window into the past, a `since` of "last seen" would miss
    /// messages; callers should back-date it by the window.
    pub fn gift_wraps_for(recipient: &PublicKey) -> Self {
        Self {
            kinds: Some(vec![KIND_GIFT_WRAP]),
            recipients: Some(vec![recipient.to_hex()]),
            since: None,
            limit: None,
        }
    }

    /// Whether `event` passes this filter (ignoring `limit`).
    pub fn matches(&self, event: &Event) -> bool {
        if let Some(kinds) = &self.kinds {
            if !kinds.contains(&event.kind) {
                return false;
            }
        }
        if let Some(recipients) = &self.recipients {
            let tagged = event
                .tags
                .iter()
                .any(|tag| tag.len() >= 2 && tag[0] == "p" && recipients.contains(&tag[1]));
            if !tagged {
                return false;
            }
        }
        if let Some(since) = self.since {
            if event.created_at < since {
                return false;
            }
        }
        true
    }
}

/// Store-and-forward transport for gift-wrap events
///
/// The core never writes anywhere else and never reads anything but the
/// events a subscription yields.
#[async_trait]
pub trait Relay: Send + Sync {
    /// Publish an event; the relay answers with an acknowledgement.
    async fn publish(&self, event: Event) -> Result<Ack>;

    /// Subscribe to events passing `filter`.
    async fn subscribe(&self, filter: Filter) -> Result<BoxStream<'static, Event>>;
}

// ============================================================================
// TESTS
// ============================================================================
