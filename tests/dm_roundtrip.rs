//! End-to-end tests for the DM pipeline: round-trip fidelity, metadata
//! opacity, failure opacity, and the relay boundary.

use std::collections::HashSet;

use async_trait::async_trait;
use futures::stream::BoxStream;
use futures::StreamExt;

use murmur_core::{
    receive_dm, send_dm, Ack, Error, Event, Filter, GiftWrap, Keys, Relay, Result, WrapPolicy,
    DEFAULT_FUZZ_WINDOW, KIND_GIFT_WRAP,
};

fn now() -> i64 {
    murmur_core::time::now_timestamp()
}

// ============================================================================
// Scenario A: Alice sends "Hello Bob!" to Bob
// ============================================================================

#[test]
fn alice_to_bob_roundtrip() {
    let alice = Keys::generate();
    let bob = Keys::generate();

    let before = now();
    let wrap = send_dm("Hello Bob!", &bob.public(), &alice, &[], &WrapPolicy::default()).unwrap();
    let after = now();

    // The wrap names Bob in its routing tag...
    assert_eq!(wrap.recipient(), Some(bob.public()));
    // ...but is authored by neither Alice nor Bob.
    let author = wrap.author().unwrap();
    assert_ne!(author, alice.public());
    assert_ne!(author, bob.public());

    let dm = receive_dm(&wrap, &bob).unwrap();
    assert_eq!(dm.content, "Hello Bob!");
    assert_eq!(dm.sender, alice.public());
    assert!(dm.sent_at >= before && dm.sent_at <= after);
}

// ============================================================================
// Scenario B: Charlie (uninvolved) sees the same wrap
// ============================================================================

#[test]
fn third_party_gets_opaque_error() {
    let alice = Keys::generate();
    let bob = Keys::generate();
    let charlie = Keys::generate();

    let wrap = send_dm("Hello Bob!", &bob.public(), &alice, &[], &WrapPolicy::default()).unwrap();

    assert!(matches!(receive_dm(&wrap, &charlie), Err(Error::Decryption)));
}

// ============================================================================
// Scenario C: edge payloads round-trip byte-exact
// ============================================================================

#[test]
fn edge_payloads_roundtrip() {
    let alice = Keys::generate();
    let bob = Keys::generate();
    let policy = WrapPolicy::default();

    // Empty content round-trips to an empty string.
    let wrap = send_dm("", &bob.public(), &alice, &[], &policy).unwrap();
    assert_eq!(receive_dm(&wrap, &bob).unwrap().content, "");

    // 10,000-byte content round-trips byte-exact (padding never truncates).
    let long: String = "m".repeat(10_000);
    let wrap = send_dm(&long, &bob.public(), &alice, &[], &policy).unwrap();
    assert_eq!(receive_dm(&wrap, &bob).unwrap().content, long);

    // Unicode round-trips byte-exact.
    let unicode = "秘密のメッセージ 🤫 — çã ñ";
    let wrap = send_dm(unicode, &bob.public(), &alice, &[], &policy).unwrap();
    assert_eq!(receive_dm(&wrap, &bob).unwrap().content, unicode);
}

// ============================================================================
// Non-reuse and timestamp properties
// ============================================================================

#[test]
fn hundred_sends_hundred_distinct_ephemeral_authors() {
    let alice = Keys::generate();
    let bob = Keys::generate();
    let policy = WrapPolicy::default();

    let authors: HashSet<String> = (0..100)
        .map(|_| {
            send_dm("same args", &bob.public(), &alice, &[], &policy)
                .unwrap()
                .author()
                .unwrap()
                .to_hex()
        })
        .collect();

    assert_eq!(authors.len(), 100);
    assert!(!authors.contains(&alice.public().to_hex()));
}

#[test]
fn fuzzed_timestamp_stays_within_window_and_never_future() {
    let alice = Keys::generate();
    let bob = Keys::generate();
    let policy = WrapPolicy::default();

    for _ in 0..50 {
        let wrap = send_dm("tick", &bob.public(), &alice, &[], &policy).unwrap();
        let send_time = now();
        assert!(wrap.created_at() <= send_time);
        // +1 tolerates the clock ticking between stamp and assertion.
        assert!(send_time - wrap.created_at() <= DEFAULT_FUZZ_WINDOW + 1);
    }
}

#[test]
fn fuzz_window_is_policy_configurable() {
    let alice = Keys::generate();
    let bob = Keys::generate();
    let policy = WrapPolicy { fuzz_window: 60 };

    for _ in 0..20 {
        let wrap = send_dm("tick", &bob.public(), &alice, &[], &policy).unwrap();
        assert!(now() - wrap.created_at() <= 61);
    }
}

// ============================================================================
// Tampering and forgery
// ============================================================================

#[test]
fn single_bit_flip_in_content_is_rejected_opaquely() {
    let alice = Keys::generate();
    let bob = Keys::generate();

    let wrap = send_dm("fragile", &bob.public(), &alice, &[], &WrapPolicy::default()).unwrap();
    let event = wrap.into_event();

    // Flip one bit in every byte position of the content in turn; the
    // result must never be plaintext and never an unhandled fault.
    for idx in (0..event.content.len()).step_by(7) {
        let mut bytes = event.content.clone().into_bytes();
        bytes[idx] ^= 0x01;
        let Ok(content) = String::from_utf8(bytes) else {
            continue;
        };
        let mut tampered = event.clone();
        tampered.content = content;
        let Ok(tampered) = GiftWrap::from_event(tampered) else {
            continue;
        };
        assert!(matches!(receive_dm(&tampered, &bob), Err(Error::Decryption)));
    }
}

#[test]
fn published_wrap_never_mentions_the_sender() {
    let alice = Keys::generate();
    let bob = Keys::generate();

    let wrap = send_dm("who am I", &bob.public(), &alice, &[], &WrapPolicy::default()).unwrap();
    let json = wrap.as_event().to_json().unwrap();

    assert!(!json.contains(&alice.public().to_hex()));
    assert!(!json.contains("who am I"));
}

// ============================================================================
// Relay boundary
// ============================================================================

/// Minimal store-and-forward relay double: accepts only verifiable
/// gift-wrap events, replays matching stored events on subscribe.
#[derive(Default)]
struct InMemoryRelay {
    events: tokio::sync::Mutex<Vec<Event>>,
}

#[async_trait]
impl Relay for InMemoryRelay {
    async fn publish(&self, event: Event) -> Result<Ack> {
        let accepted = event.kind == KIND_GIFT_WRAP && event.verify().is_ok();
        let id = event.id.clone();
        if accepted {
            self.events.lock().await.push(event);
        }
        Ok(Ack { id, accepted })
    }

    async fn subscribe(&self, filter: Filter) -> Result<BoxStream<'static, Event>> {
        let events = self.events.lock().await;
        let mut matched: Vec<Event> = events.iter().filter(|e| filter.matches(e)).cloned().collect();
        if let Some(limit) = filter.limit {
            matched.truncate(limit);
        }
        Ok(futures::stream::iter(matched).boxed())
    }
}

#[tokio::test]
async fn publish_subscribe_roundtrip_through_relay() {
    let alice = Keys::generate();
    let bob = Keys::generate();
    let carol = Keys::generate();
    let relay = InMemoryRelay::default();

    let to_bob = send_dm("for Bob", &bob.public(), &alice, &[], &WrapPolicy::default()).unwrap();
    let to_carol =
        send_dm("for Carol", &carol.public(), &alice, &[], &WrapPolicy::default()).unwrap();

    assert!(relay.publish(to_bob.into_event()).await.unwrap().accepted);
    assert!(relay.publish(to_carol.into_event()).await.unwrap().accepted);

    // Bob's filter only yields wraps addressed to Bob.
    let mut stream = relay.subscribe(Filter::gift_wraps_for(&bob.public())).await.unwrap();
    let mut received = Vec::new();
    while let Some(event) = stream.next().await {
        let wrap = GiftWrap::from_event(event).unwrap();
        received.push(receive_dm(&wrap, &bob).unwrap());
    }

    assert_eq!(received.len(), 1);
    assert_eq!(received[0].content, "for Bob");
    assert_eq!(received[0].sender, alice.public());
}

#[tokio::test]
async fn relay_rejects_non_gift_wrap_kinds() {
    let alice = Keys::generate();
    let relay = InMemoryRelay::default();

    // A seal kind must never be publishable: only gift wraps leave the
    // sending process.
    let stray = Event::new_signed(&alice, now(), murmur_core::KIND_SEAL, vec![], "x".into())
        .unwrap();
    assert!(!relay.publish(stray).await.unwrap().accepted);
}
