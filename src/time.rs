//! Wall-clock time utilities.
//!
//! Event timestamps are Unix seconds. The only consumer of real time in
//! this crate is the DM pipeline: rumors are stamped with the true send
//! time and gift wraps with a fuzzed one derived from it.

/// Returns the current Unix timestamp in seconds.
pub fn now_timestamp() -> i64 {
    chrono::Utc::now().timestamp()
}
