//! OpenTelemetry-style span helpers for tracker operations
//!
//! Span names are static and attributes are structured, so traces group
//! cleanly by operation regardless of protocol or chain. The tracker uses these
//! internally; they are public for callers that drive adapters directly.
//!
//! # Example
//!
//! ```rust,no_run
//! use gmp_tracker::{spans, Protocol};
//! use alloy_primitives::TxHash;
//!
//! let span = spans::poll_relay_status(Protocol::Axelar, TxHash::ZERO, 1);
//! let _guard = span.enter();
//! // query the relay status source here
//! ```

use alloy_chains::NamedChain;
use alloy_primitives::TxHash;
use tracing::Span;

use crate::adapter::Protocol;

/// Span covering one subscription to an origin transaction's lifecycle.
///
/// Parent: caller's operation span
/// Children: gmp_tracker.relay_polling (spawned when the origin is mined)
#[inline]
pub fn observe_origin(protocol: Protocol, origin: NamedChain, destination: NamedChain) -> Span {
    tracing::info_span!(
        "gmp_tracker.observe_origin",
        protocol = %protocol,
        origin_chain = %origin,
        destination_chain = %destination,
        error.type = tracing::field::Empty,
        error.message = tracing::field::Empty,
        error.context = tracing::field::Empty,
        otel.status_code = "OK",
    )
}

/// Span covering the whole life of a relay poller task.
///
/// Parent: gmp_tracker.observe_origin, when started from an observer
/// Children: gmp_tracker.poll_relay_status (one per attempt)
#[inline]
pub fn relay_polling(
    protocol: Protocol,
    tx_hash: TxHash,
    generation: u64,
    poll_interval_ms: u64,
    max_attempts: Option<u32>,
) -> Span {
    tracing::info_span!(
        "gmp_tracker.relay_polling",
        protocol = %protocol,
        tx_hash = %tx_hash,
        generation = generation,
        poll_interval_ms = poll_interval_ms,
        max_attempts = ?max_attempts,
        exit = tracing::field::Empty,
        error.type = tracing::field::Empty,
        error.message = tracing::field::Empty,
        error.context = tracing::field::Empty,
        otel.status_code = "OK",
    )
}

/// Span for a single relay status query.
///
/// Parent: gmp_tracker.relay_polling
/// Children: HTTP or RPC client spans
#[inline]
pub fn poll_relay_status(protocol: Protocol, tx_hash: TxHash, attempt: u32) -> Span {
    tracing::debug_span!(
        "gmp_tracker.poll_relay_status",
        protocol = %protocol,
        tx_hash = %tx_hash,
        attempt = attempt,
        code = tracing::field::Empty,
        error.type = tracing::field::Empty,
        error.message = tracing::field::Empty,
        otel.status_code = "OK",
    )
}

/// Span for a pre-submission gas fee quote.
#[inline]
pub fn quote_fee(protocol: Protocol, origin: NamedChain, destination: NamedChain) -> Span {
    tracing::info_span!(
        "gmp_tracker.quote_fee",
        protocol = %protocol,
        origin_chain = %origin,
        destination_chain = %destination,
        fee_wei = tracing::field::Empty,
        error.type = tracing::field::Empty,
        error.message = tracing::field::Empty,
        otel.status_code = "OK",
    )
}

/// Record an error on the current span.
///
/// The error type is the leading segment of the error's display string.
pub fn record_error<E: std::error::Error>(error: &E) {
    let current_span = Span::current();
    let message = error.to_string();
    current_span.record(
        "error.type",
        message.split(':').next().unwrap_or("Unknown"),
    );
    current_span.record("error.message", message.as_str());
    current_span.record("otel.status_code", "ERROR");
}

/// Record error attributes with custom context on the current span.
///
/// # Example
///
/// ```rust,no_run
/// use gmp_tracker::spans;
///
/// let span = tracing::info_span!("gmp_tracker.operation", error.context = tracing::field::Empty);
/// let _guard = span.enter();
///
/// spans::record_error_with_context(
///     "RelayTransportFailed",
///     "Axelarscan unreachable",
///     Some("three consecutive failures"),
/// );
/// ```
pub fn record_error_with_context(
    error_type: &str,
    error_message: &str,
    additional_context: Option<&str>,
) {
    let current_span = Span::current();
    current_span.record("error.type", error_type);
    current_span.record("error.message", error_message);
    current_span.record("otel.status_code", "ERROR");

    if let Some(context) = additional_context {
        current_span.record("error.context", context);
    }
}
