//! GSSAPI peer exchange state machines.
//!
//! Two single-owner handshake drivers, one per role, over a pluggable
//! security-mechanism trait. Tokens cross the wire as base64 text; each
//! `step` call feeds one inbound challenge to the mechanism and retains the
//! outbound response until the next step. The exchanges perform no networking
//! themselves; the caller moves the base64 strings between peers.

#![deny(missing_docs)]

pub mod mech;
mod client;
mod server;

pub use client::ClientExchange;
pub use server::ServerExchange;

/// Convenient result alias that reuses the core error type.
pub type Result<T> = dirsvc_core::Result<T>;

/// Observable state of a handshake exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangeState {
    /// Created; no step has run yet.
    Initialized,
    /// The mechanism needs more round trips.
    Continue,
    /// Negotiation finished; the peer name is available.
    Complete,
    /// A mechanism failure ended the exchange; only cleanup remains.
    Failed,
}
