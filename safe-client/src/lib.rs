//! HTTP client for the Gnosis Safe transaction service and client gateway.
//!
//! The transaction service stores multisig proposals and their approval
//! state; the client gateway exposes the queue of not-yet-executed
//! transactions for a Safe. Each remote call is a `*Call` struct holding a
//! shared `reqwest` client and its arguments, with an async `run` method.

/// Client-gateway host used to read a Safe's pending-transaction queue.
const GATEWAY_URL: &str = "https://safe-client.gnosis.io";

pub mod chains;
pub mod err;
pub mod info;
pub mod propose;
pub mod queue;
pub mod tx;
