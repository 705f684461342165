//! Administration of a comptroller contract pair governed by a Safe multisig.
//!
//! The contracts live on two chains (an origin chain and a rollup) behind
//! transparent proxies, and their owner is a multisig rather than a single
//! key. An administrative action therefore becomes a *proposal*: a signed
//! Safe transaction submitted to the transaction service where the remaining
//! owners approve it. This crate owns the hard part of that flow, which is
//! sequencing: picking the right nonce for the first proposal of a run from
//! an eventually-consistent view of the pending queue, handing out strictly
//! increasing nonces to every subsequent proposal of the same run, and
//! keeping that sequence intact while every network call around it is
//! retried.
//!
//! Command-line parsing, network presets and key management are deliberately
//! left to callers; everything here takes plain values and capability
//! objects ([`SafeService`], [`ProposalSigner`], [`DirectSender`],
//! [`VerificationService`]) so tests can substitute fakes.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub use error::{AdminError, AdminResult};
pub use nonce::{NonceLedger, NonceStrategy, ProposalLogEntry};
pub use propose::{ProposalPipeline, ProposalRequest, ProposeOptions, Routing};
pub use retry::RetryPolicy;
pub use sequence::execute_serially;
pub use traits::{
    DirectSender, ProposalSigner, SafeService, VerificationService, VerifyOutcome, VerifyRequest,
};

/// Re-exported so callers configuring a pipeline do not need a direct
/// dependency on the client crate.
pub use safe_client::chains::Chain;

pub mod checks;
pub mod clients;
mod error;
pub mod nonce;
pub mod propose;
pub mod retry;
pub mod sequence;
pub mod tasks;
pub mod traits;
pub mod verify;
