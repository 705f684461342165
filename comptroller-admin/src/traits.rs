//! Capability seams for everything that touches the network. Production
//! implementations live in [`crate::clients`] and [`crate::verify`]; tests
//! substitute fakes.

use async_trait::async_trait;
use auto_impl::auto_impl;
use ethers_core::types::{Address, Bytes, Signature, H256};
use ethers_signers::Signer;
use safe_client::err::SafeClientError;
use safe_client::queue::QueueEntry;
use safe_client::tx::{SafeTx, SignableTx};

use crate::{AdminError, AdminResult};

/// View of one Safe held by the relay (transaction) service: its confirmed
/// nonce, its pending queue, and a sink for new proposals. Treated as
/// best-effort and eventually consistent; callers wrap every method in a
/// [`crate::RetryPolicy`].
#[async_trait]
#[auto_impl(&, Box, Arc)]
pub trait SafeService: Send + Sync {
    /// Next nonce the Safe contract itself will execute (queue-independent).
    async fn last_confirmed_nonce(&self) -> Result<u64, SafeClientError>;

    /// Pending (not yet executed) transactions, newest first.
    async fn queued_transactions(&self) -> Result<Vec<QueueEntry>, SafeClientError>;

    /// Submit a signed proposal for the remaining owners to approve.
    async fn propose(
        &self,
        tx: &SafeTx,
        digest: H256,
        sender: Address,
        signature: Signature,
        description: &str,
    ) -> Result<(), SafeClientError>;
}

/// Produces the off-chain signature over a proposal's EIP-712 digest. No
/// on-chain approval transaction is sent at this stage.
///
/// Blanket-implemented for every [`Signer`], so a `LocalWallet`, AWS or
/// Ledger signer can be dropped in directly.
#[async_trait]
pub trait ProposalSigner: Send + Sync {
    /// Address the signature recovers to; sent alongside the proposal.
    fn address(&self) -> Address;

    /// Sign the proposal's typed-data digest.
    async fn sign_proposal(&self, tx: &SignableTx) -> AdminResult<Signature>;
}

#[async_trait]
impl<S> ProposalSigner for S
where
    S: Signer + Send + Sync,
    S::Error: Send + Sync + 'static,
{
    fn address(&self) -> Address {
        Signer::address(self)
    }

    async fn sign_proposal(&self, tx: &SignableTx) -> AdminResult<Signature> {
        self.sign_typed_data(tx)
            .await
            .map_err(|e| AdminError::Signer(Box::new(e)))
    }
}

/// Broadcasts a call as a plain transaction from the operator's own key.
/// Only used by the explicit direct-signer routing mode.
#[async_trait]
#[auto_impl(&, Box, Arc)]
pub trait DirectSender: Send + Sync {
    /// Broadcast and return the transaction hash once accepted by the node.
    async fn send(&self, to: Address, data: Bytes) -> AdminResult<H256>;
}

/// Outcome classification of a source-verification request. The two benign
/// service responses are mapped to variants here, at the client boundary,
/// so call sites never re-parse message strings.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum VerifyOutcome {
    /// Verification accepted.
    Verified,
    /// The source was verified previously; idempotent success.
    AlreadyVerified,
    /// The service cannot accept constructor arguments this long; a known
    /// environment limitation, reported so the caller can log a skip.
    ConstructorArgsTooLong,
}

/// Submits deployed-contract source verification requests.
#[async_trait]
#[auto_impl(&, Box, Arc)]
pub trait VerificationService: Send + Sync {
    /// Request verification of one deployed contract.
    async fn verify(&self, request: &VerifyRequest) -> AdminResult<VerifyOutcome>;
}

/// Everything the verification service needs to reproduce the build.
#[derive(Debug, Clone)]
pub struct VerifyRequest {
    /// Deployed contract address.
    pub address: Address,
    /// Fully-qualified source identifier, e.g.
    /// `src/L2Comptroller.sol:L2Comptroller`.
    pub contract: String,
    /// Flattened or standard-JSON source payload.
    pub source_code: String,
    /// Long compiler version string, e.g. `v0.8.18+commit.87f61d96`.
    pub compiler_version: String,
    /// ABI-encoded constructor arguments, hex without `0x`.
    pub constructor_arguments: String,
}
