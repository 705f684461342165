//! The proposal pipeline: builds, signs, sequences and submits Safe
//! transactions.

use std::sync::Arc;

use ethers_core::types::{Address, Bytes, U256};
use safe_client::chains::Chain;
use safe_client::tx::{SafeTx, SignableTx};
use tracing::{info, instrument};

use crate::nonce::{self, NonceLedger, NonceStrategy, ProposalLogEntry};
use crate::retry::{RetryPolicy, DEFAULT_MAX_ATTEMPTS};
use crate::traits::{DirectSender, ProposalSigner, SafeService};
use crate::{AdminError, AdminResult};

/// One administrative call to route through governance.
#[derive(Debug, Clone)]
pub struct ProposalRequest {
    /// Destination contract.
    pub to: Address,
    /// ABI-encoded call data.
    pub data: Bytes,
    /// Native value to attach; zero for every administrative call.
    pub value: U256,
    /// Human-readable description, logged and shown in the Safe UI.
    pub description: String,
}

impl ProposalRequest {
    /// A zero-value call, which is every call this tool proposes.
    pub fn call(to: Address, data: Bytes, description: impl Into<String>) -> Self {
        Self {
            to,
            data,
            value: U256::zero(),
            description: description.into(),
        }
    }
}

/// Per-run execution configuration, supplied by the caller as plain values.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProposeOptions {
    /// When false, only log what would be proposed; no network interaction
    /// and no nonce consumption. Lets operators preview a batch before
    /// committing nonces.
    pub execute: bool,
    /// Seed-nonce selection for the first live proposal of the run.
    pub nonce: NonceStrategy,
}

/// Where proposals go. An explicit mode rather than an inferred branch:
/// bypassing the multisig is a policy decision the configuration has to
/// spell out.
#[derive(Clone)]
pub enum Routing {
    /// The target is owned by a Safe; proposals go to the transaction
    /// service for quorum collection.
    Multisig {
        /// Relay-service view of the owning Safe.
        service: Arc<dyn SafeService>,
        /// Address of the owning Safe contract.
        safe_address: Address,
    },
    /// The target is not behind a multisig; calls are broadcast directly
    /// from the operator key. No quorum is collected.
    DirectSigner {
        /// Broadcast capability for the operator key.
        sender: Arc<dyn DirectSender>,
    },
}

/// Top-level orchestrator for a run's proposals.
///
/// Owns the [`NonceLedger`] (seeded lazily, once, on the first live multisig
/// proposal) and the append-only proposal log. Methods take `&mut self`: the
/// ledger needs no lock because the borrow checker already forbids two
/// concurrent proposals on one pipeline, and allocation itself never awaits.
pub struct ProposalPipeline {
    chain: Chain,
    routing: Routing,
    signer: Arc<dyn ProposalSigner>,
    nonce_retry: RetryPolicy,
    submit_retry: RetryPolicy,
    ledger: Option<NonceLedger>,
    log: Vec<ProposalLogEntry>,
}

impl ProposalPipeline {
    /// A pipeline with the default retry budgets for nonce resolution and
    /// proposal submission.
    pub fn new(chain: Chain, routing: Routing, signer: Arc<dyn ProposalSigner>) -> Self {
        Self {
            chain,
            routing,
            signer,
            nonce_retry: RetryPolicy::new("gnosis get nonce", DEFAULT_MAX_ATTEMPTS),
            submit_retry: RetryPolicy::new("gnosis propose", DEFAULT_MAX_ATTEMPTS),
            ledger: None,
            log: Vec::new(),
        }
    }

    /// Override both retry policies; primarily for tests that want
    /// millisecond delays.
    pub fn with_retry_policies(mut self, nonce: RetryPolicy, submit: RetryPolicy) -> Self {
        self.nonce_retry = nonce;
        self.submit_retry = submit;
        self
    }

    /// Nonces allocated so far this run, in allocation order.
    pub fn log(&self) -> &[ProposalLogEntry] {
        &self.log
    }

    /// Nonce the ledger will assign next; `None` until the first live
    /// multisig proposal of the run has seeded it.
    pub fn session_nonce(&self) -> Option<u64> {
        self.ledger.as_ref().map(NonceLedger::peek)
    }

    /// Route one administrative call through governance.
    ///
    /// Dry-run (`execute: false`) records intent only. Direct routing
    /// broadcasts from the operator key. Multisig routing allocates the next
    /// ledger nonce, signs the Safe transaction off-chain and submits it to
    /// the service under retry. A submission that still fails after the
    /// retry budget propagates its error without rolling the nonce back.
    #[instrument(skip_all, fields(description = %request.description))]
    pub async fn propose(
        &mut self,
        request: ProposalRequest,
        options: &ProposeOptions,
    ) -> AdminResult<()> {
        if !options.execute {
            info!(description = %request.description, "will propose transaction");
            return Ok(());
        }

        let (service, safe_address) = match &self.routing {
            Routing::DirectSigner { sender } => {
                let tx_hash = sender.send(request.to, request.data).await?;
                info!(?tx_hash, "dispatched direct transaction");
                return Ok(());
            }
            Routing::Multisig {
                service,
                safe_address,
            } => (Arc::clone(service), *safe_address),
        };

        let nonce = self.next_nonce(&*service, options.nonce).await?;

        let signable = SignableTx {
            chain_id: self.chain.into(),
            safe_address,
            tx: SafeTx::call(request.to, request.value, request.data, nonce),
        };
        let digest = signable.digest()?;
        let signature = self.signer.sign_proposal(&signable).await?;

        self.log.push(ProposalLogEntry {
            nonce,
            description: request.description.clone(),
        });
        info!(nonce, description = %request.description, "proposing transaction");

        let sender_address = self.signer.address();
        self.submit_retry
            .run(|| async {
                service
                    .propose(
                        &signable.tx,
                        digest,
                        sender_address,
                        signature,
                        &request.description,
                    )
                    .await
                    .map_err(AdminError::from)
            })
            .await?;
        Ok(())
    }

    /// Seed the ledger on first use, then allocate. The ledger read and
    /// increment stay on one side of every await point.
    async fn next_nonce(
        &mut self,
        service: &dyn SafeService,
        strategy: NonceStrategy,
    ) -> AdminResult<u64> {
        if self.ledger.is_none() {
            let seed = self
                .nonce_retry
                .run(|| nonce::resolve(service, strategy))
                .await?;
            info!(nonce = seed, "seeded session nonce");
            self.ledger = Some(NonceLedger::new(seed));
        }
        let ledger = self
            .ledger
            .as_mut()
            .expect("ledger seeded above");
        Ok(ledger.allocate())
    }
}
