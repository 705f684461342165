//! Production implementations of the network capability seams.

use std::sync::Arc;

use async_trait::async_trait;
use derive_new::new;
use ethers_core::types::{Address, Bytes, Signature, TransactionRequest, H256};
use ethers_providers::Middleware;
use safe_client::chains::Chain;
use safe_client::err::SafeClientError;
use safe_client::info::SafeInfoCall;
use safe_client::propose::{ProposeArgs, ProposeCall};
use safe_client::queue::{QueueEntry, QueuedTransactionsCall};
use safe_client::tx::SafeTx;

use crate::traits::{DirectSender, SafeService};
use crate::{AdminError, AdminResult};

/// [`SafeService`] backed by the hosted transaction service and client
/// gateway.
#[derive(Debug, Clone, new)]
pub struct SafeTransactionService {
    http: Arc<reqwest::Client>,
    chain: Chain,
    safe_address: Address,
    /// Transaction-service base URL for this chain, e.g.
    /// `https://safe-transaction-optimism.safe.global`.
    service_url: String,
}

#[async_trait]
impl SafeService for SafeTransactionService {
    async fn last_confirmed_nonce(&self) -> Result<u64, SafeClientError> {
        let call = SafeInfoCall {
            http: Arc::clone(&self.http),
            service_url: self.service_url.clone(),
            safe_address: self.safe_address,
        };
        Ok(call.run().await?.nonce)
    }

    async fn queued_transactions(&self) -> Result<Vec<QueueEntry>, SafeClientError> {
        let call = QueuedTransactionsCall {
            http: Arc::clone(&self.http),
            chain: self.chain,
            safe_address: self.safe_address,
        };
        call.run().await
    }

    async fn propose(
        &self,
        tx: &SafeTx,
        digest: H256,
        sender: Address,
        signature: Signature,
        description: &str,
    ) -> Result<(), SafeClientError> {
        let call = ProposeCall {
            http: Arc::clone(&self.http),
            service_url: self.service_url.clone(),
            args: ProposeArgs {
                safe_address: self.safe_address,
                tx: tx.clone(),
                contract_transaction_hash: digest,
                sender,
                signature,
                origin: Some(description.to_string()),
            },
        };
        call.run().await
    }
}

/// [`DirectSender`] broadcasting through an ethers middleware stack (a
/// provider with a signing layer).
#[derive(Debug, Clone, new)]
pub struct EthereumSender<M> {
    client: Arc<M>,
}

#[async_trait]
impl<M> DirectSender for EthereumSender<M>
where
    M: Middleware + 'static,
    M::Error: 'static,
{
    async fn send(&self, to: Address, data: Bytes) -> AdminResult<H256> {
        let tx = TransactionRequest::new().to(to).data(data);
        let pending = self
            .client
            .send_transaction(tx, None)
            .await
            .map_err(|e| AdminError::DirectSend(Box::new(e)))?;
        Ok(*pending)
    }
}
