use std::sync::Arc;

use ethers_core::types::Address;
use ethers_core::utils::to_checksum;
use serde::Deserialize;
use tracing::instrument;

use crate::chains::Chain;
use crate::err::SafeClientError;
use crate::GATEWAY_URL;

/// Fetches the queue of not-yet-executed transactions for a Safe.
///
/// The gateway returns entries newest first, interleaved with non-transaction
/// entries (date labels, conflict headers) that carry no execution nonce.
#[derive(Debug, Clone)]
pub struct QueuedTransactionsCall {
    pub http: Arc<reqwest::Client>,
    pub chain: Chain,
    pub safe_address: Address,
}

impl QueuedTransactionsCall {
    #[instrument(skip(self), fields(chain = %self.chain))]
    pub async fn run(&self) -> Result<Vec<QueueEntry>, SafeClientError> {
        let url = format!(
            "{}/v1/chains/{}/safes/{}/transactions/queued",
            GATEWAY_URL,
            u64::from(self.chain),
            to_checksum(&self.safe_address, None),
        );
        let res = self.http.get(url).send().await?;
        if !res.status().is_success() {
            return Err(SafeClientError::Api {
                status: res.status().as_u16(),
                message: res.text().await.unwrap_or_default(),
            });
        }
        let result: QueuedTransactionsResult = res.json().await?;
        Ok(result.results)
    }
}

#[derive(Debug, Clone, Deserialize)]
struct QueuedTransactionsResult {
    results: Vec<QueueEntry>,
}

/// One entry of the queued-transactions listing. Only `TRANSACTION` entries
/// carry a nonce; everything else is presentation chrome we skip over.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QueueEntry {
    Transaction { transaction: QueuedTransaction },
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueuedTransaction {
    pub id: String,
    pub execution_info: Option<ExecutionInfo>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionInfo {
    pub nonce: u64,
    #[serde(default)]
    pub confirmations_required: Option<u32>,
    #[serde(default)]
    pub confirmations_submitted: Option<u32>,
}
