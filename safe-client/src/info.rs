use std::sync::Arc;

use ethers_core::types::Address;
use ethers_core::utils::to_checksum;
use serde::Deserialize;
use tracing::instrument;

use crate::err::SafeClientError;

/// Reads the Safe's on-contract state as reported by the transaction
/// service, primarily the last confirmed (executed) nonce.
#[derive(Debug, Clone)]
pub struct SafeInfoCall {
    pub http: Arc<reqwest::Client>,
    pub service_url: String,
    pub safe_address: Address,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SafeInfo {
    /// Next nonce the Safe contract will execute; everything below it is
    /// confirmed.
    pub nonce: u64,
    pub threshold: u32,
    pub owners: Vec<Address>,
}

impl SafeInfoCall {
    #[instrument(skip(self))]
    pub async fn run(&self) -> Result<SafeInfo, SafeClientError> {
        let url = format!(
            "{}/api/v1/safes/{}/",
            self.service_url,
            to_checksum(&self.safe_address, None),
        );
        let res = self.http.get(url).send().await?;
        if !res.status().is_success() {
            return Err(SafeClientError::Api {
                status: res.status().as_u16(),
                message: res.text().await.unwrap_or_default(),
            });
        }
        Ok(res.json().await?)
    }
}
