use std::sync::Arc;

use ethers_core::types::{Address, Signature, H256};
use ethers_core::utils::to_checksum;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use tracing::instrument;

use crate::err::SafeClientError;
use crate::tx::SafeTx;

/// Submits a signed proposal to the transaction service, where the remaining
/// owners can find and approve it.
#[derive(Debug, Clone)]
pub struct ProposeCall {
    pub http: Arc<reqwest::Client>,
    pub service_url: String,
    pub args: ProposeArgs,
}

#[derive(Debug, Clone)]
pub struct ProposeArgs {
    pub safe_address: Address,
    pub tx: SafeTx,
    /// The EIP-712 digest of `tx`; the service recomputes and cross-checks it.
    pub contract_transaction_hash: H256,
    /// Owner address the off-chain signature recovers to.
    pub sender: Address,
    pub signature: Signature,
    /// Free-form label shown in the Safe UI next to the proposal.
    pub origin: Option<String>,
}

impl ProposeCall {
    #[instrument(skip(self), fields(nonce = self.args.tx.nonce))]
    pub async fn run(&self) -> Result<(), SafeClientError> {
        let url = format!(
            "{}/api/v1/safes/{}/multisig-transactions/",
            self.service_url,
            to_checksum(&self.args.safe_address, None),
        );
        let res = self.http.post(url).json(&self.args).send().await?;
        if !res.status().is_success() {
            return Err(SafeClientError::Api {
                status: res.status().as_u16(),
                message: res.text().await.unwrap_or_default(),
            });
        }
        Ok(())
    }
}

// The service's field conventions differ enough from our types' default
// serde output that spelling the fields out inline is more readable than
// stacking attributes:
//     *  `value` and `gasPrice` must be decimal strings, not hex.
//     *  addresses must be EIP-55 checksummed, where serde would emit
//        lowercase hex.
//     *  the signature needs a '0x' prefix that ethers' Display omits.
//     *  the Safe address is carried in the URL, not the body.
impl Serialize for ProposeArgs {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("ProposeHTTPArgs", 13)?;
        state.serialize_field("to", &to_checksum(&self.tx.to, None))?;
        state.serialize_field("value", &self.tx.value.to_string())?;
        state.serialize_field("data", &self.tx.data)?;
        state.serialize_field("operation", &(self.tx.operation as u8))?;
        state.serialize_field("safeTxGas", &self.tx.safe_tx_gas.as_u64())?;
        state.serialize_field("baseGas", &self.tx.base_gas.as_u64())?;
        state.serialize_field("gasPrice", &self.tx.gas_price.to_string())?;
        state.serialize_field("gasToken", &to_checksum(&self.tx.gas_token, None))?;
        state.serialize_field(
            "refundReceiver",
            &to_checksum(&self.tx.refund_receiver, None),
        )?;
        state.serialize_field("nonce", &self.tx.nonce)?;
        state.serialize_field(
            "contractTransactionHash",
            &format!("{:?}", self.contract_transaction_hash),
        )?;
        state.serialize_field("sender", &to_checksum(&self.sender, None))?;
        state.serialize_field("signature", &format!("0x{}", self.signature))?;
        if let Some(origin) = &self.origin {
            state.serialize_field("origin", origin)?;
        }
        state.end()
    }
}
