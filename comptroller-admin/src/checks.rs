//! Raw-storage checks that a deployed comptroller is configured and ready.
//!
//! These read slots directly over RPC instead of going through the contract
//! ABI, so they also catch proxies pointing at the wrong implementation or
//! an initializer that never ran.

use std::sync::Arc;

use derive_new::new;
use ethers_core::types::{Address, H256, U256};
use ethers_providers::Middleware;
use tracing::{info, instrument};

use crate::{AdminError, AdminResult};

/// Slot 0 holds the OpenZeppelin `Initializable` state; its low byte is the
/// `_initialized` version.
const INITIALIZED_SLOT: u64 = 0;

/// Packed slot holding `crossChainGasLimit` in bits 160..192, after the
/// 160-bit messenger address.
const GAS_LIMIT_SLOT: u64 = 153;

/// Low byte of the `Initializable` slot.
pub fn initialized_version(word: H256) -> u8 {
    word.as_bytes()[31]
}

/// `crossChainGasLimit` out of its packed slot.
pub fn cross_chain_gas_limit(word: H256) -> u32 {
    let value = U256::from_big_endian(word.as_bytes());
    ((value >> 160) & U256::from(u32::MAX)).as_u32()
}

/// Reads and validates a deployed comptroller's storage.
#[derive(Debug, Clone, new)]
pub struct ComptrollerChecker<M> {
    provider: Arc<M>,
    address: Address,
}

impl<M> ComptrollerChecker<M>
where
    M: Middleware + 'static,
    M::Error: 'static,
{
    async fn slot(&self, slot: u64) -> AdminResult<H256> {
        self.provider
            .get_storage_at(self.address, H256::from_low_u64_be(slot), None)
            .await
            .map_err(|e| AdminError::Rpc(Box::new(e)))
    }

    /// The initializer must have run exactly once.
    #[instrument(skip(self), fields(address = ?self.address))]
    pub async fn check_initialized(&self) -> AdminResult<()> {
        let version = initialized_version(self.slot(INITIALIZED_SLOT).await?);
        if version != 1 {
            return Err(AdminError::CheckFailed {
                field: "initialized",
                expected: "1".to_string(),
                actual: version.to_string(),
            });
        }
        info!("initialized");
        Ok(())
    }

    /// The packed cross-chain gas limit must match the configured value.
    #[instrument(skip(self), fields(address = ?self.address))]
    pub async fn check_cross_chain_gas_limit(&self, expected: u32) -> AdminResult<()> {
        let actual = cross_chain_gas_limit(self.slot(GAS_LIMIT_SLOT).await?);
        if actual != expected {
            return Err(AdminError::CheckFailed {
                field: "crossChainGasLimit",
                expected: expected.to_string(),
                actual: actual.to_string(),
            });
        }
        info!(gas_limit = actual, "cross-chain gas limit matches");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word_from(value: U256) -> H256 {
        let mut bytes = [0u8; 32];
        value.to_big_endian(&mut bytes);
        H256::from(bytes)
    }

    #[test]
    fn initialized_version_is_the_low_byte() {
        assert_eq!(initialized_version(H256::zero()), 0);
        assert_eq!(initialized_version(word_from(U256::from(1))), 1);
        // Higher-order packing (e.g. `_initializing` bool) must not leak in.
        let packed = (U256::from(1) << 8) | U256::from(1);
        assert_eq!(initialized_version(word_from(packed)), 1);
    }

    #[test]
    fn gas_limit_is_extracted_from_bits_160_to_192() {
        // messenger address in the low 160 bits, gas limit above it.
        let messenger = U256::from_big_endian(Address::repeat_byte(0x42).as_bytes());
        let packed = (U256::from(1_920_000u64) << 160) | messenger;
        assert_eq!(cross_chain_gas_limit(word_from(packed)), 1_920_000);
    }

    #[test]
    fn gas_limit_masks_out_anything_above_its_32_bits() {
        let packed = (U256::from(0xdeadu64) << 192) | (U256::from(77u64) << 160);
        assert_eq!(cross_chain_gas_limit(word_from(packed)), 77);
    }
}
