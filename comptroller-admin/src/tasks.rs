//! The administrative operations routed through the pipeline: ownership
//! handover and proxy upgrades for the comptroller pair.

use ethers_core::abi::{encode, Token};
use ethers_core::types::{Address, Bytes};
use ethers_core::utils::id;

use crate::propose::{ProposalPipeline, ProposalRequest, ProposeOptions};
use crate::AdminResult;

fn call_data(signature: &str, args: &[Token]) -> Bytes {
    let mut data = id(signature).to_vec();
    data.extend(encode(args));
    data.into()
}

/// `setL2Comptroller(address)` on the L1Comptroller, pairing the two
/// deployments before handover.
pub fn set_l2_comptroller(l1_comptroller: Address, l2_comptroller: Address) -> ProposalRequest {
    ProposalRequest::call(
        l1_comptroller,
        call_data("setL2Comptroller(address)", &[Token::Address(l2_comptroller)]),
        format!("Set L2Comptroller {l2_comptroller:?} on L1Comptroller {l1_comptroller:?}"),
    )
}

/// `transferOwnership(address)` on the ProxyAdmin, handing upgrade rights to
/// the multisig.
pub fn transfer_proxy_admin_ownership(proxy_admin: Address, new_owner: Address) -> ProposalRequest {
    ProposalRequest::call(
        proxy_admin,
        call_data("transferOwnership(address)", &[Token::Address(new_owner)]),
        format!("Transfer ProxyAdmin {proxy_admin:?} ownership to {new_owner:?}"),
    )
}

/// ProxyAdmin `upgrade(address,address)`, pointing a proxy at a new
/// implementation.
pub fn upgrade_proxy(
    proxy_admin: Address,
    proxy: Address,
    implementation: Address,
) -> ProposalRequest {
    ProposalRequest::call(
        proxy_admin,
        call_data(
            "upgrade(address,address)",
            &[Token::Address(proxy), Token::Address(implementation)],
        ),
        format!("Upgrade proxy {proxy:?} to implementation {implementation:?}"),
    )
}

/// Handover batch: pair the comptrollers, then give the ProxyAdmin to the
/// multisig. Strictly ordered; a failure halts the rest of the batch.
///
/// Sequenced with a plain loop rather than
/// [`crate::execute_serially`]: every proposal needs `&mut` access to the
/// pipeline's nonce ledger, so the batch's futures cannot coexist.
pub async fn handover(
    pipeline: &mut ProposalPipeline,
    options: &ProposeOptions,
    l1_comptroller: Address,
    l2_comptroller: Address,
    proxy_admin: Address,
    multisig: Address,
) -> AdminResult<()> {
    for request in [
        set_l2_comptroller(l1_comptroller, l2_comptroller),
        transfer_proxy_admin_ownership(proxy_admin, multisig),
    ] {
        pipeline.propose(request, options).await?;
    }
    Ok(())
}

/// Upgrade batch: point the proxy at a freshly deployed implementation.
pub async fn upgrade(
    pipeline: &mut ProposalPipeline,
    options: &ProposeOptions,
    proxy_admin: Address,
    proxy: Address,
    implementation: Address,
) -> AdminResult<()> {
    pipeline
        .propose(upgrade_proxy(proxy_admin, proxy, implementation), options)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers_core::utils::keccak256;

    #[test]
    fn calldata_carries_selector_then_encoded_args() {
        let l1: Address = Address::repeat_byte(0x11);
        let l2: Address = Address::repeat_byte(0x22);
        let request = set_l2_comptroller(l1, l2);

        assert_eq!(request.to, l1);
        let data = request.data.as_ref();
        assert_eq!(&data[..4], &keccak256("setL2Comptroller(address)")[..4]);
        // One address argument, left-padded to a 32-byte word.
        assert_eq!(data.len(), 4 + 32);
        assert_eq!(&data[16..36], l2.as_bytes());
    }

    #[test]
    fn upgrade_encodes_proxy_then_implementation() {
        let admin = Address::repeat_byte(0xaa);
        let proxy = Address::repeat_byte(0xbb);
        let implementation = Address::repeat_byte(0xcc);
        let request = upgrade_proxy(admin, proxy, implementation);

        let data = request.data.as_ref();
        assert_eq!(&data[..4], &keccak256("upgrade(address,address)")[..4]);
        assert_eq!(data.len(), 4 + 64);
        assert_eq!(&data[16..36], proxy.as_bytes());
        assert_eq!(&data[48..68], implementation.as_bytes());
    }
}
