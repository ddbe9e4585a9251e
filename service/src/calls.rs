use alloy::{
    eips::eip2718::Encodable2718,
    network::{EthereumWallet, TransactionBuilder},
    primitives::{Address, Bytes, TxHash, U256},
    rpc::types::TransactionRequest,
};

/// 0.1 native units, in wei.
pub const BRIDGE_VALUE: U256 = U256::from_limbs([100_000_000_000_000_000, 0, 0, 0]);

/// Added on top of the node's gas estimate.
pub const GAS_LIMIT_MARGIN: u64 = 50_000;

/// Gas estimate request for a bridge payload, sent before any nonce is used.
pub struct BridgeCallRequest<'a> {
    pub from: Address,
    pub to: Address,
    pub data: &'a Bytes,
    pub value: U256,
}

impl From<&BridgeCallRequest<'_>> for TransactionRequest {
    fn from(call: &BridgeCallRequest<'_>) -> Self {
        TransactionRequest::default()
            .with_from(call.from)
            .with_to(call.to)
            .with_input(call.data.clone())
            .with_value(call.value)
    }
}

/// A fully priced legacy transaction, ready to be signed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeCall {
    pub nonce: u64,
    pub to: Address,
    pub value: U256,
    pub gas_limit: u64,
    pub gas_price: u128,
    pub chain_id: u64,
    pub data: Bytes,
}

pub struct SignedBridgeCall {
    pub hash: TxHash,
    pub raw: Bytes,
}

pub fn gas_limit_for(estimate: u64) -> u64 {
    estimate.saturating_add(GAS_LIMIT_MARGIN)
}

impl BridgeCall {
    pub async fn sign(&self, wallet: &EthereumWallet) -> eyre::Result<SignedBridgeCall> {
        let request: TransactionRequest = self.into();
        let envelope = request.build(wallet).await?;

        Ok(SignedBridgeCall {
            hash: *envelope.tx_hash(),
            raw: envelope.encoded_2718().into(),
        })
    }
}

impl From<&BridgeCall> for TransactionRequest {
    fn from(call: &BridgeCall) -> Self {
        TransactionRequest::default()
            .with_nonce(call.nonce)
            .with_to(call.to)
            .with_value(call.value)
            .with_gas_limit(call.gas_limit)
            .with_gas_price(call.gas_price)
            .with_chain_id(call.chain_id)
            .with_input(call.data.clone())
    }
}
