use std::time::Duration;

use alloy::primitives::{Address, Bytes, TxHash, U256};
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    balance::{native_balance, Balance},
    calls::{gas_limit_for, BridgeCall, BridgeCallRequest, BRIDGE_VALUE},
    chain::NetworkConfig,
    client::{ChainClient, ReceiptSummary},
    pacing::Sleeper,
    wallet::Wallet,
};

pub const RECEIPT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// How the per-gas price of a bridge transaction is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GasPriceStrategy {
    /// Ask the node on every submission.
    Live,
    /// Operator-chosen price in wei, captured once at startup.
    Fixed(u128),
}

/// Receipt polling cadence. `max_polls: None` waits forever.
#[derive(Debug, Clone, Copy)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_polls: Option<u64>,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: RECEIPT_POLL_INTERVAL,
            max_polls: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("nonce query failed: {0}")]
    Nonce(eyre::Report),
    #[error("gas estimation failed: {0}")]
    GasEstimation(eyre::Report),
    #[error("gas price query failed: {0}")]
    GasPrice(eyre::Report),
    #[error("signing failed: {0}")]
    Signing(eyre::Report),
    #[error("broadcast failed: {0}")]
    Broadcast(eyre::Report),
    #[error("no receipt for {0} after {1} polls")]
    ReceiptTimeout(TxHash, u64),
}

/// Outcome of a confirmed bridge transaction.
#[derive(Debug, Clone)]
pub struct BridgeReceipt {
    pub tx_hash: TxHash,
    pub value: U256,
    pub sender: Address,
    pub gas_used: u64,
    pub block_number: u64,
    pub success: bool,
    /// Sender balance after inclusion; `None` if the read failed.
    pub balance: Option<Balance>,
    pub explorer_link: String,
}

/// Prices, signs and broadcasts bridge calls, then waits for inclusion.
#[derive(Debug, Clone)]
pub struct Submitter {
    gas_price: GasPriceStrategy,
    receipts: PollPolicy,
}

impl Submitter {
    pub fn new(gas_price: GasPriceStrategy, receipts: PollPolicy) -> Self {
        Self {
            gas_price,
            receipts,
        }
    }

    pub async fn submit<C, S>(
        &self,
        client: &C,
        sleeper: &S,
        wallet: &Wallet,
        network: &NetworkConfig,
        payload: &Bytes,
    ) -> Result<BridgeReceipt, SubmitError>
    where
        C: ChainClient,
        S: Sleeper,
    {
        let sender = wallet.address();
        let nonce = client
            .pending_nonce(sender)
            .await
            .map_err(SubmitError::Nonce)?;

        let request = BridgeCallRequest {
            from: sender,
            to: network.contract,
            data: payload,
            value: BRIDGE_VALUE,
        };
        let estimate = client
            .estimate_gas(&(&request).into())
            .await
            .map_err(SubmitError::GasEstimation)?;

        let gas_price = match self.gas_price {
            GasPriceStrategy::Fixed(wei) => wei,
            GasPriceStrategy::Live => client.gas_price().await.map_err(SubmitError::GasPrice)?,
        };

        let call = BridgeCall {
            nonce,
            to: network.contract,
            value: BRIDGE_VALUE,
            gas_limit: gas_limit_for(estimate),
            gas_price,
            chain_id: network.chain_id,
            data: payload.clone(),
        };
        debug!(?call, "signing bridge call");

        let signed = call
            .sign(wallet.ethereum_wallet())
            .await
            .map_err(SubmitError::Signing)?;
        let tx_hash = client
            .send_raw(&signed.raw)
            .await
            .map_err(SubmitError::Broadcast)?;
        if tx_hash != signed.hash {
            warn!(local = %signed.hash, remote = %tx_hash, "node returned a different tx hash");
        }

        let receipt = self.wait_for_receipt(client, sleeper, tx_hash).await?;

        let balance = match native_balance(client, sender).await {
            Ok(balance) => Some(balance),
            Err(e) => {
                warn!(%sender, "balance read after submission failed: {e}");
                None
            }
        };

        Ok(BridgeReceipt {
            tx_hash,
            value: call.value,
            sender,
            gas_used: receipt.gas_used,
            block_number: receipt.block_number,
            success: receipt.success,
            balance,
            explorer_link: network.explorer_link(tx_hash),
        })
    }

    async fn wait_for_receipt<C, S>(
        &self,
        client: &C,
        sleeper: &S,
        tx_hash: TxHash,
    ) -> Result<ReceiptSummary, SubmitError>
    where
        C: ChainClient,
        S: Sleeper,
    {
        let mut polls: u64 = 0;
        loop {
            polls += 1;
            match client.receipt(tx_hash).await {
                Ok(Some(receipt)) => return Ok(receipt),
                Ok(None) => debug!(%tx_hash, polls, "transaction not mined yet"),
                Err(e) => warn!(%tx_hash, polls, "receipt poll failed: {e}"),
            }

            if self.receipts.max_polls.is_some_and(|max| polls >= max) {
                return Err(SubmitError::ReceiptTimeout(tx_hash, polls));
            }
            sleeper.sleep(self.receipts.interval).await;
        }
    }
}
