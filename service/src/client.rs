use std::marker::PhantomData;

use alloy::{
    network::{Ethereum, ReceiptResponse},
    primitives::{Address, TxHash, U256},
    providers::{Provider, ProviderBuilder, RootProvider},
    rpc::types::TransactionRequest,
    transports::{
        http::{reqwest::Url, Client, Http},
        Transport,
    },
};
use async_trait::async_trait;

use crate::chain::NetworkConfig;

/// Execution data taken from a mined transaction's receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReceiptSummary {
    pub gas_used: u64,
    pub block_number: u64,
    pub success: bool,
}

/// Chain RPC capability the bot drives. Signing stays local to the bot.
#[async_trait]
pub trait ChainClient: Send + Sync {
    async fn chain_id(&self) -> eyre::Result<u64>;

    async fn is_live(&self) -> bool {
        self.chain_id().await.is_ok()
    }

    async fn balance(&self, address: Address) -> eyre::Result<U256>;

    /// Transaction count including pending transactions.
    async fn pending_nonce(&self, address: Address) -> eyre::Result<u64>;

    async fn estimate_gas(&self, tx: &TransactionRequest) -> eyre::Result<u64>;

    async fn gas_price(&self) -> eyre::Result<u128>;

    /// Broadcasts an EIP-2718 encoded signed transaction.
    async fn send_raw(&self, raw: &[u8]) -> eyre::Result<TxHash>;

    /// `None` while the transaction is not yet mined.
    async fn receipt(&self, tx_hash: TxHash) -> eyre::Result<Option<ReceiptSummary>>;
}

/// Builds a client for a network's RPC endpoint.
pub trait Connector {
    type Client: ChainClient;

    fn connect(&self, network: &NetworkConfig) -> eyre::Result<Self::Client>;
}

pub struct AlloyClient<P, T> {
    provider: P,
    _phantom: PhantomData<T>,
}

impl<P, T> AlloyClient<P, T>
where
    P: Provider<T, Ethereum>,
    T: Transport + Clone,
{
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            _phantom: PhantomData,
        }
    }
}

#[async_trait]
impl<P, T> ChainClient for AlloyClient<P, T>
where
    P: Provider<T, Ethereum> + Send + Sync,
    T: Transport + Clone + Send + Sync,
{
    async fn chain_id(&self) -> eyre::Result<u64> {
        Ok(self.provider.get_chain_id().await?)
    }

    async fn balance(&self, address: Address) -> eyre::Result<U256> {
        Ok(self.provider.get_balance(address).await?)
    }

    async fn pending_nonce(&self, address: Address) -> eyre::Result<u64> {
        Ok(self
            .provider
            .get_transaction_count(address)
            .pending()
            .await?)
    }

    async fn estimate_gas(&self, tx: &TransactionRequest) -> eyre::Result<u64> {
        Ok(self.provider.estimate_gas(tx).await?)
    }

    async fn gas_price(&self) -> eyre::Result<u128> {
        Ok(self.provider.get_gas_price().await?)
    }

    async fn send_raw(&self, raw: &[u8]) -> eyre::Result<TxHash> {
        let pending = self.provider.send_raw_transaction(raw).await?;
        Ok(*pending.tx_hash())
    }

    async fn receipt(&self, tx_hash: TxHash) -> eyre::Result<Option<ReceiptSummary>> {
        let Some(receipt) = self.provider.get_transaction_receipt(tx_hash).await? else {
            return Ok(None);
        };
        let gas_used: u64 = receipt.gas_used.try_into()?;

        Ok(Some(ReceiptSummary {
            gas_used,
            block_number: receipt.block_number.unwrap_or_default(),
            success: ReceiptResponse::status(&receipt),
        }))
    }
}

pub type HttpClient = AlloyClient<RootProvider<Http<Client>>, Http<Client>>;

/// Plain HTTP providers, one per connection attempt.
#[derive(Debug, Default, Clone, Copy)]
pub struct HttpConnector;

impl Connector for HttpConnector {
    type Client = HttpClient;

    fn connect(&self, network: &NetworkConfig) -> eyre::Result<Self::Client> {
        let url: Url = network.rpc_url.parse()?;
        let provider = ProviderBuilder::new().on_http(url);
        Ok(AlloyClient::new(provider))
    }
}
