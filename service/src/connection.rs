use std::time::Duration;

use tracing::{info, warn};

use crate::{
    chain::NetworkConfig,
    client::{ChainClient, Connector},
    pacing::Sleeper,
};

pub const RECONNECT_INTERVAL: Duration = Duration::from_secs(5);

/// Fixed-interval retry. `max_attempts: None` retries forever.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub interval: Duration,
    pub max_attempts: Option<u64>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            interval: RECONNECT_INTERVAL,
            max_attempts: None,
        }
    }
}

/// Returns a client for `network` once it answers RPC calls.
pub async fn ensure_connected<C, S>(
    connector: &C,
    network: &NetworkConfig,
    sleeper: &S,
    policy: &RetryPolicy,
) -> eyre::Result<C::Client>
where
    C: Connector,
    S: Sleeper,
{
    let mut attempt: u64 = 0;
    loop {
        attempt += 1;

        match connector.connect(network) {
            Ok(client) => {
                if client.is_live().await {
                    match client.chain_id().await {
                        Ok(chain_id) if chain_id != network.chain_id => warn!(
                            network = %network.network,
                            expected = network.chain_id,
                            reported = chain_id,
                            "rpc endpoint reports an unexpected chain id"
                        ),
                        _ => {}
                    }
                    info!(network = %network.network, attempt, "connected");
                    return Ok(client);
                }
                warn!(
                    network = %network.network,
                    attempt,
                    "cannot reach {}, retrying in {:?}",
                    network.rpc_url,
                    policy.interval
                );
            }
            Err(e) => warn!(
                network = %network.network,
                attempt,
                "cannot build client for {}: {e}",
                network.rpc_url
            ),
        }

        if policy.max_attempts.is_some_and(|max| attempt >= max) {
            eyre::bail!("{} unreachable after {attempt} attempts", network.network);
        }
        sleeper.sleep(policy.interval).await;
    }
}
