use alloy::primitives::{utils::format_ether, U256};

use crate::{
    chain::{Network, Route},
    submitter::BridgeReceipt,
};

const GREEN: &str = "\x1b[92m";
const RESET: &str = "\x1b[0m";

pub fn color(network: Network) -> &'static str {
    match network {
        Network::BaseSepolia => "\x1b[34m",
        Network::OpSepolia => "\x1b[91m",
    }
}

/// Native amount rounded to five decimals.
pub fn amount(wei: U256) -> String {
    let ether: f64 = format_ether(wei).parse().unwrap_or_default();
    format!("{ether:.5}")
}

pub fn banner() -> String {
    format!("{GREEN}Auto bridge bot  https://bridge.t1rn.io/{RESET}\n")
}

pub fn receipt_block(receipt: &BridgeReceipt) -> String {
    let balance = receipt
        .balance
        .map(|balance| balance.to_string())
        .unwrap_or_else(|| "unavailable".to_string());

    format!(
        "{GREEN}Sender: {}\nGas used: {}\nBlock: {}\nBalance: {}\nExplorer: {}\n{RESET}",
        receipt.sender, receipt.gas_used, receipt.block_number, balance, receipt.explorer_link
    )
}

pub fn success_line(
    network: Network,
    successful_txs: u64,
    label: &str,
    route: Route,
    value: U256,
) -> String {
    format!(
        "{}Successful txs: {successful_txs} | {label} | Route: {route} | Amount: {} ETH{RESET}",
        color(network),
        amount(value)
    )
}

pub fn switch_line(from: Network, to: Network) -> String {
    format!(
        "{}{from} balance below 0.1 ETH, switching to {to}{RESET}",
        color(from)
    )
}

pub fn separator() -> String {
    "=".repeat(150)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        balance::Balance,
        calls::BRIDGE_VALUE,
        testing::test_wallet,
    };
    use alloy::primitives::{utils::parse_ether, TxHash};

    #[test]
    fn amount_rounds_to_five_decimals() {
        assert_eq!(amount(BRIDGE_VALUE), "0.10000");
        assert_eq!(amount(parse_ether("1.234567").unwrap()), "1.23457");
    }

    #[test]
    fn success_line_carries_count_label_route_and_color() {
        let line = success_line(Network::OpSepolia, 7, "main", Route::OpToBase, BRIDGE_VALUE);

        assert!(line.starts_with("\x1b[91m"));
        assert!(line.contains("Successful txs: 7"));
        assert!(line.contains("| main |"));
        assert!(line.contains("Route: OP - Base"));
        assert!(line.contains("Amount: 0.10000 ETH"));
    }

    #[test]
    fn receipt_block_reports_exact_receipt_values() {
        let receipt = BridgeReceipt {
            tx_hash: TxHash::repeat_byte(0xab),
            value: BRIDGE_VALUE,
            sender: test_wallet(0).address(),
            gas_used: 21_000,
            block_number: 12_345,
            success: true,
            balance: Some(Balance(parse_ether("2").unwrap())),
            explorer_link: "https://sepolia.basescan.org/tx/0xab".to_string(),
        };

        let block = receipt_block(&receipt);

        assert!(block.contains("Gas used: 21000"));
        assert!(block.contains("Block: 12345"));
        assert!(block.contains("Explorer: https://sepolia.basescan.org/tx/0xab"));
        assert!(block.contains(&receipt.sender.to_string()));
    }

    #[test]
    fn missing_balance_is_marked_unavailable() {
        let receipt = BridgeReceipt {
            tx_hash: TxHash::ZERO,
            value: BRIDGE_VALUE,
            sender: test_wallet(1).address(),
            gas_used: 1,
            block_number: 1,
            success: true,
            balance: None,
            explorer_link: String::new(),
        };

        assert!(receipt_block(&receipt).contains("Balance: unavailable"));
    }
}
