//! Rule-based transaction classifier
//!
//! Categories come from substring matching over a transaction's joined log
//! messages. Patterns are tested in a fixed priority order and the first
//! match wins - the categories are not mutually exclusive by substring, so
//! the order is part of the contract (a swap that also logs "transfer"
//! classifies as Transfer).

use serde::Serialize;

use crate::rpc::TransactionRecord;

/// Coarse transaction category derived from log text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TxCategory {
    Transfer,
    #[serde(rename = "Swap/DEX")]
    SwapDex,
    Staking,
    #[serde(rename = "NFT")]
    Nft,
    Vote,
    #[serde(rename = "Account Creation")]
    AccountCreation,
    #[serde(rename = "Program Interaction")]
    ProgramInteraction,
    Unknown,
}

impl TxCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            TxCategory::Transfer => "Transfer",
            TxCategory::SwapDex => "Swap/DEX",
            TxCategory::Staking => "Staking",
            TxCategory::Nft => "NFT",
            TxCategory::Vote => "Vote",
            TxCategory::AccountCreation => "Account Creation",
            TxCategory::ProgramInteraction => "Program Interaction",
            TxCategory::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for TxCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a transaction from its log messages.
///
/// A record with no logMessages field at all is Unknown; a present but
/// unmatched log set is ProgramInteraction.
pub fn classify(record: &TransactionRecord) -> TxCategory {
    let Some(lines) = &record.log_messages else {
        return TxCategory::Unknown;
    };

    let logs = lines.join(" ").to_lowercase();

    if logs.contains("transfer") {
        return TxCategory::Transfer;
    }
    if logs.contains("swap") || logs.contains("raydium") || logs.contains("jupiter") {
        return TxCategory::SwapDex;
    }
    if logs.contains("stake") {
        return TxCategory::Staking;
    }
    if logs.contains("nft") || logs.contains("metaplex") {
        return TxCategory::Nft;
    }
    if logs.contains("vote") {
        return TxCategory::Vote;
    }
    if logs.contains("create account") {
        return TxCategory::AccountCreation;
    }

    TxCategory::ProgramInteraction
}

/// Build the one-line description for a classified transaction.
pub fn describe(record: &TransactionRecord, category: TxCategory) -> String {
    let count = record.instructions;

    if record.err.is_some() {
        return format!(
            "Failed {} with {} instruction(s)",
            category.as_str().to_lowercase(),
            count
        );
    }

    match category {
        TxCategory::Transfer => format!("Transferred SOL or tokens ({} instruction(s))", count),
        TxCategory::SwapDex => format!("Executed token swap on DEX ({} instruction(s))", count),
        TxCategory::Staking => format!("Staking operation ({} instruction(s))", count),
        TxCategory::Nft => format!("NFT transaction ({} instruction(s))", count),
        TxCategory::Vote => format!("Validator vote ({} instruction(s))", count),
        TxCategory::AccountCreation => {
            format!("Created new account(s) ({} instruction(s))", count)
        }
        _ => format!("Interacted with Solana program(s) ({} instruction(s))", count),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_with_logs(logs: Option<Vec<&str>>) -> TransactionRecord {
        TransactionRecord {
            signature: "sig".to_string(),
            slot: 1,
            block_time: Some(1700000000),
            err: None,
            fee: 5000,
            instructions: 2,
            account_keys: vec![],
            log_messages: logs.map(|l| l.into_iter().map(String::from).collect()),
        }
    }

    #[test]
    fn test_classify_no_logs_is_unknown() {
        let record = record_with_logs(None);
        assert_eq!(classify(&record), TxCategory::Unknown);
    }

    #[test]
    fn test_classify_empty_logs_is_program_interaction() {
        let record = record_with_logs(Some(vec![]));
        assert_eq!(classify(&record), TxCategory::ProgramInteraction);
    }

    #[test]
    fn test_classify_transfer_wins_over_swap() {
        // Priority order: "transfer" is checked first, even when "swap"
        // also matches
        let record = record_with_logs(Some(vec![
            "Program log: Instruction: Swap",
            "Program log: Instruction: Transfer",
        ]));
        assert_eq!(classify(&record), TxCategory::Transfer);
    }

    #[test]
    fn test_classify_is_case_insensitive() {
        let record = record_with_logs(Some(vec!["PROGRAM LOG: TRANSFER CHECKED"]));
        assert_eq!(classify(&record), TxCategory::Transfer);
    }

    #[test]
    fn test_classify_swap_aliases() {
        for log in ["swap executed", "invoked Raydium amm", "Jupiter route"] {
            let record = record_with_logs(Some(vec![log]));
            assert_eq!(classify(&record), TxCategory::SwapDex, "log: {}", log);
        }
    }

    #[test]
    fn test_classify_remaining_patterns() {
        let cases = [
            ("delegate stake account", TxCategory::Staking),
            ("metaplex token metadata", TxCategory::Nft),
            ("nft mint", TxCategory::Nft),
            ("Vote111 tower sync", TxCategory::Vote),
            ("SystemProgram: Create Account", TxCategory::AccountCreation),
            ("Program log: custom thing", TxCategory::ProgramInteraction),
        ];
        for (log, expected) in cases {
            let record = record_with_logs(Some(vec![log]));
            assert_eq!(classify(&record), expected, "log: {}", log);
        }
    }

    #[test]
    fn test_describe_success_templates() {
        let record = record_with_logs(Some(vec!["transfer"]));
        assert_eq!(
            describe(&record, TxCategory::Transfer),
            "Transferred SOL or tokens (2 instruction(s))"
        );
        assert_eq!(
            describe(&record, TxCategory::SwapDex),
            "Executed token swap on DEX (2 instruction(s))"
        );
        assert_eq!(
            describe(&record, TxCategory::Unknown),
            "Interacted with Solana program(s) (2 instruction(s))"
        );
    }

    #[test]
    fn test_describe_failed_transaction() {
        let mut record = record_with_logs(Some(vec!["swap"]));
        record.err = Some(serde_json::json!({"InstructionError": [0, "Custom"]}));
        assert_eq!(
            describe(&record, TxCategory::SwapDex),
            "Failed swap/dex with 2 instruction(s)"
        );
    }
}
