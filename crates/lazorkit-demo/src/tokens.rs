//! SPL tokens shown on the wallet card.

use crate::rpc::TokenAccount;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnownToken {
    pub symbol: &'static str,
    pub name: &'static str,
    pub mint: &'static str,
    pub decimals: u8,
    pub icon: &'static str,
}

/// Devnet mints of the tokens the card always lists.
pub const KNOWN_TOKENS: [KnownToken; 3] = [
    KnownToken {
        symbol: "USDC",
        name: "USD Coin",
        mint: "4zMMC9srt5Ri5X14GAgXhaHii3GnPAEERYPJgZJDncDU",
        decimals: 6,
        icon: "\u{1F4B5}",
    },
    KnownToken {
        symbol: "USDT",
        name: "Tether",
        mint: "EJwZgeZrdC8TXTQbQBoL6bfuAnFUUy1PVCMB4DYPzVaS",
        decimals: 6,
        icon: "\u{1F4B2}",
    },
    KnownToken {
        symbol: "BONK",
        name: "Bonk",
        mint: "DezXAZ8z7PnrnRJjz3wXBoRgixCa6xjnB7YaB1pPB263",
        decimals: 5,
        icon: "\u{1F415}",
    },
];

#[derive(Debug, Clone, PartialEq)]
pub struct TokenBalance {
    pub symbol: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
    pub balance: f64,
}

/// One row per known token, in table order. Accounts of unknown mints are
/// ignored; several accounts of one mint are summed; absent tokens show 0.
pub fn token_balances(accounts: &[TokenAccount]) -> Vec<TokenBalance> {
    KNOWN_TOKENS
        .iter()
        .map(|token| TokenBalance {
            symbol: token.symbol,
            name: token.name,
            icon: token.icon,
            balance: accounts
                .iter()
                .filter(|a| a.mint == token.mint)
                .map(|a| a.ui_amount)
                .sum(),
        })
        .collect()
}

/// Thousands-separated amount with up to `max_fraction` decimals, trailing
/// zeros trimmed.
pub fn format_amount(value: f64, max_fraction: usize) -> String {
    let fixed = format!("{:.*}", max_fraction, value.abs());
    let (whole, frac) = match fixed.split_once('.') {
        Some((w, f)) => (w.to_string(), f.trim_end_matches('0').to_string()),
        None => (fixed.clone(), String::new()),
    };

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    if frac.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{frac}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(mint: &str, amount: f64) -> TokenAccount {
        TokenAccount {
            pubkey: "acct".into(),
            mint: mint.into(),
            ui_amount: amount,
            decimals: 6,
        }
    }

    #[test]
    fn test_missing_tokens_show_zero() {
        let rows = token_balances(&[]);
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|r| r.balance == 0.0));
        assert_eq!(rows[0].symbol, "USDC");
    }

    #[test]
    fn test_known_mints_summed_unknown_ignored() {
        let rows = token_balances(&[
            account(KNOWN_TOKENS[2].mint, 1_000.0),
            account("SomeOtherMint111111111111111111111111111111", 5.0),
            account(KNOWN_TOKENS[2].mint, 234.5),
            account(KNOWN_TOKENS[0].mint, 12.25),
        ]);
        assert_eq!(rows[0].balance, 12.25);
        assert_eq!(rows[1].balance, 0.0);
        assert_eq!(rows[2].balance, 1_234.5);
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(0.0, 4), "0");
        assert_eq!(format_amount(1_234_567.5, 2), "1,234,567.5");
        assert_eq!(format_amount(0.12345, 4), "0.1235");
        assert_eq!(format_amount(999.0, 0), "999");
    }
}
