//! Money helpers and the report currency selector.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Amounts are `rust_decimal::Decimal` end to end.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Number of decimal places amounts are reported with.
pub const MONEY_SCALE: u32 = 2;

/// Rounds an amount to currency precision.
///
/// Uses Banker's Rounding (round half to even), the `rust_decimal` default.
#[must_use]
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp(MONEY_SCALE)
}

/// Which pair of amount columns a report reads from a voucher line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CurrencySelector {
    /// Functional (local) currency columns.
    #[default]
    Local,
    /// Foreign currency columns.
    Foreign,
}

impl CurrencySelector {
    /// Picks the (debit, credit) pair matching this selector.
    #[must_use]
    pub const fn select(
        self,
        local: (Decimal, Decimal),
        foreign: (Decimal, Decimal),
    ) -> (Decimal, Decimal) {
        match self {
            Self::Local => local,
            Self::Foreign => foreign,
        }
    }
}

impl std::fmt::Display for CurrencySelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Local => write!(f, "local"),
            Self::Foreign => write!(f, "foreign"),
        }
    }
}

impl std::str::FromStr for CurrencySelector {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "local" | "mn" => Ok(Self::Local),
            "foreign" | "me" => Ok(Self::Foreign),
            _ => Err(format!("Unknown currency selector: {s}")),
        }
    }
}
