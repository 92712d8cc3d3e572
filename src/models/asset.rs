use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DashboardError;

// ---------------------------------------------------------------------------
// Asset: The fixed set of coins the dashboard tracks
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Asset {
    Btc,
    Eth,
    Litecoin,
    Solana,
    Etc,
    Elrond,
    Aave,
}

impl Asset {
    pub const ALL: [Asset; 7] = [
        Asset::Btc,
        Asset::Eth,
        Asset::Litecoin,
        Asset::Solana,
        Asset::Etc,
        Asset::Elrond,
        Asset::Aave,
    ];

    /// Coin name as the provider expects it in `coinName`.
    pub fn as_str(self) -> &'static str {
        match self {
            Asset::Btc => "BTC",
            Asset::Eth => "ETH",
            Asset::Litecoin => "LITECOIN",
            Asset::Solana => "SOLANA",
            Asset::Etc => "ETC",
            Asset::Elrond => "ELROND",
            Asset::Aave => "AAVE",
        }
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Asset {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Asset::ALL
            .into_iter()
            .find(|a| a.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| DashboardError::InvalidArgument(format!("Unknown asset: {}", s)))
    }
}

// ---------------------------------------------------------------------------
// Interval: Sampling granularity requested from the provider
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interval {
    #[default]
    Daily,
    Weekly,
    Monthly,
}

impl Interval {
    pub const ALL: [Interval; 3] = [Interval::Daily, Interval::Weekly, Interval::Monthly];

    pub fn as_str(self) -> &'static str {
        match self {
            Interval::Daily => "daily",
            Interval::Weekly => "weekly",
            Interval::Monthly => "monthly",
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Interval {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Interval::ALL
            .into_iter()
            .find(|i| i.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| DashboardError::InvalidArgument(format!("Unknown interval: {}", s)))
    }
}
