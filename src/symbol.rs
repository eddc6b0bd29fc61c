//! User symbol -> provider ticker normalization
//!
//! Users type `"<code> <market>"` (e.g. `"700 HK"`, `"NVDA US"`,
//! `"603501 CH"`); the data provider wants Yahoo-style tickers
//! (`"0700.HK"`, `"NVDA"`, `"603501.SS"`). Anything not in that shape is
//! passed through upper-cased, so a malformed symbol fails at fetch time
//! rather than here.

use std::str::FromStr;

use crate::CandleError;

/// Market suffix accepted after the code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Market {
    /// `HK` - Hong Kong Exchange
    HongKong,
    /// `US` - any US listing, no suffix
    UnitedStates,
    /// `CH` - mainland China A-shares (Shanghai or Shenzhen)
    China,
}

impl FromStr for Market {
    type Err = CandleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "HK" => Ok(Market::HongKong),
            "US" => Ok(Market::UnitedStates),
            "CH" => Ok(Market::China),
            _ => Err(CandleError::InvalidValue("unknown market suffix")),
        }
    }
}

impl Market {
    /// Provider ticker for an upper-cased code on this market
    pub fn provider_ticker(self, code: &str) -> String {
        match self {
            Market::HongKong => format!("{}.HK", zero_pad(code, 4)),
            Market::UnitedStates => code.to_string(),
            // Leading 6 is Shanghai, everything else Shenzhen. Misplaces some
            // boards (e.g. 9xxxxx B-shares) but matches what users expect.
            Market::China if code.starts_with('6') => format!("{code}.SS"),
            Market::China => format!("{code}.SZ"),
        }
    }
}

/// Left-pad with zeros to `width`, keeping a leading sign in front
/// (`"7"` -> `"0007"`, `"-7"` -> `"-007"`). Longer codes are left as-is.
fn zero_pad(code: &str, width: usize) -> String {
    let (sign, digits) = match code.strip_prefix(['+', '-']) {
        Some(rest) => (&code[..1], rest),
        None => ("", code),
    };
    format!("{sign}{digits:0>w$}", w = width.saturating_sub(sign.len()))
}

/// Convert user input like `"700 HK"` into the provider's ticker syntax
pub fn to_provider_ticker(raw: &str) -> String {
    let upper = raw.trim().to_uppercase();
    let mut parts = upper.split_whitespace();

    if let (Some(code), Some(market), None) = (parts.next(), parts.next(), parts.next()) {
        if let Ok(market) = market.parse::<Market>() {
            return market.provider_ticker(code);
        }
    }

    upper
}
