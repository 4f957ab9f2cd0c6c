use serde::{Deserialize, Serialize};
use std::convert::TryFrom;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Instruments offered by the dashboard selector
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
#[allow(clippy::upper_case_acronyms)]
pub enum Ticker {
    /// SPDR S&P 500 ETF
    #[default]
    SPY,
    /// Invesco QQQ
    QQQ,
    /// Schwab US Dividend Equity ETF
    SCHD,
    VICI,
    KO,
    TGT,
    TSM,
    O,
    LOW,
    HSY,
    AAPL,
    TSLA,
    SBUX,
    ADC,
    V,
    CVX,
    MSFT,
    LMT,
    MSTX,
}

impl Ticker {
    /// Selector order
    pub const ALL: [Ticker; 19] = [
        Ticker::SPY,
        Ticker::QQQ,
        Ticker::SCHD,
        Ticker::VICI,
        Ticker::KO,
        Ticker::TGT,
        Ticker::TSM,
        Ticker::O,
        Ticker::LOW,
        Ticker::HSY,
        Ticker::AAPL,
        Ticker::TSLA,
        Ticker::SBUX,
        Ticker::ADC,
        Ticker::V,
        Ticker::CVX,
        Ticker::MSFT,
        Ticker::LMT,
        Ticker::MSTX,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            Ticker::SPY => "SPY",
            Ticker::QQQ => "QQQ",
            Ticker::SCHD => "SCHD",
            Ticker::VICI => "VICI",
            Ticker::KO => "KO",
            Ticker::TGT => "TGT",
            Ticker::TSM => "TSM",
            Ticker::O => "O",
            Ticker::LOW => "LOW",
            Ticker::HSY => "HSY",
            Ticker::AAPL => "AAPL",
            Ticker::TSLA => "TSLA",
            Ticker::SBUX => "SBUX",
            Ticker::ADC => "ADC",
            Ticker::V => "V",
            Ticker::CVX => "CVX",
            Ticker::MSFT => "MSFT",
            Ticker::LMT => "LMT",
            Ticker::MSTX => "MSTX",
        }
    }

    /// All symbols, comma separated
    pub fn supported() -> String {
        Self::ALL
            .iter()
            .map(|t| t.symbol())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Display for Ticker {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.symbol())
    }
}

impl FromStr for Ticker {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.symbol().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                format!(
                    "Unsupported ticker: {s} (choose one of {})",
                    Self::supported()
                )
            })
    }
}

impl TryFrom<String> for Ticker {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Ticker::from_str(&s)
    }
}

impl From<Ticker> for String {
    fn from(ticker: Ticker) -> Self {
        ticker.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbols_round_trip() {
        for ticker in Ticker::ALL {
            assert_eq!(ticker.to_string().parse::<Ticker>(), Ok(ticker));
        }
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("aapl".parse::<Ticker>(), Ok(Ticker::AAPL));
        assert_eq!(" mstx ".parse::<Ticker>(), Ok(Ticker::MSTX));
    }

    #[test]
    fn unknown_symbol_lists_supported() {
        let err = "GME".parse::<Ticker>().unwrap_err();
        assert!(err.contains("GME"));
        assert!(err.contains("SPY, QQQ, SCHD"));
    }

    #[test]
    fn default_is_first_entry() {
        assert_eq!(Ticker::default(), Ticker::ALL[0]);
    }

    #[test]
    fn serde_uses_symbol() {
        let json = serde_json::to_string(&Ticker::LMT).unwrap();
        assert_eq!(json, "\"LMT\"");
        let back: Ticker = serde_json::from_str("\"ko\"").unwrap();
        assert_eq!(back, Ticker::KO);
    }
}
