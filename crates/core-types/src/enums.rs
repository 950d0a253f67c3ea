use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Direction of a recorded operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationType {
    Buy,
    Sell,
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationType::Buy => write!(f, "buy"),
            OperationType::Sell => write!(f, "sell"),
        }
    }
}

impl FromStr for OperationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "buy" | "compra" | "long" => Ok(OperationType::Buy),
            "sell" | "venda" | "short" => Ok(OperationType::Sell),
            other => Err(format!("unknown operation type '{other}'")),
        }
    }
}

/// The rationale a trader tags an entry with.
///
/// The journal ships a fixed vocabulary, but records written by other tools
/// (or older versions) may carry tags outside of it. Those are kept verbatim
/// in `Other` and treated as opaque labels by the analytics.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EntryReason {
    Rejection,
    ZoneTouch,
    Breakout,
    Reversal,
    Trend,
    News,
    Other(String),
}

impl EntryReason {
    /// All reasons of the built-in vocabulary, in form order.
    pub const KNOWN: [EntryReason; 6] = [
        EntryReason::Rejection,
        EntryReason::ZoneTouch,
        EntryReason::Breakout,
        EntryReason::Reversal,
        EntryReason::Trend,
        EntryReason::News,
    ];

    /// The stable storage code of the reason.
    pub fn code(&self) -> &str {
        match self {
            EntryReason::Rejection => "rejection",
            EntryReason::ZoneTouch => "zone-touch",
            EntryReason::Breakout => "breakout",
            EntryReason::Reversal => "reversal",
            EntryReason::Trend => "trend",
            EntryReason::News => "news",
            EntryReason::Other(raw) => raw,
        }
    }

    /// Human readable label used in breakdown tables and insight text.
    pub fn label(&self) -> &str {
        match self {
            EntryReason::Rejection => "Price rejection",
            EntryReason::ZoneTouch => "Zone touch",
            EntryReason::Breakout => "Breakout",
            EntryReason::Reversal => "Reversal",
            EntryReason::Trend => "Trend following",
            EntryReason::News => "News/Event",
            EntryReason::Other(raw) => raw,
        }
    }

    pub fn is_known(&self) -> bool {
        Self::KNOWN.contains(self)
    }
}

impl From<String> for EntryReason {
    fn from(raw: String) -> Self {
        // Legacy journals were written with Portuguese codes.
        match raw.trim().to_ascii_lowercase().as_str() {
            "rejection" | "rejeicao" => EntryReason::Rejection,
            "zone-touch" | "touch" | "toque" => EntryReason::ZoneTouch,
            "breakout" | "rompimento" => EntryReason::Breakout,
            "reversal" | "reversao" => EntryReason::Reversal,
            "trend" | "trend-follow" | "tendencia" => EntryReason::Trend,
            "news" | "news-event" | "noticia" => EntryReason::News,
            _ => EntryReason::Other(raw),
        }
    }
}

impl From<&str> for EntryReason {
    fn from(raw: &str) -> Self {
        EntryReason::from(raw.to_string())
    }
}

impl From<EntryReason> for String {
    fn from(reason: EntryReason) -> Self {
        match reason {
            EntryReason::Other(raw) => raw,
            known => known.code().to_string(),
        }
    }
}

impl fmt::Display for EntryReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for EntryReason {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(EntryReason::from(s))
    }
}
