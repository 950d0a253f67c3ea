use crate::enums::{EntryReason, OperationType};
use crate::error::CoreError;
use chrono::{DateTime, NaiveDate, NaiveTime, Timelike, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque, stable identifier of a journal entry.
///
/// Newly recorded trades get a UUID, but any string read back from disk is
/// accepted as-is so journals written by older versions keep their ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TradeId(String);

impl TradeId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TradeId {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

impl From<String> for TradeId {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl fmt::Display for TradeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single recorded trading operation.
///
/// Trades are immutable once stored; editing produces a replacement record
/// with the same `id` and `created_at` (see [`Trade::revise`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    pub id: TradeId,
    pub operation_type: OperationType,
    /// Uppercase symbol, e.g. "EURUSD".
    pub asset: String,
    pub lots: Decimal,
    pub entry_price: Decimal,
    pub stop_loss: Decimal,
    pub take_profit: Decimal,
    /// Realised profit or loss in account currency.
    pub result: Decimal,
    pub reasons: Vec<EntryReason>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "non_blank"
    )]
    pub description: Option<String>,
    pub date: NaiveDate,
    #[serde(with = "time_of_day")]
    pub time: NaiveTime,
    #[serde(default)]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: DateTime<Utc>,
}

impl Trade {
    pub fn is_win(&self) -> bool {
        self.result > Decimal::ZERO
    }

    pub fn is_loss(&self) -> bool {
        self.result < Decimal::ZERO
    }

    pub fn is_breakeven(&self) -> bool {
        self.result.is_zero()
    }

    /// Hour of day (0..=23) the trade was executed.
    pub fn hour(&self) -> u32 {
        self.time.hour()
    }

    /// Absolute distance between the entry price and the stop loss.
    pub fn stop_distance(&self) -> Decimal {
        (self.entry_price - self.stop_loss).abs()
    }

    /// Builds the replacement record for an edit, keeping identity and creation time.
    pub fn revise(&self, draft: NewTrade, now: DateTime<Utc>) -> Result<Trade, CoreError> {
        let mut revised = draft.into_trade(self.id.clone(), now)?;
        revised.created_at = self.created_at;
        Ok(revised)
    }
}

/// The payload of the entry form, before validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTrade {
    pub operation_type: OperationType,
    pub asset: String,
    pub lots: Decimal,
    pub entry_price: Decimal,
    pub stop_loss: Decimal,
    pub take_profit: Decimal,
    pub result: Decimal,
    pub reasons: Vec<EntryReason>,
    #[serde(default)]
    pub description: Option<String>,
    pub date: NaiveDate,
    #[serde(with = "time_of_day")]
    pub time: NaiveTime,
}

impl NewTrade {
    /// Validates the draft and turns it into a fresh `Trade` with a new id.
    pub fn record(self, now: DateTime<Utc>) -> Result<Trade, CoreError> {
        self.into_trade(TradeId::generate(), now)
    }

    fn into_trade(self, id: TradeId, now: DateTime<Utc>) -> Result<Trade, CoreError> {
        let asset = self.asset.trim().to_uppercase();
        if asset.is_empty() {
            return Err(CoreError::invalid("asset", "asset symbol must not be empty"));
        }
        if self.lots <= Decimal::ZERO {
            return Err(CoreError::invalid(
                "lots",
                format!("lot size must be positive, got {}", self.lots),
            ));
        }

        let mut reasons: Vec<EntryReason> = Vec::with_capacity(self.reasons.len());
        for reason in self.reasons {
            if !reasons.contains(&reason) {
                reasons.push(reason);
            }
        }
        if reasons.is_empty() {
            return Err(CoreError::invalid("reasons", "select at least one entry reason"));
        }
        for reason in reasons.iter().filter(|r| !r.is_known()) {
            tracing::warn!(reason = %reason, "Recording trade with an entry reason outside the vocabulary.");
        }

        let description = self.description.as_deref().and_then(trimmed_text);

        Ok(Trade {
            id,
            operation_type: self.operation_type,
            asset,
            lots: self.lots,
            entry_price: self.entry_price,
            stop_loss: self.stop_loss,
            take_profit: self.take_profit,
            result: self.result,
            reasons,
            description,
            date: self.date,
            time: self.time,
            created_at: now,
            updated_at: now,
        })
    }
}

impl From<&Trade> for NewTrade {
    fn from(trade: &Trade) -> Self {
        Self {
            operation_type: trade.operation_type,
            asset: trade.asset.clone(),
            lots: trade.lots,
            entry_price: trade.entry_price,
            stop_loss: trade.stop_loss,
            take_profit: trade.take_profit,
            result: trade.result,
            reasons: trade.reasons.clone(),
            description: trade.description.clone(),
            date: trade.date,
            time: trade.time,
        }
    }
}

/// Parses a time of day written as `HH:MM` or `HH:MM:SS`.
pub fn parse_time_of_day(raw: &str) -> Result<NaiveTime, CoreError> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .map_err(|e| CoreError::invalid("time", format!("'{raw}': {e}")))
}

fn trimmed_text(raw: &str) -> Option<String> {
    let text = raw.trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// Blank descriptions (the web form always wrote one) load as `None`.
fn non_blank<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(trimmed_text))
}

/// Serde adapter storing times of day the way the entry form produces them (`HH:MM`).
mod time_of_day {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_time_of_day(&raw).map_err(serde::de::Error::custom)
    }
}
