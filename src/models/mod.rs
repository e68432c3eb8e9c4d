use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

// ── Display value ─────────────────────────────────────────────────────────────

/// A field value exactly as the quote API sent it.
///
/// Nothing is ever computed from these, so the JSON scalar is kept verbatim
/// and only formatted for display: `150` stays `150`, `148.8` stays `148.8`,
/// and integral floats such as `150.0` lose their fraction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct DisplayValue(Value);

impl DisplayValue {
    pub fn new(value: impl Into<Value>) -> Self {
        Self(value.into())
    }
}

impl fmt::Display for DisplayValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            // Booleans have no display form on the board, like null.
            Value::Null | Value::Bool(_) => Ok(()),
            Value::String(s) => f.write_str(s),
            Value::Number(n) => match integral_float(n) {
                Some(i) => write!(f, "{}", i),
                None => write!(f, "{}", n),
            },
            // Nested values are not part of the quote shape; show them raw.
            other => write!(f, "{}", other),
        }
    }
}

/// Largest magnitude below which every integer is exactly representable in an f64.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// `150.0` and `1e3` display as `150` and `1000`.
fn integral_float(n: &serde_json::Number) -> Option<i64> {
    if n.is_i64() || n.is_u64() {
        return None;
    }
    let f = n.as_f64()?;
    if f.is_finite() && f.fract() == 0.0 && f.abs() <= MAX_SAFE_INTEGER {
        Some(f as i64)
    } else {
        None
    }
}

/// Read any scalar (or nothing) as display text.
fn display_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<DisplayValue>::deserialize(deserializer)?;
    Ok(value.map(|v| v.to_string()).unwrap_or_default())
}

// ── Quote ─────────────────────────────────────────────────────────────────────

/// One symbol's point-in-time snapshot, as returned by the quote endpoint.
///
/// Only the displayed fields are decoded; anything else in the payload is
/// ignored. Every field is optional: missing or `null` values render as
/// empty cells, so one sparse element never spoils the rest of the batch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    #[serde(default, deserialize_with = "display_string")]
    pub symbol: String,
    #[serde(default)]
    pub name: Option<DisplayValue>,
    #[serde(default)]
    pub price: Option<DisplayValue>,
    #[serde(default)]
    pub change: Option<DisplayValue>,
    #[serde(default)]
    pub day_low: Option<DisplayValue>,
    #[serde(default)]
    pub day_high: Option<DisplayValue>,
    #[serde(default)]
    pub volume: Option<DisplayValue>,
    #[serde(default)]
    pub avg_volume: Option<DisplayValue>,
    #[serde(default)]
    pub open: Option<DisplayValue>,
    #[serde(default)]
    pub previous_close: Option<DisplayValue>,
    #[serde(default)]
    pub eps: Option<DisplayValue>,
    #[serde(default)]
    pub pe: Option<DisplayValue>,
}

impl Quote {
    /// Quote with only the symbol set.
    pub fn bare(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            name: None,
            price: None,
            change: None,
            day_low: None,
            day_high: None,
            volume: None,
            avg_volume: None,
            open: None,
            previous_close: None,
            eps: None,
            pe: None,
        }
    }

    /// Display text for `field`; empty when the value is absent.
    pub fn cell(&self, field: Field) -> String {
        let value = match field {
            Field::Symbol => return self.symbol.clone(),
            Field::Name => &self.name,
            Field::Price => &self.price,
            Field::Change => &self.change,
            Field::DayLow => &self.day_low,
            Field::DayHigh => &self.day_high,
            Field::Volume => &self.volume,
            Field::AvgVolume => &self.avg_volume,
            Field::Open => &self.open,
            Field::PreviousClose => &self.previous_close,
            Field::Eps => &self.eps,
            Field::Pe => &self.pe,
        };
        value.as_ref().map(|v| v.to_string()).unwrap_or_default()
    }
}

// ── Displayed fields ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Symbol,
    Name,
    Price,
    Change,
    DayLow,
    DayHigh,
    Volume,
    AvgVolume,
    Open,
    PreviousClose,
    Eps,
    Pe,
}

impl Field {
    /// Table columns, in display order.
    pub const ALL: [Field; 12] = [
        Field::Symbol,
        Field::Name,
        Field::Price,
        Field::Change,
        Field::DayLow,
        Field::DayHigh,
        Field::Volume,
        Field::AvgVolume,
        Field::Open,
        Field::PreviousClose,
        Field::Eps,
        Field::Pe,
    ];

    /// Labeled fields shown on a compact card, below symbol and name.
    pub const CARD: [Field; 5] = [
        Field::Price,
        Field::Change,
        Field::Volume,
        Field::DayLow,
        Field::DayHigh,
    ];

    /// JSON key of the field in the quote payload.
    pub fn key(self) -> &'static str {
        match self {
            Field::Symbol => "symbol",
            Field::Name => "name",
            Field::Price => "price",
            Field::Change => "change",
            Field::DayLow => "dayLow",
            Field::DayHigh => "dayHigh",
            Field::Volume => "volume",
            Field::AvgVolume => "avgVolume",
            Field::Open => "open",
            Field::PreviousClose => "previousClose",
            Field::Eps => "eps",
            Field::Pe => "pe",
        }
    }

    /// Key with its first letter upper-cased ("dayLow" → "DayLow").
    pub fn label(self) -> String {
        let key = self.key();
        let mut chars = key.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
