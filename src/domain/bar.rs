//! OHLCV bar record: a read-only view over one raw data row.
//!
//! Rows arrive from a [`BarSource`](crate::ports::bar_source::BarSource) as
//! loosely typed name/value maps. [`BarRecord`] gives them structure without
//! copying: every accessor reads the row on demand, so a record is a pure
//! function of its row and instrument.

use crate::domain::error::CometError;
use crate::domain::instrument::Instrument;
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

pub const FIELD_OPEN: &str = "open";
pub const FIELD_HIGH: &str = "high";
pub const FIELD_LOW: &str = "low";
pub const FIELD_CLOSE: &str = "close";
pub const FIELD_VOLUME: &str = "volume";
pub const FIELD_DATE: &str = "date";

/// One raw cell of a bar row.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl FieldValue {
    /// Numeric view of the cell. Text coerces only when it parses as a number.
    /// Integers beyond 2^53 round to the nearest `f64`; use [`FieldValue::as_i64`]
    /// where the exact count matters.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Int(v) => Some(*v as f64),
            FieldValue::Float(v) => Some(*v),
            FieldValue::Text(s) => s.trim().parse().ok(),
        }
    }

    /// Exact integer view. Floats qualify only when whole and in range.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Int(v) => Some(*v),
            FieldValue::Float(v)
                if v.fract() == 0.0 && *v >= i64::MIN as f64 && *v < i64::MAX as f64 =>
            {
                Some(*v as i64)
            }
            FieldValue::Float(_) => None,
            FieldValue::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Int(v) => write!(f, "{v}"),
            FieldValue::Float(v) => write!(f, "{v}"),
            FieldValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Int(v)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Float(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Text(v.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::Text(v)
    }
}

/// A raw data row keyed by column name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BarRow {
    fields: HashMap<String, FieldValue>,
}

impl BarRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Row holding the six standard columns.
    pub fn from_ohlcv(date: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self::new()
            .with(FIELD_DATE, date)
            .with(FIELD_OPEN, open)
            .with(FIELD_HIGH, high)
            .with(FIELD_LOW, low)
            .with(FIELD_CLOSE, close)
            .with(FIELD_VOLUME, volume)
    }

    pub fn with(mut self, name: &str, value: impl Into<FieldValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: &str, value: impl Into<FieldValue>) {
        self.fields.insert(name.to_string(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Parsed `date` column, used by sources to index rows by time.
    pub fn datetime(&self) -> Result<NaiveDateTime, CometError> {
        let raw = self
            .get(FIELD_DATE)
            .ok_or_else(|| CometError::missing(FIELD_DATE))?;
        parse_compact_datetime(raw)
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for BarRow {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Named numeric fields of a bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BarField {
    Open,
    High,
    Low,
    Close,
    Volume,
    Last,
}

impl BarField {
    pub fn name(self) -> &'static str {
        match self {
            BarField::Open => FIELD_OPEN,
            BarField::High => FIELD_HIGH,
            BarField::Low => FIELD_LOW,
            BarField::Close => FIELD_CLOSE,
            BarField::Volume => FIELD_VOLUME,
            BarField::Last => "last",
        }
    }

    /// Row column that backs this field.
    fn column(self) -> &'static str {
        match self {
            BarField::Last => FIELD_CLOSE,
            other => other.name(),
        }
    }
}

impl FromStr for BarField {
    type Err = CometError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(BarField::Open),
            "high" => Ok(BarField::High),
            "low" => Ok(BarField::Low),
            "close" => Ok(BarField::Close),
            "volume" => Ok(BarField::Volume),
            "last" => Ok(BarField::Last),
            other => Err(CometError::missing(other)),
        }
    }
}

/// Interval label for the rolling statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Frequency {
    #[default]
    Day,
    Minute,
}

impl FromStr for Frequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1d" | "day" => Ok(Frequency::Day),
            "1m" | "minute" => Ok(Frequency::Minute),
            other => Err(format!("unknown frequency: {other}")),
        }
    }
}

/// Parses the 14-digit `YYYYMMDDHHMMSS` encoding used in the `date` column.
pub fn parse_compact_datetime(raw: &FieldValue) -> Result<NaiveDateTime, CometError> {
    let text = match raw {
        FieldValue::Int(v) => v.to_string(),
        FieldValue::Float(v) if v.fract() == 0.0 => format!("{v:.0}"),
        FieldValue::Float(v) => v.to_string(),
        FieldValue::Text(s) => s.trim().to_string(),
    };
    let invalid = || CometError::InvalidTimestamp {
        value: text.clone(),
    };

    if text.len() != 14 || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    let part = |from: usize, to: usize| -> Result<u32, CometError> {
        text[from..to].parse().map_err(|_| invalid())
    };

    let year = part(0, 4)? as i32;
    let date = NaiveDate::from_ymd_opt(year, part(4, 6)?, part(6, 8)?).ok_or_else(invalid)?;
    date.and_hms_opt(part(8, 10)?, part(10, 12)?, part(12, 14)?)
        .ok_or_else(invalid)
}

/// One OHLCV observation for one instrument.
#[derive(Debug, Clone, PartialEq)]
pub struct BarRecord {
    instrument: Arc<Instrument>,
    row: BarRow,
}

impl BarRecord {
    pub fn new(instrument: Arc<Instrument>, row: BarRow) -> Self {
        Self { instrument, row }
    }

    /// Raw row value for any column, including ones without a named accessor.
    pub fn get(&self, name: &str) -> Result<&FieldValue, CometError> {
        self.row.get(name).ok_or_else(|| CometError::missing(name))
    }

    pub fn field(&self, field: BarField) -> Result<f64, CometError> {
        let column = field.column();
        let raw = self.get(column)?;
        raw.as_f64().ok_or_else(|| CometError::InvalidField {
            field: column.to_string(),
            value: raw.to_string(),
        })
    }

    pub fn open(&self) -> Result<f64, CometError> {
        self.field(BarField::Open)
    }

    pub fn high(&self) -> Result<f64, CometError> {
        self.field(BarField::High)
    }

    pub fn low(&self) -> Result<f64, CometError> {
        self.field(BarField::Low)
    }

    pub fn close(&self) -> Result<f64, CometError> {
        self.field(BarField::Close)
    }

    pub fn last(&self) -> Result<f64, CometError> {
        self.field(BarField::Last)
    }

    pub fn volume(&self) -> Result<f64, CometError> {
        self.field(BarField::Volume)
    }

    /// Volume as an exact integer, for counts too large for [`BarRecord::volume`].
    pub fn volume_int(&self) -> Result<i64, CometError> {
        let raw = self.get(FIELD_VOLUME)?;
        raw.as_i64().ok_or_else(|| CometError::InvalidField {
            field: FIELD_VOLUME.to_string(),
            value: raw.to_string(),
        })
    }

    pub fn is_trading(&self) -> Result<bool, CometError> {
        Ok(self.volume()? > 0.0)
    }

    pub fn datetime(&self) -> Result<NaiveDateTime, CometError> {
        self.row.datetime()
    }

    pub fn instrument(&self) -> &Instrument {
        &self.instrument
    }

    pub fn symbol(&self) -> &str {
        &self.instrument.symbol
    }

    pub fn order_book_id(&self) -> &str {
        &self.instrument.order_book_id
    }

    pub fn row(&self) -> &BarRow {
        &self.row
    }

    // Rolling statistics need a history window, which a single-row view
    // does not have. They stay declared so callers handle the error.

    pub fn mavg(&self, _intervals: usize, _frequency: Frequency) -> Result<f64, CometError> {
        Err(CometError::NotImplemented { operation: "mavg" })
    }

    pub fn vwap(&self, _intervals: usize, _frequency: Frequency) -> Result<f64, CometError> {
        Err(CometError::NotImplemented { operation: "vwap" })
    }

    pub fn history(
        &self,
        _bar_count: usize,
        _frequency: Frequency,
        _field: &str,
    ) -> Result<Vec<f64>, CometError> {
        Err(CometError::NotImplemented {
            operation: "history",
        })
    }
}

impl fmt::Display for BarRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cell = |name: &str| {
            self.row
                .get(name)
                .map_or_else(|| "-".to_string(), |v| v.to_string())
        };
        write!(
            f,
            "BarRecord({} {} o={} h={} l={} c={} v={})",
            self.order_book_id(),
            cell(FIELD_DATE),
            cell(FIELD_OPEN),
            cell(FIELD_HIGH),
            cell(FIELD_LOW),
            cell(FIELD_CLOSE),
            cell(FIELD_VOLUME),
        )
    }
}
