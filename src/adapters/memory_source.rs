//! In-memory bar source indexed by instrument and timestamp.

use crate::domain::bar::{BarRecord, BarRow};
use crate::domain::error::CometError;
use crate::domain::instrument::{Instrument, canonical_key};
use crate::ports::bar_source::BarSource;
use chrono::NaiveDateTime;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

struct Series {
    instrument: Arc<Instrument>,
    rows: BTreeMap<NaiveDateTime, BarRow>,
}

#[derive(Default)]
pub struct MemoryBarSource {
    series: HashMap<String, Series>,
}

impl MemoryBarSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an instrument under its canonical key. Re-registering keeps loaded rows.
    pub fn add_instrument(&mut self, instrument: Instrument) {
        let key = instrument.key();
        let instrument = Arc::new(instrument);
        self.series
            .entry(key)
            .and_modify(|s| s.instrument = instrument.clone())
            .or_insert_with(|| Series {
                instrument,
                rows: BTreeMap::new(),
            });
    }

    /// Adds a row for a registered instrument, keyed by its `date` column.
    /// A row with the same timestamp replaces the previous one.
    pub fn insert_row(&mut self, key: &str, row: BarRow) -> Result<(), CometError> {
        let dt = row.datetime()?;
        let series = self
            .series
            .get_mut(&canonical_key(key))
            .ok_or_else(|| CometError::UnknownInstrument {
                key: key.to_string(),
            })?;
        series.rows.insert(dt, row);
        Ok(())
    }

    pub fn with_rows(
        mut self,
        instrument: Instrument,
        rows: impl IntoIterator<Item = BarRow>,
    ) -> Result<Self, CometError> {
        let key = instrument.key();
        self.add_instrument(instrument);
        for row in rows {
            self.insert_row(&key, row)?;
        }
        Ok(self)
    }

    fn series(&self, key: &str) -> Option<&Series> {
        self.series.get(&canonical_key(key))
    }

    pub fn instrument(&self, key: &str) -> Option<&Instrument> {
        self.series(key).map(|s| s.instrument.as_ref())
    }

    pub fn bar_count(&self, key: &str) -> usize {
        self.series(key).map_or(0, |s| s.rows.len())
    }

    /// First and last timestamps held for `key`.
    pub fn data_range(&self, key: &str) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let rows = &self.series(key)?.rows;
        let first = rows.keys().next()?;
        let last = rows.keys().next_back()?;
        Some((*first, *last))
    }
}

impl BarSource for MemoryBarSource {
    fn get_bar(&self, key: &str, dt: NaiveDateTime) -> Result<BarRecord, CometError> {
        let series = self
            .series(key)
            .ok_or_else(|| CometError::UnknownInstrument {
                key: key.to_string(),
            })?;
        let (_, row) = series
            .rows
            .range(..=dt)
            .next_back()
            .ok_or_else(|| CometError::NoData {
                key: key.to_string(),
                dt,
            })?;
        Ok(BarRecord::new(series.instrument.clone(), row.clone()))
    }
}
