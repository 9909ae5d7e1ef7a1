#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use comet::domain::bar::{BarRecord, BarRow};
use comet::domain::error::CometError;
use comet::domain::instrument::Instrument;
use comet::ports::bar_source::BarSource;
use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Arc;

/// Source returning fixed records per key and logging every query.
pub struct MockBarSource {
    pub bars: HashMap<String, BarRecord>,
    pub queries: RefCell<Vec<(String, NaiveDateTime)>>,
}

impl MockBarSource {
    pub fn new() -> Self {
        Self {
            bars: HashMap::new(),
            queries: RefCell::new(Vec::new()),
        }
    }

    pub fn with_bar(mut self, key: &str, bar: BarRecord) -> Self {
        self.bars.insert(key.to_string(), bar);
        self
    }

    pub fn queried_at(&self) -> Vec<NaiveDateTime> {
        self.queries.borrow().iter().map(|(_, dt)| *dt).collect()
    }
}

impl BarSource for MockBarSource {
    fn get_bar(&self, key: &str, dt: NaiveDateTime) -> Result<BarRecord, CometError> {
        self.queries.borrow_mut().push((key.to_string(), dt));
        self.bars
            .get(key)
            .cloned()
            .ok_or_else(|| CometError::UnknownInstrument {
                key: key.to_string(),
            })
    }
}

pub fn instrument(order_book_id: &str) -> Arc<Instrument> {
    Arc::new(Instrument::new(order_book_id.split('.').next().unwrap(), order_book_id))
}

pub fn make_bar(order_book_id: &str, date: i64, close: f64, volume: f64) -> BarRecord {
    BarRecord::new(
        instrument(order_book_id),
        BarRow::from_ohlcv(date, close - 0.1, close + 0.2, close - 0.3, close, volume),
    )
}

pub fn minute_rows(start_minute: u32, count: u32, start_price: f64) -> Vec<BarRow> {
    (0..count)
        .map(|i| {
            let minute = start_minute + i;
            let date = 20160701090000 + i64::from(minute / 60) * 10000 + i64::from(minute % 60) * 100;
            let price = start_price + f64::from(i) * 0.01;
            BarRow::from_ohlcv(date, price, price + 0.02, price - 0.02, price + 0.01, 100.0)
        })
        .collect()
}

pub fn dt(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, mo, d)
        .unwrap()
        .and_hms_opt(h, mi, s)
        .unwrap()
}
