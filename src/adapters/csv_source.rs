//! CSV file bar loader.
//!
//! Reads one `<order_book_id>.csv` per instrument from a directory. The
//! header row names the columns; `date` must hold the compact
//! `YYYYMMDDHHMMSS` timestamp. The OHLCV and `date` columns are read as
//! numbers, every other column is kept as the text in the file.

use crate::adapters::memory_source::MemoryBarSource;
use crate::domain::bar::{
    BarRow, FIELD_CLOSE, FIELD_DATE, FIELD_HIGH, FIELD_LOW, FIELD_OPEN, FIELD_VOLUME, FieldValue,
};
use crate::domain::error::CometError;
use crate::domain::instrument::Instrument;
use crate::domain::lookup_config::{LookupConfig, SECTION};
use std::path::{Path, PathBuf};

pub struct CsvBarSource {
    base_path: PathBuf,
}

impl CsvBarSource {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    /// Source rooted at the configured `data_dir`.
    pub fn from_config(config: &LookupConfig) -> Result<Self, CometError> {
        let dir = config
            .data_dir
            .clone()
            .ok_or_else(|| CometError::ConfigMissing {
                section: SECTION.to_string(),
                key: "data_dir".to_string(),
            })?;
        Ok(Self::new(dir))
    }

    fn csv_path(&self, order_book_id: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", order_book_id.trim()))
    }

    /// Loads every instrument's file into memory. Instruments without a
    /// file are registered with no rows.
    pub fn load(
        &self,
        instruments: impl IntoIterator<Item = Instrument>,
    ) -> Result<MemoryBarSource, CometError> {
        let mut source = MemoryBarSource::new();

        for instrument in instruments {
            let key = instrument.key();
            let path = self.csv_path(&instrument.order_book_id);
            source.add_instrument(instrument);

            if !path.exists() {
                tracing::warn!("no bar file for {key} at {}", path.display());
                continue;
            }
            for row in read_rows(&path)? {
                source.insert_row(&key, row)?;
            }
        }

        Ok(source)
    }
}

const NUMERIC_COLUMNS: [&str; 6] = [
    FIELD_DATE,
    FIELD_OPEN,
    FIELD_HIGH,
    FIELD_LOW,
    FIELD_CLOSE,
    FIELD_VOLUME,
];

fn parse_cell(column: &str, cell: &str) -> FieldValue {
    if !NUMERIC_COLUMNS.contains(&column) {
        return FieldValue::Text(cell.to_string());
    }
    let trimmed = cell.trim();
    if let Ok(v) = trimmed.parse::<i64>() {
        FieldValue::Int(v)
    } else if let Ok(v) = trimmed.parse::<f64>() {
        FieldValue::Float(v)
    } else {
        FieldValue::Text(cell.to_string())
    }
}

pub fn read_rows(path: &Path) -> Result<Vec<BarRow>, CometError> {
    let mut rdr = csv::Reader::from_path(path)?;
    let headers = rdr.headers()?.clone();

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let row: BarRow = headers
            .iter()
            .zip(record.iter())
            .map(|(name, cell)| {
                let name = name.trim();
                (name, parse_cell(name, cell))
            })
            .collect();
        rows.push(row);
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::bar_source::BarSource;
    use chrono::NaiveDate;
    use std::fs;
    use tempfile::TempDir;

    fn setup_test_data() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().to_path_buf();

        let csv_content = "date,open,high,low,close,volume,turnover\n\
            20160701093000,9.00,9.20,8.90,9.10,1500,0.01\n\
            20160701093100,9.10,9.30,9.00,9.20,0,0.00\n";
        fs::write(path.join("000001.XSHE.csv"), csv_content).unwrap();

        (dir, path)
    }

    fn dt(h: u32, m: u32) -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2016, 7, 1)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn parse_cell_types() {
        assert_eq!(parse_cell("volume", "1500"), FieldValue::Int(1500));
        assert_eq!(parse_cell("open", " 9.10 "), FieldValue::Float(9.1));
        assert_eq!(parse_cell("close", "halt"), FieldValue::Text("halt".into()));
    }

    #[test]
    fn extra_columns_keep_file_text() {
        assert_eq!(parse_cell("code", "000001"), FieldValue::Text("000001".into()));
        assert_eq!(parse_cell("turnover", "+0.50"), FieldValue::Text("+0.50".into()));
    }

    #[test]
    fn zero_padded_code_column_survives_load() {
        let (_dir, path) = setup_test_data();
        fs::write(
            path.join("000002.XSHE.csv"),
            "date,open,high,low,close,volume,code\n20160701093000,9,9,9,9,1,000002\n",
        )
        .unwrap();
        let source = CsvBarSource::new(path)
            .load([Instrument::new("WK", "000002.XSHE")])
            .unwrap();

        let bar = source.get_bar("000002.XSHE", dt(9, 30)).unwrap();
        assert_eq!(bar.get("code").unwrap(), &FieldValue::Text("000002".into()));
        assert_eq!(bar.volume().unwrap(), 1.0);
    }

    #[test]
    fn from_config_uses_data_dir() {
        let (_dir, path) = setup_test_data();
        let mut config = LookupConfig {
            codes: vec!["000001.XSHE".into()],
            start: dt(9, 30),
            data_dir: None,
            validate_universe: false,
        };
        assert!(matches!(
            CsvBarSource::from_config(&config),
            Err(CometError::ConfigMissing { key, .. }) if key == "data_dir"
        ));

        config.data_dir = Some(path);
        let source = CsvBarSource::from_config(&config)
            .unwrap()
            .load(config.instruments())
            .unwrap();
        assert_eq!(source.bar_count("000001.XSHE"), 2);
    }

    #[test]
    fn load_reads_rows() {
        let (_dir, path) = setup_test_data();
        let source = CsvBarSource::new(path)
            .load([Instrument::new("PAYH", "000001.XSHE")])
            .unwrap();

        assert_eq!(source.bar_count("000001.XSHE"), 2);
        let bar = source.get_bar("000001.XSHE", dt(9, 30)).unwrap();
        assert_eq!(bar.open().unwrap(), 9.0);
        assert_eq!(bar.volume().unwrap(), 1500.0);
        assert_eq!(bar.get("turnover").unwrap(), &FieldValue::Text("0.01".into()));
        assert!(bar.is_trading().unwrap());

        let halted = source.get_bar("000001.XSHE", dt(9, 31)).unwrap();
        assert!(!halted.is_trading().unwrap());
    }

    #[test]
    fn missing_file_registers_empty_instrument() {
        let (_dir, path) = setup_test_data();
        let source = CsvBarSource::new(path)
            .load([Instrument::new("PFYH", "600000.XSHG")])
            .unwrap();

        assert_eq!(source.bar_count("600000.XSHG"), 0);
        assert!(matches!(
            source.get_bar("600000.XSHG", dt(9, 30)),
            Err(CometError::NoData { .. })
        ));
    }

    #[test]
    fn bad_date_fails_load() {
        let (_dir, path) = setup_test_data();
        fs::write(
            path.join("600000.XSHG.csv"),
            "date,open,high,low,close,volume\n2016-07-01,1,1,1,1,1\n",
        )
        .unwrap();
        let result = CsvBarSource::new(path).load([Instrument::new("PFYH", "600000.XSHG")]);
        assert!(matches!(result, Err(CometError::InvalidTimestamp { .. })));
    }

    #[test]
    fn ragged_row_is_csv_error() {
        let (_dir, path) = setup_test_data();
        fs::write(
            path.join("600000.XSHG.csv"),
            "date,open,high,low,close,volume\n20160701093000,1,1\n",
        )
        .unwrap();
        let result = CsvBarSource::new(path).load([Instrument::new("PFYH", "600000.XSHG")]);
        assert!(matches!(result, Err(CometError::Csv(_))));
    }
}
