//! `[lookup]` configuration section.
//!
//! ```ini
//! [lookup]
//! universe = 000001.XSHE, 600000.XSHG
//! start = 20160701093000
//! data_dir = ./data
//! validate_universe = true
//! ```

use crate::domain::bar::{FieldValue, parse_compact_datetime};
use crate::domain::error::CometError;
use crate::domain::instrument::Instrument;
use crate::domain::universe::{Universe, parse_codes, validate_universe};
use crate::ports::bar_source::BarSource;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDateTime;
use std::path::PathBuf;

pub const SECTION: &str = "lookup";

#[derive(Debug, Clone, PartialEq)]
pub struct LookupConfig {
    pub codes: Vec<String>,
    pub start: NaiveDateTime,
    pub data_dir: Option<PathBuf>,
    pub validate_universe: bool,
}

fn required(config: &dyn ConfigPort, key: &str) -> Result<String, CometError> {
    config
        .get_string(SECTION, key)
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| CometError::ConfigMissing {
            section: SECTION.to_string(),
            key: key.to_string(),
        })
}

fn invalid(key: &str, reason: impl ToString) -> CometError {
    CometError::ConfigInvalid {
        section: SECTION.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

impl LookupConfig {
    pub fn from_port(config: &dyn ConfigPort) -> Result<Self, CometError> {
        let codes = parse_codes(&required(config, "universe")?)
            .map_err(|e| invalid("universe", e))?;

        let start_raw = required(config, "start")?;
        let start = parse_compact_datetime(&FieldValue::Text(start_raw))
            .map_err(|e| invalid("start", e))?;

        let data_dir = config
            .get_string(SECTION, "data_dir")
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty())
            .map(PathBuf::from);

        Ok(Self {
            codes,
            start,
            data_dir,
            validate_universe: config.get_bool(SECTION, "validate_universe", false),
        })
    }

    /// Configured codes as instruments, with the code standing in for the symbol.
    pub fn instruments(&self) -> Vec<Instrument> {
        self.codes
            .iter()
            .map(|code| Instrument::new(code.as_str(), code.as_str()))
            .collect()
    }

    /// Universe for the run. With `validate_universe` set, codes the source
    /// cannot resolve at `start` are dropped.
    pub fn build_universe(&self, source: &dyn BarSource) -> Result<Universe, CometError> {
        if !self.validate_universe {
            return Ok(Universe::new(self.codes.iter().cloned()));
        }
        let result = validate_universe(source, self.codes.clone(), self.start)?;
        Ok(result.universe)
    }
}
