//! Trading universe: the instrument keys a lookup considers valid.
//!
//! Parses code lists from configuration and checks that each code can be
//! resolved by the data source at the simulation start.

use crate::domain::error::CometError;
use crate::domain::instrument::canonical_key;
use crate::ports::bar_source::BarSource;
use chrono::NaiveDateTime;
use std::collections::HashSet;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Universe {
    codes: Vec<String>,
    members: HashSet<String>,
}

impl Universe {
    /// Builds a universe keyed by [`canonical_key`]. Later duplicates are dropped.
    pub fn new<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut universe = Self::default();
        for code in codes {
            let code = canonical_key(&code.into());
            if universe.members.insert(code.clone()) {
                universe.codes.push(code);
            }
        }
        universe
    }

    pub fn count(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn contains(&self, code: &str) -> bool {
        self.members.contains(&canonical_key(code))
    }

    /// Codes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.codes.iter().map(String::as_str)
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum UniverseError {
    #[error("empty token in code list")]
    EmptyToken,

    #[error("duplicate code: {0}")]
    DuplicateCode(String),
}

pub fn parse_codes(input: &str) -> Result<Vec<String>, UniverseError> {
    let mut codes = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let code = canonical_key(token);
        if code.is_empty() {
            return Err(UniverseError::EmptyToken);
        }
        if !seen.insert(code.clone()) {
            return Err(UniverseError::DuplicateCode(code));
        }
        codes.push(code);
    }

    Ok(codes)
}

pub struct UniverseValidationResult {
    pub universe: Universe,
    pub skipped: Vec<SkippedCode>,
}

#[derive(Debug, Clone)]
pub struct SkippedCode {
    pub code: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    UnknownInstrument,
    NoData,
}

/// Keeps the codes the source can resolve at `start`.
///
/// Codes the source rejects are skipped with a warning. Errors other than
/// an unknown instrument or a missing bar abort validation.
pub fn validate_universe(
    source: &dyn BarSource,
    codes: Vec<String>,
    start: NaiveDateTime,
) -> Result<UniverseValidationResult, CometError> {
    let mut valid_codes = Vec::new();
    let mut skipped = Vec::new();

    for code in codes {
        let reason = match source.get_bar(&code, start) {
            Ok(_) => {
                valid_codes.push(code);
                continue;
            }
            Err(CometError::UnknownInstrument { .. }) => SkipReason::UnknownInstrument,
            Err(CometError::NoData { .. }) => SkipReason::NoData,
            Err(e) => return Err(e),
        };
        tracing::warn!("skipping {code} ({reason:?} at {start})");
        skipped.push(SkippedCode { code, reason });
    }

    if !skipped.is_empty() {
        tracing::warn!(
            "universe keeps {} of {} codes",
            valid_codes.len(),
            valid_codes.len() + skipped.len()
        );
    }

    Ok(UniverseValidationResult {
        universe: Universe::new(valid_codes),
        skipped,
    })
}
