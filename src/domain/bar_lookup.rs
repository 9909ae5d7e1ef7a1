//! Time-cursor lookup over a bar source.
//!
//! A [`BarLookup`] holds no bars of its own. It pairs a universe with the
//! simulation's current timestamp and forwards every lookup to the source
//! at that timestamp. The driver moves the cursor with [`BarLookup::advance`],
//! which needs `&mut self`; resolving only needs `&self`, so strategies can
//! share the lookup between advances.

use crate::domain::bar::BarRecord;
use crate::domain::error::CometError;
use crate::domain::universe::Universe;
use crate::ports::bar_source::BarSource;
use chrono::NaiveDateTime;
use std::fmt;

pub struct BarLookup<'a> {
    dt: NaiveDateTime,
    universe: Universe,
    source: &'a dyn BarSource,
}

impl<'a> BarLookup<'a> {
    pub fn new(dt: NaiveDateTime, universe: Universe, source: &'a dyn BarSource) -> Self {
        Self {
            dt,
            universe,
            source,
        }
    }

    pub fn current_dt(&self) -> NaiveDateTime {
        self.dt
    }

    pub fn universe(&self) -> &Universe {
        &self.universe
    }

    pub fn contains(&self, key: &str) -> bool {
        self.universe.contains(key)
    }

    /// Moves the cursor. Backward moves are accepted.
    pub fn advance(&mut self, dt: NaiveDateTime) {
        if dt < self.dt {
            tracing::debug!("bar lookup moved backwards from {} to {dt}", self.dt);
        }
        self.dt = dt;
    }

    /// Bar for `key` at the current timestamp, exactly as the source returns it.
    pub fn resolve(&self, key: &str) -> Result<BarRecord, CometError> {
        if !self.universe.contains(key) {
            return Err(CometError::OutOfUniverse {
                key: key.to_string(),
            });
        }
        self.source.get_bar(key, self.dt)
    }

    /// Resolves every universe member, in universe order.
    pub fn resolve_all(&self) -> Vec<(&str, Result<BarRecord, CometError>)> {
        self.universe
            .iter()
            .map(|key| (key, self.source.get_bar(key, self.dt)))
            .collect()
    }
}

impl fmt::Debug for BarLookup<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BarLookup")
            .field("dt", &self.dt)
            .field("universe", &self.universe)
            .finish_non_exhaustive()
    }
}
