//! Bar data source port.

use crate::domain::bar::BarRecord;
use crate::domain::error::CometError;
use chrono::NaiveDateTime;

/// Supplies the bar valid for an instrument at a point in time.
pub trait BarSource {
    /// Returns the observation at `dt`, or the most recent one before it.
    fn get_bar(&self, key: &str, dt: NaiveDateTime) -> Result<BarRecord, CometError>;
}
