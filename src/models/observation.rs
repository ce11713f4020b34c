use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A parsed station file line, not yet attached to a stored station.
///
/// Measurements are raw tenths exactly as read; the `-9999` sentinel is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewObservation {
    pub date: NaiveDate,
    pub max_temp_tenths_c: i32,
    pub min_temp_tenths_c: i32,
    pub precip_tenths_mm: i32,
}

impl NewObservation {
    pub fn new(
        date: NaiveDate,
        max_temp_tenths_c: i32,
        min_temp_tenths_c: i32,
        precip_tenths_mm: i32,
    ) -> Self {
        Self {
            date,
            max_temp_tenths_c,
            min_temp_tenths_c,
            precip_tenths_mm,
        }
    }
}
