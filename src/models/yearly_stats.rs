use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Derived per-station, per-year statistics in natural units.
///
/// Each field is `None` when the station had no valid measurement of that
/// kind during the year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct YearlyStationStat {
    pub station_id: i64,
    pub year: i32,
    pub avg_max_celsius: Option<f64>,
    pub avg_min_celsius: Option<f64>,
    pub total_precip_cm: Option<f64>,
}
