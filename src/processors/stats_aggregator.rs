//! Yearly per-station statistics, recomputed from raw observations.
//!
//! The stats table behaves as a materialized view: every run regroups all
//! observations and writes one row per (station, year), updating rows that
//! already exist. Sentinel values are excluded from averages and sums, and
//! unit conversion happens once per group after the database has aggregated
//! the raw tenths.

use crate::db::Database;
use crate::error::Result;
use crate::models::YearlyStationStat;
use crate::utils::constants::{DEFAULT_STATS_BATCH_SIZE, MISSING_VALUE};
use crate::utils::units::{mean_tenths_to_unit, total_tenths_mm_to_cm};
use serde::Serialize;
use sqlx::{FromRow, Sqlite, Transaction};
use tracing::{debug, info};

const AGGREGATE_SQL: &str = r#"
SELECT
    station_id,
    CAST(strftime('%Y', observation_date) AS INTEGER) AS year,
    AVG(CASE WHEN max_temp_tenths_c != ? THEN max_temp_tenths_c END) AS avg_max_tenths,
    AVG(CASE WHEN min_temp_tenths_c != ? THEN min_temp_tenths_c END) AS avg_min_tenths,
    SUM(CASE WHEN precip_tenths_mm != ? THEN precip_tenths_mm END) AS sum_precip_tenths
FROM weather_observations
GROUP BY station_id, year
ORDER BY station_id, year
"#;

/// Raw aggregates for one (station, year) group, still in tenths.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct YearlyGroup {
    pub station_id: i64,
    pub year: i64,
    pub avg_max_tenths: Option<f64>,
    pub avg_min_tenths: Option<f64>,
    pub sum_precip_tenths: Option<i64>,
}

impl From<YearlyGroup> for YearlyStationStat {
    fn from(group: YearlyGroup) -> Self {
        YearlyStationStat {
            station_id: group.station_id,
            year: group.year as i32,
            avg_max_celsius: mean_tenths_to_unit(group.avg_max_tenths),
            avg_min_celsius: mean_tenths_to_unit(group.avg_min_tenths),
            total_precip_cm: total_tenths_mm_to_cm(group.sum_precip_tenths),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AggregationReport {
    pub rows_upserted: u64,
    pub inserted: u64,
    pub updated: u64,
}

impl AggregationReport {
    pub fn summary(&self) -> String {
        format!(
            "Upserted {} yearly-station stat rows ({} new, {} updated)",
            self.rows_upserted, self.inserted, self.updated
        )
    }
}

pub struct StatsAggregator {
    db: Database,
    batch_size: usize,
}

impl StatsAggregator {
    pub fn new(db: Database) -> Self {
        Self {
            db,
            batch_size: DEFAULT_STATS_BATCH_SIZE,
        }
    }

    /// Upserts per committed transaction.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Group observations by station and calendar year.
    pub async fn compute_groups(&self) -> Result<Vec<YearlyGroup>> {
        let groups = sqlx::query_as::<_, YearlyGroup>(AGGREGATE_SQL)
            .bind(MISSING_VALUE)
            .bind(MISSING_VALUE)
            .bind(MISSING_VALUE)
            .fetch_all(self.db.pool())
            .await?;

        Ok(groups)
    }

    /// Recompute every stats row. Running again on unchanged data rewrites
    /// identical values.
    pub async fn run(&self) -> Result<AggregationReport> {
        info!("Executing aggregate query...");
        let groups = self.compute_groups().await?;
        debug!(groups = groups.len(), "Aggregate query complete");

        let mut report = AggregationReport::default();
        let mut tx = self.db.begin().await?;

        for group in groups {
            let stat = YearlyStationStat::from(group);

            if update_stat(&mut tx, &stat).await? {
                report.updated += 1;
            } else {
                insert_stat(&mut tx, &stat).await?;
                report.inserted += 1;
            }
            report.rows_upserted += 1;

            if report.rows_upserted % self.batch_size as u64 == 0 {
                tx.commit().await?;
                info!("Committed {} stat rows...", report.rows_upserted);
                tx = self.db.begin().await?;
            }
        }

        tx.commit().await?;
        info!(
            inserted = report.inserted,
            updated = report.updated,
            "Finished upserting {} yearly-station stat rows",
            report.rows_upserted
        );

        Ok(report)
    }
}

/// Overwrite the three measures of an existing row; `false` if none matched.
async fn update_stat(tx: &mut Transaction<'_, Sqlite>, stat: &YearlyStationStat) -> Result<bool> {
    let result = sqlx::query(
        "UPDATE yearly_station_stats \
         SET avg_max_celsius = ?, avg_min_celsius = ?, total_precip_cm = ? \
         WHERE station_id = ? AND year = ?",
    )
    .bind(stat.avg_max_celsius)
    .bind(stat.avg_min_celsius)
    .bind(stat.total_precip_cm)
    .bind(stat.station_id)
    .bind(stat.year)
    .execute(&mut **tx)
    .await?;

    Ok(result.rows_affected() > 0)
}

async fn insert_stat(tx: &mut Transaction<'_, Sqlite>, stat: &YearlyStationStat) -> Result<()> {
    sqlx::query(
        "INSERT INTO yearly_station_stats \
         (station_id, year, avg_max_celsius, avg_min_celsius, total_precip_cm) \
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(stat.station_id)
    .bind(stat.year)
    .bind(stat.avg_max_celsius)
    .bind(stat.avg_min_celsius)
    .bind(stat.total_precip_cm)
    .execute(&mut **tx)
    .await?;

    Ok(())
}
