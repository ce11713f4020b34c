//! SQLite-backed store: connection pool, schema management and station lookups.

pub mod schema;

use std::str::FromStr;
use std::time::Duration;

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{QueryBuilder, Sqlite, SqlitePool, Transaction};
use tracing::{debug, info};

use crate::error::Result;
use crate::models::{CropYield, NewObservation, Station};
use crate::utils::constants::DEFAULT_MAX_CONNECTIONS;

/// Rows per multi-row INSERT; five binds each keeps well under SQLite's variable limit.
const INSERT_CHUNK_ROWS: usize = 1000;

pub use schema::{DROP_SQL, SCHEMA_SQL, TABLE_NAMES};

/// Handle to the backing store. Cheap to clone; all clones share one pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (creating if needed) the database named by `database_url`.
    pub async fn connect(database_url: &str) -> Result<Self> {
        Self::connect_with(database_url, DEFAULT_MAX_CONNECTIONS).await
    }

    pub async fn connect_with(database_url: &str, max_connections: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(30));

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect_with(options)
            .await?;

        debug!(database_url = %database_url, "Connected to database");
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn begin(&self) -> Result<Transaction<'static, Sqlite>> {
        Ok(self.pool.begin().await?)
    }

    /// Create all tables and indexes that do not exist yet.
    pub async fn migrate(&self) -> Result<()> {
        for statement in schema::statements(SCHEMA_SQL) {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        info!("Database tables created");
        Ok(())
    }

    /// Drop every table and recreate the schema.
    pub async fn reset(&self) -> Result<()> {
        let mut tx = self.begin().await?;
        for statement in schema::statements(DROP_SQL) {
            sqlx::query(statement).execute(&mut *tx).await?;
        }
        tx.commit().await?;
        info!("Existing tables dropped");
        self.migrate().await
    }

    pub async fn find_station(&self, station_code: &str) -> Result<Option<Station>> {
        let station = sqlx::query_as::<_, Station>(
            "SELECT id, station_code, state FROM weather_stations WHERE station_code = ?",
        )
        .bind(station_code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(station)
    }

    /// Row counts per table and the observed date range.
    pub async fn summary(&self) -> Result<StoreSummary> {
        let mut counts = Vec::with_capacity(TABLE_NAMES.len());
        for table in TABLE_NAMES {
            // Table names come from a fixed list, never from input.
            let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
                .fetch_one(&self.pool)
                .await?;
            counts.push(count);
        }

        let (first_date, last_date): (Option<NaiveDate>, Option<NaiveDate>) = sqlx::query_as(
            "SELECT MIN(observation_date), MAX(observation_date) FROM weather_observations",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(StoreSummary {
            stations: counts[0],
            observations: counts[1],
            crop_yields: counts[2],
            yearly_stats: counts[3],
            first_observation: first_date,
            last_observation: last_date,
        })
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Insert a station inside the caller's transaction and return it with its id.
pub async fn insert_station(
    tx: &mut Transaction<'_, Sqlite>,
    station: &Station,
) -> Result<Station> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO weather_stations (station_code, state) VALUES (?, ?) RETURNING id",
    )
    .bind(&station.station_code)
    .bind(&station.state)
    .fetch_one(&mut **tx)
    .await?;

    Ok(Station::new(id, station.station_code.clone(), station.state.clone()))
}

/// Append observations for one station inside the caller's transaction.
pub async fn insert_observations(
    tx: &mut Transaction<'_, Sqlite>,
    station_id: i64,
    observations: &[NewObservation],
) -> Result<u64> {
    let mut inserted = 0;

    for chunk in observations.chunks(INSERT_CHUNK_ROWS) {
        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(
            "INSERT INTO weather_observations \
             (station_id, observation_date, max_temp_tenths_c, min_temp_tenths_c, precip_tenths_mm) ",
        );
        builder.push_values(chunk, |mut row, obs| {
            row.push_bind(station_id)
                .push_bind(obs.date)
                .push_bind(obs.max_temp_tenths_c)
                .push_bind(obs.min_temp_tenths_c)
                .push_bind(obs.precip_tenths_mm);
        });

        inserted += builder.build().execute(&mut **tx).await?.rows_affected();
    }

    Ok(inserted)
}

/// Insert a crop-yield row unless the year is already present.
///
/// Returns `true` when a new row was written.
pub async fn insert_crop_yield_if_absent(
    tx: &mut Transaction<'_, Sqlite>,
    crop_yield: &CropYield,
) -> Result<bool> {
    let result = sqlx::query(
        "INSERT INTO crop_yields (year, yield_amount) VALUES (?, ?) ON CONFLICT(year) DO NOTHING",
    )
    .bind(crop_yield.year)
    .bind(crop_yield.yield_amount)
    .execute(&mut **tx)
    .await?;

    Ok(result.rows_affected() == 1)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreSummary {
    pub stations: i64,
    pub observations: i64,
    pub crop_yields: i64,
    pub yearly_stats: i64,
    pub first_observation: Option<NaiveDate>,
    pub last_observation: Option<NaiveDate>,
}

impl StoreSummary {
    pub fn summary(&self) -> String {
        let range = match (self.first_observation, self.last_observation) {
            (Some(first), Some(last)) => format!("{} to {}", first, last),
            _ => "no observations".to_string(),
        };

        format!(
            "Stations: {}\nObservations: {}\nCrop yields: {}\nYearly station stats: {}\nDate range: {}",
            self.stations, self.observations, self.crop_yields, self.yearly_stats, range
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn temp_database() -> (TempDir, Database) {
        let dir = TempDir::new().unwrap();
        let url = format!("sqlite://{}", dir.path().join("store.db").display());
        let db = Database::connect(&url).await.unwrap();
        db.migrate().await.unwrap();
        (dir, db)
    }

    #[tokio::test]
    async fn test_migrate_is_idempotent() {
        let (_dir, db) = temp_database().await;
        db.migrate().await.unwrap();

        let summary = db.summary().await.unwrap();
        assert_eq!(summary.stations, 0);
        assert_eq!(summary.observations, 0);
        assert_eq!(summary.first_observation, None);
    }

    #[tokio::test]
    async fn test_insert_and_find_station() {
        let (_dir, db) = temp_database().await;

        let mut tx = db.begin().await.unwrap();
        let stored = insert_station(&mut tx, &Station::candidate("USC00110072"))
            .await
            .unwrap();
        tx.commit().await.unwrap();

        assert!(stored.id > 0);
        let found = db.find_station("USC00110072").await.unwrap().unwrap();
        assert_eq!(found, stored);
        assert!(db.find_station("MISSING").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_uncommitted_station_rolls_back() {
        let (_dir, db) = temp_database().await;

        {
            let mut tx = db.begin().await.unwrap();
            insert_station(&mut tx, &Station::candidate("ROLLBACK1"))
                .await
                .unwrap();
        }

        assert!(db.find_station("ROLLBACK1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_station_code_rejected() {
        let (_dir, db) = temp_database().await;

        let mut tx = db.begin().await.unwrap();
        insert_station(&mut tx, &Station::candidate("DUP")).await.unwrap();
        let second = insert_station(&mut tx, &Station::candidate("DUP")).await;
        assert!(second.is_err());
    }

    #[tokio::test]
    async fn test_insert_observations_in_chunks() {
        let (_dir, db) = temp_database().await;
        let date = NaiveDate::from_ymd_opt(2001, 1, 1).unwrap();
        let rows: Vec<NewObservation> = (0..2500)
            .map(|i| NewObservation::new(date + chrono::Duration::days(i), 10, 0, 5))
            .collect();

        let mut tx = db.begin().await.unwrap();
        let station = insert_station(&mut tx, &Station::candidate("CHUNKS")).await.unwrap();
        let inserted = insert_observations(&mut tx, station.id, &rows).await.unwrap();
        tx.commit().await.unwrap();

        assert_eq!(inserted, 2500);
        let summary = db.summary().await.unwrap();
        assert_eq!(summary.observations, 2500);
        assert_eq!(summary.first_observation, Some(date));
    }

    #[tokio::test]
    async fn test_crop_yield_keeps_existing_year() {
        let (_dir, db) = temp_database().await;

        let mut tx = db.begin().await.unwrap();
        assert!(insert_crop_yield_if_absent(&mut tx, &CropYield::new(2020, 1)).await.unwrap());
        assert!(!insert_crop_yield_if_absent(&mut tx, &CropYield::new(2020, 2)).await.unwrap());
        tx.commit().await.unwrap();

        let amount: i64 = sqlx::query_scalar("SELECT yield_amount FROM crop_yields WHERE year = 2020")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(amount, 1);
    }

    #[tokio::test]
    async fn test_reset_clears_tables() {
        let (_dir, db) = temp_database().await;

        let mut tx = db.begin().await.unwrap();
        insert_station(&mut tx, &Station::candidate("A")).await.unwrap();
        tx.commit().await.unwrap();
        assert_eq!(db.summary().await.unwrap().stations, 1);

        db.reset().await.unwrap();
        assert_eq!(db.summary().await.unwrap().stations, 0);
        assert!(db.find_station("A").await.unwrap().is_none());
    }
}
