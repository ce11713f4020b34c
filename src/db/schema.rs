//! Table definitions for the four record types.

/// Schema creation SQL. Every statement is idempotent.
pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS weather_stations (
    id INTEGER PRIMARY KEY,
    station_code VARCHAR(20) NOT NULL UNIQUE,
    state VARCHAR(50)
);

CREATE TABLE IF NOT EXISTS weather_observations (
    id INTEGER PRIMARY KEY,
    station_id INTEGER NOT NULL REFERENCES weather_stations(id),
    observation_date DATE NOT NULL,
    max_temp_tenths_c INTEGER,
    min_temp_tenths_c INTEGER,
    precip_tenths_mm INTEGER
);

CREATE INDEX IF NOT EXISTS idx_station_date ON weather_observations(station_id, observation_date);
CREATE INDEX IF NOT EXISTS idx_observation_date ON weather_observations(observation_date);
CREATE INDEX IF NOT EXISTS idx_observation_station ON weather_observations(station_id);

CREATE TABLE IF NOT EXISTS crop_yields (
    id INTEGER PRIMARY KEY,
    year INTEGER NOT NULL UNIQUE,
    yield_amount INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS yearly_station_stats (
    id INTEGER PRIMARY KEY,
    station_id INTEGER NOT NULL REFERENCES weather_stations(id),
    year INTEGER NOT NULL,
    avg_max_celsius REAL,
    avg_min_celsius REAL,
    total_precip_cm REAL
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_stats_station_year ON yearly_station_stats(station_id, year);
CREATE INDEX IF NOT EXISTS idx_stats_year ON yearly_station_stats(year);
"#;

/// Drop order respects foreign keys: dependents first.
pub const DROP_SQL: &str = r#"
DROP TABLE IF EXISTS yearly_station_stats;
DROP TABLE IF EXISTS weather_observations;
DROP TABLE IF EXISTS crop_yields;
DROP TABLE IF EXISTS weather_stations;
"#;

pub const TABLE_NAMES: [&str; 4] = [
    "weather_stations",
    "weather_observations",
    "crop_yields",
    "yearly_station_stats",
];

/// Split a multi-statement script into individual statements.
pub fn statements(script: &str) -> impl Iterator<Item = &str> {
    script.split(';').map(str::trim).filter(|s| !s.is_empty())
}
