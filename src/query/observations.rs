use chrono::NaiveDate;
use serde::Serialize;
use sqlx::{FromRow, QueryBuilder, Sqlite};

use crate::db::Database;
use crate::error::{PipelineError, Result};
use crate::query::pagination::{Page, Paginated};
use crate::utils::constants::API_DATE_FORMAT;
use crate::utils::units::{tenths_to_celsius, tenths_to_mm};

/// Conjunctive filter over raw observations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObservationFilter {
    pub station_code: Option<String>,
    pub date: Option<NaiveDate>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl ObservationFilter {
    /// Build a filter from raw query-string values. Empty strings are treated
    /// as absent.
    pub fn from_params(
        station_id: Option<&str>,
        date: Option<&str>,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<Self> {
        Ok(Self {
            station_code: non_empty(station_id).map(str::to_string),
            date: non_empty(date).map(|v| parse_date("date", v)).transpose()?,
            start_date: non_empty(start_date)
                .map(|v| parse_date("start_date", v))
                .transpose()?,
            end_date: non_empty(end_date)
                .map(|v| parse_date("end_date", v))
                .transpose()?,
        })
    }

    fn push_where(&self, builder: &mut QueryBuilder<'_, Sqlite>) {
        builder.push(" WHERE 1 = 1");
        if let Some(code) = &self.station_code {
            builder.push(" AND s.station_code = ").push_bind(code.clone());
        }
        if let Some(date) = self.date {
            builder.push(" AND o.observation_date = ").push_bind(date);
        }
        if let Some(start) = self.start_date {
            builder.push(" AND o.observation_date >= ").push_bind(start);
        }
        if let Some(end) = self.end_date {
            builder.push(" AND o.observation_date <= ").push_bind(end);
        }
    }
}

pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Parse a `YYYY-MM-DD` query parameter.
pub fn parse_date(parameter: &'static str, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, API_DATE_FORMAT).map_err(|_| {
        PipelineError::invalid_query(
            parameter,
            format!("Invalid {} format. Use YYYY-MM-DD", parameter),
        )
    })
}

#[derive(Debug, Clone, FromRow)]
struct ObservationRow {
    id: i64,
    station_code: String,
    observation_date: NaiveDate,
    max_temp_tenths_c: Option<i32>,
    min_temp_tenths_c: Option<i32>,
    precip_tenths_mm: Option<i32>,
}

/// One observation as served to clients, in natural units.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObservationView {
    pub id: i64,
    pub station_id: String,
    pub date: NaiveDate,
    pub max_temperature_celsius: Option<f64>,
    pub min_temperature_celsius: Option<f64>,
    pub precipitation_mm: Option<f64>,
}

impl From<ObservationRow> for ObservationView {
    fn from(row: ObservationRow) -> Self {
        Self {
            id: row.id,
            station_id: row.station_code,
            date: row.observation_date,
            max_temperature_celsius: tenths_to_celsius(row.max_temp_tenths_c),
            min_temperature_celsius: tenths_to_celsius(row.min_temp_tenths_c),
            precipitation_mm: tenths_to_mm(row.precip_tenths_mm),
        }
    }
}

const FROM_CLAUSE: &str =
    " FROM weather_observations o JOIN weather_stations s ON s.id = o.station_id";

/// Filtered, ordered page of observations plus the unpaginated match count.
pub async fn query_observations(
    db: &Database,
    filter: &ObservationFilter,
    page: Page,
) -> Result<Paginated<ObservationView>> {
    let mut count: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT COUNT(*)");
    count.push(FROM_CLAUSE);
    filter.push_where(&mut count);
    let total_count: i64 = count.build_query_scalar().fetch_one(db.pool()).await?;

    let mut select: QueryBuilder<Sqlite> = QueryBuilder::new(
        "SELECT o.id, s.station_code, o.observation_date, \
         o.max_temp_tenths_c, o.min_temp_tenths_c, o.precip_tenths_mm",
    );
    select.push(FROM_CLAUSE);
    filter.push_where(&mut select);
    select
        .push(" ORDER BY o.observation_date, o.id LIMIT ")
        .push_bind(page.limit)
        .push(" OFFSET ")
        .push_bind(page.offset);

    let rows = select
        .build_query_as::<ObservationRow>()
        .fetch_all(db.pool())
        .await?;

    let data = rows.into_iter().map(ObservationView::from).collect();
    Ok(Paginated::new(data, total_count, page))
}
