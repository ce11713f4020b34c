use serde::Serialize;
use sqlx::{FromRow, QueryBuilder, Sqlite};

use crate::db::Database;
use crate::error::{PipelineError, Result};
use crate::query::observations::non_empty;
use crate::query::pagination::{Page, Paginated};

/// Conjunctive filter over yearly station statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatsFilter {
    pub station_code: Option<String>,
    pub year: Option<i32>,
    pub start_year: Option<i32>,
    pub end_year: Option<i32>,
}

impl StatsFilter {
    pub fn from_params(
        station_id: Option<&str>,
        year: Option<&str>,
        start_year: Option<&str>,
        end_year: Option<&str>,
    ) -> Result<Self> {
        Ok(Self {
            station_code: non_empty(station_id).map(str::to_string),
            year: non_empty(year).map(|v| parse_year("year", v)).transpose()?,
            start_year: non_empty(start_year)
                .map(|v| parse_year("start_year", v))
                .transpose()?,
            end_year: non_empty(end_year)
                .map(|v| parse_year("end_year", v))
                .transpose()?,
        })
    }

    fn push_where(&self, builder: &mut QueryBuilder<'_, Sqlite>) {
        builder.push(" WHERE 1 = 1");
        if let Some(code) = &self.station_code {
            builder.push(" AND s.station_code = ").push_bind(code.clone());
        }
        if let Some(year) = self.year {
            builder.push(" AND y.year = ").push_bind(year);
        }
        if let Some(start) = self.start_year {
            builder.push(" AND y.year >= ").push_bind(start);
        }
        if let Some(end) = self.end_year {
            builder.push(" AND y.year <= ").push_bind(end);
        }
    }
}

pub fn parse_year(parameter: &'static str, value: &str) -> Result<i32> {
    value.parse::<i32>().map_err(|_| {
        PipelineError::invalid_query(
            parameter,
            format!("Invalid {} value. Use an integer year", parameter),
        )
    })
}

/// One yearly stat row as served to clients.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct StatsView {
    pub station_id: String,
    pub year: i32,
    pub avg_max_celsius: Option<f64>,
    pub avg_min_celsius: Option<f64>,
    pub total_precip_cm: Option<f64>,
}

const FROM_CLAUSE: &str =
    " FROM yearly_station_stats y JOIN weather_stations s ON s.id = y.station_id";

pub async fn query_stats(
    db: &Database,
    filter: &StatsFilter,
    page: Page,
) -> Result<Paginated<StatsView>> {
    let mut count: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT COUNT(*)");
    count.push(FROM_CLAUSE);
    filter.push_where(&mut count);
    let total_count: i64 = count.build_query_scalar().fetch_one(db.pool()).await?;

    let mut select: QueryBuilder<Sqlite> = QueryBuilder::new(
        "SELECT s.station_code AS station_id, y.year, \
         y.avg_max_celsius, y.avg_min_celsius, y.total_precip_cm",
    );
    select.push(FROM_CLAUSE);
    filter.push_where(&mut select);
    select
        .push(" ORDER BY s.station_code, y.year LIMIT ")
        .push_bind(page.limit)
        .push(" OFFSET ")
        .push_bind(page.offset);

    let data = select
        .build_query_as::<StatsView>()
        .fetch_all(db.pool())
        .await?;

    Ok(Paginated::new(data, total_count, page))
}
