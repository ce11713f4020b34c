//! Filtered, paginated reads over observations and yearly statistics.

pub mod observations;
pub mod pagination;
pub mod stats;

pub use observations::{parse_date, query_observations, ObservationFilter, ObservationView};
pub use pagination::{Page, Paginated, PaginationMeta};
pub use stats::{parse_year, query_stats, StatsFilter, StatsView};
