pub mod stats_aggregator;
pub mod weather_ingestor;
pub mod yield_ingestor;

pub use stats_aggregator::{AggregationReport, StatsAggregator, YearlyGroup};
pub use weather_ingestor::{WeatherIngestor, WeatherIngestReport};
pub use yield_ingestor::{merge_first_seen, YieldIngestReport, YieldIngestor};
