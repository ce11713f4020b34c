/// Reserved raw value meaning "no measurement"
pub const MISSING_VALUE: i32 = -9999;

/// Raw measurements are stored as integer tenths of their natural unit
pub const TENTHS_PER_UNIT: f64 = 10.0;

/// Tenths of a millimetre per centimetre
pub const TENTHS_MM_PER_CM: f64 = 100.0;

/// Source file extension for both weather and crop-yield directories
pub const SOURCE_FILE_EXTENSION: &str = "txt";

/// Date format of the first column in station files
pub const STATION_FILE_DATE_FORMAT: &str = "%Y%m%d";

/// Date format accepted by the read API
pub const API_DATE_FORMAT: &str = "%Y-%m-%d";

/// Minimum number of tab-separated fields in a station file line
pub const OBSERVATION_FIELD_COUNT: usize = 4;

/// Minimum number of whitespace-separated fields in a crop-yield line
pub const YIELD_FIELD_COUNT: usize = 2;

/// Processing defaults
pub const DEFAULT_OBSERVATION_BATCH_SIZE: usize = 10_000;
pub const DEFAULT_STATS_BATCH_SIZE: usize = 500;
pub const DEFAULT_BUFFER_SIZE: usize = 8192 * 16; // 128KB

/// Connection defaults
pub const DEFAULT_DATABASE_URL: &str = "sqlite://weather.db";
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:5000";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Pagination bounds
pub const DEFAULT_PAGE_LIMIT: i64 = 100;
pub const MIN_PAGE_LIMIT: i64 = 1;
pub const MAX_PAGE_LIMIT: i64 = 10_000;

/// Default source directories for the combined `ingest` command
pub const DEFAULT_WX_DATA_DIR: &str = "data/wx_data";
pub const DEFAULT_YLD_DATA_DIR: &str = "data/yld_data";
