use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A weather station, keyed externally by the stem of its source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, FromRow)]
pub struct Station {
    pub id: i64,

    #[validate(length(min = 1, max = 20))]
    pub station_code: String,

    #[validate(length(max = 50))]
    pub state: Option<String>,
}

impl Station {
    pub fn new(id: i64, station_code: String, state: Option<String>) -> Self {
        Self {
            id,
            station_code,
            state,
        }
    }

    /// Station code as derived from a source file name, before it has an id.
    pub fn candidate(station_code: impl Into<String>) -> Self {
        Self::new(0, station_code.into(), None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_station_validation() {
        let station = Station::new(1, "USC00110072".to_string(), Some("IL".to_string()));
        assert!(station.validate().is_ok());
        assert!(Station::candidate("USC00110072").validate().is_ok());
    }

    #[test]
    fn test_invalid_station_code() {
        assert!(Station::candidate("").validate().is_err());
        assert!(Station::candidate("X".repeat(21)).validate().is_err());
    }
}
