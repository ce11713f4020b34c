use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Total harvested yield for one calendar year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct CropYield {
    pub year: i32,
    pub yield_amount: i64,
}

impl CropYield {
    pub fn new(year: i32, yield_amount: i64) -> Self {
        Self { year, yield_amount }
    }
}
