pub mod crop_yield;
pub mod observation;
pub mod station;
pub mod yearly_stats;

pub use crop_yield::CropYield;
pub use observation::NewObservation;
pub use station::Station;
pub use yearly_stats::YearlyStationStat;
