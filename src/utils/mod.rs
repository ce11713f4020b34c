pub mod constants;
pub mod logging;
pub mod progress;
pub mod units;

pub use constants::*;
pub use logging::{init_logging, LoggingOptions};
pub use progress::ProgressReporter;
