pub mod constants;
pub mod progress;
pub mod time;
pub mod units;

pub use constants::*;
pub use progress::ProgressReporter;
