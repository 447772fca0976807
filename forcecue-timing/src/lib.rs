pub mod manual;
pub mod schedule;
pub mod timer;

pub use manual::ManualTimer;
pub use schedule::RepeatingTask;
pub use timer::{CalibrationStats, HighPrecisionTimer, Timer};
