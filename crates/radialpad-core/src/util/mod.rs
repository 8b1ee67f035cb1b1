pub use average_timer::AverageTimer;

pub mod average_timer;
