pub mod chart;
pub mod summary;
pub mod time;
