pub mod config;
pub mod errors;
pub mod meta;
pub mod plotting;
