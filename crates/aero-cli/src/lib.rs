//! CLI library components of the airline ETL.

pub mod config;
pub mod logging;
pub mod pipeline;
