pub mod config;
pub mod conversion;
pub mod dataset;
pub mod error;
pub mod position;
pub mod query;
pub mod records;
pub mod report;
pub mod similarity;
pub mod table;

pub use error::{Error, Result};
