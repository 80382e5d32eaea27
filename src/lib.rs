pub mod aggregate;
pub mod chart;
pub mod cli;
pub mod error;
pub mod metrics;
pub mod parser;
pub mod plan;
pub mod report;
pub mod table;

pub use error::ReportError;
