//! HTTP request handlers

pub mod alert;
pub mod dashboard;
pub mod ml;
pub mod prediction;

pub use alert::*;
pub use dashboard::*;
pub use ml::*;
pub use prediction::*;
