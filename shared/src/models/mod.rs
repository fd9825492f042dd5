//! Domain models for the Stockcast forecasting and alerting platform

mod alert;
mod dashboard;
mod forecast;
mod inventory;
mod product;

pub use alert::*;
pub use dashboard::*;
pub use forecast::*;
pub use inventory::*;
pub use product::*;
