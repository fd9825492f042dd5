//! Business logic services for the Stockcast engine

pub mod alert;
pub mod dashboard;
pub mod inventory;
pub mod prediction;
pub mod product;
pub mod replenishment;
pub mod scheduler;

pub use alert::{AlertService, CycleReport, PassOutcome};
pub use dashboard::DashboardService;
pub use inventory::InventoryService;
pub use prediction::PredictionService;
pub use product::ProductService;
pub use scheduler::{AlertScheduler, CycleOutcome, CycleState};
