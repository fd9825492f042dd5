//! External API integrations

pub mod ml_service;

pub use ml_service::MlServiceClient;
