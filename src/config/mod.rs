//! Configuration module for Permit Desk
//!
//! - Platform path resolution with an environment override
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::PermitPaths;
pub use settings::Settings;
