//! Core data models for Permit Desk
//!
//! Facilities, payments and the region/office partition that scopes them.

pub mod facility;
pub mod ids;
pub mod money;
pub mod payment;
pub mod region;
pub mod scope;

pub use facility::{Facility, FacilityValidationError};
pub use ids::{FacilityId, OfficeId, PaymentId, RegionId};
pub use money::{Money, MoneyParseError};
pub use payment::{Payment, PaymentValidationError};
pub use region::{Office, Region};
pub use scope::RecordScope;
