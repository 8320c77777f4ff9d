//! Service layer for Permit Desk
//!
//! Business rules on top of the record store: validation, write-time
//! normalization, scoping, bulk import and the dashboard summary.

pub mod dashboard;
pub mod facility;
pub mod import;
pub mod payment;
pub mod region;

pub use dashboard::{Dashboard, DashboardService, FlaggedFacility};
pub use facility::{FacilityChanges, FacilityInput, FacilityService};
pub use import::{
    read_rows, read_sheet, read_workbook_rows, ImportPreview, ImportRow, ImportService,
    ImportSummary, ValidationError,
};
pub use payment::{PaymentInput, PaymentService};
pub use region::RegionService;
