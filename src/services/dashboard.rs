//! Dashboard summary
//!
//! Everything the overview screen shows for one scope on one day: permit
//! status counts overall and per sector, the expiring and expired lists,
//! payment totals and the latest records.

use chrono::NaiveDate;

use crate::config::Settings;
use crate::error::PermitResult;
use crate::lifecycle::{days_until, LifecycleStatus, LifecycleTally};
use crate::models::{Facility, Money, Payment, RecordScope};
use crate::storage::Storage;

use super::facility::FacilityService;
use super::payment::PaymentService;

/// How many of the newest facilities and payments are shown
pub const RECENT_LIMIT: usize = 5;

/// A facility flagged on the dashboard
#[derive(Debug, Clone)]
pub struct FlaggedFacility {
    pub facility: Facility,
    /// Days until expiry (negative once past); `None` if the date is unreadable
    pub days_left: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct Dashboard {
    pub today: NaiveDate,
    pub horizon_days: u32,
    pub tally: LifecycleTally,
    /// Soonest expiry first
    pub expiring: Vec<FlaggedFacility>,
    /// Longest overdue first; unreadable dates last
    pub expired: Vec<FlaggedFacility>,
    pub total_payments: usize,
    pub revenue: Money,
    pub recent_facilities: Vec<Facility>,
    pub recent_payments: Vec<Payment>,
}

impl Dashboard {
    pub fn total_facilities(&self) -> usize {
        self.tally.totals.total()
    }
}

pub struct DashboardService<'a> {
    storage: &'a Storage,
    settings: &'a Settings,
}

impl<'a> DashboardService<'a> {
    pub fn new(storage: &'a Storage, settings: &'a Settings) -> Self {
        Self { storage, settings }
    }

    pub fn build(&self, today: NaiveDate, scope: &RecordScope) -> PermitResult<Dashboard> {
        let classified = FacilityService::new(self.storage, self.settings).classified(scope, today)?;

        let tally: LifecycleTally = classified
            .iter()
            .map(|(f, status)| (f.sector.as_deref(), *status))
            .collect();

        let mut expiring = Vec::new();
        let mut expired = Vec::new();
        for (facility, status) in &classified {
            let flagged = || FlaggedFacility {
                days_left: days_until(today, &facility.expiry()),
                facility: facility.clone(),
            };
            match status {
                LifecycleStatus::Expiring => expiring.push(flagged()),
                LifecycleStatus::Expired => expired.push(flagged()),
                LifecycleStatus::Valid => {}
            }
        }
        // None sorts after every Some
        let soonest = |f: &FlaggedFacility| (f.days_left.is_none(), f.days_left);
        expiring.sort_by_key(soonest);
        expired.sort_by_key(soonest);

        let payments = PaymentService::new(self.storage, self.settings).list(scope)?;
        let revenue = payments.iter().map(|p| p.amount_paid).sum();

        let dashboard = Dashboard {
            today,
            horizon_days: self.settings.expiry_horizon_days,
            expiring,
            expired,
            total_payments: payments.len(),
            revenue,
            recent_facilities: classified
                .into_iter()
                .take(RECENT_LIMIT)
                .map(|(f, _)| f)
                .collect(),
            recent_payments: payments.into_iter().take(RECENT_LIMIT).collect(),
            tally,
        };

        tracing::debug!(
            facilities = dashboard.total_facilities(),
            expiring = dashboard.expiring.len(),
            expired = dashboard.expired.len(),
            "dashboard built"
        );
        Ok(dashboard)
    }
}
