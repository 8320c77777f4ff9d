//! Payment model
//!
//! A permit fee or levy received by an office.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{OfficeId, PaymentId, RegionId};
use super::money::Money;
use crate::lifecycle::{parse_date, ParsedDate};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,

    /// Payer
    pub name: String,

    pub location: String,

    /// Free-text sector
    #[serde(default)]
    pub sector: Option<String>,

    #[serde(default)]
    pub category: Option<String>,

    pub amount_paid: Money,

    /// Date as recorded
    pub payment_date: String,

    #[serde(default)]
    pub region_id: Option<RegionId>,

    #[serde(default)]
    pub office_id: Option<OfficeId>,

    pub created_at: DateTime<Utc>,
}

impl Payment {
    pub fn new(
        name: impl Into<String>,
        location: impl Into<String>,
        amount_paid: Money,
        payment_date: impl Into<String>,
    ) -> Self {
        Self {
            id: PaymentId::new(),
            name: name.into(),
            location: location.into(),
            sector: None,
            category: None,
            amount_paid,
            payment_date: payment_date.into(),
            region_id: None,
            office_id: None,
            created_at: Utc::now(),
        }
    }

    /// Stored payment date; stored text is always day-first
    pub fn paid_on(&self) -> ParsedDate {
        parse_date(self.payment_date.as_str())
    }

    /// Case-insensitive substring match over name, sector and location
    pub fn matches_term(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }
        [
            Some(self.name.as_str()),
            self.sector.as_deref(),
            Some(self.location.as_str()),
        ]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&term))
    }

    pub fn validate(&self) -> Result<(), PaymentValidationError> {
        if self.name.trim().is_empty() {
            return Err(PaymentValidationError::EmptyName);
        }
        if self.location.trim().is_empty() {
            return Err(PaymentValidationError::EmptyLocation);
        }
        if self.amount_paid.is_zero() {
            return Err(PaymentValidationError::ZeroAmount);
        }
        if self.payment_date.trim().is_empty() {
            return Err(PaymentValidationError::MissingDate);
        }
        Ok(())
    }
}

impl fmt::Display for Payment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.amount_paid)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentValidationError {
    EmptyName,
    EmptyLocation,
    ZeroAmount,
    MissingDate,
}

impl PaymentValidationError {
    /// Record field the error refers to
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyName => "name",
            Self::EmptyLocation => "location",
            Self::ZeroAmount => "amount_paid",
            Self::MissingDate => "payment_date",
        }
    }
}

impl fmt::Display for PaymentValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Name is required"),
            Self::EmptyLocation => write!(f, "Location is required"),
            Self::ZeroAmount => write!(f, "Valid amount is required"),
            Self::MissingDate => write!(f, "Payment date is required"),
        }
    }
}

impl std::error::Error for PaymentValidationError {}
