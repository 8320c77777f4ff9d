//! Payment service

use crate::audit::EntityType;
use crate::config::Settings;
use crate::error::{PermitError, PermitResult};
use crate::lifecycle::normalize_date_cell;
use crate::models::{Money, Payment, PaymentId, RecordScope};
use crate::storage::Storage;

use super::facility::clean_sector;

#[derive(Debug, Clone, Default)]
pub struct PaymentInput {
    pub name: String,
    pub location: String,
    pub sector: Option<String>,
    pub category: Option<String>,
    pub amount_paid: Money,
    pub payment_date: String,
}

pub struct PaymentService<'a> {
    storage: &'a Storage,
    settings: &'a Settings,
}

impl<'a> PaymentService<'a> {
    pub fn new(storage: &'a Storage, settings: &'a Settings) -> Self {
        Self { storage, settings }
    }

    /// Build a payment record from input without saving it
    pub(crate) fn prepare(&self, input: PaymentInput, scope: &RecordScope) -> Payment {
        let payment_date =
            normalize_date_cell(&input.payment_date, self.settings.date_order).unwrap_or_default();

        let mut payment = Payment::new(
            input.name.trim(),
            input.location.trim(),
            input.amount_paid,
            payment_date,
        );
        payment.sector = clean_sector(input.sector.as_deref());
        payment.category = input
            .category
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        payment.region_id = scope.region_id;
        payment.office_id = scope.office_id;
        payment
    }

    pub fn create(&self, input: PaymentInput, scope: &RecordScope) -> PermitResult<Payment> {
        let payment = self.prepare(input, scope);
        payment
            .validate()
            .map_err(|e| PermitError::Validation(e.to_string()))?;

        self.storage.payments.insert(payment.clone())?;
        self.storage.payments.save()?;

        self.storage.log_create(
            EntityType::Payment,
            payment.id.to_string(),
            Some(payment.name.clone()),
            &payment,
        )?;

        tracing::debug!(id = %payment.id, amount = %payment.amount_paid, "payment recorded");
        Ok(payment)
    }

    pub fn delete(&self, id: PaymentId) -> PermitResult<Payment> {
        let payment = self
            .storage
            .payments
            .delete(id)?
            .ok_or_else(|| PermitError::payment_not_found(id.to_string()))?;
        self.storage.payments.save()?;

        self.storage.log_delete(
            EntityType::Payment,
            payment.id.to_string(),
            Some(payment.name.clone()),
            &payment,
        )?;

        Ok(payment)
    }

    /// Payment by full or short id
    pub fn resolve(&self, identifier: &str) -> PermitResult<Payment> {
        if let Ok(id) = identifier.trim().parse::<PaymentId>() {
            if let Some(payment) = self.storage.payments.get(id)? {
                return Ok(payment);
            }
        }

        self.storage
            .payments
            .get_all()?
            .into_iter()
            .find(|p| p.id.matches(identifier))
            .ok_or_else(|| PermitError::payment_not_found(identifier))
    }

    /// Payments inside `scope`, newest first
    pub fn list(&self, scope: &RecordScope) -> PermitResult<Vec<Payment>> {
        Ok(self
            .storage
            .payments
            .get_all()?
            .into_iter()
            .filter(|p| scope.admits_payment(p))
            .collect())
    }

    /// Payments whose name and location contain the given fragments
    ///
    /// Both fragments are case-insensitive; an absent or blank fragment
    /// matches everything.
    pub fn search(
        &self,
        name: Option<&str>,
        location: Option<&str>,
        scope: &RecordScope,
    ) -> PermitResult<Vec<Payment>> {
        let fragment = |value: Option<&str>| {
            value
                .map(|v| v.trim().to_lowercase())
                .filter(|v| !v.is_empty())
        };
        let name = fragment(name);
        let location = fragment(location);

        Ok(self
            .list(scope)?
            .into_iter()
            .filter(|p| {
                name.as_ref()
                    .map_or(true, |n| p.name.to_lowercase().contains(n))
                    && location
                        .as_ref()
                        .map_or(true, |l| p.location.to_lowercase().contains(l))
            })
            .collect())
    }

    /// Sum of amounts paid inside `scope`
    pub fn total_revenue(&self, scope: &RecordScope) -> PermitResult<Money> {
        Ok(self.list(scope)?.iter().map(|p| p.amount_paid).sum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PermitPaths;
    use crate::models::OfficeId;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = PermitPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn input(name: &str, location: &str, minor: u64) -> PaymentInput {
        PaymentInput {
            name: name.into(),
            location: location.into(),
            sector: Some(" Mining ".into()),
            category: Some("Permit fee".into()),
            amount_paid: Money::from_minor(minor),
            payment_date: "2025-03-01".into(),
        }
    }

    #[test]
    fn test_create_normalizes() {
        let (_temp_dir, storage) = create_test_storage();
        let settings = Settings::default();
        let service = PaymentService::new(&storage, &settings);

        let payment = service
            .create(input(" Acme Quarry ", "Tema", 50_000), &RecordScope::all())
            .unwrap();
        assert_eq!(payment.name, "Acme Quarry");
        assert_eq!(payment.sector.as_deref(), Some("mining"));
        assert_eq!(payment.payment_date, "01/03/2025");
    }

    #[test]
    fn test_create_validation() {
        let (_temp_dir, storage) = create_test_storage();
        let settings = Settings::default();
        let service = PaymentService::new(&storage, &settings);

        let err = service
            .create(input("Acme", "Tema", 0), &RecordScope::all())
            .unwrap_err();
        assert!(err.to_string().contains("Valid amount is required"));

        let mut missing_date = input("Acme", "Tema", 100);
        missing_date.payment_date = "  ".into();
        assert!(service
            .create(missing_date, &RecordScope::all())
            .unwrap_err()
            .is_validation());
        assert_eq!(storage.payments.count().unwrap(), 0);
    }

    #[test]
    fn test_search_and_revenue() {
        let (_temp_dir, storage) = create_test_storage();
        let settings = Settings::default();
        let service = PaymentService::new(&storage, &settings);
        let office = OfficeId::new();
        let scoped = RecordScope::new(None, Some(office));

        service.create(input("Acme Quarry", "Tema", 10_000), &scoped).unwrap();
        service.create(input("Acme Stone", "Kumasi", 20_000), &scoped).unwrap();
        service
            .create(input("Sea View Hotel", "Tema", 5_050), &RecordScope::all())
            .unwrap();

        let acme = service.search(Some("ACME"), None, &RecordScope::all()).unwrap();
        assert_eq!(acme.len(), 2);

        let acme_tema = service
            .search(Some("acme"), Some("tema"), &RecordScope::all())
            .unwrap();
        assert_eq!(acme_tema.len(), 1);

        assert_eq!(
            service.total_revenue(&RecordScope::all()).unwrap(),
            Money::from_minor(35_050)
        );
        assert_eq!(service.total_revenue(&scoped).unwrap(), Money::from_minor(30_000));
    }

    #[test]
    fn test_delete_by_short_id() {
        let (_temp_dir, storage) = create_test_storage();
        let settings = Settings::default();
        let service = PaymentService::new(&storage, &settings);
        let payment = service
            .create(input("Acme", "Tema", 100), &RecordScope::all())
            .unwrap();

        let found = service.resolve(&payment.id.to_string()).unwrap();
        service.delete(found.id).unwrap();
        assert!(service.list(&RecordScope::all()).unwrap().is_empty());
        assert!(service.resolve("pmt-00000000").unwrap_err().is_not_found());
    }
}
