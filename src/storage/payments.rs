//! Payment repository for JSON storage
//!
//! Manages loading and saving payments to payments.json. Payments are
//! inserted, never merged.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::PermitError;
use crate::models::{Payment, PaymentId};

use super::file_io::{read_json, write_json_atomic};
use super::{read_lock_error, write_lock_error};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct PaymentData {
    payments: Vec<Payment>,
}

pub struct PaymentRepository {
    path: PathBuf,
    data: RwLock<HashMap<PaymentId, Payment>>,
}

impl PaymentRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    pub fn load(&self) -> Result<(), PermitError> {
        let file_data: PaymentData = read_json(&self.path)?;

        let mut data = self.data.write().map_err(write_lock_error)?;
        *data = file_data
            .payments
            .into_iter()
            .map(|payment| (payment.id, payment))
            .collect();

        tracing::debug!(count = data.len(), "payments loaded");
        Ok(())
    }

    pub fn save(&self) -> Result<(), PermitError> {
        let payments = self.get_all()?;
        write_json_atomic(&self.path, &PaymentData { payments })
    }

    /// Add a new payment; an existing id is a duplicate
    pub fn insert(&self, payment: Payment) -> Result<(), PermitError> {
        let mut data = self.data.write().map_err(write_lock_error)?;

        if data.contains_key(&payment.id) {
            return Err(PermitError::Duplicate {
                entity_type: "Payment",
                identifier: payment.id.to_string(),
            });
        }
        data.insert(payment.id, payment);
        Ok(())
    }

    pub fn get(&self, id: PaymentId) -> Result<Option<Payment>, PermitError> {
        let data = self.data.read().map_err(read_lock_error)?;
        Ok(data.get(&id).cloned())
    }

    /// All payments, newest first
    pub fn get_all(&self) -> Result<Vec<Payment>, PermitError> {
        let data = self.data.read().map_err(read_lock_error)?;

        let mut payments: Vec<_> = data.values().cloned().collect();
        payments.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(payments)
    }

    pub fn delete(&self, id: PaymentId) -> Result<Option<Payment>, PermitError> {
        let mut data = self.data.write().map_err(write_lock_error)?;
        Ok(data.remove(&id))
    }

    pub fn count(&self) -> Result<usize, PermitError> {
        let data = self.data.read().map_err(read_lock_error)?;
        Ok(data.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, PaymentRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = PaymentRepository::new(temp_dir.path().join("payments.json"));
        repo.load().unwrap();
        (temp_dir, repo)
    }

    fn payment(name: &str) -> Payment {
        Payment::new(name, "Tema", Money::from_minor(10_000), "01/02/2025")
    }

    #[test]
    fn test_insert_and_get() {
        let (_temp_dir, repo) = create_test_repo();
        let p = payment("Acme Quarry");
        let id = p.id;
        repo.insert(p).unwrap();

        assert_eq!(repo.get(id).unwrap().unwrap().name, "Acme Quarry");
        assert_eq!(repo.count().unwrap(), 1);
    }

    #[test]
    fn test_same_name_inserts_twice() {
        let (_temp_dir, repo) = create_test_repo();
        repo.insert(payment("Acme Quarry")).unwrap();
        repo.insert(payment("Acme Quarry")).unwrap();
        assert_eq!(repo.count().unwrap(), 2);
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let (_temp_dir, repo) = create_test_repo();
        let p = payment("Acme Quarry");
        repo.insert(p.clone()).unwrap();
        assert!(matches!(repo.insert(p), Err(PermitError::Duplicate { .. })));
    }

    #[test]
    fn test_save_and_reload() {
        let (temp_dir, repo) = create_test_repo();
        let p = payment("Acme Quarry");
        let id = p.id;
        repo.insert(p).unwrap();
        repo.save().unwrap();

        let reloaded = PaymentRepository::new(temp_dir.path().join("payments.json"));
        reloaded.load().unwrap();
        assert_eq!(
            reloaded.get(id).unwrap().unwrap().amount_paid,
            Money::from_minor(10_000)
        );
    }

    #[test]
    fn test_delete() {
        let (_temp_dir, repo) = create_test_repo();
        let p = payment("Acme Quarry");
        let id = p.id;
        repo.insert(p).unwrap();
        assert!(repo.delete(id).unwrap().is_some());
        assert_eq!(repo.count().unwrap(), 0);
    }
}
