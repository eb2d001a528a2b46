use std::sync::Arc;

use chrono::Utc;
use sea_orm::{IntoActiveModel, Set};
use uuid::Uuid;

use crate::errors::InternalError;
use crate::providers::CryptoProvider;
use crate::stores::UserStore;
use crate::types::db::{employee, user};
use crate::types::internal::role_mapping::user_role_for;

/// A login record written for an employee, with the plaintext shown once
#[derive(Debug, Clone)]
pub struct IssuedCredential {
    pub user: user::Model,
    pub temp_password: String,
}

/// Issues and maintains the login record that mirrors an employee by email
pub struct CredentialProvider {
    user_store: UserStore,
    crypto: Arc<CryptoProvider>,
}

impl CredentialProvider {
    pub fn new(user_store: UserStore, crypto: Arc<CryptoProvider>) -> Self {
        Self { user_store, crypto }
    }

    /// Generate a temporary password and create or update the employee's user
    ///
    /// The user is forced to change the password on next login, and its
    /// `active` flag follows the employee's access eligibility.
    ///
    /// # Returns
    /// * `Ok(IssuedCredential)` - User row after the upsert plus the plaintext password
    /// * `Err(InternalError)` - Hashing or the write failed
    pub async fn issue(&self, employee: &employee::Model) -> Result<IssuedCredential, InternalError> {
        let temp_password = self.crypto.generate_secure_password();
        let password_hash = self.crypto.hash_password(&temp_password)?;
        let role = user_role_for(&employee.role);
        let now = Utc::now().timestamp();

        let user = match self.user_store.find_by_email(&employee.email).await? {
            Some(existing) => {
                let mut row = existing.into_active_model();
                row.name = Set(employee.name.clone());
                row.role = Set(role);
                row.password_hash = Set(password_hash);
                row.must_change_password = Set(true);
                row.active = Set(employee.has_system_access());
                row.updated_at = Set(now);
                self.user_store.update(row).await?
            }
            None => {
                let row = user::ActiveModel {
                    id: Set(Uuid::new_v4().to_string()),
                    email: Set(employee.email.clone()),
                    name: Set(employee.name.clone()),
                    role: Set(role),
                    password_hash: Set(password_hash),
                    must_change_password: Set(true),
                    active: Set(employee.has_system_access()),
                    created_at: Set(now),
                    updated_at: Set(now),
                };
                self.user_store.insert(row).await?
            }
        };

        tracing::debug!("Issued credentials for employee {}", employee.employee_code);

        Ok(IssuedCredential { user, temp_password })
    }

    /// Mirror name, email, role and access onto the user found under `previous_email`
    ///
    /// # Returns
    /// * `Ok(true)` - A user was found and updated
    /// * `Ok(false)` - No user exists for the employee
    pub async fn sync_from_employee(
        &self,
        previous_email: &str,
        employee: &employee::Model,
    ) -> Result<bool, InternalError> {
        let Some(existing) = self.user_store.find_by_email(previous_email).await? else {
            return Ok(false);
        };

        let mut row = existing.into_active_model();
        row.name = Set(employee.name.clone());
        row.email = Set(employee.email.clone());
        row.role = Set(user_role_for(&employee.role));
        row.active = Set(employee.has_system_access());
        row.updated_at = Set(Utc::now().timestamp());
        self.user_store.update(row).await?;

        Ok(true)
    }

    /// Turn off the login for `email`; `Ok(false)` when no user exists
    pub async fn deactivate(&self, email: &str) -> Result<bool, InternalError> {
        let Some(existing) = self.user_store.find_by_email(email).await? else {
            return Ok(false);
        };

        let mut row = existing.into_active_model();
        row.active = Set(false);
        row.updated_at = Set(Utc::now().timestamp());
        self.user_store.update(row).await?;

        Ok(true)
    }
}
