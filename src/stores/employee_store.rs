use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QuerySelect,
};

use crate::errors::InternalError;
use crate::types::db::employee::{self, Entity as Employee};

/// Repository for `employees` rows
#[derive(Clone)]
pub struct EmployeeStore {
    db: DatabaseConnection,
}

impl EmployeeStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Insert a new employee row
    ///
    /// Unique violations are returned as-is so callers can tell a code
    /// collision (retry) from an email collision (validation).
    pub async fn insert(&self, row: employee::ActiveModel) -> Result<employee::Model, InternalError> {
        row.insert(&self.db)
            .await
            .map_err(|e| InternalError::database("insert_employee", e))
    }

    pub async fn update(&self, row: employee::ActiveModel) -> Result<employee::Model, InternalError> {
        row.update(&self.db)
            .await
            .map_err(|e| InternalError::database("update_employee", e))
    }

    pub async fn delete(&self, id: i32) -> Result<u64, InternalError> {
        let result = Employee::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| InternalError::database("delete_employee", e))?;
        Ok(result.rows_affected)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<employee::Model>, InternalError> {
        Employee::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_employee_by_id", e))
    }

    /// Case-insensitive lookup over active and soft-deleted rows
    pub async fn find_by_email(&self, email: &str) -> Result<Option<employee::Model>, InternalError> {
        Employee::find()
            .filter(Expr::expr(Func::lower(Expr::col(employee::Column::Email))).eq(email.trim().to_lowercase()))
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_employee_by_email", e))
    }

    /// Whether another row already uses `email`
    pub async fn email_taken(&self, email: &str, excluding: Option<i32>) -> Result<bool, InternalError> {
        Ok(match self.find_by_email(email).await? {
            Some(existing) => Some(existing.id) != excluding,
            None => false,
        })
    }

    /// Match on the current code or the provisional code it replaced
    pub async fn find_by_code(&self, code: &str) -> Result<Option<employee::Model>, InternalError> {
        let code = code.trim();
        Employee::find()
            .filter(
                Condition::any()
                    .add(employee::Column::EmployeeCode.eq(code))
                    .add(employee::Column::ProvisionalCode.eq(code)),
            )
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_employee_by_code", e))
    }

    pub async fn code_exists(&self, code: &str) -> Result<bool, InternalError> {
        Ok(self.find_by_code(code).await?.is_some())
    }

    pub async fn find_by_exact_name(&self, name: &str) -> Result<Option<employee::Model>, InternalError> {
        Employee::find()
            .filter(employee::Column::Name.eq(name.trim()))
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_employee_by_name", e))
    }

    pub async fn find_by_name_ignoring_case(&self, name: &str) -> Result<Option<employee::Model>, InternalError> {
        Employee::find()
            .filter(Expr::expr(Func::upper(Expr::col(employee::Column::Name))).eq(name.trim().to_uppercase()))
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_employee_by_name_ignoring_case", e))
    }

    /// Every current or provisional code starting with `prefix`
    pub async fn codes_with_prefix(&self, prefix: &str) -> Result<Vec<String>, InternalError> {
        let pattern = format!("{}%", prefix);

        let current: Vec<String> = Employee::find()
            .select_only()
            .column(employee::Column::EmployeeCode)
            .filter(employee::Column::EmployeeCode.like(&pattern))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("list_employee_codes", e))?;

        let provisional: Vec<Option<String>> = Employee::find()
            .select_only()
            .column(employee::Column::ProvisionalCode)
            .filter(employee::Column::ProvisionalCode.like(&pattern))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("list_provisional_codes", e))?;

        Ok(current.into_iter().chain(provisional.into_iter().flatten()).collect())
    }

    pub async fn count(&self) -> Result<u64, InternalError> {
        Employee::find()
            .count(&self.db)
            .await
            .map_err(|e| InternalError::database("count_employees", e))
    }
}
