use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};

use crate::errors::InternalError;
use crate::types::db::kyc_submission::{self, Entity as KycSubmission};

/// Repository for `kyc_submissions` rows
#[derive(Clone)]
pub struct KycStore {
    db: DatabaseConnection,
}

impl KycStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn insert(&self, row: kyc_submission::ActiveModel) -> Result<kyc_submission::Model, InternalError> {
        row.insert(&self.db)
            .await
            .map_err(|e| InternalError::database("insert_kyc_submission", e))
    }

    pub async fn update(&self, row: kyc_submission::ActiveModel) -> Result<kyc_submission::Model, InternalError> {
        row.update(&self.db)
            .await
            .map_err(|e| InternalError::database("update_kyc_submission", e))
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<kyc_submission::Model>, InternalError> {
        KycSubmission::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_kyc_submission", e))
    }

    /// Most recent submission filed under any of `codes`
    pub async fn latest_for_codes(&self, codes: &[String]) -> Result<Option<kyc_submission::Model>, InternalError> {
        KycSubmission::find()
            .filter(kyc_submission::Column::EmployeeId.is_in(codes.iter().cloned()))
            .order_by_desc(kyc_submission::Column::CreatedAt)
            .order_by_desc(kyc_submission::Column::Id)
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_latest_kyc_submission", e))
    }

    /// Most recent submission filed under a code starting with `prefix` for the
    /// same person, matched by full name (case-insensitive) or email
    pub async fn latest_with_code_prefix_for(
        &self,
        prefix: &str,
        full_name: &str,
        email: Option<&str>,
    ) -> Result<Option<kyc_submission::Model>, InternalError> {
        let mut same_person = Condition::any().add(
            Expr::expr(Func::upper(Expr::col(kyc_submission::Column::FullName))).eq(full_name.trim().to_uppercase()),
        );
        if let Some(email) = email.map(str::trim).filter(|e| !e.is_empty()) {
            same_person = same_person
                .add(Expr::expr(Func::lower(Expr::col(kyc_submission::Column::Email))).eq(email.to_lowercase()));
        }

        KycSubmission::find()
            .filter(kyc_submission::Column::EmployeeId.starts_with(prefix))
            .filter(same_person)
            .order_by_desc(kyc_submission::Column::CreatedAt)
            .order_by_desc(kyc_submission::Column::Id)
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_latest_placeholder_kyc_submission", e))
    }

    /// Submissions referencing any of `codes`, or filed under `full_name` (case-insensitive)
    pub async fn find_for_employee(
        &self,
        codes: &[String],
        full_name: &str,
    ) -> Result<Vec<kyc_submission::Model>, InternalError> {
        KycSubmission::find()
            .filter(
                Condition::any()
                    .add(kyc_submission::Column::EmployeeId.is_in(codes.iter().cloned()))
                    .add(
                        Expr::expr(Func::upper(Expr::col(kyc_submission::Column::FullName)))
                            .eq(full_name.trim().to_uppercase()),
                    ),
            )
            .order_by_asc(kyc_submission::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("find_kyc_submissions_for_employee", e))
    }

    pub async fn delete(&self, id: i32) -> Result<u64, InternalError> {
        let result = KycSubmission::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| InternalError::database("delete_kyc_submission", e))?;
        Ok(result.rows_affected)
    }
}
