use sea_orm::sea_query::{Expr, Func};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryFilter};

use crate::errors::InternalError;
use crate::types::db::user::{self, Entity as User};

/// Repository for login records; rows are matched to employees by email only
#[derive(Clone)]
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<user::Model>, InternalError> {
        User::find()
            .filter(Expr::expr(Func::lower(Expr::col(user::Column::Email))).eq(email.trim().to_lowercase()))
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("find_user_by_email", e))
    }

    pub async fn insert(&self, row: user::ActiveModel) -> Result<user::Model, InternalError> {
        row.insert(&self.db)
            .await
            .map_err(|e| InternalError::database("insert_user", e))
    }

    pub async fn update(&self, row: user::ActiveModel) -> Result<user::Model, InternalError> {
        row.update(&self.db)
            .await
            .map_err(|e| InternalError::database("update_user", e))
    }

    pub async fn delete_by_email(&self, email: &str) -> Result<u64, InternalError> {
        let result = User::delete_many()
            .filter(Expr::expr(Func::lower(Expr::col(user::Column::Email))).eq(email.trim().to_lowercase()))
            .exec(&self.db)
            .await
            .map_err(|e| InternalError::database("delete_user_by_email", e))?;
        Ok(result.rows_affected)
    }
}
