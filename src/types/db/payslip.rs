use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "payslips")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Older payslips carry the numeric employee id, newer ones the email
    pub employee_id: Option<i32>,
    pub email: Option<String>,
    pub period: String,
    pub net_pay_cents: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
