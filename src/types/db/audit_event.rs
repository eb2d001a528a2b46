use sea_orm::entity::prelude::*;

/// One row per lifecycle action, written to the separate audit database
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "audit_events")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Unix seconds
    pub occurred_at: i64,
    pub event_type: String,
    pub actor_id: String,
    /// Employee code (temporary or permanent) the event concerns, if any
    pub subject: Option<String>,
    pub request_id: String,
    pub ip_address: Option<String>,
    /// JSON object with event specific fields
    pub data: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
