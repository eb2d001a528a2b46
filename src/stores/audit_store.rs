use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::errors::internal::AuditError;
use crate::errors::InternalError;
use crate::types::db::audit_event;
use crate::types::internal::audit::AuditEvent;

/// Append-only access to the `audit_events` table
pub struct AuditStore {
    db: DatabaseConnection,
}

impl AuditStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Encode the event data as JSON and append one row stamped with the current time
    ///
    /// # Errors
    ///
    /// `AuditError` when the actor is blank or the data cannot be encoded,
    /// `InternalError::Database` when the insert fails
    pub async fn write_event(&self, event: AuditEvent) -> Result<(), InternalError> {
        let event_type = event.event_type.to_string();
        if event.actor_id.trim().is_empty() {
            return Err(AuditError::MissingActor(event_type).into());
        }

        let data_json = serde_json::to_string(&event.data).map_err(|e| AuditError::EncodeFailed {
            event_type: event_type.clone(),
            message: e.to_string(),
        })?;

        let row = audit_event::ActiveModel {
            id: sea_orm::ActiveValue::NotSet,
            occurred_at: Set(Utc::now().timestamp()),
            event_type: Set(event_type),
            actor_id: Set(event.actor_id),
            subject: Set(event.subject),
            request_id: Set(event.request_id),
            ip_address: Set(event.ip_address),
            data: Set(data_json),
        };

        row.insert(&self.db)
            .await
            .map_err(|e| InternalError::database("write_audit_event", e))?;

        Ok(())
    }

    /// Every event recorded against one employee code, oldest first
    pub async fn events_for_subject(&self, subject: &str) -> Result<Vec<audit_event::Model>, InternalError> {
        audit_event::Entity::find()
            .filter(audit_event::Column::Subject.eq(subject))
            .order_by_asc(audit_event::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("find_audit_events_by_subject", e))
    }
}
