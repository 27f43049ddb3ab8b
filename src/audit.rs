use sea_orm::{ActiveModelTrait, ActiveValue::NotSet, Set};
use serde_json::Value;
use uuid::Uuid;

use crate::{entity::audit_logs::ActiveModel as AuditActive, error::AppResult, state::AppState};

pub async fn log_audit(
    state: &AppState,
    user_id: Option<Uuid>,
    action: &str,
    resource: Option<&str>,
    metadata: Option<Value>,
) -> AppResult<()> {
    AuditActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        action: Set(action.to_string()),
        resource: Set(resource.map(str::to_string)),
        metadata: Set(metadata),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(())
}

/// Writes an audit row and swallows the failure.
pub async fn record(
    state: &AppState,
    user_id: Uuid,
    action: &str,
    resource: &str,
    metadata: Value,
) {
    if let Err(err) = log_audit(state, Some(user_id), action, Some(resource), Some(metadata)).await
    {
        tracing::warn!(error = %err, action, "audit log failed");
    }
}
