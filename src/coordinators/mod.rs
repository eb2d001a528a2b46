// Coordinators layer - Workflow orchestration
//
// Coordinators compose store and provider operations into the lifecycle
// workflows exposed by the API. Best-effort steps are reported through the
// outcome structs rather than as errors.

pub mod employee_coordinator;
pub mod kyc_coordinator;

pub use employee_coordinator::EmployeeCoordinator;
pub use kyc_coordinator::KycCoordinator;

#[cfg(test)]
mod employee_coordinator_test;

use crate::errors::internal::TokenError;
use crate::errors::InternalError;
use crate::types::db::user::UserRole;
use crate::types::internal::context::RequestContext;

/// Role of the caller; rejects contexts without validated claims
pub(crate) fn authenticated_role(ctx: &RequestContext) -> Result<Option<UserRole>, InternalError> {
    if !ctx.authenticated || ctx.claims.is_none() {
        return Err(TokenError::Missing.into());
    }
    Ok(ctx.caller_role())
}

/// True for roles allowed to manage employees and review KYC
pub(crate) fn is_people_manager(role: Option<UserRole>) -> bool {
    matches!(role, Some(UserRole::Admin) | Some(UserRole::Hr))
}
