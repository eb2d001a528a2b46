use std::sync::Arc;

use poem::Request;
use poem_openapi::param::Path;
use poem_openapi::{payload::Json, OpenApi, Tags};

use crate::api::{helpers, BearerAuth};
use crate::coordinators::EmployeeCoordinator;
use crate::errors::ApiError;
use crate::providers::TokenProvider;
use crate::types::dto::employee::{
    CreateEmployeeApiResponse, CreateEmployeeRequest, DeleteEmployeeResponse, EmployeeResponse,
    UpdateEmployeeRequest, UpdateEmployeeResponse,
};
use crate::AppData;

/// Employee onboarding and maintenance endpoints
pub struct EmployeeApi {
    coordinator: EmployeeCoordinator,
    token_provider: Arc<TokenProvider>,
}

impl EmployeeApi {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            token_provider: app_data.token_provider.clone(),
            coordinator: EmployeeCoordinator::new(app_data),
        }
    }
}

#[derive(Tags)]
enum EmployeeTags {
    /// Employee lifecycle
    Employees,
}

#[OpenApi(prefix_path = "/api")]
impl EmployeeApi {
    /// Onboard an employee
    ///
    /// Allocates a provisional code, issues login credentials and sends the
    /// onboarding notification. The temporary password is returned once.
    #[oai(path = "/employees", method = "post", tag = "EmployeeTags::Employees")]
    async fn create_employee(
        &self,
        req: &Request,
        auth: BearerAuth,
        body: Json<CreateEmployeeRequest>,
    ) -> Result<CreateEmployeeApiResponse, ApiError> {
        let ctx = helpers::authenticated_context(req, &auth, &self.token_provider)?;
        let created = self.coordinator.create_employee(&ctx, body.0.into()).await?;
        Ok(CreateEmployeeApiResponse::Created(Json(created.into())))
    }

    /// Fetch one employee
    #[oai(path = "/employees/:id", method = "get", tag = "EmployeeTags::Employees")]
    async fn get_employee(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<i32>,
    ) -> Result<Json<EmployeeResponse>, ApiError> {
        let ctx = helpers::authenticated_context(req, &auth, &self.token_provider)?;
        let employee = self.coordinator.get_employee(&ctx, id.0).await?;
        Ok(Json(employee.into()))
    }

    /// Update an employee
    ///
    /// Name, email and role changes are mirrored onto the login account.
    #[oai(path = "/employees/:id", method = "put", tag = "EmployeeTags::Employees")]
    async fn update_employee(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<i32>,
        body: Json<UpdateEmployeeRequest>,
    ) -> Result<Json<UpdateEmployeeResponse>, ApiError> {
        let ctx = helpers::authenticated_context(req, &auth, &self.token_provider)?;
        let updated = self.coordinator.update_employee(&ctx, id.0, body.0.into()).await?;
        Ok(Json(updated.into()))
    }

    /// Delete an employee
    ///
    /// Admins purge the employee and every dependent record; HR deactivates.
    #[oai(path = "/employees/:id", method = "delete", tag = "EmployeeTags::Employees")]
    async fn delete_employee(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<i32>,
    ) -> Result<Json<DeleteEmployeeResponse>, ApiError> {
        let ctx = helpers::authenticated_context(req, &auth, &self.token_provider)?;
        let outcome = self.coordinator.delete_employee(&ctx, id.0).await?;
        Ok(Json(outcome.into()))
    }
}
