use std::sync::Arc;

use poem::Request;
use poem_openapi::param::Path;
use poem_openapi::{payload::Json, OpenApi, Tags};

use crate::api::{helpers, BearerAuth};
use crate::coordinators::KycCoordinator;
use crate::errors::ApiError;
use crate::providers::TokenProvider;
use crate::types::dto::kyc::{
    KycResponse, KycReviewRequest, KycReviewResponse, KycSubmissionForm, KycSubmitApiResponse,
    KycSubmittedResponse,
};
use crate::AppData;

/// KYC submission and review endpoints
pub struct KycApi {
    coordinator: KycCoordinator,
    token_provider: Arc<TokenProvider>,
}

impl KycApi {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            token_provider: app_data.token_provider.clone(),
            coordinator: KycCoordinator::new(app_data),
        }
    }
}

#[derive(Tags)]
enum KycTags {
    /// Identity verification
    Kyc,
}

#[OpenApi(prefix_path = "/api")]
impl KycApi {
    /// Submit KYC details and documents
    ///
    /// Files that fail type or size checks are skipped and listed in
    /// `rejected_files`; the submission fails only if none are accepted.
    #[oai(path = "/kyc", method = "post", tag = "KycTags::Kyc")]
    async fn submit_kyc(
        &self,
        req: &Request,
        auth: BearerAuth,
        form: KycSubmissionForm,
    ) -> Result<KycSubmitApiResponse, ApiError> {
        let ctx = helpers::authenticated_context(req, &auth, &self.token_provider)?;
        let input = form.into_input().await?;
        let outcome = self.coordinator.submit_kyc(&ctx, input).await?;
        Ok(KycSubmitApiResponse::Created(Json(KycSubmittedResponse::try_from_outcome(outcome)?)))
    }

    /// Fetch one KYC submission
    #[oai(path = "/kyc/:id", method = "get", tag = "KycTags::Kyc")]
    async fn get_kyc(&self, req: &Request, auth: BearerAuth, id: Path<i32>) -> Result<Json<KycResponse>, ApiError> {
        let ctx = helpers::authenticated_context(req, &auth, &self.token_provider)?;
        let submission = self.coordinator.get_kyc(&ctx, id.0).await?;
        Ok(Json(KycResponse::try_from_model(submission)?))
    }

    /// Review a KYC submission
    ///
    /// Approval promotes the employee to a permanent code and sends the
    /// approval notification.
    #[oai(path = "/kyc/:id/review", method = "put", tag = "KycTags::Kyc")]
    async fn review_kyc(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<i32>,
        body: Json<KycReviewRequest>,
    ) -> Result<Json<KycReviewResponse>, ApiError> {
        let ctx = helpers::authenticated_context(req, &auth, &self.token_provider)?;
        let reviewed = self.coordinator.review_kyc(&ctx, id.0, body.0.into()).await?;
        Ok(Json(KycReviewResponse::try_from_outcome(reviewed)?))
    }
}
