use std::net::IpAddr;

use poem::Request;

use crate::api::BearerAuth;
use crate::errors::ApiError;
use crate::providers::TokenProvider;
use crate::types::internal::context::RequestContext;

/// Client address from proxy headers, falling back to the socket peer
pub fn extract_ip_address(req: &Request) -> Option<IpAddr> {
    if let Some(forwarded) = req.header("X-Forwarded-For") {
        if let Some(ip) = forwarded.split(',').next() {
            if let Ok(ip) = ip.trim().parse() {
                return Some(ip);
            }
        }
    }

    if let Some(real_ip) = req.header("X-Real-IP") {
        if let Ok(ip) = real_ip.trim().parse() {
            return Some(ip);
        }
    }

    req.remote_addr().as_socket_addr().map(|addr| addr.ip())
}

/// Build an authenticated RequestContext from the bearer token
///
/// # Errors
/// Returns `ApiError::Unauthorized` when the token is invalid or expired
pub fn authenticated_context(
    req: &Request,
    auth: &BearerAuth,
    token_provider: &TokenProvider,
) -> Result<RequestContext, ApiError> {
    let claims = token_provider.validate_jwt(&auth.0.token).map_err(ApiError::from_internal_error)?;
    Ok(RequestContext::for_api(extract_ip_address(req)).with_claims(claims))
}
