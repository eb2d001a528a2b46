use std::sync::Arc;

use crate::config::SecretManager;
use crate::providers::TokenProvider;
use crate::types::db::user::UserRole;
use crate::types::internal::context::RequestContext;

/// Mint a bearer token and print it to stdout
///
/// # Arguments
/// * `secret_manager` - Provides the JWT signing secret
/// * `sub` - Subject claim
/// * `role` - Role claim
/// * `ttl_minutes` - Lifetime of the token
pub fn issue_token(
    secret_manager: Arc<SecretManager>,
    sub: &str,
    role: UserRole,
    ttl_minutes: i64,
) -> Result<(), Box<dyn std::error::Error>> {
    if ttl_minutes <= 0 {
        return Err("ttl-minutes must be positive".into());
    }

    let ctx = RequestContext::for_cli("issue-token");
    let token_provider = TokenProvider::new(secret_manager);
    let (token, claims) = token_provider.issue_token(sub, role, ttl_minutes)?;

    tracing::info!(
        actor = %ctx.actor_id,
        request_id = %ctx.request_id,
        sub = %claims.sub, role = %claims.role, jti = %claims.jti,
        "Issued operator token"
    );

    println!("{}", token);
    Ok(())
}
