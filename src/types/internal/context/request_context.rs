use std::net::IpAddr;

use crate::types::db::user::UserRole;
use crate::types::internal::auth::Claims;

use super::{request_id::RequestId, request_source::RequestSource};

/// Who is calling, from where, under which request id
///
/// Built once per HTTP request (or CLI command) and handed down to the
/// coordinators, which use it for role checks and audit rows.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestContext {
    pub ip_address: Option<IpAddr>,
    pub request_id: RequestId,
    /// True once a bearer token has been verified
    pub authenticated: bool,
    pub claims: Option<Claims>,
    pub source: RequestSource,
    /// Token subject, `anonymous`, or `cli:<command>`
    pub actor_id: String,
}

impl RequestContext {
    pub fn for_api(ip_address: Option<IpAddr>) -> Self {
        Self {
            ip_address,
            request_id: RequestId::new(),
            authenticated: false,
            claims: None,
            source: RequestSource::API,
            actor_id: "anonymous".to_string(),
        }
    }

    pub fn for_cli(command_name: &str) -> Self {
        Self {
            ip_address: None,
            request_id: RequestId::new(),
            authenticated: false,
            claims: None,
            source: RequestSource::CLI,
            actor_id: format!("cli:{}", command_name),
        }
    }

    /// Attach verified claims; the subject becomes the actor
    pub fn with_claims(mut self, claims: Claims) -> Self {
        self.authenticated = true;
        self.actor_id = claims.sub.clone();
        self.claims = Some(claims);
        self
    }

    /// `None` for anonymous callers and for roles the service does not know
    pub fn caller_role(&self) -> Option<UserRole> {
        self.claims.as_ref().and_then(|c| UserRole::parse(&c.role))
    }

    pub fn role_label(&self) -> String {
        self.claims
            .as_ref()
            .map(|c| c.role.clone())
            .unwrap_or_else(|| "anonymous".to_string())
    }
}
