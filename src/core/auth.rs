//! Tenant context and authorization
//!
//! Authentication itself happens upstream (gateway or auth service). This
//! service trusts the identity headers it receives:
//!
//! - `X-Organization-Id`: tenant UUID, required on every business route
//! - `X-User-Id`: acting user UUID, optional
//! - `X-Roles`: comma separated roles (`staff`, `admin`, ...), optional

use crate::core::error::{OmisError, RequestError};
use axum::extract::FromRequestParts;
use axum::http::HeaderMap;
use axum::http::request::Parts;
use uuid::Uuid;

pub const ORGANIZATION_HEADER: &str = "x-organization-id";
pub const USER_HEADER: &str = "x-user-id";
pub const ROLES_HEADER: &str = "x-roles";

pub const ROLE_STAFF: &str = "staff";
pub const ROLE_ADMIN: &str = "admin";

/// Identity of the caller
///
/// Built from the `x-organization-id`, `x-user-id` and `x-roles` headers as
/// sent. Nothing here authenticates them: the service must sit behind a
/// trusted gateway that verifies the caller and overwrites these headers,
/// otherwise any client can claim staff rights.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub organization_id: Uuid,
    pub user_id: Option<Uuid>,
    pub roles: Vec<String>,
}

impl AuthContext {
    pub fn new(organization_id: Uuid) -> Self {
        Self {
            organization_id,
            user_id: None,
            roles: Vec::new(),
        }
    }

    pub fn with_role(mut self, role: &str) -> Self {
        self.roles.push(role.to_string());
        self
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    /// Distributor staff can manage catalog and every customer's orders
    ///
    /// Trusts the `x-roles` header, see [`AuthContext`].
    pub fn is_staff(&self) -> bool {
        self.has_role(ROLE_STAFF) || self.has_role(ROLE_ADMIN)
    }

    /// Fail with 403 unless `policy` allows this context
    pub fn require(&self, policy: &AuthPolicy) -> Result<(), OmisError> {
        if policy.check(self) {
            Ok(())
        } else {
            Err(RequestError::Forbidden {
                message: policy.describe(),
            }
            .into())
        }
    }

    /// Read the context from request headers
    pub fn from_headers(headers: &HeaderMap) -> Result<Self, OmisError> {
        let organization = headers
            .get(ORGANIZATION_HEADER)
            .ok_or_else(|| RequestError::Unauthorized {
                message: format!("missing {} header", ORGANIZATION_HEADER),
            })?;
        let organization_id = parse_uuid_header(ORGANIZATION_HEADER, organization.to_str().ok())?;

        let user_id = match headers.get(USER_HEADER) {
            Some(value) => Some(parse_uuid_header(USER_HEADER, value.to_str().ok())?),
            None => None,
        };

        let roles = headers
            .get(ROLES_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(|raw| {
                raw.split(',')
                    .map(|r| r.trim().to_ascii_lowercase())
                    .filter(|r| !r.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            organization_id,
            user_id,
            roles,
        })
    }
}

fn parse_uuid_header(header: &str, value: Option<&str>) -> Result<Uuid, OmisError> {
    value
        .and_then(|v| Uuid::parse_str(v.trim()).ok())
        .ok_or_else(|| {
            RequestError::InvalidHeader {
                header: header.to_string(),
                message: "expected a UUID".to_string(),
            }
            .into()
        })
}

impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = OmisError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Self::from_headers(&parts.headers)
    }
}

/// Authorization policy for an operation
#[derive(Debug, Clone)]
pub enum AuthPolicy {
    /// Any caller with a tenant context
    Authenticated,

    /// Distributor staff or admin
    Staff,

    /// Caller must have one of these roles
    HasRole(Vec<String>),

    /// Caller's organization owns the resource, or caller is staff
    OwnerOrStaff(Uuid),
}

impl AuthPolicy {
    pub fn check(&self, context: &AuthContext) -> bool {
        match self {
            AuthPolicy::Authenticated => true,
            AuthPolicy::Staff => context.is_staff(),
            AuthPolicy::HasRole(roles) => roles.iter().any(|r| context.has_role(r)),
            AuthPolicy::OwnerOrStaff(owner) => {
                context.organization_id == *owner || context.is_staff()
            }
        }
    }

    fn describe(&self) -> String {
        match self {
            AuthPolicy::Authenticated => "authentication required".to_string(),
            AuthPolicy::Staff => "staff role required".to_string(),
            AuthPolicy::HasRole(roles) => format!("one of roles [{}] required", roles.join(", ")),
            AuthPolicy::OwnerOrStaff(_) => "resource belongs to another organization".to_string(),
        }
    }
}
