use crate::domain::principal::PrincipalKind;
use crate::error::PortalError;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const CUSTOMER_COOKIE: &str = "portal_session";
pub const STAFF_COOKIE: &str = "staff_session";

pub const CUSTOMER_SESSION_HOURS: i64 = 1;
pub const STAFF_SESSION_HOURS: i64 = 8;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: Uuid,
    pub kind: PrincipalKind,
    pub iat: i64,
    pub exp: i64,
}

/// Issues and verifies signed session tokens. Customer and staff tokens are
/// disjoint namespaces: a token minted for one kind never verifies as the
/// other, whatever channel it arrives on.
#[derive(Clone)]
pub struct SessionAuthenticator {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl SessionAuthenticator {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::default();
        validation.leeway = 0;
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub fn issue_customer(&self, customer_id: Uuid) -> Result<String, PortalError> {
        self.issue(customer_id, PrincipalKind::Customer, Duration::hours(CUSTOMER_SESSION_HOURS))
    }

    pub fn issue_staff(&self, staff_id: Uuid) -> Result<String, PortalError> {
        self.issue(staff_id, PrincipalKind::Staff, Duration::hours(STAFF_SESSION_HOURS))
    }

    pub fn issue(
        &self,
        principal_id: Uuid,
        kind: PrincipalKind,
        lifetime: Duration,
    ) -> Result<String, PortalError> {
        let now = Utc::now();
        let claims = SessionClaims {
            sub: principal_id,
            kind,
            iat: now.timestamp(),
            exp: (now + lifetime).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|_| PortalError::Unauthenticated)
    }

    /// Signature and expiry check plus namespace check. Every failure mode
    /// collapses to `Unauthenticated` so callers cannot probe which check
    /// tripped.
    pub fn verify(&self, token: &str, expected: PrincipalKind) -> Result<SessionClaims, PortalError> {
        let data = decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|_| PortalError::Unauthenticated)?;
        if data.claims.kind != expected {
            return Err(PortalError::Unauthenticated);
        }
        Ok(data.claims)
    }
}
