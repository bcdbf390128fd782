//! Signed session credential: mint and validation.
//!
//! The credential is a stateless HS256 JWT. Validity is signature + expiry
//! only; there is no server-side session store and no revocation list. The
//! role set is a point-in-time snapshot taken at issuance — role changes do
//! not retroactively affect already-minted sessions.

use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::Deserialize;
#[cfg(any(feature = "USE_ONLY_IN_API_SERVICE", test))]
use serde::Serialize;
use uuid::Uuid;

use roombook_domain::role::RoleName;

/// Session lifetime in seconds (7 days).
pub const SESSION_EXP_SECS: u64 = 604_800;

/// Identity extracted from a validated session credential.
#[derive(Debug, Clone)]
pub struct SessionInfo {
    pub user_id: Uuid,
    pub email: String,
    /// Role snapshot taken when the session was minted.
    pub roles: Vec<RoleName>,
    pub expires_at: u64,
}

/// Errors returned by [`validate_session`].
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("invalid signature")]
    InvalidSignature,
    #[error("session expired")]
    Expired,
    #[error("malformed credential")]
    Malformed,
}

/// JWT claims carried by a session credential.
///
/// [`Deserialize`] is always available — every consumer validates sessions.
/// [`Serialize`] requires the **`USE_ONLY_IN_API_SERVICE`** cargo feature.
/// Only the API service enables it because it is the sole session issuer.
#[derive(Debug, Deserialize)]
#[cfg_attr(any(feature = "USE_ONLY_IN_API_SERVICE", test), derive(Serialize))]
pub struct SessionClaims {
    /// User ID (UUID string).
    pub sub: String,
    pub email: String,
    /// Role names held at issuance.
    pub roles: Vec<RoleName>,
    /// Issued-at timestamp (seconds since UNIX epoch).
    pub iat: u64,
    /// Expiration timestamp (seconds since UNIX epoch).
    pub exp: u64,
}

fn now_secs() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("system clock before UNIX epoch")
        .as_secs()
}

/// Decode and validate a session JWT, returning raw claims.
///
/// Validation: HS256, exp checked, required claims: `exp` + `sub`.
/// Zero leeway — the expiry boundary is exact.
fn decode_session(token: &str, secret: &str) -> Result<SessionClaims, SessionError> {
    let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
    validation.validate_exp = true;
    validation.leeway = 0;
    validation.required_spec_claims.clear();
    validation.set_required_spec_claims(&["exp", "sub"]);

    let data = decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => SessionError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidSignature => SessionError::InvalidSignature,
        _ => SessionError::Malformed,
    })?;

    Ok(data.claims)
}

/// Validate a session cookie value, returning the parsed identity.
///
/// Any signature mismatch, malformed payload, or past expiry is an error;
/// callers map every variant to an unauthenticated response.
pub fn validate_session(cookie_value: &str, secret: &str) -> Result<SessionInfo, SessionError> {
    let claims = decode_session(cookie_value, secret)?;
    let user_id = claims
        .sub
        .parse::<Uuid>()
        .map_err(|_| SessionError::Malformed)?;
    Ok(SessionInfo {
        user_id,
        email: claims.email,
        roles: claims.roles,
        expires_at: claims.exp,
    })
}

/// Mint a signed session credential for a user with the given role snapshot.
///
/// Returns the encoded JWT and its expiry timestamp. Requires the
/// `USE_ONLY_IN_API_SERVICE` feature — only the API service issues sessions.
#[cfg(any(feature = "USE_ONLY_IN_API_SERVICE", test))]
pub fn issue_session(
    user_id: Uuid,
    email: &str,
    roles: Vec<RoleName>,
    secret: &str,
) -> Result<(String, u64), jsonwebtoken::errors::Error> {
    use jsonwebtoken::{EncodingKey, Header, encode};

    let iat = now_secs();
    let exp = iat + SESSION_EXP_SECS;
    let claims = SessionClaims {
        sub: user_id.to_string(),
        email: email.to_owned(),
        roles,
        iat,
        exp,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;
    Ok((token, exp))
}
